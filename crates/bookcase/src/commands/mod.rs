//! Command dispatch: bridges CLI args -> store operations -> output formatting.

pub mod books;
pub mod config_cmd;
pub mod import;
pub mod util;

use bookcase_core::{BookStore, FileStorage};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a catalog-bound command to the appropriate handler.
pub fn dispatch(
    cmd: Command,
    store: &mut BookStore<FileStorage>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::List(args) => books::list(store, args, global),
        Command::Show { id } => books::show(store, &id, global),
        Command::Add(fields) => books::add(store, fields, global),
        Command::Edit { id, fields } => books::edit(store, &id, fields, global),
        Command::Delete { id } => books::delete(store, &id, global),
        Command::Import { file } => import::handle(store, &file, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
