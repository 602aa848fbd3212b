//! `import`: merge books from a JSON file into the catalog.

use std::path::Path;

use bookcase_core::{BookStore, FileStorage, seed};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub fn handle(
    store: &mut BookStore<FileStorage>,
    file: &Path,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let incoming = seed::read_seed(file)?;
    let offered = incoming.len();
    let appended = store.merge_seed(incoming)?;

    tracing::info!(file = %file.display(), offered, appended, "import finished");
    output::print_success(
        &format!(
            "Imported {appended} of {offered} books ({} already present)",
            offered - appended
        ),
        &global.color_mode(),
        global.quiet,
    );
    Ok(())
}
