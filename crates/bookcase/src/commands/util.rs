//! Shared helpers for command handlers.

use std::io::{self, IsTerminal};

use bookcase_core::{Book, BookId, BookStore, FileStorage};

use crate::error::CliError;

/// Look up a book by id, or fail with a not-found pointing at `list`.
pub fn find_book<'a>(store: &'a BookStore<FileStorage>, id: &str) -> Result<&'a Book, CliError> {
    store
        .get(&BookId::from(id))
        .ok_or_else(|| CliError::book_not_found(id))
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so the action is refused.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))?;
    Ok(confirmed)
}
