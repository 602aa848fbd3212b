//! UI actions. Every state change in the TUI goes through one of these.

use std::fmt;
use std::sync::Arc;

use bookcase_core::{Book, BookId, GenreFilter, Submission};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A toast shown in the bottom-right corner for a few seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }
}

/// Operations that wait on a y/n answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteBook { id: BookId, title: String },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteBook { title, .. } => write!(f, "Delete \"{title}\"?"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    ToggleHelp,

    // ── Search & filters ──────────────────────────────────────────
    OpenSearch,
    /// Abandon the search and clear the term.
    CloseSearch,
    /// Hide the search bar, keeping the term.
    SearchSubmit,
    SearchInput(String),
    FilterGenre(GenreFilter),
    ClearFilters,

    // ── Catalog ───────────────────────────────────────────────────
    /// Fresh snapshot of the store, in store order.
    BooksUpdated(Arc<Vec<Book>>),
    NewBook,
    EditBook(Book),
    CancelEdit,
    SubmitBook(Submission),
    /// The store refused a submission; the editor restores it.
    SubmitRejected(Submission),
    RequestDelete(BookId),

    // ── Dialogs ───────────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,
    Notify(Notification),
}
