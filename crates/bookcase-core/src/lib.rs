//! Domain core for the bookcase catalog manager, shared by the CLI and TUI.
//!
//! - **[`BookStore`]**: the canonical ordered list of [`Book`] records,
//!   rewritten in full to a [`KeyValueStore`] after every mutation and
//!   seeded/merged by id on open.
//!
//! - **[`derive`]**: pure projection of a book list through a
//!   [`ViewState`] (search term, genre filter, sort column and direction).
//!
//! - **[`BookForm`]**: create/edit form controller with per-field
//!   validation. A successful submit yields a [`Submission`] the caller
//!   applies to the store.
//!
//! - **Domain model** ([`model`]): [`Book`], [`BookId`], [`Genre`],
//!   [`BookType`], plus the [`Field`]/[`FieldErrors`] validation vocabulary.

pub mod error;
pub mod form;
pub mod model;
pub mod seed;
pub mod storage;
pub mod store;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use form::{BookForm, FormMode, Submission};
pub use model::{Book, BookId, BookType, Field, FieldErrors, Genre};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
pub use store::{BookStore, CORRUPT_SUFFIX, DEFAULT_STORAGE_KEY};
pub use view::{GenreFilter, SortDirection, SortField, ViewState, derive};
