//! Canonical domain types: the [`Book`] record, its identifier, and the
//! field-level validation vocabulary shared by the store and the form.

mod book;
mod id;
mod validation;

pub use book::{Book, BookType, Genre};
pub use id::BookId;
pub use validation::{Field, FieldErrors, messages};
pub(crate) use validation::{is_numeric, is_valid_url, price_error};
