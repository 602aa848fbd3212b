// ── Field validation vocabulary ──
//
// `Field` names every editable attribute of a book in form order.
// `FieldErrors` collects at most one message per field; both the form
// controller and the store speak in these terms so a rejected record
// always reports every failing field at once.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Editable book attributes, ordered as they appear on the form.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    Title,
    Author,
    Isbn,
    PublicationDate,
    Genre,
    Price,
    PurchaseLink,
    BookType,
    Description,
}

impl Field {
    /// Human-readable label used by form and detail views.
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Book Title",
            Self::Author => "Author",
            Self::Isbn => "ISBN",
            Self::PublicationDate => "Publication Date",
            Self::Genre => "Genre",
            Self::Price => "Price",
            Self::PurchaseLink => "Purchase Link",
            Self::BookType => "Book Type",
            Self::Description => "Description",
        }
    }

    /// Whether the field holds free text (as opposed to an enumerated choice).
    pub fn is_text(self) -> bool {
        !matches!(self, Self::Genre | Self::BookType)
    }
}

/// User-facing validation messages.
pub mod messages {
    pub const TITLE_REQUIRED: &str = "Title is required";
    pub const AUTHOR_REQUIRED: &str = "Author is required";
    pub const ISBN_REQUIRED: &str = "ISBN is required";
    pub const ISBN_NUMERIC: &str = "ISBN must contain only numbers";
    pub const DATE_REQUIRED: &str = "Publication date is required";
    pub const DATE_INVALID: &str = "Publication date must be a valid date (YYYY-MM-DD)";
    pub const GENRE_INVALID: &str = "Genre must be fiction or non-fiction";
    pub const PRICE_REQUIRED: &str = "Price is required";
    pub const PRICE_NOT_NUMBER: &str = "Price must be a number";
    pub const PRICE_NOT_POSITIVE: &str = "Price must be greater than 0";
    pub const LINK_REQUIRED: &str = "Purchase link is required";
    pub const LINK_INVALID: &str = "Please enter a valid URL";
    pub const BOOK_TYPE_INVALID: &str = "Book type must be Ebook or Printedbook";
}

// ── Rules shared by Book::validate and BookForm ─────────────────────

pub(crate) fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

pub(crate) fn is_valid_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

pub(crate) fn price_error(price: f64) -> Option<&'static str> {
    if !price.is_finite() {
        Some(messages::PRICE_NOT_NUMBER)
    } else if price <= 0.0 {
        Some(messages::PRICE_NOT_POSITIVE)
    } else {
        None
    }
}

// ── FieldErrors ─────────────────────────────────────────────────────

/// Per-field validation failures. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure. The first message for a field wins.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn remove(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterate failures in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (_, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
            first = false;
        }
        Ok(())
    }
}
