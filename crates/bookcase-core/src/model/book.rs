use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::id::BookId;
use super::validation::{self, Field, FieldErrors, messages};

// ── Enumerations ────────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Genre {
    #[default]
    Fiction,
    NonFiction,
}

impl Genre {
    pub fn label(self) -> &'static str {
        match self {
            Self::Fiction => "Fiction",
            Self::NonFiction => "Non-Fiction",
        }
    }
}

/// Physical format. Older data spells the printed variant `printedBook`
/// or `Printed`; all spellings read back as [`BookType::Printedbook`].
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
#[strum(ascii_case_insensitive)]
pub enum BookType {
    #[default]
    #[serde(alias = "ebook", alias = "E-Book")]
    #[strum(to_string = "Ebook", serialize = "e-book")]
    Ebook,
    #[serde(alias = "printedBook", alias = "Printed", alias = "printed")]
    #[strum(to_string = "Printedbook", serialize = "printed")]
    Printedbook,
}

impl BookType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ebook => "E-Book",
            Self::Printedbook => "Printed Book",
        }
    }
}

// ── Book ────────────────────────────────────────────────────────────

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_date: NaiveDate,
    pub genre: Genre,
    #[serde(deserialize_with = "number_or_string")]
    pub price: f64,
    pub purchase_link: String,
    pub book_type: BookType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Book {
    /// Check the record against the catalog invariants: required text
    /// present, numeric ISBN, positive price, absolute purchase URL.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.title.trim().is_empty() {
            errors.insert(Field::Title, messages::TITLE_REQUIRED);
        }
        if self.author.trim().is_empty() {
            errors.insert(Field::Author, messages::AUTHOR_REQUIRED);
        }
        if self.isbn.is_empty() {
            errors.insert(Field::Isbn, messages::ISBN_REQUIRED);
        } else if !validation::is_numeric(&self.isbn) {
            errors.insert(Field::Isbn, messages::ISBN_NUMERIC);
        }
        if let Some(message) = validation::price_error(self.price) {
            errors.insert(Field::Price, message);
        }
        if self.purchase_link.trim().is_empty() {
            errors.insert(Field::PurchaseLink, messages::LINK_REQUIRED);
        } else if !validation::is_valid_url(&self.purchase_link) {
            errors.insert(Field::PurchaseLink, messages::LINK_INVALID);
        }

        errors.into_result()
    }

    /// Price rendered as dollars with two decimals.
    pub fn price_display(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// Display-ready value of a single field.
    pub fn field_text(&self, field: Field) -> String {
        match field {
            Field::Title => self.title.clone(),
            Field::Author => self.author.clone(),
            Field::Isbn => self.isbn.clone(),
            Field::PublicationDate => self.publication_date.to_string(),
            Field::Genre => self.genre.label().to_owned(),
            Field::Price => self.price_display(),
            Field::PurchaseLink => self.purchase_link.clone(),
            Field::BookType => self.book_type.label().to_owned(),
            Field::Description => self.description.clone().unwrap_or_default(),
        }
    }
}

/// Prices persisted by form-driven writers may be strings ("12.50").
fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid price: {s:?}"))),
    }
}
