//! Create/edit form controller.
//!
//! [`BookForm`] holds raw text for every field, validates on submit and
//! emits a [`Submission`] for the caller to apply. It never touches the
//! store itself, so a rejected submit leaves the catalog untouched by
//! construction.

use chrono::NaiveDate;
use strum::IntoEnumIterator;

use crate::error::CoreError;
use crate::model::{
    Book, BookId, BookType, Field, FieldErrors, Genre, is_numeric, is_valid_url, messages,
    price_error,
};
use crate::storage::KeyValueStore;
use crate::store::BookStore;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    /// Bound to an existing record; its id survives the submit.
    Edit(BookId),
}

// ── Submission ──────────────────────────────────────────────────────

/// A validated record ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Created(Book),
    Updated(Book),
}

impl Submission {
    pub fn book(&self) -> &Book {
        match self {
            Self::Created(book) | Self::Updated(book) => book,
        }
    }

    pub fn into_book(self) -> Book {
        match self {
            Self::Created(book) | Self::Updated(book) => book,
        }
    }

    /// Confirmation text shown once the submission is stored.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Created(_) => "Book added successfully!",
            Self::Updated(_) => "Book updated successfully!",
        }
    }

    /// Write the record to `store`: append for a create, replace by id for
    /// an update. Updating a record that was deleted meanwhile is reported
    /// as `NotFound`.
    pub fn apply<S: KeyValueStore>(self, store: &mut BookStore<S>) -> Result<Book, CoreError> {
        match self {
            Self::Created(book) => {
                store.add(book.clone())?;
                Ok(book)
            }
            Self::Updated(book) => {
                if store.update(book.clone())? {
                    Ok(book)
                } else {
                    Err(CoreError::NotFound {
                        identifier: book.id.to_string(),
                    })
                }
            }
        }
    }
}

// ── BookForm ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookForm {
    mode: FormMode,
    title: String,
    author: String,
    isbn: String,
    publication_date: String,
    genre: String,
    price: String,
    purchase_link: String,
    book_type: String,
    description: String,
    errors: FieldErrors,
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            mode: FormMode::Create,
            title: String::new(),
            author: String::new(),
            isbn: String::new(),
            publication_date: String::new(),
            genre: Genre::default().to_string(),
            price: String::new(),
            purchase_link: String::new(),
            book_type: BookType::default().to_string(),
            description: String::new(),
            errors: FieldErrors::new(),
        }
    }
}

impl BookForm {
    /// Blank form in create mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Form in edit mode, pre-filled from `book`.
    pub fn edit(book: &Book) -> Self {
        Self {
            mode: FormMode::Edit(book.id.clone()),
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: digits_only(&book.isbn),
            publication_date: book.publication_date.format(DATE_FORMAT).to_string(),
            genre: book.genre.to_string(),
            price: book.price.to_string(),
            purchase_link: book.purchase_link.clone(),
            book_type: book.book_type.to_string(),
            description: book.description.clone().unwrap_or_default(),
            errors: FieldErrors::new(),
        }
    }

    /// Form pre-filled from a submission the store rejected, in the mode
    /// that produced it.
    pub fn reopen(submission: &Submission) -> Self {
        let mut form = Self::edit(submission.book());
        if let Submission::Created(_) = submission {
            form.mode = FormMode::Create;
        }
        form
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn title_text(&self) -> &'static str {
        if self.is_editing() { "Edit Book" } else { "Add New Book" }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() { "Update Book" } else { "Save Book" }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Author => &self.author,
            Field::Isbn => &self.isbn,
            Field::PublicationDate => &self.publication_date,
            Field::Genre => &self.genre,
            Field::Price => &self.price,
            Field::PurchaseLink => &self.purchase_link,
            Field::BookType => &self.book_type,
            Field::Description => &self.description,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Author => &mut self.author,
            Field::Isbn => &mut self.isbn,
            Field::PublicationDate => &mut self.publication_date,
            Field::Genre => &mut self.genre,
            Field::Price => &mut self.price,
            Field::PurchaseLink => &mut self.purchase_link,
            Field::BookType => &mut self.book_type,
            Field::Description => &mut self.description,
        }
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// Replace a field's raw value. ISBN input keeps digits only. Editing
    /// a field clears its pending error.
    pub fn set(&mut self, field: Field, value: &str) {
        let value = if field == Field::Isbn {
            digits_only(value)
        } else {
            value.to_owned()
        };
        *self.slot(field) = value;
        self.errors.remove(field);
    }

    /// Append one typed character.
    pub fn push_char(&mut self, field: Field, c: char) {
        if field == Field::Isbn && !c.is_ascii_digit() {
            return;
        }
        self.slot(field).push(c);
        self.errors.remove(field);
    }

    pub fn pop_char(&mut self, field: Field) {
        self.slot(field).pop();
        self.errors.remove(field);
    }

    /// Step an enumerated field (genre, book type) to its next or previous
    /// option. Text fields are left alone.
    pub fn cycle(&mut self, field: Field, forward: bool) {
        let next = match field {
            Field::Genre => {
                let current: Genre = self.genre.parse().unwrap_or_default();
                step(current, forward).to_string()
            }
            Field::BookType => {
                let current: BookType = self.book_type.parse().unwrap_or_default();
                step(current, forward).to_string()
            }
            _ => return,
        };
        *self.slot(field) = next;
        self.errors.remove(field);
    }

    /// Reset every field and error. The mode is kept.
    pub fn clear(&mut self) {
        let mode = std::mem::take(&mut self.mode);
        *self = Self { mode, ..Self::new() };
    }

    /// Abandon any edit and return to a blank create form.
    pub fn cancel(&mut self) {
        *self = Self::new();
    }

    // ── Submit ───────────────────────────────────────────────────────

    /// Validate and emit the record. On failure every failing field gets
    /// a message and the form keeps its input. On success the form resets
    /// to a blank create form.
    pub fn submit(&mut self) -> Result<Submission, FieldErrors> {
        let id = match &self.mode {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id.clone()),
        };

        match self.build(id) {
            Ok(submission) => {
                *self = Self::new();
                Ok(submission)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    fn build(&self, existing: Option<BookId>) -> Result<Submission, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.insert(Field::Title, messages::TITLE_REQUIRED);
        }
        let author = self.author.trim();
        if author.is_empty() {
            errors.insert(Field::Author, messages::AUTHOR_REQUIRED);
        }

        if self.isbn.is_empty() {
            errors.insert(Field::Isbn, messages::ISBN_REQUIRED);
        } else if !is_numeric(&self.isbn) {
            errors.insert(Field::Isbn, messages::ISBN_NUMERIC);
        }

        let date = self.publication_date.trim();
        let publication_date = if date.is_empty() {
            errors.insert(Field::PublicationDate, messages::DATE_REQUIRED);
            None
        } else {
            NaiveDate::parse_from_str(date, DATE_FORMAT)
                .map_err(|_| errors.insert(Field::PublicationDate, messages::DATE_INVALID))
                .ok()
        };

        let genre = self
            .genre
            .parse::<Genre>()
            .map_err(|_| errors.insert(Field::Genre, messages::GENRE_INVALID))
            .ok();

        let price = self.parse_price(&mut errors);

        let link = self.purchase_link.trim();
        if link.is_empty() {
            errors.insert(Field::PurchaseLink, messages::LINK_REQUIRED);
        } else if !is_valid_url(link) {
            errors.insert(Field::PurchaseLink, messages::LINK_INVALID);
        }

        let book_type = self
            .book_type
            .parse::<BookType>()
            .map_err(|_| errors.insert(Field::BookType, messages::BOOK_TYPE_INVALID))
            .ok();

        let (Some(publication_date), Some(genre), Some(price), Some(book_type), true) =
            (publication_date, genre, price, book_type, errors.is_empty())
        else {
            return Err(errors);
        };

        let description = self.description.trim();
        let book = Book {
            id: existing.clone().unwrap_or_else(BookId::generate),
            title: title.to_owned(),
            author: author.to_owned(),
            isbn: self.isbn.clone(),
            publication_date,
            genre,
            price,
            purchase_link: link.to_owned(),
            book_type,
            description: (!description.is_empty()).then(|| description.to_owned()),
        };

        Ok(match existing {
            Some(_) => Submission::Updated(book),
            None => Submission::Created(book),
        })
    }

    fn parse_price(&self, errors: &mut FieldErrors) -> Option<f64> {
        let raw = self.price.trim();
        if raw.is_empty() {
            errors.insert(Field::Price, messages::PRICE_REQUIRED);
            return None;
        }
        let Ok(price) = raw.parse::<f64>() else {
            errors.insert(Field::Price, messages::PRICE_NOT_NUMBER);
            return None;
        };
        if let Some(message) = price_error(price) {
            errors.insert(Field::Price, message);
            return None;
        }
        Some(price)
    }
}

fn step<T: IntoEnumIterator + PartialEq + Copy>(current: T, forward: bool) -> T {
    let all: Vec<T> = T::iter().collect();
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    let len = all.len();
    let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
    all.get(next).copied().unwrap_or(current)
}

fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::DEFAULT_STORAGE_KEY;
    use pretty_assertions::assert_eq;

    fn filled() -> BookForm {
        let mut form = BookForm::new();
        form.set(Field::Title, "The Pragmatic Programmer");
        form.set(Field::Author, "Andy Hunt");
        form.set(Field::Isbn, "978-0201616224");
        form.set(Field::PublicationDate, "1999-10-20");
        form.set(Field::Price, "39.95");
        form.set(Field::PurchaseLink, "https://example.com/book");
        form
    }

    #[test]
    fn defaults_match_blank_form() {
        let form = BookForm::new();
        assert_eq!(form.value(Field::Genre), "fiction");
        assert_eq!(form.value(Field::BookType), "Ebook");
        assert_eq!(form.value(Field::Price), "");
        assert_eq!(form.mode(), &FormMode::Create);
        assert_eq!(form.submit_label(), "Save Book");
    }

    #[test]
    fn empty_submit_reports_six_errors() {
        let mut form = BookForm::new();
        let errors = form.submit().unwrap_err();

        let fields: Vec<Field> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(
            fields,
            [
                Field::Title,
                Field::Author,
                Field::Isbn,
                Field::PublicationDate,
                Field::Price,
                Field::PurchaseLink,
            ]
        );
        assert_eq!(errors.get(Field::Title), Some("Title is required"));
        assert_eq!(errors.get(Field::Author), Some("Author is required"));
        assert_eq!(errors.get(Field::Isbn), Some("ISBN is required"));
        assert_eq!(errors.get(Field::PublicationDate), Some("Publication date is required"));
        assert_eq!(errors.get(Field::Price), Some("Price is required"));
        assert_eq!(errors.get(Field::PurchaseLink), Some("Purchase link is required"));
        assert_eq!(form.errors(), &errors);
    }

    #[test]
    fn isbn_keeps_digits_only() {
        let mut form = BookForm::new();
        form.set(Field::Isbn, "123abc456");
        assert_eq!(form.value(Field::Isbn), "123456");

        form.set(Field::Isbn, "abc123");
        assert_eq!(form.value(Field::Isbn), "123");

        form.push_char(Field::Isbn, 'x');
        form.push_char(Field::Isbn, '4');
        assert_eq!(form.value(Field::Isbn), "1234");
    }

    #[test]
    fn purchase_link_must_be_absolute_url() {
        let mut form = filled();
        form.set(Field::PurchaseLink, "invalid-url");
        let errors = form.submit().unwrap_err();
        assert_eq!(errors.get(Field::PurchaseLink), Some("Please enter a valid URL"));
        assert_eq!(errors.len(), 1);

        form.set(Field::PurchaseLink, "https://example.com/book");
        assert!(form.submit().is_ok());
    }

    #[test]
    fn price_must_be_positive_number() {
        let mut form = filled();
        form.set(Field::Price, "0");
        assert_eq!(
            form.submit().unwrap_err().get(Field::Price),
            Some("Price must be greater than 0")
        );
        form.set(Field::Price, "-3");
        assert_eq!(
            form.submit().unwrap_err().get(Field::Price),
            Some("Price must be greater than 0")
        );
        form.set(Field::Price, "abc");
        assert_eq!(
            form.submit().unwrap_err().get(Field::Price),
            Some("Price must be a number")
        );
        form.set(Field::Price, "NaN");
        assert_eq!(
            form.submit().unwrap_err().get(Field::Price),
            Some("Price must be a number")
        );
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut form = filled();
        form.set(Field::PublicationDate, "20/10/1999");
        assert_eq!(
            form.submit().unwrap_err().get(Field::PublicationDate),
            Some(messages::DATE_INVALID)
        );
    }

    #[test]
    fn editing_a_field_clears_its_error() {
        let mut form = BookForm::new();
        let _ = form.submit();
        assert!(form.error(Field::Title).is_some());
        form.push_char(Field::Title, 'D');
        assert!(form.error(Field::Title).is_none());
        assert!(form.error(Field::Author).is_some());
    }

    #[test]
    fn create_assigns_id_and_resets() {
        let mut form = filled();
        let submission = form.submit().unwrap();

        let Submission::Created(book) = &submission else {
            panic!("expected create, got {submission:?}");
        };
        assert!(!book.id.as_str().is_empty());
        assert_eq!(book.isbn, "9780201616224");
        assert_eq!(book.genre, Genre::Fiction);
        assert_eq!(book.book_type, BookType::Ebook);
        assert_eq!(form, BookForm::new());
    }

    #[test]
    fn edit_preserves_id_and_replaces_fields() {
        let original = filled().submit().unwrap().into_book();

        let mut form = BookForm::edit(&original);
        assert!(form.is_editing());
        assert_eq!(form.value(Field::Price), "39.95");
        assert_eq!(form.value(Field::PublicationDate), "1999-10-20");

        form.set(Field::Title, "The Pragmatic Programmer, 2nd Edition");
        form.set(Field::Price, "49.99");
        form.cycle(Field::Genre, true);
        form.cycle(Field::BookType, true);

        let Submission::Updated(updated) = form.submit().unwrap() else {
            panic!("expected update");
        };
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.title, "The Pragmatic Programmer, 2nd Edition");
        assert_eq!(updated.genre, Genre::NonFiction);
        assert_eq!(updated.book_type, BookType::Printedbook);
        assert!(!form.is_editing());
    }

    #[test]
    fn edit_strips_separators_from_stored_isbn() {
        let mut book = filled().submit().unwrap().into_book();
        book.isbn = "978-0-201-61622-4".into();

        let mut form = BookForm::edit(&book);
        assert_eq!(form.value(Field::Isbn), "9780201616224");

        let updated = form.submit().unwrap().into_book();
        assert_eq!(updated.isbn, "9780201616224");
    }

    #[test]
    fn reopen_restores_values_and_mode() {
        let created = filled().submit().unwrap();
        let form = BookForm::reopen(&created);
        assert_eq!(form.mode(), &FormMode::Create);
        assert_eq!(form.value(Field::Title), "The Pragmatic Programmer");

        let book = created.into_book();
        let form = BookForm::reopen(&Submission::Updated(book.clone()));
        assert_eq!(form.mode(), &FormMode::Edit(book.id));
        assert_eq!(form.value(Field::Price), "39.95");
    }

    #[test]
    fn clear_resets_fields_and_errors_but_keeps_mode() {
        let book = filled().submit().unwrap().into_book();

        let mut form = BookForm::edit(&book);
        form.set(Field::Title, "");
        let _ = form.submit();
        assert!(!form.errors().is_empty());

        form.clear();
        assert!(form.errors().is_empty());
        assert_eq!(form.value(Field::Title), "");
        assert_eq!(form.value(Field::Genre), "fiction");
        assert!(form.is_editing());

        form.cancel();
        assert_eq!(form, BookForm::new());
    }

    #[test]
    fn cycle_wraps_both_directions() {
        let mut form = BookForm::new();
        form.cycle(Field::Genre, false);
        assert_eq!(form.value(Field::Genre), "non-fiction");
        form.cycle(Field::Genre, false);
        assert_eq!(form.value(Field::Genre), "fiction");
        form.cycle(Field::Title, true);
        assert_eq!(form.value(Field::Title), "");
    }

    #[test]
    fn rejected_submit_leaves_store_untouched() {
        let mut store =
            BookStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY, Vec::new()).unwrap();
        let mut form = BookForm::new();
        form.set(Field::Title, "Only a title");

        if let Ok(submission) = form.submit() {
            submission.apply(&mut store).unwrap();
        }

        assert!(store.is_empty());
        assert_eq!(form.value(Field::Title), "Only a title");
    }

    #[test]
    fn applying_update_for_deleted_book_is_not_found() {
        let mut store =
            BookStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY, Vec::new()).unwrap();
        let book = filled().submit().unwrap().apply(&mut store).unwrap();
        store.delete(&book.id).unwrap();

        let err = Submission::Updated(book).apply(&mut store).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }
}
