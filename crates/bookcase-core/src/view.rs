// ── View state and list derivation ──
//
// `ViewState` is the transient, never-persisted state of a list view.
// `derive` projects a book list through it: filter by search term and
// genre, then optionally sort. Neither touches the store.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use tracing::warn;

use crate::model::{Book, BookId, Genre};

// ── Genre filter ────────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
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
pub enum GenreFilter {
    #[default]
    All,
    Fiction,
    NonFiction,
}

impl GenreFilter {
    pub fn matches(self, genre: Genre) -> bool {
        match self {
            Self::All => true,
            Self::Fiction => genre == Genre::Fiction,
            Self::NonFiction => genre == Genre::NonFiction,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All Genres",
            Self::Fiction => "Fiction",
            Self::NonFiction => "Non-Fiction",
        }
    }

    /// Next filter in tab order, wrapping.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Fiction,
            Self::Fiction => Self::NonFiction,
            Self::NonFiction => Self::All,
        }
    }

    pub fn index(self) -> usize {
        Self::iter().position(|f| f == self).unwrap_or(0)
    }
}

impl From<Genre> for GenreFilter {
    fn from(genre: Genre) -> Self {
        match genre {
            Genre::Fiction => Self::Fiction,
            Genre::NonFiction => Self::NonFiction,
        }
    }
}

// ── Sorting ─────────────────────────────────────────────────────────

/// Sortable columns, in table order.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum SortField {
    #[default]
    Title,
    Author,
    Isbn,
    Genre,
    BookType,
    Price,
    PublicationDate,
}

impl SortField {
    /// Column header text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Author => "Author",
            Self::Isbn => "ISBN",
            Self::Genre => "Genre",
            Self::BookType => "Type",
            Self::Price => "Price",
            Self::PublicationDate => "Published",
        }
    }

    /// Column for a 1-based position, as bound to number keys.
    pub fn from_position(position: usize) -> Option<Self> {
        position.checked_sub(1).and_then(|i| Self::iter().nth(i))
    }

    fn compare(self, collation: &Collation, a: &Book, b: &Book) -> Ordering {
        match self {
            Self::Title => collation.compare(&a.title, &b.title),
            Self::Author => collation.compare(&a.author, &b.author),
            Self::Isbn => collation.compare(&a.isbn, &b.isbn),
            Self::Genre => collation.compare(a.genre.into(), b.genre.into()),
            Self::BookType => collation.compare(a.book_type.into(), b.book_type.into()),
            Self::Price => a.price.total_cmp(&b.price),
            Self::PublicationDate => a.publication_date.cmp(&b.publication_date),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    #[default]
    None,
    Asc,
    Desc,
}

impl SortDirection {
    /// none → asc → desc → none
    pub fn cycle(self) -> Self {
        match self {
            Self::None => Self::Asc,
            Self::Asc => Self::Desc,
            Self::Desc => Self::None,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            Self::None => "↕",
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

/// Root-locale collation for string columns. Collator ties fall back to
/// code-point order so the result is total.
struct Collation(Option<Collator>);

impl Collation {
    fn new() -> Self {
        let collator = Collator::try_new(&Default::default(), CollatorOptions::new())
            .inspect_err(|err| warn!(%err, "collation data unavailable, sorting case-insensitively"))
            .ok();
        Self(collator)
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        let ordering = match &self.0 {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        };
        ordering.then_with(|| a.cmp(b))
    }
}

// ── ViewState ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub search_term: String,
    pub genre_filter: GenreFilter,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    /// Weak reference to the book shown in the details view.
    pub selected: Option<BookId>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn set_genre_filter(&mut self, filter: GenreFilter) {
        self.genre_filter = filter;
    }

    /// Clicking the active column cycles its direction; clicking another
    /// column makes it active in ascending order.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.cycle();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
    }

    /// Reset search, genre and direction. The sort field and any open
    /// details view are left alone.
    pub fn clear_filters(&mut self) {
        self.search_term.clear();
        self.genre_filter = GenreFilter::All;
        self.sort_direction = SortDirection::None;
    }

    pub fn select(&mut self, id: BookId) {
        self.selected = Some(id);
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }

    /// Resolve the selection against the current list. `None` when nothing
    /// is selected or the book has since been deleted.
    pub fn selected_book<'a>(&self, books: impl IntoIterator<Item = &'a Book>) -> Option<&'a Book> {
        let id = self.selected.as_ref()?;
        books.into_iter().find(|b| &b.id == id)
    }

    /// Header glyph for a column: `↕` unless it is the active sort column.
    pub fn sort_indicator(&self, field: SortField) -> &'static str {
        if self.sort_field == field {
            self.sort_direction.indicator()
        } else {
            SortDirection::None.indicator()
        }
    }

    pub fn is_filtered(&self) -> bool {
        !self.search_term.is_empty() || self.genre_filter != GenreFilter::All
    }
}

// ── Derivation ──────────────────────────────────────────────────────

/// Project `books` through `view`. Store order is kept when the sort
/// direction is `None` and among equal keys otherwise.
pub fn derive<'a>(books: impl IntoIterator<Item = &'a Book>, view: &ViewState) -> Vec<&'a Book> {
    let needle = view.search_term.to_lowercase();

    let mut out: Vec<&Book> = books
        .into_iter()
        .filter(|b| view.genre_filter.matches(b.genre) && matches_search(b, &needle))
        .collect();

    let field = view.sort_field;
    match view.sort_direction {
        SortDirection::None => {}
        SortDirection::Asc => {
            let collation = Collation::new();
            out.sort_by(|a, b| field.compare(&collation, a, b));
        }
        SortDirection::Desc => {
            let collation = Collation::new();
            out.sort_by(|a, b| field.compare(&collation, a, b).reverse());
        }
    }

    out
}

fn matches_search(book: &Book, needle: &str) -> bool {
    needle.is_empty()
        || book.title.to_lowercase().contains(needle)
        || book.author.to_lowercase().contains(needle)
        || book.isbn.to_lowercase().contains(needle)
}
