// ── Book store ──
//
// Canonical ordered list of books, mirrored to a key-value backend.
// Every mutating call rewrites the whole serialized list under the
// store key; there is no partial update and no versioning.

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{Book, BookId};
use crate::storage::KeyValueStore;

/// Key the book list is persisted under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "books";

/// Suffix appended to the store key when an unreadable value is set aside.
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// Owner of the book list. Insertion order is store order.
pub struct BookStore<S: KeyValueStore> {
    storage: S,
    key: String,
    books: IndexMap<BookId, Book>,
}

impl<S: KeyValueStore> BookStore<S> {
    /// Load the persisted list, or adopt `seed` when nothing is persisted.
    ///
    /// A non-empty seed is then merged by id into whatever was loaded.
    /// A persisted value that fails to parse is copied to
    /// `<key>.corrupt` and the store starts over from the seed.
    pub fn open(storage: S, key: impl Into<String>, seed: Vec<Book>) -> Result<Self, CoreError> {
        let mut store = Self {
            storage,
            key: key.into(),
            books: IndexMap::new(),
        };

        match store.load()? {
            Some(books) => {
                store.books = dedupe(books);
                info!(key = %store.key, count = store.books.len(), "loaded book list");
                if !seed.is_empty() {
                    store.merge_seed(seed)?;
                }
            }
            None => {
                let appended = store.merge_seed(seed)?;
                info!(key = %store.key, count = appended, "initialized book list from seed");
            }
        }

        Ok(store)
    }

    fn load(&mut self) -> Result<Option<Vec<Book>>, CoreError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<Vec<Book>>(&raw) {
            Ok(books) => Ok(Some(books)),
            Err(err) => {
                let backup = format!("{}{CORRUPT_SUFFIX}", self.key);
                warn!(
                    key = %self.key,
                    backup = %backup,
                    error = %err,
                    "persisted book list is unreadable, reseeding"
                );
                self.storage.set(&backup, &raw)?;
                Ok(None)
            }
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Snapshot of every book in store order.
    pub fn list(&self) -> Vec<Book> {
        self.books.values().cloned().collect()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Book> {
        self.books.values()
    }

    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.books.get(id)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Append a validated record. Rejects an id that is already present.
    pub fn add(&mut self, book: Book) -> Result<(), CoreError> {
        book.validate()?;
        if self.books.contains_key(&book.id) {
            return Err(CoreError::Conflict {
                identifier: book.id.to_string(),
            });
        }

        debug!(id = %book.id, title = %book.title, "adding book");
        self.books.insert(book.id.clone(), book);
        self.persist()
    }

    /// Replace the record with the same id in place. Returns `false` when
    /// no such record exists; the list is left as it was.
    pub fn update(&mut self, book: Book) -> Result<bool, CoreError> {
        book.validate()?;
        let replaced = match self.books.get_mut(&book.id) {
            Some(slot) => {
                debug!(id = %book.id, "updating book");
                *slot = book;
                true
            }
            None => {
                debug!(id = %book.id, "update for unknown id ignored");
                false
            }
        };
        self.persist()?;
        Ok(replaced)
    }

    /// Remove the record with `id`. Returns `false` when it was not present.
    pub fn delete(&mut self, id: &BookId) -> Result<bool, CoreError> {
        let removed = self.books.shift_remove(id).is_some();
        debug!(id = %id, removed, "deleting book");
        self.persist()?;
        Ok(removed)
    }

    /// Append seed records whose id is not already present. Existing
    /// records always win. Seed records are taken verbatim. Returns the
    /// number of records appended.
    pub fn merge_seed(&mut self, seed: impl IntoIterator<Item = Book>) -> Result<usize, CoreError> {
        let mut appended = 0;
        for book in seed {
            if self.books.contains_key(&book.id) {
                continue;
            }
            self.books.insert(book.id.clone(), book);
            appended += 1;
        }

        debug!(appended, total = self.books.len(), "merged seed");
        self.persist()?;
        Ok(appended)
    }

    fn persist(&mut self) -> Result<(), CoreError> {
        let books: Vec<&Book> = self.books.values().collect();
        let json = serde_json::to_string_pretty(&books)?;
        self.storage.set(&self.key, &json)
    }
}

/// Collapse duplicate ids, keeping the first occurrence.
fn dedupe(books: Vec<Book>) -> IndexMap<BookId, Book> {
    let mut map = IndexMap::with_capacity(books.len());
    for book in books {
        if map.contains_key(&book.id) {
            warn!(id = %book.id, "dropping duplicate id in persisted list");
            continue;
        }
        map.insert(book.id.clone(), book);
    }
    map
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{BookType, Genre};
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn book(id: &str, title: &str) -> Book {
        Book {
            id: BookId::from(id),
            title: title.into(),
            author: "Author".into(),
            isbn: "1234567890".into(),
            publication_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            genre: Genre::Fiction,
            price: 10.0,
            purchase_link: "https://example.com/book".into(),
            book_type: BookType::Ebook,
            description: None,
        }
    }

    fn persisted(store: &BookStore<MemoryStorage>) -> Vec<Book> {
        let raw = store.storage().get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn empty_storage_adopts_seed_and_persists() {
        let seed = vec![book("1", "A"), book("2", "B")];
        let store = BookStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY, seed.clone()).unwrap();
        assert_eq!(store.list(), seed);
        assert_eq!(persisted(&store), seed);
    }

    #[test]
    fn empty_storage_without_seed_persists_empty_list() {
        let store = BookStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY, Vec::new()).unwrap();
        assert!(store.is_empty());
        assert_eq!(persisted(&store), Vec::<Book>::new());
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut store =
            BookStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY, vec![book("1", "A")]).unwrap();
        let err = store.add(book("1", "Other")).unwrap_err();
        assert!(matches!(err, CoreError::Conflict { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_rejects_invalid_record() {
        let mut store = BookStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY, Vec::new()).unwrap();
        let mut bad = book("1", "A");
        bad.price = -1.0;
        let err = store.add(bad).unwrap_err();
        assert!(err.field_errors().is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn update_replaces_in_place() {
        let seed = vec![book("1", "A"), book("2", "B"), book("3", "C")];
        let mut store = BookStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY, seed).unwrap();

        assert!(store.update(book("2", "B2")).unwrap());
        let titles: Vec<_> = store.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["A", "B2", "C"]);
        assert_eq!(persisted(&store)[1].title, "B2");
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let mut store =
            BookStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY, vec![book("1", "A")]).unwrap();
        assert!(!store.update(book("9", "Z")).unwrap());
        assert_eq!(store.list(), vec![book("1", "A")]);
    }

    #[test]
    fn delete_preserves_order_of_remaining() {
        let seed = vec![book("1", "A"), book("2", "B"), book("3", "C")];
        let mut store = BookStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY, seed).unwrap();

        assert!(store.delete(&BookId::from("2")).unwrap());
        assert!(!store.delete(&BookId::from("2")).unwrap());
        let ids: Vec<_> = persisted(&store).into_iter().map(|b| b.id.to_string()).collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn merge_keeps_existing_records() {
        let mut store =
            BookStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY, vec![book("1", "A")]).unwrap();
        let untitled = book("3", "");

        let appended = store
            .merge_seed(vec![book("1", "Replaced?"), book("2", "B"), untitled])
            .unwrap();

        assert_eq!(appended, 2);
        assert_eq!(store.get(&BookId::from("1")).unwrap().title, "A");
        assert_eq!(store.get(&BookId::from("3")).unwrap().title, "");
    }

    #[test]
    fn seed_with_invalid_records_is_persisted_verbatim() {
        let mut free = book("2", "Free");
        free.price = 0.0;
        let mut broken_link = book("3", "Broken");
        broken_link.purchase_link = "not a url".into();
        let seed = vec![book("1", "A"), free, broken_link];

        let store = BookStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY, seed.clone()).unwrap();

        assert_eq!(store.list(), seed);
        assert_eq!(persisted(&store), seed);
    }

    #[test]
    fn duplicate_ids_in_seed_collapse_to_first() {
        let store = BookStore::open(
            MemoryStorage::new(),
            DEFAULT_STORAGE_KEY,
            vec![book("1", "First"), book("1", "Second")],
        )
        .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].title, "First");
    }

    #[test]
    fn corrupt_value_is_backed_up_and_reseeded() {
        let storage = MemoryStorage::new().with_entry(DEFAULT_STORAGE_KEY, "{not json");
        let store = BookStore::open(storage, DEFAULT_STORAGE_KEY, vec![book("1", "A")]).unwrap();

        assert_eq!(store.len(), 1);
        let backup = store.storage().get("books.corrupt").unwrap();
        assert_eq!(backup.as_deref(), Some("{not json"));
        assert_eq!(persisted(&store), vec![book("1", "A")]);
    }
}
