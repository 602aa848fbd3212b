// ── Seed files ──
//
// A seed file is a JSON array of books in the persisted shape. It is
// merged by id into the store on open (`--seed`) or on demand (`import`).

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::CoreError;
use crate::model::Book;

/// Parse a seed list from JSON text.
pub fn parse_seed(path: &Path, text: &str) -> Result<Vec<Book>, CoreError> {
    serde_json::from_str(text).map_err(|source| CoreError::SeedParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a seed file that must exist.
pub fn read_seed(path: &Path) -> Result<Vec<Book>, CoreError> {
    let text = std::fs::read_to_string(path).map_err(|source| CoreError::SeedRead {
        path: path.to_path_buf(),
        source,
    })?;
    let books = parse_seed(path, &text)?;
    debug!(path = %path.display(), count = books.len(), "read seed file");
    Ok(books)
}

/// Read an optional seed file. A missing file is an empty seed.
pub fn read_seed_optional(path: Option<&Path>) -> Result<Vec<Book>, CoreError> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    match read_seed(path) {
        Err(CoreError::SeedRead { source, .. }) if source.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "seed file not present");
            Ok(Vec::new())
        }
        other => other,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SEED: &str = r#"[
        {
            "id": "1",
            "title": "A",
            "author": "X",
            "isbn": "111",
            "publicationDate": "2001-02-03",
            "genre": "fiction",
            "price": 5,
            "purchaseLink": "https://example.com/a",
            "bookType": "Ebook"
        }
    ]"#;

    #[test]
    fn reads_seed_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, SEED).unwrap();

        let books = read_seed(&path).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "A");
    }

    #[test]
    fn missing_optional_seed_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(read_seed_optional(Some(&path)).unwrap().is_empty());
        assert!(read_seed_optional(None).unwrap().is_empty());
        assert!(matches!(read_seed(&path), Err(CoreError::SeedRead { .. })));
    }

    #[test]
    fn malformed_seed_is_parse_error() {
        let err = parse_seed(Path::new("x.json"), "{}").unwrap_err();
        assert!(matches!(err, CoreError::SeedParse { .. }));
    }
}
