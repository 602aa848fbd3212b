// ── Book identity ──
//
// Ids arriving from persisted data or seed files are arbitrary strings
// ("1", "2", ...) or bare integers from timestamp-style generators; ids
// minted here are UUID v4. All of them compare as plain strings.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Stable identifier of a book record. Assigned once on create, never
/// rewritten.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    /// Mint a fresh, unique identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BookId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for BookId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = BookId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or integer book id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<BookId, E> {
                Ok(BookId::from(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<BookId, E> {
                Ok(BookId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<BookId, E> {
                Ok(BookId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<BookId, E> {
                Ok(BookId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}
