//! Screen identifiers.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    /// Book table with filters and details.
    #[default]
    Library,
    /// Add/edit form. Captures all keys while open.
    Editor,
}

impl ScreenId {
    pub fn label(self) -> &'static str {
        match self {
            Self::Library => "Library",
            Self::Editor => "Editor",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
