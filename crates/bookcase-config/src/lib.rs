//! Shared configuration for the bookcase CLI and TUI.
//!
//! TOML config file + `BOOKCASE_*` environment overrides, platform
//! directory resolution, and translation to an opened
//! [`BookStore`](bookcase_core::BookStore). Both binaries depend on this
//! crate; the CLI layers its `GlobalOpts` overrides on top.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use bookcase_core::{BookStore, CoreError, DEFAULT_STORAGE_KEY, FileStorage, seed};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Directory holding the persisted book list. Platform data dir if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Key (file stem) the book list is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Seed list merged into the store on every open.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,

    /// Presentation defaults.
    #[serde(default)]
    pub defaults: Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: default_storage_key(),
            seed_file: None,
            defaults: Defaults::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.into()
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

impl Config {
    /// Reject values that cannot name a storage file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self.storage_key.trim();
        if key.is_empty() {
            return Err(ConfigError::Validation {
                field: "storage_key".into(),
                reason: "must not be empty".into(),
            });
        }
        if key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(ConfigError::Validation {
                field: "storage_key".into(),
                reason: format!("'{key}' is not a plain file name"),
            });
        }
        Ok(())
    }

    /// Combine file/env settings with command-line overrides.
    pub fn resolve(
        &self,
        data_dir: Option<PathBuf>,
        seed_file: Option<PathBuf>,
    ) -> Result<StoreSettings, ConfigError> {
        self.validate()?;
        Ok(StoreSettings {
            data_dir: data_dir
                .or_else(|| self.data_dir.clone())
                .unwrap_or_else(default_data_dir),
            storage_key: self.storage_key.trim().to_owned(),
            seed_file: seed_file.or_else(|| self.seed_file.clone()),
        })
    }
}

// ── Resolved storage settings ───────────────────────────────────────

/// Where the book list lives and what seeds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub seed_file: Option<PathBuf>,
}

impl StoreSettings {
    /// Path of the persisted book list.
    pub fn data_file(&self) -> PathBuf {
        FileStorage::new(&self.data_dir).path_for(&self.storage_key)
    }

    /// Open the file-backed store, merging the seed file if one exists.
    pub fn open(&self) -> Result<BookStore<FileStorage>, CoreError> {
        let seed = seed::read_seed_optional(self.seed_file.as_deref())?;
        debug!(
            data_dir = %self.data_dir.display(),
            key = %self.storage_key,
            seed = seed.len(),
            "opening book store"
        );
        BookStore::open(FileStorage::new(&self.data_dir), self.storage_key.clone(), seed)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("rs", "bookcase", "bookcase")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Platform data directory used when neither flag nor config names one.
pub fn default_data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn home_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("bookcase");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
}

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let config: Config = figment_for(&config_path())
        .merge(Env::prefixed("BOOKCASE_").split("__"))
        .extract()?;
    Ok(config)
}

/// Load a Config from an explicit file, without environment overrides.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    Ok(figment_for(path).extract()?)
}

/// Load config, returning a default if the file doesn't exist or is unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    cfg.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.storage_key, "books");
        assert_eq!(cfg.defaults.output, "table");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/srv/books\"\nstorage_key = \"shelf\"\n\n[defaults]\noutput = \"json\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.data_dir, Some(PathBuf::from("/srv/books")));
        assert_eq!(cfg.storage_key, "shelf");
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.color, "auto");
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let cfg = Config {
            seed_file: Some(PathBuf::from("/tmp/seed.json")),
            ..Config::default()
        };
        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn flag_overrides_win_over_config() {
        let cfg = Config {
            data_dir: Some(PathBuf::from("/from/config")),
            ..Config::default()
        };
        let settings = cfg.resolve(Some(PathBuf::from("/from/flag")), None).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/from/flag"));
        assert_eq!(settings.data_file(), PathBuf::from("/from/flag/books.json"));

        let settings = cfg.resolve(None, None).unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/from/config"));
    }

    #[test]
    fn storage_key_must_be_plain_name() {
        let cfg = Config {
            storage_key: "../escape".into(),
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation { .. })));
        let cfg = Config {
            storage_key: "  ".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn open_creates_store_with_seed() {
        let dir = tempfile::tempdir().unwrap();
        let seed_path = dir.path().join("seed.json");
        std::fs::write(
            &seed_path,
            r#"[{"id":"1","title":"A","author":"B","isbn":"1","publicationDate":"2000-01-01",
                "genre":"fiction","price":1,"purchaseLink":"https://e.com","bookType":"Ebook"}]"#,
        )
        .unwrap();

        let settings = Config::default()
            .resolve(Some(dir.path().join("data")), Some(seed_path))
            .unwrap();
        let store = settings.open().unwrap();
        assert_eq!(store.len(), 1);
        assert!(settings.data_file().exists());
    }
}
