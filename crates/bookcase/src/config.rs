//! CLI configuration: thin wrapper around `bookcase_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--data-dir, --seed, --output, --color).

use clap::ValueEnum;
use tracing::warn;

use bookcase_core::{BookStore, FileStorage};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use bookcase_config::{Config, StoreSettings, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Fill unset presentation flags from the config `[defaults]` table.
pub fn apply_defaults(global: &mut GlobalOpts, cfg: &Config) {
    if global.output.is_none() {
        global.output = parse_default("defaults.output", &cfg.defaults.output);
    }
    if global.color.is_none() {
        global.color = parse_default::<ColorMode>("defaults.color", &cfg.defaults.color);
    }
}

fn parse_default<T: ValueEnum>(key: &str, value: &str) -> Option<T> {
    match T::from_str(value, true) {
        Ok(parsed) => Some(parsed),
        Err(reason) => {
            warn!(key, value, %reason, "ignoring invalid config default");
            None
        }
    }
}

/// Storage location after applying flag overrides to the config.
pub fn store_settings(global: &GlobalOpts, cfg: &Config) -> Result<StoreSettings, CliError> {
    Ok(cfg.resolve(global.data_dir.clone(), global.seed.clone())?)
}

/// Open the catalog named by flags + config.
pub fn open_store(global: &GlobalOpts, cfg: &Config) -> Result<BookStore<FileStorage>, CliError> {
    let settings = store_settings(global, cfg)?;
    Ok(settings.open()?)
}
