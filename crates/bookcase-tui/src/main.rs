//! `bookcase-tui`: terminal front end for the bookcase catalog.
//!
//! Built on [ratatui](https://ratatui.rs). The library screen lists the
//! catalog with search, genre tabs and column sorting; the editor screen
//! adds and edits books through the shared form controller.
//!
//! Logs go to a file (default `<tmp>/bookcase-tui.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;

const LOG_FILE_NAME: &str = "bookcase-tui.log";

/// Browse and edit your book catalog in the terminal.
#[derive(Parser, Debug)]
#[command(name = "bookcase-tui", version, about)]
struct Cli {
    /// Directory holding the persisted catalog
    #[arg(long, env = "BOOKCASE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// JSON file of books merged into the catalog on start
    #[arg(long, env = "BOOKCASE_SEED_FILE")]
    seed: Option<PathBuf>,

    /// Log file path (defaults to <tmp>/bookcase-tui.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. Hold the returned guard until exit so buffered
/// lines are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "bookcase_tui={log_level},bookcase_core={log_level},bookcase_config={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join(LOG_FILE_NAME));
    let log_dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let log_filename = log_file.file_name().unwrap_or(OsStr::new(LOG_FILE_NAME));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    // Flags and env beat the config file
    let cfg = bookcase_config::load_config_or_default();
    let settings = cfg.resolve(cli.data_dir.clone(), cli.seed.clone())?;

    info!(
        data_file = %settings.data_file().display(),
        seed = ?settings.seed_file,
        "starting bookcase-tui"
    );

    let store = settings.open()?;
    let mut app = App::new(store);
    app.run().await?;

    Ok(())
}
