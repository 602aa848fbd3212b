//! Config subcommand handlers.

use std::fmt::Write;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// Resolved configuration, including where the catalog actually lives.
fn format_config(cfg: &Config, global: &GlobalOpts) -> Result<String, CliError> {
    let settings = config::store_settings(global, cfg)?;
    let mut out = String::new();

    let _ = writeln!(out, "# {}", config::config_path().display());
    let _ = writeln!(out, "data_dir = \"{}\"", settings.data_dir.display());
    let _ = writeln!(out, "storage_key = \"{}\"", settings.storage_key);
    match &settings.seed_file {
        Some(seed) => {
            let _ = writeln!(out, "seed_file = \"{}\"", seed.display());
        }
        None => {
            let _ = writeln!(out, "# seed_file not set");
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = write!(out, "color = \"{}\"", cfg.defaults.color);

    Ok(out)
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            output::print_output(&format_config(&cfg, global)?, global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let cfg = Config {
                data_dir: global.data_dir.clone(),
                seed_file: global.seed.clone(),
                ..Config::default()
            };
            let written = config::save_config(&cfg)?;
            output::print_success(
                &format!("Wrote {}", written.display()),
                &global.color_mode(),
                global.quiet,
            );
            Ok(())
        }
    }
}
