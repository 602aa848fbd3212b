//! Clap derive structures for the `bookcase` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bookcase -- keep track of the books you own and want
#[derive(Debug, Parser)]
#[command(
    name = "bookcase",
    version,
    about = "Manage a personal book catalog from the command line",
    long_about = "Add, edit, search and sort the books in a local catalog.\n\n\
        The catalog is a single JSON file in your data directory, shared\n\
        with the bookcase-tui terminal interface.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Directory holding the catalog file
    #[arg(long, env = "BOOKCASE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Seed file merged into the catalog on open (JSON array of books)
    #[arg(long, env = "BOOKCASE_SEED_FILE", global = true)]
    pub seed: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "BOOKCASE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

impl GlobalOpts {
    pub fn output_format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.clone().unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Domain value enums ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenreArg {
    Fiction,
    NonFiction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenreFilterArg {
    All,
    Fiction,
    NonFiction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BookTypeArg {
    /// E-Book
    #[value(alias = "e-book")]
    Ebook,
    /// Printed book
    #[value(alias = "printedbook")]
    Printed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Title,
    Author,
    Isbn,
    Genre,
    #[value(alias = "type")]
    BookType,
    Price,
    #[value(alias = "published")]
    PublicationDate,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List books, optionally searched, filtered and sorted
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show every field of one book
    #[command(alias = "get")]
    Show {
        /// Book id
        id: String,
    },

    /// Add a new book
    Add(BookFieldArgs),

    /// Edit an existing book; only the given fields change
    Edit {
        /// Book id
        id: String,

        #[command(flatten)]
        fields: BookFieldArgs,
    },

    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        /// Book id
        id: String,
    },

    /// Merge books from a JSON file; existing ids are kept as they are
    Import {
        /// JSON array of books
        file: PathBuf,
    },

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── List ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive match against title, author and ISBN
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only show one genre
    #[arg(long, short = 'g', value_enum, default_value = "all")]
    pub genre: GenreFilterArg,

    /// Sort column (ascending unless --desc)
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

// ── Book fields (add / edit) ─────────────────────────────────────────

/// Field flags shared by `add` and `edit`. All optional so that a missing
/// required field is reported alongside every other validation failure.
#[derive(Debug, Default, Args)]
pub struct BookFieldArgs {
    /// Book title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Author name
    #[arg(long, short = 'a')]
    pub author: Option<String>,

    /// ISBN (non-digits are dropped)
    #[arg(long)]
    pub isbn: Option<String>,

    /// Publication date (YYYY-MM-DD)
    #[arg(long, alias = "publication-date")]
    pub published: Option<String>,

    /// Genre
    #[arg(long, short = 'g', value_enum)]
    pub genre: Option<GenreArg>,

    /// Price in dollars
    #[arg(long, short = 'p')]
    pub price: Option<String>,

    /// Purchase link (absolute URL)
    #[arg(long, alias = "purchase-link")]
    pub link: Option<String>,

    /// Book type
    #[arg(long = "type", value_enum)]
    pub book_type: Option<BookTypeArg>,

    /// Free-form description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn desc_requires_sort() {
        let res = Cli::try_parse_from(["bookcase", "list", "--desc"]);
        assert!(res.is_err());
    }

    #[test]
    fn type_alias_parses() {
        let cli = Cli::try_parse_from(["bookcase", "list", "--sort", "type"])
            .unwrap_or_else(|e| panic!("{e}"));
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.sort, Some(SortArg::BookType));
    }
}
