//! Integration tests for the `bookcase` CLI binary.
//!
//! Every test runs against a fresh temporary data directory and an
//! isolated HOME, so the user's real catalog and config are never touched.
#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

struct Sandbox {
    root: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    fn data_file(&self) -> PathBuf {
        self.data_dir().join("books.json")
    }

    /// `bookcase` with env isolation and `--data-dir` pointing into the sandbox.
    fn cmd(&self) -> assert_cmd::Command {
        let home = self.root.path().join("home");
        let mut cmd = cargo_bin_cmd!("bookcase");
        cmd.env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env("XDG_DATA_HOME", home.join(".local/share"))
            .env_remove("BOOKCASE_DATA_DIR")
            .env_remove("BOOKCASE_SEED_FILE")
            .env_remove("BOOKCASE_OUTPUT")
            .env_remove("BOOKCASE_STORAGE_KEY")
            .env_remove("RUST_LOG")
            .arg("--data-dir")
            .arg(self.data_dir())
            .args(["--color", "never"]);
        cmd
    }

    fn write_seed(&self, json: &str) -> PathBuf {
        let path = self.root.path().join("seed.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    fn persisted(&self) -> Vec<Value> {
        let raw = std::fs::read_to_string(self.data_file()).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    /// Add a book and return its generated id.
    fn add(&self, title: &str, price: &str) -> String {
        let output = self
            .cmd()
            .args(["-o", "plain", "add", "--title", title])
            .args(["--author", "Test Author", "--isbn", "978-0-00-000000-2"])
            .args(["--published", "2001-09-11", "--price", price])
            .args(["--link", "https://example.com/buy"])
            .output()
            .unwrap();
        assert!(output.status.success(), "add failed: {output:?}");
        String::from_utf8(output.stdout).unwrap().trim().to_owned()
    }
}

const SEED: &str = r#"[
  {"id":"1","title":"The Hobbit","author":"J.R.R. Tolkien","isbn":"9780547928227",
   "publicationDate":"1937-09-21","genre":"fiction","price":14.99,
   "purchaseLink":"https://example.com/hobbit","bookType":"Printedbook"},
  {"id":"2","title":"Sapiens","author":"Yuval Noah Harari","isbn":"9780062316097",
   "publicationDate":"2011-01-01","genre":"non-fiction","price":22.5,
   "purchaseLink":"https://example.com/sapiens","bookType":"Ebook"}
]"#;

fn ids(values: &[Value]) -> Vec<&str> {
    values.iter().map(|v| v["id"].as_str().unwrap()).collect()
}

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_owned)
        .collect()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = cargo_bin_cmd!("bookcase").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    cargo_bin_cmd!("bookcase")
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("add"))
                .and(predicate::str::contains("import")),
        );
}

#[test]
fn test_completions_bash() {
    Sandbox::new()
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Listing ─────────────────────────────────────────────────────────

#[test]
fn test_empty_catalog_message() {
    Sandbox::new()
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No books found matching your search criteria",
        ))
        .stderr(predicate::str::contains("Total Books: 0"));
}

#[test]
fn test_seed_is_persisted_on_first_open() {
    let sandbox = Sandbox::new();
    let seed = sandbox.write_seed(SEED);

    sandbox
        .cmd()
        .arg("--seed")
        .arg(&seed)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("The Hobbit").and(predicate::str::contains("Sapiens")))
        .stderr(predicate::str::contains("Total Books: 2 · Showing 2 books"));

    assert_eq!(ids(&sandbox.persisted()), ["1", "2"]);
}

#[test]
fn test_list_filters_and_sorts() {
    let sandbox = Sandbox::new();
    let seed = sandbox.write_seed(SEED);

    let output = sandbox
        .cmd()
        .arg("--seed")
        .arg(&seed)
        .args(["-o", "plain", "list", "--sort", "price", "--desc"])
        .output()
        .unwrap();
    assert_eq!(stdout_lines(&output), ["2", "1"]);

    let output = sandbox
        .cmd()
        .args(["-o", "plain", "list", "--search", "TOLKIEN"])
        .output()
        .unwrap();
    assert_eq!(stdout_lines(&output), ["1"]);

    let output = sandbox
        .cmd()
        .args(["-o", "plain", "list", "--genre", "non-fiction"])
        .output()
        .unwrap();
    assert_eq!(stdout_lines(&output), ["2"]);
}

#[test]
fn test_list_json_is_camel_case() {
    let sandbox = Sandbox::new();
    let seed = sandbox.write_seed(SEED);

    let output = sandbox
        .cmd()
        .arg("--seed")
        .arg(&seed)
        .args(["-o", "json", "list"])
        .output()
        .unwrap();
    let books: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["publicationDate"], "1937-09-21");
    assert_eq!(books[0]["bookType"], "Printedbook");
}

// ── Add / edit ──────────────────────────────────────────────────────

#[test]
fn test_add_persists_and_strips_isbn() {
    let sandbox = Sandbox::new();
    let id = sandbox.add("Dune", "9.99");

    let stored = sandbox.persisted();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["id"], id.as_str());
    assert_eq!(stored[0]["isbn"], "9780000000002");
    assert_eq!(stored[0]["genre"], "fiction");
    assert_eq!(stored[0]["bookType"], "Ebook");
}

#[test]
fn test_add_reports_success() {
    Sandbox::new()
        .cmd()
        .args(["add", "--title", "Dune", "--author", "Frank Herbert"])
        .args(["--isbn", "9780441013593", "--published", "1965-08-01"])
        .args(["--price", "9.99", "--link", "https://example.com/dune"])
        .args(["--genre", "fiction", "--type", "printed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Printed Book"))
        .stderr(predicate::str::contains("Book added successfully!"));
}

#[test]
fn test_add_with_no_fields_lists_every_error() {
    let sandbox = Sandbox::new();
    let output = sandbox.cmd().arg("add").output().unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    for message in [
        "Title is required",
        "Author is required",
        "ISBN is required",
        "Publication date is required",
        "Price is required",
        "Purchase link is required",
    ] {
        assert!(stderr.contains(message), "missing {message:?} in:\n{stderr}");
    }
    assert!(sandbox.persisted().is_empty());
}

#[test]
fn test_add_rejects_bad_url_and_price() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["add", "--title", "T", "--author", "A", "--isbn", "1"])
        .args(["--published", "2020-01-01", "--price", "0", "--link", "invalid-url"])
        .assert()
        .code(2)
        .stderr(
            predicate::str::contains("Please enter a valid URL")
                .and(predicate::str::contains("Price must be greater than 0")),
        );
    assert!(sandbox.persisted().is_empty());
}

#[test]
fn test_edit_preserves_id() {
    let sandbox = Sandbox::new();
    let id = sandbox.add("Draft", "10");

    sandbox
        .cmd()
        .args(["edit", &id, "--title", "Final", "--price", "12.5"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Book updated successfully!"));

    let stored = sandbox.persisted();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["id"], id.as_str());
    assert_eq!(stored[0]["title"], "Final");
    assert_eq!(stored[0]["price"], 12.5);
    assert_eq!(stored[0]["author"], "Test Author");
}

#[test]
fn test_edit_without_fields_is_usage_error() {
    let sandbox = Sandbox::new();
    let id = sandbox.add("Draft", "10");
    sandbox.cmd().args(["edit", &id]).assert().code(2);
}

#[test]
fn test_show_unknown_id_is_not_found() {
    Sandbox::new()
        .cmd()
        .args(["show", "nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("not found"));
}

// ── Delete ──────────────────────────────────────────────────────────

#[test]
fn test_delete_with_yes_removes_exactly_one() {
    let sandbox = Sandbox::new();
    let first = sandbox.add("One", "1");
    let second = sandbox.add("Two", "2");

    sandbox
        .cmd()
        .args(["-y", "delete", &first])
        .assert()
        .success()
        .stderr(predicate::str::contains("Book deleted successfully!"));

    let stored = sandbox.persisted();
    assert_eq!(ids(&stored), [second.as_str()]);
}

#[test]
fn test_delete_without_tty_requires_yes() {
    let sandbox = Sandbox::new();
    let id = sandbox.add("Keep", "1");

    sandbox
        .cmd()
        .args(["delete", &id])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
    assert_eq!(sandbox.persisted().len(), 1);
}

// ── Import / recovery ───────────────────────────────────────────────

#[test]
fn test_import_merges_by_id() {
    let sandbox = Sandbox::new();
    let seed = sandbox.write_seed(SEED);
    sandbox.cmd().arg("--seed").arg(&seed).arg("list").assert().success();

    let more = sandbox.root.path().join("more.json");
    std::fs::write(
        &more,
        r#"[
          {"id":"1","title":"Changed","author":"X","isbn":"1","publicationDate":"2000-01-01",
           "genre":"fiction","price":1,"purchaseLink":"https://e.com","bookType":"Ebook"},
          {"id":"3","title":"Cosmos","author":"Carl Sagan","isbn":"9780345539434",
           "publicationDate":"1980-01-01","genre":"non-fiction","price":"18.00",
           "purchaseLink":"https://example.com/cosmos","bookType":"printedBook"}
        ]"#,
    )
    .unwrap();

    sandbox
        .cmd()
        .arg("import")
        .arg(&more)
        .assert()
        .success()
        .stderr(predicate::str::contains("Imported 1 of 2 books (1 already present)"));

    let stored = sandbox.persisted();
    assert_eq!(ids(&stored), ["1", "2", "3"]);
    assert_eq!(stored[0]["title"], "The Hobbit");
}

#[test]
fn test_import_missing_file_fails() {
    Sandbox::new()
        .cmd()
        .args(["import", "/definitely/not/here.json"])
        .assert()
        .code(1);
}

#[test]
fn test_corrupt_catalog_is_set_aside() {
    let sandbox = Sandbox::new();
    std::fs::create_dir_all(sandbox.data_dir()).unwrap();
    std::fs::write(sandbox.data_file(), "[{broken").unwrap();

    sandbox.cmd().arg("list").assert().success();

    let backup = sandbox.data_dir().join("books.corrupt.json");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), "[{broken");
    assert!(sandbox.persisted().is_empty());
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_init_then_refuses_overwrite() {
    let sandbox = Sandbox::new();
    sandbox.cmd().args(["config", "init"]).assert().success();
    sandbox.cmd().args(["config", "init"]).assert().code(6);
    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("storage_key = \"books\""));
}
