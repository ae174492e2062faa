//! Integration tests for the `record-store` inspection binary.

use std::path::{Path, PathBuf};
use std::process::Command;

use record_store_core::{FieldSpec, Persistable, RowId, Value};
use record_store_sqlite::{Engine, Store};

#[derive(Debug, Default, Clone, PartialEq)]
struct Bookmark {
    row_id: Option<RowId>,
    url: String,
    clicks: i64,
}

static BOOKMARK_FIELDS: &[FieldSpec] =
    &[FieldSpec::text("url").primary(), FieldSpec::long("clicks")];

impl Persistable for Bookmark {
    fn table() -> &'static str {
        "Bookmark"
    }

    fn fields() -> &'static [FieldSpec] {
        BOOKMARK_FIELDS
    }

    fn field_value(&self, field: &str) -> Value {
        match field {
            "url" => Value::text(&self.url),
            "clicks" => self.clicks.into(),
            _ => Value::Null,
        }
    }

    fn put_field(&mut self, field: &str, value: Value) {
        match (field, value) {
            ("url", Value::Text(s)) => self.url = s,
            ("clicks", Value::Int(n)) => self.clicks = n,
            _ => {}
        }
    }

    fn row_id(&self) -> Option<RowId> {
        self.row_id
    }

    fn set_row_id(&mut self, id: RowId) {
        self.row_id = Some(id);
    }
}

/// Creates a store file with a Bookmark table and two rows.
fn seed_store(dir: &Path) -> PathBuf {
    let path = dir.join("store.db");
    let mut engine = Engine::new(Store::open(&path));
    engine.register::<Bookmark>().unwrap();
    engine.ensure_schema().unwrap();
    engine
        .insert(&mut Bookmark {
            row_id: None,
            url: "https://example.org/a".to_string(),
            clicks: 3,
        })
        .unwrap();
    engine
        .insert(&mut Bookmark {
            row_id: None,
            url: "https://example.org/b".to_string(),
            clicks: 7,
        })
        .unwrap();
    path
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_record-store"))
        .args(args)
        .output()
        .expect("binary should run")
}

#[test]
fn test_tables_lists_user_tables() {
    let dir = tempfile::tempdir().unwrap();
    let db = seed_store(dir.path());

    let out = run(&["tables", "--db", db.to_str().unwrap()]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.lines().any(|l| l == "Bookmark"));
}

#[test]
fn test_status_reports_column_and_row_counts() {
    let dir = tempfile::tempdir().unwrap();
    let db = seed_store(dir.path());

    let out = run(&["status", "--db", db.to_str().unwrap(), "--json"]);
    assert!(out.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let entries = parsed.as_array().unwrap();
    let bookmark = entries
        .iter()
        .find(|e| e["table"] == "Bookmark")
        .expect("Bookmark status should be listed");
    // Two declared fields plus the implicit rowid.
    assert_eq!(bookmark["columns"], 3);
    assert_eq!(bookmark["rows"], 2);
}

#[test]
fn test_dump_emits_rows_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let db = seed_store(dir.path());

    let out = run(&["dump", "--db", db.to_str().unwrap(), "--table", "Bookmark"]);
    assert!(out.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().any(|r| r["url"] == "https://example.org/a"));
    assert!(rows.iter().all(|r| r["rowid"].is_i64()));
}

#[test]
fn test_dump_respects_limit() {
    let dir = tempfile::tempdir().unwrap();
    let db = seed_store(dir.path());

    let out = run(&[
        "dump",
        "--db",
        db.to_str().unwrap(),
        "--table",
        "Bookmark",
        "--limit",
        "1",
    ]);
    assert!(out.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
}

#[test]
fn test_missing_file_exits_nonzero() {
    let out = run(&["tables", "--db", "/nonexistent/store.db"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("no such file"));
}

#[test]
fn test_unknown_table_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let db = seed_store(dir.path());

    let out = run(&["dump", "--db", db.to_str().unwrap(), "--table", "Ghost"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("no such table"));
}
