// SPDX-FileCopyrightText: 2026 Prompt Journal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving the `journal` binary.
//!
//! Each test gets its own temp directory holding a config file and a SQLite
//! database. Tests are independent and order-insensitive.

use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

const PASSWORD: &str = "e2e-secret";

struct Harness {
    dir: TempDir,
    config: PathBuf,
}

impl Harness {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("journal.toml");
        let db = dir.path().join("journal.db");
        std::fs::write(
            &config,
            format!(
                "[app]\nlog_level = \"warn\"\n\n[storage]\ndatabase_path = '{}'\n\n[security]\nadmin_password = '{PASSWORD}'\n",
                db.display()
            ),
        )
        .unwrap();
        Self { dir, config }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn run(&self, password: Option<&str>, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_journal"));
        cmd.current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .env_remove("PROMPT_JOURNAL_PASSWORD")
            .arg("--config")
            .arg(&self.config);
        if let Some(password) = password {
            cmd.arg("--password").arg(password);
        }
        cmd.args(args).output().unwrap()
    }

    fn admin(&self, args: &[&str]) -> String {
        let output = self.run(Some(PASSWORD), args);
        assert!(
            output.status.success(),
            "{args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    fn public(&self, args: &[&str]) -> String {
        let output = self.run(None, args);
        assert!(
            output.status.success(),
            "{args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    fn export(&self) -> Vec<serde_json::Value> {
        serde_json::from_str(&self.admin(&["export"])).unwrap()
    }
}

const TRANSCRIPT: &str = "### 🧑\u{200d}💻 User\n\nHow do lifetimes work?\n\n---\n\n### 🤖 Assistant\n\nThey bound how long references live.";

#[test]
fn create_show_and_list() {
    let h = Harness::new();
    let file = h.write("chat.md", TRANSCRIPT);
    let file = file.to_str().unwrap();

    h.admin(&[
        "create", "--title", "Lifetimes 101", "--file", file, "--model", "claude-4-sonnet",
        "--tag", "rust", "--publish",
    ]);

    let listed = h.public(&["list"]);
    assert!(listed.contains("lifetimes-101"));
    assert!(listed.contains("[4-sonnet]"));

    let shown = h.public(&["show", "lifetimes-101"]);
    assert!(shown.contains("How do lifetimes work?"));
    assert!(shown.contains("They bound how long references live."));
    assert!(shown.contains("1 views"));

    let entries = h.export();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["views"], 1);
    assert_eq!(entries[0]["excerpt"], "How do lifetimes work?...");
    assert_eq!(entries[0]["modelTag"], "claude-4-sonnet");
}

#[test]
fn mutations_require_the_admin_password() {
    let h = Harness::new();
    let file = h.write("chat.md", TRANSCRIPT);

    let denied = h.run(
        Some("wrong"),
        &["create", "--title", "Nope", "--file", file.to_str().unwrap()],
    );
    assert!(!denied.status.success());
    assert!(String::from_utf8_lossy(&denied.stderr).contains("unauthorized"));

    let no_password = h.run(None, &["export"]);
    assert!(!no_password.status.success());

    assert!(h.export().is_empty());
}

#[test]
fn search_tags_and_bulk() {
    let h = Harness::new();
    let file = h.write("chat.md", TRANSCRIPT);
    let file = file.to_str().unwrap();
    h.admin(&["create", "--title", "Rust memory", "--file", file, "--tag", "rust", "--tag", "memory", "--publish"]);
    h.admin(&["create", "--title", "Python async", "--file", file, "--tag", "python", "--publish"]);
    h.admin(&["create", "--title", "Unfinished", "--file", file, "--tag", "rust", "--draft"]);

    assert_eq!(h.public(&["tags"]), "memory\npython\nrust\n");

    let any = h.public(&["search", "--tag", "rust", "--tag", "python"]);
    assert!(any.contains("rust-memory") && any.contains("python-async"));
    assert!(!any.contains("unfinished"));

    let all = h.public(&["search", "--tag", "rust", "--tag", "python", "--match", "all"]);
    assert!(all.trim().is_empty());

    let query = h.public(&["search", "ASYNC"]);
    assert!(query.contains("python-async") && !query.contains("rust-memory"));

    let ids: Vec<String> = h
        .export()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect();
    let out = h.admin(&["bulk", "unlist", &ids[0], &ids[1], "missing-id"]);
    assert!(out.contains("unlist 2 entries"), "{out}");
    assert!(h.public(&["search"]).trim().is_empty(), "unlisted entries leave search");
    assert!(h.public(&["list"]).contains("rust-memory"), "but stay published");

    let out = h.admin(&["bulk", "delete", &ids[2]]);
    assert!(out.contains("deleted 1 entries"));
    assert_eq!(h.export().len(), 2);

    let bad = h.run(Some(PASSWORD), &["bulk", "archive", &ids[0]]);
    assert!(!bad.status.success());
    assert!(String::from_utf8_lossy(&bad.stderr).contains("invalid bulk operation"));
}

#[test]
fn migrate_merges_by_id() {
    let h = Harness::new();
    let file = h.write("chat.md", TRANSCRIPT);
    h.admin(&["create", "--title", "Existing", "--file", file.to_str().unwrap(), "--publish"]);

    let mut dump = h.export();
    let mut foreign = dump[0].clone();
    foreign["id"] = "local-123".into();
    foreign["slug"] = "from-local".into();
    dump.push(foreign);
    dump.push(serde_json::json!({ "id": "incomplete" }));
    let payload = h.write("local.json", &serde_json::to_string(&dump).unwrap());

    let out = h.admin(&["migrate", payload.to_str().unwrap()]);
    assert!(out.contains("migrated 1 entries (1 skipped, 2 total)"), "{out}");

    let again = h.admin(&["migrate", payload.to_str().unwrap()]);
    assert!(again.contains("migrated 0 entries"), "{again}");

    let not_array = h.write("bad.json", r#"{"chats": []}"#);
    let bad = h.run(Some(PASSWORD), &["migrate", not_array.to_str().unwrap()]);
    assert!(!bad.status.success());
}

#[test]
fn invalid_config_is_rendered_and_exits_nonzero() {
    let h = Harness::new();
    std::fs::write(&h.config, "[storage]\ncolection_key = \"x\"\n").unwrap();
    let output = h.run(None, &["list"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("colection_key"));
}
