#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A throwaway working directory holding one shopping list database.
pub struct TestList {
    dir: TempDir,
}

impl TestList {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("list.sqlite")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Command running inside the list directory with no database flag.
    pub fn bare_cmd(&self) -> Command {
        let mut cmd = groceries_cmd();
        cmd.current_dir(self.path());
        cmd
    }

    /// Command pointed at this list's database.
    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--db").arg(self.db_path());
        cmd
    }

    pub fn add(&self, item: &str, category: &str) {
        self.cmd()
            .args(["add", item, "--by", "sam", "--category", category])
            .assert()
            .success();
    }

    pub fn list_json(&self, extra: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(["--json", "list"])
            .args(extra)
            .output()
            .expect("run list");
        assert!(output.status.success(), "list failed: {output:?}");
        serde_json::from_slice(&output.stdout).expect("list json")
    }

    pub fn items(&self, extra: &[&str]) -> Vec<String> {
        self.list_json(extra)["data"]["tasks"]
            .as_array()
            .expect("tasks array")
            .iter()
            .map(|task| task["item"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

pub fn groceries_cmd() -> Command {
    let mut cmd = Command::cargo_bin("groceries").expect("binary");
    cmd.env_remove("GROCERIES_DB")
        .env_remove("GROCERIES_AUTHOR")
        .env_remove("RUST_LOG");
    cmd
}
