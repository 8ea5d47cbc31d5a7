// shared utilities for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// path to the built gridfilter binary
pub fn gridfilter_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_gridfilter"))
}

/// a scratch directory holding rows and config files for one test
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create test directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// config path inside the fixture; the file only exists once written
    pub fn config_path(&self) -> PathBuf {
        self.path().join("config.json")
    }

    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.config_path();
        fs::write(&path, content).expect("Failed to write test config");
        path
    }

    pub fn write_rows(&self, rows: &serde_json::Value) -> PathBuf {
        let path = self.path().join("rows.json");
        fs::write(&path, serde_json::to_string_pretty(rows).unwrap())
            .expect("Failed to write rows");
        path
    }

    /// run gridfilter with the fixture's config path and the given args
    pub fn run(&self, args: &[&str]) -> Output {
        let config_path = self.config_path();
        let mut cmd_args = vec!["--config", config_path.to_str().unwrap()];
        cmd_args.extend(args);

        Command::new(gridfilter_binary_path())
            .args(&cmd_args)
            .env_remove("GRIDFILTER_LOG")
            .output()
            .expect("Failed to execute gridfilter")
    }

    /// run with `--json` and parse the JSON-RPC envelope
    pub fn run_json(&self, args: &[&str]) -> (Output, serde_json::Value) {
        let mut cmd_args = vec!["--json"];
        cmd_args.extend(args);
        let output = self.run(&cmd_args);
        let json = parse_json(&output);
        (output, json)
    }

    /// run with `--no-json` for text output
    pub fn run_text(&self, args: &[&str]) -> Output {
        let mut cmd_args = vec!["--no-json"];
        cmd_args.extend(args);
        self.run(&cmd_args)
    }
}

pub fn parse_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout is not JSON ({}): {}", e, stdout))
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// rows shared by most filter tests
pub fn sample_rows() -> serde_json::Value {
    serde_json::json!([
        { "name": "Alice", "joined": "2024-05-10T09:00:00Z", "active": true },
        { "name": "alice", "joined": "2024-05-11T18:30:00Z", "active": false },
        { "name": "Balice", "joined": "2024-06-01T00:00:00Z", "active": true },
        { "name": "Bob", "joined": null, "active": false },
    ])
}
