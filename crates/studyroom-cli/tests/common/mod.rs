//! Common utilities for CLI E2E tests.
//!
//! Every invocation gets a private HOME so config writes never touch the
//! developer's real `~/.config/studyroom`.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

pub struct Cli {
    home: TempDir,
}

impl Cli {
    pub fn new() -> Self {
        Self {
            home: TempDir::new().expect("Failed to create temp HOME"),
        }
    }

    /// Location of the config file inside the private HOME.
    pub fn config_path(&self) -> PathBuf {
        self.home.path().join(".config/studyroom/config.toml")
    }

    /// Invoke a CLI command and return (stdout, stderr, code).
    pub fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_studyroom"))
            .args(args)
            .env("HOME", self.home.path())
            .env_remove("STUDYROOM_ENV")
            .env_remove("STUDYROOM_LOG")
            .output()
            .expect("Failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);

        (stdout, stderr, code)
    }

    /// Invoke a CLI command and expect success.
    pub fn success(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        if code != 0 && !stderr.is_empty() {
            eprintln!("CLI error output: {}", stderr);
        }
        assert_eq!(code, 0, "CLI command failed with code {}: {:?}", code, args);
        stdout
    }

    /// Invoke a CLI command and expect failure; returns stderr.
    pub fn failure(&self, args: &[&str]) -> String {
        let (_, stderr, code) = self.run(args);
        assert!(code != 0, "CLI command unexpectedly succeeded: {:?}", args);
        stderr
    }
}

/// Parse JSON output from CLI.
pub fn parse_json<T: for<'de> serde::Deserialize<'de>>(json: &str) -> T {
    serde_json::from_str(json).expect("Failed to parse JSON output")
}

/// Check if string contains substring
pub fn assert_contains(haystack: &str, needle: &str) {
    assert!(
        haystack.contains(needle),
        "Expected '{}' to contain '{}'",
        haystack, needle
    );
}
