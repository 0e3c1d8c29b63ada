#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Default user the helper runs commands as.
pub const DEFAULT_USER: &str = "alice";

pub fn qatrack_binary() -> &'static str {
    env!("CARGO_BIN_EXE_qatrack")
}

/// Helper struct to run qatrack commands in an isolated temp directory
pub struct QaTest {
    pub temp_dir: TempDir,
    user: Option<String>,
}

impl QaTest {
    pub fn new() -> Self {
        QaTest {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
            user: Some(DEFAULT_USER.to_string()),
        }
    }

    /// A test environment with no active user.
    pub fn without_user() -> Self {
        QaTest {
            user: None,
            ..Self::new()
        }
    }

    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join(".qatrack")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(qatrack_binary());
        cmd.args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("QATRACK_ROOT")
            .env_remove("QATRACK_LOG")
            .env("NO_COLOR", "1");
        match &self.user {
            Some(user) => cmd.env("QATRACK_USER", user),
            None => cmd.env_remove("QATRACK_USER"),
        };
        cmd.output().expect("Failed to execute qatrack command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let mut full: Vec<&str> = args.to_vec();
        full.push("--json");
        let stdout = self.run_success(&full);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("Invalid JSON from {args:?}: {e}\n{stdout}"))
    }

    /// Create a test case and return its ID.
    pub fn add(&self, title: &str, extra: &[&str]) -> String {
        let mut args = vec!["add", title];
        args.extend_from_slice(extra);
        self.run_success(&args).trim().to_string()
    }

    pub fn case_path(&self, user: &str, id: &str) -> PathBuf {
        self.root()
            .join("scopes")
            .join(user)
            .join("cases")
            .join(format!("{id}.yaml"))
    }

    pub fn case_exists(&self, id: &str) -> bool {
        self.case_path(DEFAULT_USER, id).exists()
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.temp_dir.path().join(name)).expect("Failed to read file")
    }
}

impl Default for QaTest {
    fn default() -> Self {
        Self::new()
    }
}
