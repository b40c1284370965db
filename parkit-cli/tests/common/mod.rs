//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for common patterns

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables that would leak host configuration into a test run.
const PARKIT_ENV_VARS: [&str; 11] = [
    "PARKIT_DATA_DIR",
    "PARKIT_BUSY_TIMEOUT",
    "PARKIT_DISABLE_AUTOINIT",
    "PARKIT_CONFIG",
    "PARKIT_OUTPUT_FORMAT",
    "PARKIT_LOG_MODE",
    "PARKIT_CAR_RATE_PER_HOUR",
    "PARKIT_BIKE_RATE_PER_HOUR",
    "PARKIT_CAR_SPOTS",
    "PARKIT_BIKE_SPOTS",
    "PARKIT_MAXIMUM_LOCK_WAIT_SECONDS",
];

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the parkit data directory (not created until first use)
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("parkit-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// Get a command builder with a clean `PARKIT_*` environment and no
    /// pre-configured flags.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("parkit").expect("Failed to find parkit binary");
        for var in PARKIT_ENV_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Path of the lot database.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("parkit.db")
    }

    /// Write `config.yaml` into the data directory.
    pub fn write_config(&self, content: &str) -> PathBuf {
        std::fs::create_dir_all(&self.data_dir).expect("Failed to create data dir");
        let path = self.data_dir.join("config.yaml");
        std::fs::write(&path, content).expect("Failed to write config");
        path
    }

    /// Write a file anywhere under the temp directory.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Initialize the lot with the given layout.
    pub fn init_lot(&self, cars: u32, bikes: u32) {
        self.command()
            .arg("init")
            .arg("--car-spots")
            .arg(cars.to_string())
            .arg("--bike-spots")
            .arg(bikes.to_string())
            .assert()
            .success();
    }

    /// Park a vehicle and return stdout.
    ///
    /// # Panics
    /// Panics if the enter command fails.
    pub fn enter(&self, category: &str, plate: &str) -> String {
        let output = self
            .command()
            .args(["enter", "--category", category, "--plate", plate])
            .output()
            .expect("Failed to run enter command");

        assert!(
            output.status.success(),
            "Enter failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("Invalid UTF-8 in output")
    }

    /// Bill a vehicle and return stdout.
    ///
    /// # Panics
    /// Panics if the exit command fails.
    pub fn exit(&self, plate: &str) -> String {
        let output = self
            .command()
            .args(["exit", "--plate", plate])
            .output()
            .expect("Failed to run exit command");

        assert!(
            output.status.success(),
            "Exit failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).expect("Invalid UTF-8 in output")
    }

    /// Run `spots --format json` and parse the result.
    pub fn spots_json(&self) -> Vec<serde_json::Value> {
        let output = self
            .command()
            .args(["spots", "--format", "json"])
            .output()
            .expect("Failed to run spots command");
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).expect("Invalid JSON")
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }
}
