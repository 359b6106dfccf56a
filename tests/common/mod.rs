#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::{TempDir, tempdir};

pub const SHEET1: &str = "OLA_DataSet.csv";
pub const SHEET2: &str = "OLA_DataSet2.csv";
pub const JULY: &str = "OLA_DataSet3icons.csv";
pub const CLEANED: &str = "ola_data_cleaned.csv";

pub const TRIP_HEADER: &str =
    "booking_id,booking_time,vehicle_type,driver_rating,cancellation_reason";

/// Scratch data directory holding the source extracts for one test case.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file contents");
        path
    }

    /// Writes all three extracts at once.
    pub fn write_sources(&self, sheet1: &str, sheet2: &str, july: &str) {
        self.write(SHEET1, sheet1);
        self.write(SHEET2, sheet2);
        self.write(JULY, july);
    }

    pub fn cleaned_path(&self) -> PathBuf {
        self.path().join(CLEANED)
    }

    pub fn read_cleaned(&self) -> String {
        fs::read_to_string(self.cleaned_path()).expect("read cleaned output")
    }

    /// Parsed cleaned output as header plus rows.
    pub fn cleaned_records(&self) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_path(self.cleaned_path()).expect("open cleaned output");
        let headers: Vec<String> = reader
            .headers()
            .expect("headers")
            .iter()
            .map(str::to_string)
            .collect();
        let rows: Vec<Vec<String>> = reader
            .records()
            .map(|record| {
                record
                    .expect("record")
                    .iter()
                    .map(str::to_string)
                    .collect()
            })
            .collect();
        (headers, rows)
    }

    /// The binary, run from inside the workspace.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("ola-clean").expect("binary exists");
        cmd.current_dir(self.path());
        cmd
    }
}
