use std::path::PathBuf;

use thiserror::Error;

use crate::data::ColumnType;

#[derive(Error, Debug)]
pub enum CleanError {
    /// Any failure to open, read, decode, or parse one of the source extracts.
    ///
    /// Fatal: the binary reports it on stderr and exits with status 1, not 0,
    /// so callers can tell that no cleaned file was written.
    #[error(
        "input unavailable: could not read {path:?} ({reason}). Make sure all three CSV files are in the data directory"
    )]
    InputUnavailable { path: PathBuf, reason: String },

    #[error("column '{column}' is {found} and has no median")]
    NonNumericColumn { column: String, found: ColumnType },
}

impl CleanError {
    pub fn input_unavailable(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        CleanError::InputUnavailable {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }
}
