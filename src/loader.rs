//! Reads the three source extracts into trip record tables.
//!
//! Every read failure (missing file, permission problem, malformed CSV, bad
//! encoding) collapses into [`CleanError::InputUnavailable`].

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use encoding_rs::Encoding;
use log::{debug, info};

use crate::{error::CleanError, io_utils, table::TripTable};

pub const SHEET1_FILE: &str = "OLA_DataSet.csv";
pub const SHEET2_FILE: &str = "OLA_DataSet2.csv";
pub const JULY_FILE: &str = "OLA_DataSet3icons.csv";

#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub sheet1: PathBuf,
    pub sheet2: PathBuf,
    pub july: PathBuf,
}

impl SourcePaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            sheet1: dir.join(SHEET1_FILE),
            sheet2: dir.join(SHEET2_FILE),
            july: dir.join(JULY_FILE),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedSources {
    pub sheet1: TripTable,
    /// Loaded for inspection only; never merged into the working table.
    pub sheet2: TripTable,
    pub july: TripTable,
}

pub fn load_sources(
    paths: &SourcePaths,
    delimiter: Option<u8>,
    encoding: &'static Encoding,
) -> Result<LoadedSources, CleanError> {
    let sheet1 = load_source(&paths.sheet1, delimiter, encoding)?;
    let sheet2 = load_source(&paths.sheet2, delimiter, encoding)?;
    let july = load_source(&paths.july, delimiter, encoding)?;
    info!("All three files loaded successfully");
    Ok(LoadedSources {
        sheet1,
        sheet2,
        july,
    })
}

pub fn load_source(
    path: &Path,
    delimiter: Option<u8>,
    encoding: &'static Encoding,
) -> Result<TripTable, CleanError> {
    let delimiter = io_utils::resolve_input_delimiter(path, delimiter);
    read_table(path, delimiter, encoding).map_err(|err| CleanError::input_unavailable(path, &err))
}

fn read_table(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<TripTable> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)
        .with_context(|| format!("Reading header row of {path:?}"))?;
    if headers.is_empty() {
        bail!("No columns found in {path:?}");
    }
    let headers = disambiguate_headers(headers);

    let mut records = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        let decoded = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", idx + 2))?;
        records.push(decoded);
    }
    let table = TripTable::from_records(&headers, &records)?;
    debug!(
        "Loaded {} row(s) across {} column(s) from {:?}",
        table.row_count(),
        table.column_count(),
        path
    );
    Ok(table)
}

/// Repeated header names get a `.N` suffix so every column can be addressed
/// by name; the first occurrence keeps its name.
fn disambiguate_headers(headers: Vec<String>) -> Vec<String> {
    let mut taken = HashSet::new();
    let mut result = Vec::with_capacity(headers.len());
    for name in headers {
        let mut candidate = name.clone();
        let mut suffix = 1;
        while !taken.insert(candidate.clone()) {
            candidate = format!("{name}.{suffix}");
            suffix += 1;
        }
        result.push(candidate);
    }
    result
}
