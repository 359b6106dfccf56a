use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::{data::Value, io_utils, table::TripTable};

pub const OUTPUT_FILE: &str = "ola_data_cleaned.csv";

/// Writes the header row and every data row to `path`, replacing any existing
/// file. Missing cells are written as empty fields.
pub fn write_table(table: &TripTable, path: &Path, delimiter: Option<u8>) -> Result<usize> {
    let delimiter = io_utils::resolve_output_delimiter(path, delimiter);
    let mut writer = io_utils::open_csv_writer(path, delimiter)?;
    writer
        .write_record(table.headers().iter())
        .context("Writing output headers")?;

    for row in 0..table.row_count() {
        let fields = table
            .row(row)
            .into_iter()
            .map(|cell| cell.map(Value::as_display).unwrap_or_default());
        writer
            .write_record(fields)
            .with_context(|| format!("Writing output row {}", row + 2))?;
    }
    writer.flush().context("Flushing output writer")?;

    info!(
        "Successfully saved {} row(s) of cleaned data to {:?}",
        table.row_count(),
        path
    );
    Ok(table.row_count())
}
