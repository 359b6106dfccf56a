//! Column-gated cleaning steps applied to the working trip table.
//!
//! Each step is a no-op when its column is absent. Steps run in a fixed
//! order: rating median fill, cancellation reason fill, booking timestamp
//! coercion, and exact-row deduplication. No other column is touched.

use log::{info, warn};
use serde::Serialize;

use crate::{
    data::{ColumnType, Value, parse_timestamp},
    error::CleanError,
    table::{Column, TripTable},
};

pub const RATING_COLUMN: &str = "driver_rating";
pub const CANCELLATION_COLUMN: &str = "cancellation_reason";
pub const BOOKING_TIME_COLUMN: &str = "booking_time";
pub const CANCELLATION_PLACEHOLDER: &str = "Not Available";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningSummary {
    /// Median used for the rating fill; `None` when the column is absent or
    /// has no values.
    pub rating_median: Option<f64>,
    pub ratings_filled: usize,
    pub cancellation_reasons_filled: usize,
    pub booking_times_converted: bool,
    /// Booking times that failed to parse and were set to missing.
    pub booking_times_coerced: usize,
    pub duplicates_removed: usize,
}

pub fn clean(table: &mut TripTable) -> Result<CleaningSummary, CleanError> {
    let mut summary = CleaningSummary::default();

    if let Some(column) = table.column_mut(RATING_COLUMN) {
        let (median, filled) = fill_with_median(column)?;
        summary.rating_median = median;
        summary.ratings_filled = filled;
        match median {
            Some(value) => info!("Missing '{RATING_COLUMN}' filled with median value: {value}"),
            None => warn!("'{RATING_COLUMN}' has no values; median is undefined, column left as-is"),
        }
    }

    if let Some(column) = table.column_mut(CANCELLATION_COLUMN) {
        summary.cancellation_reasons_filled =
            column.fill_missing(Value::String(CANCELLATION_PLACEHOLDER.to_string()));
        info!("Missing '{CANCELLATION_COLUMN}' filled with '{CANCELLATION_PLACEHOLDER}'");
    }

    if let Some(column) = table.column_mut(BOOKING_TIME_COLUMN) {
        summary.booking_times_coerced = coerce_timestamps(column);
        summary.booking_times_converted = true;
        info!(
            "'{BOOKING_TIME_COLUMN}' column converted to datetime ({} unparseable value(s) set to missing)",
            summary.booking_times_coerced
        );
    }

    summary.duplicates_removed = table.drop_duplicate_rows();
    info!("Removed {} duplicate rows", summary.duplicates_removed);

    Ok(summary)
}

/// Median of the non-missing numeric cells; mean of the middle pair for an
/// even count.
pub fn median(column: &Column) -> Result<Option<f64>, CleanError> {
    if !column.datatype.is_numeric() && column.non_missing_count() > 0 {
        return Err(CleanError::NonNumericColumn {
            column: column.name.clone(),
            found: column.datatype,
        });
    }
    let mut values = column
        .cells
        .iter()
        .flatten()
        .filter_map(Value::as_f64)
        .filter(|value| !value.is_nan())
        .collect::<Vec<_>>();
    if values.is_empty() {
        return Ok(None);
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len().is_multiple_of(2) {
        Ok(Some((values[mid - 1] + values[mid]) / 2.0))
    } else {
        Ok(Some(values[mid]))
    }
}

fn fill_with_median(column: &mut Column) -> Result<(Option<f64>, usize), CleanError> {
    let Some(median) = median(column)? else {
        return Ok((None, 0));
    };
    let fill = if column.datatype == ColumnType::Integer && median.fract() == 0.0 {
        Value::Integer(median as i64)
    } else {
        Value::Float(median)
    };
    Ok((Some(median), column.fill_missing(fill)))
}

/// Parses every cell as a timestamp; unparseable cells become missing.
/// Returns the number of cells that were coerced to missing.
pub fn coerce_timestamps(column: &mut Column) -> usize {
    let mut coerced = 0;
    for cell in &mut column.cells {
        let converted = match cell.take() {
            None => None,
            Some(Value::DateTime(dt)) => Some(Value::DateTime(dt)),
            Some(other) => match parse_timestamp(&other.as_display()) {
                Ok(dt) => Some(Value::DateTime(dt)),
                Err(_) => {
                    coerced += 1;
                    None
                }
            },
        };
        *cell = converted;
    }
    column.datatype = ColumnType::DateTime;
    coerced
}
