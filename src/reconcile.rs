use anyhow::{Context, Result};
use itertools::Itertools;
use log::{info, warn};
use serde::Serialize;

use crate::{loader::LoadedSources, table::TripTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reconciliation {
    /// Sheet1 rows followed by July rows.
    Combined,
    /// Column sequences differed; July rows were left out.
    SheetOneOnly,
}

/// Builds the working table from the loaded extracts. Sheet2 is only
/// inspected.
pub fn reconcile(sources: LoadedSources) -> Result<(TripTable, Reconciliation)> {
    let LoadedSources {
        sheet1,
        sheet2,
        july,
    } = sources;

    println!();
    println!("--- Inspecting the data ---");
    println!("Columns in Sheet1: {}", column_list(&sheet1));
    println!("Columns in July: {}", column_list(&july));
    println!("Columns in Sheet2: {}", column_list(&sheet2));

    let (table, outcome) = if sheet1.headers() == july.headers() {
        let mut combined = sheet1;
        combined
            .append(july)
            .context("Combining Sheet1 and July rows")?;
        info!("'Sheet1' and 'July' data have been combined into a single table");
        (combined, Reconciliation::Combined)
    } else {
        warn!("Column mismatch between Sheet1 and July. Using only Sheet1");
        (sheet1, Reconciliation::SheetOneOnly)
    };

    info!("Total rides in working dataset: {}", table.row_count());
    Ok((table, outcome))
}

fn column_list(table: &TripTable) -> String {
    format!(
        "[{}]",
        table.headers().iter().map(|name| format!("'{name}'")).join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> TripTable {
        let headers = headers.iter().map(|h| h.to_string()).collect::<Vec<_>>();
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect::<Vec<_>>();
        TripTable::from_records(&headers, &rows).unwrap()
    }

    #[test]
    fn identical_columns_are_concatenated_in_order() {
        let sources = LoadedSources {
            sheet1: table(&["booking_id", "fare"], &[&["CNR1", "100"]]),
            sheet2: table(&["icon"], &[&["car.png"]]),
            july: table(&["booking_id", "fare"], &[&["CNR9", "80"], &["CNR10", "90"]]),
        };
        let (combined, outcome) = reconcile(sources).unwrap();
        assert_eq!(outcome, Reconciliation::Combined);
        assert_eq!(combined.row_count(), 3);
        assert_eq!(combined.display_rows()[1], vec!["CNR9", "80"]);
    }

    #[test]
    fn column_order_matters() {
        let sources = LoadedSources {
            sheet1: table(&["booking_id", "fare"], &[&["CNR1", "100"]]),
            sheet2: table(&["icon"], &[]),
            july: table(&["fare", "booking_id"], &[&["80", "CNR9"]]),
        };
        let (working, outcome) = reconcile(sources).unwrap();
        assert_eq!(outcome, Reconciliation::SheetOneOnly);
        assert_eq!(working.row_count(), 1);
        assert_eq!(working.display_rows()[0], vec!["CNR1", "100"]);
    }

    #[test]
    fn sheet2_is_never_merged() {
        let sources = LoadedSources {
            sheet1: table(&["a"], &[&["1"]]),
            sheet2: table(&["a"], &[&["2"]]),
            july: table(&["b"], &[&["3"]]),
        };
        let (working, _) = reconcile(sources).unwrap();
        assert_eq!(working.display_rows(), vec![vec!["1".to_string()]]);
    }
}
