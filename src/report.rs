//! Before/after diagnostics for the working trip table.
//!
//! Output goes to stdout as plain aligned text. It is meant for people, not
//! for parsing.

use std::borrow::Cow;
use std::fmt::Write as _;

use itertools::Itertools;

use crate::table::TripTable;

/// Renders the column list, row count, and per-column type and missing counts.
pub fn render_report(heading: &str, table: &TripTable) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{heading}:");
    let _ = writeln!(
        output,
        "Columns: [{}]",
        table.headers().iter().map(|name| format!("'{name}'")).join(", ")
    );
    let _ = writeln!(
        output,
        "Rows: {}  Columns: {}",
        table.row_count(),
        table.column_count()
    );

    let headers = ["#", "column", "non_null", "missing", "type"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    let rows = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            vec![
                idx.to_string(),
                column.name.clone(),
                column.non_missing_count().to_string(),
                column.missing_count().to_string(),
                column.datatype.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    output.push_str(&render_table(&headers, &rows, &[true, false, true, true, false]));
    let _ = writeln!(output, "Total missing values: {}", total_missing(table));
    output
}

pub fn print_report(heading: &str, table: &TripTable) {
    println!();
    print!("{}", render_report(heading, table));
}

pub fn total_missing(table: &TripTable) -> usize {
    table.columns().iter().map(|column| column.missing_count()).sum()
}

/// Aligned text table. Columns flagged in `right_align` are padded on the
/// left.
pub fn render_table(headers: &[String], rows: &[Vec<String>], right_align: &[bool]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(sanitize_cell(cell).chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths, right_align));
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths, &[]));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, right_align));
    }
    output
}

fn format_row(values: &[String], widths: &[usize], right_align: &[bool]) -> String {
    let line = values
        .iter()
        .zip(widths.iter().copied())
        .enumerate()
        .map(|(idx, (value, width))| {
            let cell = sanitize_cell(value);
            if right_align.get(idx).copied().unwrap_or(false) {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            }
        })
        .join("  ");
    line.trim_end().to_string()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn render_table_aligns_columns() {
        let rendered = render_table(
            &strings(&["#", "column"]),
            &[strings(&["0", "booking_id"]), strings(&["10", "fare"])],
            &[true, false],
        );
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                " #  column",
                "--  ----------",
                " 0  booking_id",
                "10  fare"
            ]
        );
    }

    #[test]
    fn render_table_flattens_control_characters() {
        let rendered = render_table(&strings(&["note"]), &[strings(&["a\nb\tc"])], &[]);
        assert_eq!(rendered.lines().nth(2), Some("a b c"));
    }

    #[test]
    fn report_lists_types_and_missing_counts() {
        let table = TripTable::from_records(
            &strings(&["booking_id", "driver_rating"]),
            &[strings(&["CNR1", "4.5"]), strings(&["CNR2", ""])],
        )
        .unwrap();
        let rendered = render_report("Initial Info", &table);
        assert!(rendered.starts_with("Initial Info:\n"));
        assert!(rendered.contains("Columns: ['booking_id', 'driver_rating']"));
        assert!(rendered.contains("Rows: 2  Columns: 2"));
        assert!(
            rendered
                .lines()
                .any(|line| line == "1  driver_rating         1        1  float")
        );
        assert!(rendered.contains("Total missing values: 1"));
    }
}
