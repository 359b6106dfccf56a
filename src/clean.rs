//! The end-to-end cleaning pass: load, reconcile, report, clean, report,
//! write.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::{
    cleaner::{self, CleaningSummary},
    cli::CleanArgs,
    io_utils,
    loader::{self, SourcePaths},
    reconcile::{self, Reconciliation},
    report,
    writer,
};

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub sheet1: PathBuf,
    pub sheet2: PathBuf,
    pub july: PathBuf,
    pub reconciliation: Reconciliation,
    pub rows_before: usize,
    pub rows_after: usize,
    pub missing_before: usize,
    pub missing_after: usize,
    pub cleaning: CleaningSummary,
    pub output: Option<PathBuf>,
}

impl RunSummary {
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Serializing run summary")?;
        fs::write(path, json).with_context(|| format!("Writing run summary to {path:?}"))
    }
}

pub fn source_paths(args: &CleanArgs) -> SourcePaths {
    SourcePaths {
        sheet1: io_utils::resolve_in_dir(&args.data_dir, &args.sheet1),
        sheet2: io_utils::resolve_in_dir(&args.data_dir, &args.sheet2),
        july: io_utils::resolve_in_dir(&args.data_dir, &args.july),
    }
}

pub fn execute(args: &CleanArgs) -> Result<RunSummary> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let paths = source_paths(args);

    let sources = loader::load_sources(&paths, args.delimiter, encoding)?;
    let (mut table, reconciliation) = reconcile::reconcile(sources)?;

    println!();
    println!("--- Starting Data Cleaning ---");
    report::print_report("Initial Info", &table);
    let rows_before = table.row_count();
    let missing_before = report::total_missing(&table);

    let cleaning = cleaner::clean(&mut table)?;

    println!();
    println!("--- Cleaning Complete ---");
    report::print_report("Final Info", &table);

    let output = if args.dry_run {
        info!("Dry run: skipping write of cleaned data");
        None
    } else {
        let path = args.output_path();
        // `--delimiter` describes the inputs; the output follows its extension
        writer::write_table(&table, &path, None)
            .with_context(|| format!("Saving cleaned data to {path:?}"))?;
        Some(path)
    };

    let summary = RunSummary {
        sheet1: paths.sheet1,
        sheet2: paths.sheet2,
        july: paths.july,
        reconciliation,
        rows_before,
        rows_after: table.row_count(),
        missing_before,
        missing_after: report::total_missing(&table),
        cleaning,
        output,
    };

    if let Some(path) = &args.summary {
        if args.dry_run {
            info!("Dry run: skipping run summary {path:?}");
        } else {
            summary.save(path)?;
            info!("Run summary written to {path:?}");
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;
    use crate::loader::{JULY_FILE, SHEET1_FILE, SHEET2_FILE};

    #[test]
    fn execute_combines_cleans_and_writes() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(SHEET1_FILE),
            "booking_id,driver_rating\nCNR1,4\nCNR2,\n",
        )
        .unwrap();
        fs::write(dir.path().join(SHEET2_FILE), "icon\ncar.png\n").unwrap();
        fs::write(
            dir.path().join(JULY_FILE),
            "booking_id,driver_rating\nCNR3,5\nCNR1,4\n",
        )
        .unwrap();

        let args = CleanArgs {
            data_dir: dir.path().to_path_buf(),
            ..CleanArgs::default()
        };
        let summary = execute(&args).unwrap();
        assert_eq!(summary.reconciliation, Reconciliation::Combined);
        assert_eq!(summary.rows_before, 4);
        assert_eq!(summary.rows_after, 3);
        assert_eq!(summary.cleaning.duplicates_removed, 1);
        assert_eq!(summary.cleaning.rating_median, Some(4.0));

        let written = fs::read_to_string(dir.path().join("ola_data_cleaned.csv")).unwrap();
        assert_eq!(
            written,
            "booking_id,driver_rating\nCNR1,4\nCNR2,4\nCNR3,5\n"
        );
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempdir().unwrap();
        for name in [SHEET1_FILE, SHEET2_FILE, JULY_FILE] {
            fs::write(dir.path().join(name), "a\n1\n").unwrap();
        }
        let args = CleanArgs {
            data_dir: dir.path().to_path_buf(),
            summary: Some(dir.path().join("summary.json")),
            dry_run: true,
            ..CleanArgs::default()
        };
        let summary = execute(&args).unwrap();
        assert_eq!(summary.output, None);
        assert!(!dir.path().join("ola_data_cleaned.csv").exists());
        assert!(!dir.path().join("summary.json").exists());
    }
}
