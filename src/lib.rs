pub mod clean;
pub mod cleaner;
pub mod cli;
pub mod data;
pub mod error;
pub mod io_utils;
pub mod loader;
pub mod reconcile;
pub mod report;
pub mod table;
pub mod writer;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::cli::Cli;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("ola_clean", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let args = cli.clean;
    debug!(
        "Cleaning extracts in {:?} with delimiter {}",
        args.data_dir,
        args.delimiter
            .map(printable_delimiter)
            .unwrap_or_else(|| "by extension".to_string())
    );
    let summary = clean::execute(&args)?;
    info!(
        "Cleaned {} row(s) down to {} row(s)",
        summary.rows_before, summary.rows_after
    );
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
