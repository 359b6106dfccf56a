use std::path::PathBuf;

use clap::{Args, Parser};

use crate::{
    loader::{JULY_FILE, SHEET1_FILE, SHEET2_FILE},
    writer::OUTPUT_FILE,
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Combine, clean, and deduplicate ride-hailing trip CSV extracts",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub clean: CleanArgs,
}

#[derive(Debug, Clone, Args)]
pub struct CleanArgs {
    /// Directory holding the source extracts and receiving the cleaned file
    #[arg(short = 'd', long = "data-dir", default_value = ".")]
    pub data_dir: PathBuf,
    /// Primary ride extract
    #[arg(long = "sheet1", default_value = SHEET1_FILE)]
    pub sheet1: PathBuf,
    /// Auxiliary extract, inspected but never merged
    #[arg(long = "sheet2", default_value = SHEET2_FILE)]
    pub sheet2: PathBuf,
    /// Secondary ride extract appended when its columns match the primary one
    #[arg(long = "july", default_value = JULY_FILE)]
    pub july: PathBuf,
    /// Cleaned CSV destination (defaults to ola_data_cleaned.csv in the data directory)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Delimiter of the input files (supports ',', 'tab', ';', '|'); the
    /// output delimiter follows the output file extension
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Write a JSON summary of the run to this path
    #[arg(long = "summary")]
    pub summary: Option<PathBuf>,
    /// Run every step but do not write any files
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl Default for CleanArgs {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            sheet1: PathBuf::from(SHEET1_FILE),
            sheet2: PathBuf::from(SHEET2_FILE),
            july: PathBuf::from(JULY_FILE),
            output: None,
            delimiter: None,
            input_encoding: None,
            summary: None,
            dry_run: false,
        }
    }
}

impl CleanArgs {
    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self.data_dir.join(OUTPUT_FILE),
        }
    }
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_uses_fixed_file_names() {
        let cli = Cli::try_parse_from(["ola-clean"]).unwrap();
        assert_eq!(cli.clean.sheet1, PathBuf::from("OLA_DataSet.csv"));
        assert_eq!(cli.clean.sheet2, PathBuf::from("OLA_DataSet2.csv"));
        assert_eq!(cli.clean.july, PathBuf::from("OLA_DataSet3icons.csv"));
        assert_eq!(
            cli.clean.output_path(),
            PathBuf::from(".").join("ola_data_cleaned.csv")
        );
        assert!(!cli.clean.dry_run);
    }

    #[test]
    fn output_flag_overrides_data_dir_default() {
        let cli =
            Cli::try_parse_from(["ola-clean", "-d", "/data", "-o", "/tmp/out.csv"]).unwrap();
        assert_eq!(cli.clean.output_path(), PathBuf::from("/tmp/out.csv"));
    }

    #[test]
    fn parse_delimiter_accepts_names_and_single_chars() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("pipe"), Ok(b'|'));
        assert_eq!(parse_delimiter(":"), Ok(b':'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("é").is_err());
    }
}
