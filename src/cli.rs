use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{correspondence::ColumnPair, source::DEFAULT_MAX_SIZE_MIB};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Reconcile two spreadsheets keyed by an identifier column",
    long_about = "Reconcile two spreadsheets keyed by an identifier column.\n\n\
                  Without a subcommand the tool asks for the files and columns interactively."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Answer prompts for the files, key columns and columns to compare
    Interactive(InteractiveArgs),
    /// Compare two spreadsheets using columns given on the command line
    Compare(CompareArgs),
    /// Preview the header and first rows of a spreadsheet
    Preview(PreviewArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct ReportOptions {
    /// Reject input files larger than this many MiB
    #[arg(long = "max-size-mib", default_value_t = DEFAULT_MAX_SIZE_MIB)]
    pub max_size_mib: u64,
    /// Report format written to stdout
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

impl ReportOptions {
    pub fn max_source_bytes(&self) -> u64 {
        self.max_size_mib.saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Args)]
pub struct InteractiveArgs {
    #[command(flatten)]
    pub report: ReportOptions,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// First spreadsheet (csv, tsv, xlsx, xlsm, xlsb, xls or ods)
    #[arg(long = "first")]
    pub first: PathBuf,
    /// Second spreadsheet
    #[arg(long = "second")]
    pub second: PathBuf,
    /// Key column in the first spreadsheet
    #[arg(long = "first-key")]
    pub first_key: String,
    /// Key column in the second spreadsheet (defaults to --first-key)
    #[arg(long = "second-key")]
    pub second_key: Option<String>,
    /// Column to compare: NAME when both sides share it, or FIRST=SECOND
    #[arg(
        short = 'C',
        long = "columns",
        action = clap::ArgAction::Append,
        required = true,
        value_parser = ColumnPair::parse
    )]
    pub columns: Vec<ColumnPair>,
    /// Worksheet to read from the first workbook (defaults to the first sheet)
    #[arg(long = "first-sheet")]
    pub first_sheet: Option<String>,
    /// Worksheet to read from the second workbook (defaults to the first sheet)
    #[arg(long = "second-sheet")]
    pub second_sheet: Option<String>,
    /// Delimiter for delimited text inputs (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the first input when it is delimited text (defaults to utf-8)
    #[arg(long = "first-encoding")]
    pub first_encoding: Option<String>,
    /// Character encoding of the second input when it is delimited text (defaults to utf-8)
    #[arg(long = "second-encoding")]
    pub second_encoding: Option<String>,
    #[command(flatten)]
    pub report: ReportOptions,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Spreadsheet to preview
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Worksheet to read from a workbook (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,
    /// Delimiter for delimited text input
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding for delimited text input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Reject input files larger than this many MiB
    #[arg(long = "max-size-mib", default_value_t = DEFAULT_MAX_SIZE_MIB)]
    pub max_size_mib: u64,
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
