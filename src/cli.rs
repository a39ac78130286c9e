use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Extract stacked report tables from spreadsheet grids", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract every located table from a grid
    Extract(ExtractArgs),
    /// Show where each table's title, header and data rows were found
    Locate(LocateArgs),
    /// Classify header cells into canonical column names
    Classify(ClassifyArgs),
    /// Suggest semantic roles for free-text column names
    Suggest(SuggestArgs),
    /// Preview the raw grid with row numbers
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
pub struct GridInputArgs {
    /// Grid file: .json array of rows, or delimited text ('-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Delimiter for text grids (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExtractionArgs {
    /// YAML file with phrase sets and analysis modes
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Title phrase to locate; repeatable, replaces configured phrase sets
    #[arg(long = "phrase", action = clap::ArgAction::Append)]
    pub phrases: Vec<String>,
    /// Treat the identifier column as products rather than regions
    #[arg(long = "product-analysis")]
    pub product_analysis: bool,
    /// Record how every raw header was renamed
    #[arg(long = "auditor")]
    pub auditor: bool,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub grid: GridInputArgs,
    #[command(flatten)]
    pub extraction: ExtractionArgs,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Output format
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct LocateArgs {
    #[command(flatten)]
    pub grid: GridInputArgs,
    #[command(flatten)]
    pub extraction: ExtractionArgs,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Header cells in row order; repeatable
    #[arg(long = "header", required = true, action = clap::ArgAction::Append)]
    pub headers: Vec<String>,
    /// Treat the identifier column as products rather than regions
    #[arg(long = "product-analysis")]
    pub product_analysis: bool,
    /// Write the resulting schema as YAML
    #[arg(long = "schema-out")]
    pub schema_out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SuggestArgs {
    /// Column names to map; repeatable
    #[arg(long = "column", required = true, action = clap::ArgAction::Append)]
    pub columns: Vec<String>,
    /// YAML role catalogue (defaults to the built-in catalogue)
    #[arg(long = "catalogue")]
    pub catalogue: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub grid: GridInputArgs,
    /// Number of rows to display
    #[arg(long, default_value_t = 20)]
    pub rows: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Table,
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
