//! CLI argument definitions for the field normalizer.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "fieldnorm",
    version,
    about = "Normalize tabular records against a field schema",
    long_about = "Normalize tabular records against a field schema.\n\n\
                  Every column is validated by its declared type (integer, float, date,\n\
                  time, boolean, multiclass, text) and rewritten in canonical form.\n\
                  The schema comes from --schema, the FIELDNORM_SCHEMA variable, or the\n\
                  built-in heat surveillance schema."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow raw cell values in trace logs (redacted by default).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize a CSV file and write the result in schema column order.
    Normalize(NormalizeArgs),

    /// List the fields of the active schema.
    Fields(SchemaArgs),

    /// Compare a CSV header against the schema column order.
    CheckColumns(CheckColumnsArgs),
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Schema file (TOML). Defaults to $FIELDNORM_SCHEMA, then the built-in schema.
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: Option<PathBuf>,
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// CSV file to normalize. The first row is the header.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Output CSV (default: <INPUT>_normalized.csv next to the input).
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write a JSON report of failed values and notes.
    #[arg(long = "report", value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Worker threads (default: available parallelism).
    #[arg(long = "jobs", short = 'j', value_name = "N")]
    pub jobs: Option<NonZeroUsize>,

    /// Exit with status 1 when any value fails validation.
    #[arg(long = "fail-on-invalid")]
    pub fail_on_invalid: bool,
}

#[derive(Parser)]
pub struct CheckColumnsArgs {
    /// CSV file whose header is checked.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub schema: SchemaArgs,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
