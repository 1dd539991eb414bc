//! CLI argument definitions for the fixed-width codec.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "fixlen",
    version,
    about = "Decode and encode fixed-width record files",
    long_about = "Decode and encode fixed-width record files.\n\n\
                  Column layouts come from a JSON schema document listing each\n\
                  column's name and width in characters."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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

    /// Allow record tokens to appear in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the column layout of a schema.
    Schema(SchemaArgs),

    /// Decode a fixed-width file into JSON or a table.
    Decode(DecodeArgs),

    /// Decode a file and report defects without writing records.
    Check(CheckArgs),

    /// Encode JSON lines into a fixed-width file.
    Encode(EncodeArgs),
}

#[derive(Args)]
pub struct SchemaArgs {
    /// JSON schema document.
    #[arg(long = "schema", short = 's', value_name = "SCHEMA")]
    pub schema: PathBuf,
}

#[derive(Args)]
pub struct DecodeArgs {
    /// JSON schema document.
    #[arg(long = "schema", short = 's', value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Fixed-width input file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Write decoded records here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format for decoded records.
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: RecordFormatArg,

    #[command(flatten)]
    pub tolerance: ToleranceArgs,
}

#[derive(Args)]
pub struct CheckArgs {
    /// JSON schema document.
    #[arg(long = "schema", short = 's', value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Fixed-width input file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub tolerance: ToleranceArgs,
}

#[derive(Args)]
pub struct EncodeArgs {
    /// JSON schema document.
    #[arg(long = "schema", short = 's', value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// JSON lines input, one object or array per line.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Write fixed-width lines here instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Character used to fill short columns.
    #[arg(long = "pad-char", value_name = "CHAR", default_value_t = ' ')]
    pub pad_char: char,

    /// End lines with CRLF instead of LF.
    #[arg(long = "crlf")]
    pub crlf: bool,
}

/// Decoder tolerance and trimming flags.
#[derive(Args, Clone, Default)]
pub struct ToleranceArgs {
    /// Pad short lines instead of failing.
    #[arg(long = "handle-short-lines")]
    pub handle_short_lines: bool,

    /// Drop characters past the last column instead of failing.
    #[arg(long = "ignore-extra-size")]
    pub ignore_extra_size: bool,

    /// Accept empty columns instead of failing.
    #[arg(long = "ignore-empty-columns")]
    pub ignore_empty_columns: bool,

    /// Enable all three tolerances.
    #[arg(long = "lenient")]
    pub lenient: bool,

    /// Strip leading whitespace from tokens.
    #[arg(long = "trim-leading")]
    pub trim_leading: bool,

    /// Strip trailing whitespace from tokens.
    #[arg(long = "trim-trailing")]
    pub trim_trailing: bool,

    /// Strip whitespace on both sides of tokens.
    #[arg(long = "trim")]
    pub trim: bool,

    /// JSON file with decoder options, combined with the flags above.
    #[arg(long = "options", value_name = "FILE")]
    pub options: Option<PathBuf>,
}

/// Output format choices for decoded records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RecordFormatArg {
    /// One JSON array of objects.
    Json,
    /// One JSON object per line.
    Jsonl,
    /// A table on stdout.
    Table,
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
