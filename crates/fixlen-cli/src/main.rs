//! `fixlen` binary entry point.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use fixlen_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use fixlen_cli::commands::{run_check, run_decode, run_encode, run_schema};
use fixlen_cli::logging::{LogConfig, LogFormat, init_logging};
use fixlen_cli::summary::{print_check_report, print_decode_report, print_schema};

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }
    let result = match &cli.command {
        Command::Schema(args) => run_schema(args).map(|schema| {
            print_schema(&schema);
            true
        }),
        Command::Decode(args) => run_decode(args).map(|outcome| {
            print_decode_report(&outcome);
            outcome.halted.is_none()
        }),
        Command::Check(args) => run_check(args).map(|outcome| {
            print_check_report(&outcome);
            outcome.is_clean()
        }),
        Command::Encode(args) => run_encode(args).map(|outcome| {
            eprintln!("Wrote {} lines.", outcome.lines_written);
            true
        }),
    };
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
