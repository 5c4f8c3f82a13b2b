//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "synthea-pipeline",
    version,
    about = "Ingest Synthea CSV extracts and derive synthetic patient feedback",
    long_about = "Load the six core Synthea CSV tables, normalize their columns and types,\n\
                  derive a deterministic patient-feedback dataset from encounters, and\n\
                  write the results as CSV files and optionally into PostgreSQL."
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

    /// Allow patient and encounter identifiers in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a Synthea extract and write processed outputs.
    Ingest(IngestArgs),

    /// List the required source tables.
    Tables,
}

#[derive(Args)]
pub struct IngestArgs {
    /// Directory holding the Synthea CSV files.
    #[arg(long = "input-dir", value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Directory for the processed CSV files.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "data/processed")]
    pub output_dir: PathBuf,

    /// Also replace the raw tables in PostgreSQL (settings from PG* variables).
    #[arg(long = "load-db")]
    pub load_db: bool,
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

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ingest_defaults_output_dir() {
        let cli = Cli::try_parse_from(["synthea-pipeline", "ingest", "--input-dir", "raw"]).unwrap();
        let Command::Ingest(args) = cli.command else {
            panic!("expected ingest");
        };
        assert_eq!(args.input_dir, PathBuf::from("raw"));
        assert_eq!(args.output_dir, PathBuf::from("data/processed"));
        assert!(!args.load_db);
    }

    #[test]
    fn ingest_requires_input_dir() {
        assert!(Cli::try_parse_from(["synthea-pipeline", "ingest"]).is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "synthea-pipeline",
            "ingest",
            "--input-dir",
            "raw",
            "--load-db",
            "--log-data",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert!(cli.log_data);
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert!(matches!(cli.command, Command::Ingest(IngestArgs { load_db: true, .. })));
    }
}
