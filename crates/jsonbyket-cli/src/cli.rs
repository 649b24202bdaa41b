//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Jsonbyket CLI - Validate and convert JSON/YAML configuration against rule documents
#[derive(Parser, Debug)]
#[command(
    name = "jsonbyket",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "JSONBYKET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a data document against a rule document and print the result
    Convert(ConvertArgs),

    /// Check that a data document satisfies a rule document
    Check(CheckArgs),

    /// List the registered data types, variable types and transforms
    Types,
}

/// Input documents shared by `convert` and `check`
#[derive(Args, Debug, Clone)]
pub struct DocumentArgs {
    /// Path to the data document (JSON or YAML)
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Path to the rule document (JSON or YAML)
    #[arg(short, long, value_name = "RULES")]
    pub rules: PathBuf,
}

/// Overrides applied to the configured globals
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Keep the `_uid`, `_parent`, `_variables` and `_defaults` bookkeeping keys
    #[arg(long)]
    pub keep_hidden: bool,

    /// Engine log threshold (0 = most verbose)
    #[arg(long, value_name = "LEVEL")]
    pub logging: Option<i64>,

    /// Report fatal errors through the normal error path instead of exiting immediately
    #[arg(long)]
    pub traceback: bool,
}

/// Arguments for the convert command
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub documents: DocumentArgs,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Write the converted document to a file (format chosen by extension)
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,

    /// Show node count and warnings after converting
    #[arg(long)]
    pub report: bool,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub documents: DocumentArgs,

    /// Engine log threshold (0 = most verbose)
    #[arg(long, value_name = "LEVEL")]
    pub logging: Option<i64>,

    /// Treat warnings as failures
    #[arg(long)]
    pub deny_warnings: bool,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format with colors
    Human,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// YAML
    Yaml,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}
