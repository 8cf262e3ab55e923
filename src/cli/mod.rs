//! Command-line interface for Warden

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::ReportFormat;

/// Verbosity level for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Default)]
pub enum Verbosity {
    /// Quiet mode - only show errors
    Quiet = 0,

    /// Normal mode - show the report and warnings
    #[default]
    Normal = 1,

    /// Verbose mode - also show info logs
    Verbose = 2,

    /// Debug mode - show everything including debug info
    Debug = 3,
}

impl From<u8> for Verbosity {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }
}

impl Verbosity {
    /// Log level used when `RUST_LOG` is not set
    pub fn log_level(&self) -> log::LevelFilter {
        match self {
            Verbosity::Quiet => log::LevelFilter::Error,
            Verbosity::Normal => log::LevelFilter::Warn,
            Verbosity::Verbose => log::LevelFilter::Info,
            Verbosity::Debug => log::LevelFilter::Debug,
        }
    }
}

/// Warden - project validation, diagnostics aggregation and quality scoring
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Warden - project validation, diagnostics aggregation and quality scoring",
    long_about = "Warden runs import, webhook, UI data flow and dependency injection validators over a project, folds their findings into one scored report and suggests what to fix first."
)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbosity level (-v=info logs, -vv=debug logs)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output unless there are errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Custom configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Effective verbosity, `--quiet` wins over `-v`
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::from(self.verbose)
        }
    }
}

/// Commands that Warden can execute
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a project and print the report (default command)
    #[command(visible_alias = "check")]
    Validate(ValidateArgs),

    /// Show the registered validators and version
    Status,

    /// Write a default .warden.toml
    Init(InitArgs),
}

/// Arguments for the validate command
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Project directory to validate
    #[arg(name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Report format (console, markdown, json)
    #[arg(short, long)]
    pub format: Option<ReportFormat>,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run validator families one after another
    #[arg(long)]
    pub sequential: bool,

    /// Exit with an error when the overall score is below this value
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub fail_under: Option<u32>,
}

impl Default for ValidateArgs {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            format: None,
            output: None,
            sequential: false,
            fail_under: None,
        }
    }
}

/// Arguments for the init command
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Directory to write the configuration into
    #[arg(name = "PATH", default_value = ".")]
    pub path: PathBuf,
}
