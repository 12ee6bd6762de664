//! Swagcheck CLI library
//!
//! Argument parsing, configuration, reporting and the suite runner behind
//! the `swagcheck` binary.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, DriverArg, FormatArg, ListArgs, LogFormatArg, RunArgs, SuiteArg,
};
pub use config::{CliConfig, ColorChoice, DriverKind, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, ProgressReporter};
pub use runner::{catalog_lines, select_suites, RunReport, ScenarioRunner};
