//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Swagcheck: end-to-end checks for the Swag Labs demo store
#[derive(Parser, Debug)]
#[command(name = "swagcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value = "compact", global = true)]
    pub log_format: LogFormatArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenario suites
    Run(RunArgs),

    /// List suites, cases and pages
    List(ListArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Suite to run
    #[arg(short, long, value_enum, default_value = "all")]
    pub suite: SuiteArg,

    /// Browser driver
    #[arg(short, long, value_enum, default_value = "sim", env = "SWAGCHECK_DRIVER")]
    pub driver: DriverArg,

    /// Show the browser window (chromium only)
    #[arg(long)]
    pub headed: bool,

    /// Disable the chromium sandbox (containers, CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Chromium executable
    #[arg(long, env = "SWAGCHECK_CHROMIUM")]
    pub chromium_path: Option<PathBuf>,

    /// Directory holding users.json and messages.json
    #[arg(long, env = "SWAGCHECK_FIXTURES")]
    pub fixtures: Option<PathBuf>,

    /// Store base URL
    #[arg(long, env = "SWAGCHECK_BASE_URL")]
    pub base_url: Option<String>,

    /// Airport Gap API base URL
    #[arg(long, env = "SWAGCHECK_API_URL")]
    pub api_url: Option<String>,

    /// Stop a suite at its first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Per-case timeout in milliseconds
    #[arg(long, default_value = "30000")]
    pub timeout: u64,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Also list pages and their elements
    #[arg(long)]
    pub elements: bool,
}

/// Suite selection
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SuiteArg {
    /// Login validation
    Login,
    /// Adding to the cart
    AddItems,
    /// Removing from the cart
    RemoveItems,
    /// Airport Gap API (needs the `api` feature)
    Api,
    /// Every available suite
    #[default]
    All,
}

impl SuiteArg {
    /// Suite name as registered in the library, `None` for `all`
    #[must_use]
    pub const fn suite_name(self) -> Option<&'static str> {
        match self {
            Self::Login => Some(swagcheck::scenarios::LOGIN_SUITE),
            Self::AddItems => Some(swagcheck::scenarios::ADD_ITEMS_SUITE),
            Self::RemoveItems => Some(swagcheck::scenarios::REMOVE_ITEMS_SUITE),
            Self::Api => Some(swagcheck::scenarios::API_SUITE),
            Self::All => None,
        }
    }
}

/// Driver selection
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverArg {
    /// In-memory store model
    #[default]
    Sim,
    /// Chromium over CDP (needs the `browser` feature)
    Chromium,
}

impl From<DriverArg> for crate::config::DriverKind {
    fn from(arg: DriverArg) -> Self {
        match arg {
            DriverArg::Sim => Self::Sim,
            DriverArg::Chromium => Self::Chromium,
        }
    }
}

/// Report format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text on stderr
    #[default]
    Text,
    /// JSON report on stdout
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Log format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormatArg {
    /// Compact human-readable lines
    #[default]
    Compact,
    /// One JSON object per line
    Json,
}

impl From<LogFormatArg> for swagcheck::logging::LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
