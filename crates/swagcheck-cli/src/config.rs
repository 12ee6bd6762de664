//! CLI configuration

use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use swagcheck::DriverConfig;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - failures and errors only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// From `-q` and the `-v` count
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Check if debug mode
    #[must_use]
    pub const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }

    /// Tracing level for this verbosity
    #[must_use]
    pub const fn log_level(self) -> tracing::Level {
        match self {
            Self::Quiet => tracing::Level::ERROR,
            Self::Normal => tracing::Level::WARN,
            Self::Verbose => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when stderr is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

/// Which browser backs the sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DriverKind {
    /// In-memory store model
    #[default]
    Sim,
    /// Chromium over CDP
    Chromium,
}

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Report format
    pub format: OutputFormat,
    /// Browser driver
    pub driver: DriverKind,
    /// Run chromium without a window
    pub headless: bool,
    /// Keep the chromium sandbox on
    pub sandbox: bool,
    /// Chromium executable override
    pub chromium_path: Option<PathBuf>,
    /// Fixture directory override
    pub fixtures_dir: Option<PathBuf>,
    /// Store base URL override
    pub base_url: Option<String>,
    /// API base URL override
    pub api_url: Option<String>,
    /// Stop a suite at its first failure
    pub fail_fast: bool,
    /// Per-case timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Auto,
            format: OutputFormat::Text,
            driver: DriverKind::Sim,
            headless: true,
            sandbox: true,
            chromium_path: None,
            fixtures_dir: None,
            base_url: None,
            api_url: None,
            fail_fast: false,
            timeout_ms: 30_000,
        }
    }
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set report format
    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set driver
    #[must_use]
    pub const fn with_driver(mut self, driver: DriverKind) -> Self {
        self.driver = driver;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium sandbox
    #[must_use]
    pub const fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Set chromium executable
    #[must_use]
    pub fn with_chromium_path(mut self, path: Option<PathBuf>) -> Self {
        self.chromium_path = path;
        self
    }

    /// Set fixture directory
    #[must_use]
    pub fn with_fixtures_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.fixtures_dir = dir;
        self
    }

    /// Set store base URL
    #[must_use]
    pub fn with_base_url(mut self, url: Option<String>) -> Self {
        self.base_url = url;
        self
    }

    /// Set API base URL
    #[must_use]
    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        self.api_url = url;
        self
    }

    /// Set fail fast
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Set per-case timeout
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Store base URL, falling back to the public site
    #[must_use]
    pub fn store_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map_or(swagcheck::sim::BASE_URL, |url| url.trim_end_matches('/'))
    }

    /// Browser launch options derived from this configuration
    #[must_use]
    pub fn driver_config(&self) -> DriverConfig {
        let mut config = DriverConfig::new()
            .headless(self.headless)
            .navigation_timeout(Duration::from_millis(self.timeout_ms));
        if !self.sandbox {
            config = config.no_sandbox();
        }
        if let Some(ref path) = self.chromium_path {
            config = config.executable_path(path.display().to_string());
        }
        config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod verbosity_tests {
        use super::*;

        #[test]
        fn test_from_flags() {
            assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
            assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
            assert_eq!(Verbosity::from_flags(false, 3), Verbosity::Debug);
            assert_eq!(Verbosity::from_flags(true, 2), Verbosity::Quiet);
        }

        #[test]
        fn test_predicates() {
            assert!(Verbosity::Quiet.is_quiet());
            assert!(!Verbosity::Normal.is_verbose());
            assert!(Verbosity::Debug.is_verbose());
            assert!(Verbosity::Debug.is_debug());
        }

        #[test]
        fn test_log_level() {
            assert_eq!(Verbosity::Quiet.log_level(), tracing::Level::ERROR);
            assert_eq!(Verbosity::Verbose.log_level(), tracing::Level::INFO);
        }
    }

    mod color_tests {
        use super::*;

        #[test]
        fn test_explicit_choices() {
            assert!(ColorChoice::Always.should_color());
            assert!(!ColorChoice::Never.should_color());
        }
    }

    mod cli_config_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = CliConfig::new();
            assert_eq!(config.driver, DriverKind::Sim);
            assert!(config.headless);
            assert!(config.sandbox);
            assert_eq!(config.timeout_ms, 30_000);
            assert_eq!(config.store_url(), "https://www.saucedemo.com");
        }

        #[test]
        fn test_store_url_override_trims_slash() {
            let config = CliConfig::new().with_base_url(Some("http://localhost:8080/".to_string()));
            assert_eq!(config.store_url(), "http://localhost:8080");
        }

        #[test]
        fn test_driver_config() {
            let config = CliConfig::new()
                .with_headless(false)
                .with_sandbox(false)
                .with_timeout_ms(5_000)
                .with_chromium_path(Some(PathBuf::from("/opt/chromium")))
                .driver_config();
            assert!(!config.headless);
            assert!(!config.sandbox);
            assert_eq!(config.navigation_timeout, Duration::from_secs(5));
            assert_eq!(config.executable_path.as_deref(), Some("/opt/chromium"));
        }
    }
}
