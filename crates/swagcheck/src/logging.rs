//! Tracing subscriber setup.
//!
//! The filter comes from `SWAGCHECK_LOG`, then `RUST_LOG`, then the
//! level the caller asks for.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a filter directive
pub const LOG_ENV: &str = "SWAGCHECK_LOG";

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Compact,
    /// One JSON object per line
    Json,
}

/// Filter used when no environment override is set
#[must_use]
pub fn default_filter(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    format!("swagcheck={level},swagcheck_cli={level},warn")
}

fn filter(level: Level) -> EnvFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter(level)))
}

/// Install the global subscriber, writing to stderr
///
/// Returns `false` if a subscriber was already installed.
pub fn init(level: Level, format: LogFormat) -> bool {
    let registry = tracing_subscriber::registry().with(filter(level));
    let installed = match format {
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .try_init(),
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(
            default_filter(Level::DEBUG),
            "swagcheck=debug,swagcheck_cli=debug,warn"
        );
    }

    #[test]
    fn test_second_init_is_refused() {
        let _ = init(Level::INFO, LogFormat::Compact);
        assert!(!init(Level::INFO, LogFormat::Json));
    }
}
