//! Logging setup for the ig-export binary
//!
//! Log lines go to stderr so stdout only carries the final summary.
//! `RUST_LOG` takes precedence over the configured level.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines without targets
    #[default]
    Text,
    /// One JSON object per event, fields flattened
    Json,
}

impl LogFormat {
    const NAMES: [(&'static str, LogFormat); 2] = [("text", LogFormat::Text), ("json", LogFormat::Json)];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s.trim()))
            .map(|(_, format)| *format)
            .ok_or_else(|| format!("unknown log format '{}', expected text or json", s))
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the global subscriber is built
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    /// Set by `--debug`; forces the `debug` level
    pub verbose: bool,
}

impl LoggingConfig {
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
        }
    }

    /// Filter directive used when `RUST_LOG` is not set
    pub fn directive(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.level
        }
    }

    /// Install the global subscriber
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber has already been installed
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);

        match self.format {
            LogFormat::Json => builder.json().flatten_event(true).init(),
            LogFormat::Text => builder.with_target(false).init(),
        }
    }
}

/// Log format from `IG_EXPORT_LOG_FORMAT`; text when unset or unknown
pub fn format_from_env() -> LogFormat {
    std::env::var("IG_EXPORT_LOG_FORMAT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

/// Log level from `IG_EXPORT_LOG_LEVEL`, or `info`
pub fn level_from_env() -> String {
    std::env::var("IG_EXPORT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}
