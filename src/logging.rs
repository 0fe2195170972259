//! Logging setup for Flagstaff.
//!
//! Library code only emits `tracing` events. Applications that do not install
//! their own subscriber can call [`init`] once at startup.
//!
//! # Environment Variables
//!
//! - `FLAGSTAFF_DEBUG=1` - Enable debug logging
//! - `FLAGSTAFF_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `FLAGSTAFF_LOG_FORMAT=pretty|compact|json` - Set output format
//!
//! `RUST_LOG` takes precedence over the level when set.

use std::env;
use tracing::level_filters::LevelFilter;

/// Output format for log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Multi-line human readable output
    Pretty,
    /// Compact single-line format
    Compact,
    /// JSON format for structured logging
    Json,
}

impl Format {
    /// Get format from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.to_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        "off" | "none" => Some(LevelFilter::OFF),
        _ => None,
    }
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub format: Format,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: Format::Compact,
        }
    }
}

impl LogConfig {
    /// Load configuration from `FLAGSTAFF_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let debug = lookup("FLAGSTAFF_DEBUG")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        let level = lookup("FLAGSTAFF_LOG_LEVEL")
            .and_then(|s| parse_level(&s))
            .unwrap_or(if debug {
                LevelFilter::DEBUG
            } else {
                LevelFilter::INFO
            });

        let format = lookup("FLAGSTAFF_LOG_FORMAT")
            .and_then(|s| Format::parse(&s))
            .unwrap_or(Format::Compact);

        Self { level, format }
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }
}

/// Install a global subscriber configured from the environment.
///
/// Returns `false` when a subscriber was already installed.
pub fn init() -> bool {
    init_with(LogConfig::from_env())
}

/// Install a global subscriber with explicit configuration.
pub fn init_with(config: LogConfig) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match config.format {
        Format::Pretty => builder.pretty().try_init(),
        Format::Compact => builder.compact().try_init(),
        Format::Json => builder.json().try_init(),
    };

    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> LogConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]), LogConfig::default());
    }

    #[test]
    fn test_debug_flag() {
        assert_eq!(config(&[("FLAGSTAFF_DEBUG", "1")]).level, LevelFilter::DEBUG);
        assert_eq!(config(&[("FLAGSTAFF_DEBUG", "TRUE")]).level, LevelFilter::DEBUG);
        assert_eq!(config(&[("FLAGSTAFF_DEBUG", "no")]).level, LevelFilter::INFO);
    }

    #[test]
    fn test_explicit_level_wins_over_debug() {
        let config = config(&[("FLAGSTAFF_DEBUG", "1"), ("FLAGSTAFF_LOG_LEVEL", "warning")]);
        assert_eq!(config.level, LevelFilter::WARN);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(config(&[("FLAGSTAFF_LOG_FORMAT", "json")]).format, Format::Json);
        assert_eq!(config(&[("FLAGSTAFF_LOG_FORMAT", "Pretty")]).format, Format::Pretty);
        assert_eq!(config(&[("FLAGSTAFF_LOG_FORMAT", "xml")]).format, Format::Compact);
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = LogConfig::default().with_level(LevelFilter::OFF);
        init_with(config.clone());
        assert!(!init_with(config));
    }
}
