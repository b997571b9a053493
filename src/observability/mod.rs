//! Logging setup
//!
//! Library code only emits `tracing` events. Binaries install a subscriber
//! here; logs go to stderr so stdout stays free for command responses.
//!
//! `RUST_LOG`, when set, overrides the configured level.

use std::io;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Single-line human-readable output
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Levels accepted in configuration
pub const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Installs the global subscriber.
///
/// Returns `false` if a subscriber was already installed, in which case the
/// existing one stays in effect.
pub fn init_logging(level: &str, format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(io::stderr))
            .try_init(),
    };

    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("pretty".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_second_init_is_refused() {
        init_logging("warn", LogFormat::Compact);
        assert!(!init_logging("warn", LogFormat::Json));
    }
}
