//! Logging configuration
//!
//! The `[log]` section picks the verbosity and output format of trackit
//! processes. The level can be overridden on the command line; both sources
//! resolve to one `EnvFilter` directive through [`LogConfig::directive`].

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Verbosity of trackit's own logs
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Case-insensitive, so `--log-level DEBUG` works
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown log level '{s}' (expected trace, debug, info, warn or error)")
            })
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Console,
    /// One JSON object per line
    Json,
}

/// `[log]` section
///
/// ```toml
/// [log]
/// level = "debug"
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl LogConfig {
    /// Level in effect once a command-line override is applied
    pub fn effective_level(&self, cli_override: Option<LogLevel>) -> LogLevel {
        cli_override.unwrap_or(self.level)
    }

    /// `EnvFilter` directive for the effective level
    ///
    /// Trackit crates log at the effective level; dependencies (reqwest,
    /// hyper) are held at `warn` unless the effective level is quieter.
    pub fn directive(&self, cli_override: Option<LogLevel>) -> String {
        let level = self.effective_level(cli_override);
        let deps = level.max(LogLevel::Warn);
        format!("{deps},trackit={level},trackit_tracking={level},trackit_client={level}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Console);
    }

    #[test]
    fn test_deserialize_full() {
        let config: LogConfig = toml::from_str("level = \"warn\"\nformat = \"json\"").unwrap();
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_level_from_str_is_case_insensitive() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!(" warn ".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("verbose".parse::<LogLevel>().unwrap_err().contains("verbose"));
    }

    #[test]
    fn test_cli_override_wins() {
        let config = LogConfig {
            level: LogLevel::Error,
            ..Default::default()
        };
        assert_eq!(config.effective_level(None), LogLevel::Error);
        assert_eq!(config.effective_level(Some(LogLevel::Trace)), LogLevel::Trace);
    }

    #[test]
    fn test_directive_holds_dependencies_at_warn() {
        let config = LogConfig {
            level: LogLevel::Debug,
            ..Default::default()
        };
        assert_eq!(
            config.directive(None),
            "warn,trackit=debug,trackit_tracking=debug,trackit_client=debug"
        );
        assert_eq!(
            config.directive(Some(LogLevel::Error)),
            "error,trackit=error,trackit_tracking=error,trackit_client=error"
        );
    }
}
