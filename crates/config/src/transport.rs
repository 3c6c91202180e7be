//! Transport configuration
//!
//! Selects where finished tracking payloads are dispatched.
//!
//! # Defaults
//!
//! - `type`: `log` (payloads are written to the log)
//! - `timeout`: 10 seconds
//!
//! The transport makes a single attempt per payload. Retries, if any, are the
//! receiving endpoint's business.

use serde::Deserialize;
use std::time::Duration;

/// Default request timeout for the HTTP transport
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport kind
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    /// Write payloads to the log (default)
    #[default]
    Log,
    /// POST payloads to an HTTP endpoint
    Http,
    /// Discard payloads
    Null,
}

impl TransportType {
    /// Lowercase name as written in config
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Http => "http",
            Self::Null => "null",
        }
    }
}

/// Transport configuration
///
/// # Example
///
/// ```toml
/// [transport]
/// type = "http"
/// endpoint = "https://collect.example.com/v1/track"
/// timeout = "5s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Transport kind (log, http, null)
    /// Default: log
    #[serde(rename = "type")]
    pub transport_type: TransportType,

    /// Collection endpoint, required for `http`
    pub endpoint: Option<String>,

    /// Per-request timeout
    /// Default: 10s
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            transport_type: TransportType::Log,
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
