//! Configuration validation
//!
//! Validates config consistency:
//! - The HTTP transport has an absolute http(s) endpoint
//! - Timeouts are non-zero

use crate::Config;
use crate::error::{ConfigError, Result};
use crate::transport::TransportType;

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_transport(config)?;
    Ok(())
}

fn validate_transport(config: &Config) -> Result<()> {
    let transport = &config.transport;

    if transport.timeout.is_zero() {
        return Err(ConfigError::invalid_value(
            "transport",
            "timeout",
            "must be greater than zero",
        ));
    }

    if transport.transport_type == TransportType::Http {
        let endpoint = transport
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ConfigError::missing_field("transport", "endpoint"))?;

        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::invalid_value(
                "transport",
                "endpoint",
                format!("'{endpoint}' must start with http:// or https://"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_http_requires_endpoint() {
        let err = Config::from_str("[transport]\ntype = \"http\"").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingField {
                section: "transport",
                field: "endpoint"
            }
        ));
    }

    #[test]
    fn test_http_rejects_blank_endpoint() {
        let err = Config::from_str("[transport]\ntype = \"http\"\nendpoint = \"  \"").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));
    }

    #[test]
    fn test_http_rejects_relative_endpoint() {
        let err =
            Config::from_str("[transport]\ntype = \"http\"\nendpoint = \"collect/v1\"").unwrap_err();
        assert!(err.to_string().contains("collect/v1"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Config::from_str("[transport]\ntimeout = \"0s\"").unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_log_transport_ignores_endpoint() {
        assert!(Config::from_str("[transport]\ntype = \"log\"").is_ok());
    }
}
