//! Payload transports.
//!
//! A transport receives the serialized payload of one completed call chain.
//! It is invoked at most once per chain and never awaited by the caller of
//! `track`. Transports make a single attempt; they do not retry.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};
use trackit_config::{TransportConfig, TransportType};

use crate::error::TransportError;

/// Destination for finished tracking payloads.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one serialized payload.
    async fn send(&self, payload: String) -> Result<(), TransportError>;

    /// Transport name for logging
    fn name(&self) -> &'static str;
}

/// Writes payloads to the log at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

#[async_trait]
impl Transport for LogTransport {
    async fn send(&self, payload: String) -> Result<(), TransportError> {
        info!(target: "trackit::payload", payload = %payload, "Tracking request");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Discards every payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTransport;

#[async_trait]
impl Transport for NullTransport {
    async fn send(&self, _payload: String) -> Result<(), TransportError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

/// POSTs payloads as JSON to a collection endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for `endpoint` with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Config(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into(),
            timeout,
            http_client,
        })
    }

    /// Collection endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, payload: String) -> Result<(), TransportError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(self.timeout)
                } else {
                    TransportError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(endpoint = %self.endpoint, status = status.as_u16(), "Payload accepted");
            Ok(())
        } else {
            Err(TransportError::Server(status.as_u16()))
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Build the transport described by `config`.
///
/// # Errors
///
/// Returns [`TransportError::Config`] if an HTTP transport has no endpoint or
/// its client cannot be built.
pub fn from_config(config: &TransportConfig) -> Result<Arc<dyn Transport>, TransportError> {
    match config.transport_type {
        TransportType::Log => Ok(Arc::new(LogTransport)),
        TransportType::Null => Ok(Arc::new(NullTransport)),
        TransportType::Http => {
            let endpoint = config
                .endpoint
                .as_deref()
                .ok_or_else(|| TransportError::Config("http transport requires an endpoint".into()))?;
            Ok(Arc::new(HttpTransport::new(endpoint, config.timeout)?))
        }
    }
}
