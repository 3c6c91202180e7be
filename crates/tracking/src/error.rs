//! Tracking error types.
//!
//! None of these reach the caller of `track`: they are raised and logged
//! inside the detached dispatch task.

use std::time::Duration;

use thiserror::Error;
use trackit_client::BuilderError;

/// Errors raised by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network error during payload submission
    #[error("network error: {0}")]
    Network(String),

    /// Server returned an error status
    #[error("server error: HTTP {0}")]
    Server(u16),

    /// Request did not complete in time
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport could not be constructed from its configuration
    #[error("invalid transport configuration: {0}")]
    Config(String),
}

/// Why a detached dispatch did not deliver its payload.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Payload was incomplete or could not be serialized
    #[error("payload rejected: {0}")]
    Build(#[from] BuilderError),

    /// Transport failed to deliver the payload
    #[error("transport '{transport}' failed: {source}")]
    Transport {
        /// Transport name
        transport: &'static str,
        #[source]
        source: TransportError,
    },
}
