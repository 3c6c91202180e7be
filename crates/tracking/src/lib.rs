//! Trackit tracking - call-chain scoped, non-blocking payload dispatch.
//!
//! Instrumented code wraps its work in [`TrackingContext::track`]. Key principles:
//!
//! - **Accumulating**: nested `track` calls on one context, including calls
//!   made from tasks spawned with [`Tracker::spawn`], fill the same payload
//! - **Isolated**: each context, and each independent call chain, has its own builder
//! - **Non-blocking**: the caller gets its result back before the payload is
//!   built, validated and sent in a detached task
//! - **Side-channel**: validation and transport failures are logged, never
//!   returned to the caller
//!
//! # Architecture
//!
//! ```text
//! caller ── track(block) ──▶ block task ──(rendezvous)──▶ caller gets result
//!                              │ Tracker::set                │
//!                              ▼                             ▼ outermost only
//!                         RequestBuilder ◀── build/validate ── dispatch task ──▶ Transport
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::convert::Infallible;
//! use std::sync::Arc;
//! use trackit_client::Attribute;
//! use trackit_tracking::{LogTransport, TrackingClient, TrackingContext};
//!
//! # async fn run() {
//! let client = TrackingClient::new(Arc::new(LogTransport));
//! let context = TrackingContext::new(client.clone());
//!
//! let page = context
//!     .track(|tracker| async move {
//!         tracker.set(Attribute::PageName, "Home");
//!         Ok::<_, Infallible>("rendered")
//!     })
//!     .await;
//!
//! // Before exit: wait for payloads still in flight
//! client.shutdown().await;
//! # }
//! ```

pub mod client;
pub mod context;
pub mod error;
pub mod transport;


pub use client::{DispatchStats, TrackingClient};
pub use context::{ContextId, Tracker, TrackingContext, spawn};
pub use error::{DispatchError, TransportError};
pub use transport::{HttpTransport, LogTransport, NullTransport, Transport};
