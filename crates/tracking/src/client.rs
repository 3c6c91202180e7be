//! Tracking client - runs tracked blocks and dispatches their payloads.
//!
//! Each `track` call runs the caller's block in its own task, bound to the
//! chain's builder, and receives the block's result through a single-slot
//! rendezvous. When the outermost block of a chain succeeds, a second task is
//! forked to build, validate and send the payload. That task is detached from
//! the caller: it is never awaited by `track`, outlives the caller's
//! cancellation, and contains its own failures. Dispatch tasks are registered
//! on a [`TaskTracker`] so they can be drained before shutdown.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, trace, warn};
use trackit_config::TransportConfig;

use crate::context::{ChainBinding, ContextId, Tracker};
use crate::error::{DispatchError, TransportError};
use crate::transport::{self, Transport};

/// Dispatch outcome counters
#[derive(Debug, Default)]
struct DispatchMetrics {
    dispatched: AtomicU64,
    failed_validation: AtomicU64,
    failed_transport: AtomicU64,
}

impl DispatchMetrics {
    fn record(&self, outcome: &Result<(), DispatchError>) {
        let counter = match outcome {
            Ok(()) => &self.dispatched,
            Err(DispatchError::Build(_)) => &self.failed_validation,
            Err(DispatchError::Transport { .. }) => &self.failed_transport,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> DispatchStats {
        DispatchStats {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            failed_validation: self.failed_validation.load(Ordering::Relaxed),
            failed_transport: self.failed_transport.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of a client's dispatch counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Payloads accepted by the transport
    pub dispatched: u64,
    /// Payloads dropped because required fields were missing
    pub failed_validation: u64,
    /// Payloads the transport failed to deliver
    pub failed_transport: u64,
}

impl DispatchStats {
    /// Total dispatch attempts that finished
    pub fn total(&self) -> u64 {
        self.dispatched + self.failed_validation + self.failed_transport
    }
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    dispatches: TaskTracker,
    metrics: DispatchMetrics,
    shut_down: AtomicBool,
}

/// Runs tracked blocks and dispatches completed payloads.
///
/// Cheap to clone; clones share the transport, the dispatch tracker and the
/// counters.
#[derive(Clone)]
pub struct TrackingClient {
    inner: Arc<ClientInner>,
}

impl TrackingClient {
    /// Create a client sending payloads to `transport`
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                dispatches: TaskTracker::new(),
                metrics: DispatchMetrics::default(),
                shut_down: AtomicBool::new(false),
            }),
        }
    }

    /// Create a client with the transport described by `config`
    ///
    /// # Errors
    ///
    /// Returns error if the transport cannot be constructed.
    pub fn from_config(config: &TransportConfig) -> Result<Self, TransportError> {
        Ok(Self::new(transport::from_config(config)?))
    }

    /// Name of the underlying transport
    pub fn transport_name(&self) -> &'static str {
        self.inner.transport.name()
    }

    /// Number of dispatch tasks still running
    pub fn pending_dispatches(&self) -> usize {
        self.inner.dispatches.len()
    }

    /// Dispatch counters
    pub fn stats(&self) -> DispatchStats {
        self.inner.metrics.snapshot()
    }

    /// Whether [`shutdown`](Self::shutdown) has been called
    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub(crate) fn dispatches_closed(&self) -> bool {
        self.inner.dispatches.is_closed()
    }

    /// Wait for every dispatch forked so far; the client stays usable.
    ///
    /// After [`shutdown`](Self::shutdown) this only waits; the dispatch
    /// tracker stays closed.
    pub async fn drain(&self) {
        self.inner.dispatches.close();
        self.inner.dispatches.wait().await;
        if !self.is_shut_down() {
            self.inner.dispatches.reopen();
        }
    }

    /// Wait for every outstanding dispatch before process exit.
    pub async fn shutdown(&self) {
        debug!(
            pending = self.pending_dispatches(),
            "Draining tracking dispatches"
        );
        self.inner.shut_down.store(true, Ordering::Release);
        self.inner.dispatches.close();
        self.inner.dispatches.wait().await;
        debug!(stats = ?self.stats(), "Tracking client shut down");
    }

    /// Run `block` in the call chain of `context` (see `TrackingContext::track`)
    pub(crate) async fn track<F, Fut, R, E>(&self, context: ContextId, block: F) -> Result<R, E>
    where
        F: FnOnce(Tracker) -> Fut + Send + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
    {
        let binding = ChainBinding::current();
        let (tracker, outermost) = match binding.lookup(context) {
            Some(tracker) => (tracker, false),
            None => (Tracker::new(context), true),
        };
        trace!(context = context.as_u64(), outermost, "Tracked block starting");

        let (tx, rx) = oneshot::channel();
        let unit = {
            let tracker = tracker.clone();
            let binding = binding.with(tracker.clone());
            BlockUnit(Some(tokio::spawn(binding.scope(async move {
                let _ = tx.send(block(tracker).await);
            }))))
        };

        let outcome = match rx.await {
            Ok(outcome) => outcome,
            Err(_) => unit.resume_failure().await,
        };

        if outermost && outcome.is_ok() {
            self.dispatch(context, tracker);
        }

        outcome
    }

    /// Fork the detached task that builds and sends the chain's payload
    fn dispatch(&self, context: ContextId, tracker: Tracker) {
        let inner = Arc::clone(&self.inner);
        self.inner.dispatches.spawn(async move {
            let outcome = inner.send(tracker).await;
            inner.metrics.record(&outcome);

            match outcome {
                Ok(()) => debug!(
                    context = context.as_u64(),
                    transport = inner.transport.name(),
                    "Tracking payload dispatched"
                ),
                Err(DispatchError::Build(e)) => warn!(
                    context = context.as_u64(),
                    missing = ?e.missing_fields(),
                    error = %e,
                    "Tracking payload rejected"
                ),
                Err(e) => warn!(context = context.as_u64(), error = %e, "Tracking failed"),
            }
        });
    }
}

impl ClientInner {
    async fn send(&self, tracker: Tracker) -> Result<(), DispatchError> {
        let payload = tracker.build()?;
        self.transport
            .send(payload)
            .await
            .map_err(|source| DispatchError::Transport {
                transport: self.transport.name(),
                source,
            })
    }
}

/// Task running a tracked block; aborted if dropped before the rendezvous.
struct BlockUnit(Option<JoinHandle<()>>);

impl BlockUnit {
    /// The block's task ended without handing back a result
    async fn resume_failure<T>(mut self) -> T {
        if let Some(handle) = self.0.take()
            && let Err(e) = handle.await
            && e.is_panic()
        {
            std::panic::resume_unwind(e.into_panic());
        }
        // Only reachable when the runtime tears down the block's task
        error!("Tracked block was cancelled before returning a result");
        panic!("tracked block was cancelled before returning a result")
    }
}

impl Drop for BlockUnit {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for TrackingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingClient")
            .field("transport", &self.inner.transport.name())
            .field("pending_dispatches", &self.pending_dispatches())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}
