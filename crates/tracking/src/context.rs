//! Tracking contexts and call-chain propagation.
//!
//! A call chain starts at the outermost `track` call on a context and covers
//! every task spawned on its behalf. The builder of a chain travels with the
//! chain's tasks as a task-local binding, keyed by context identity, so that:
//!
//! - nested `track` calls on the same context reuse the chain's builder
//! - a different context never sees another context's builder
//! - two independent chains on one context each get their own builder
//!
//! Tasks started with plain `tokio::spawn` leave the chain. Use
//! [`Tracker::spawn`] or [`spawn`] to carry the binding along.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use trackit_client::{Attribute, BuilderError, RequestBuilder, Value};

use crate::client::TrackingClient;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

tokio::task_local! {
    static CHAIN: ChainBinding;
}

/// Identity of a [`TrackingContext`]; shared by its clones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric id
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Builders bound to the current task, one per context with an active chain
#[derive(Clone, Default)]
pub(crate) struct ChainBinding {
    bound: Vec<(ContextId, Tracker)>,
}

impl ChainBinding {
    /// Binding of the current task, empty outside any chain
    pub(crate) fn current() -> Self {
        CHAIN.try_with(ChainBinding::clone).unwrap_or_default()
    }

    pub(crate) fn lookup(&self, context: ContextId) -> Option<Tracker> {
        self.bound
            .iter()
            .find(|(id, _)| *id == context)
            .map(|(_, tracker)| tracker.clone())
    }

    /// This binding with `tracker` bound for its context
    pub(crate) fn with(mut self, tracker: Tracker) -> Self {
        match self.bound.iter_mut().find(|(id, _)| *id == tracker.context) {
            Some(slot) => slot.1 = tracker,
            None => self.bound.push((tracker.context, tracker)),
        }
        self
    }

    /// Run `future` with this binding as its task-local state
    pub(crate) fn scope<F: Future>(self, future: F) -> impl Future<Output = F::Output> {
        CHAIN.scope(self, future)
    }
}

/// Spawn a task that stays inside the current call chain.
///
/// `track` calls made by the task resolve to the same builders as the
/// spawning task. Outside any chain this behaves like `tokio::spawn`.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::spawn(ChainBinding::current().scope(future))
}

/// Handle to the builder of one call chain, given to `track` blocks.
///
/// Cheap to clone; every clone mutates the same builder and belongs to the
/// same context.
#[derive(Debug, Clone)]
pub struct Tracker {
    context: ContextId,
    builder: Arc<Mutex<RequestBuilder>>,
}

impl Tracker {
    pub(crate) fn new(context: ContextId) -> Self {
        Self {
            context,
            builder: Arc::default(),
        }
    }

    /// Context whose chain this builder belongs to
    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Assign a value to an attribute
    pub fn set(&self, attribute: Attribute, value: impl Into<Value>) -> &Self {
        self.builder.lock().set(attribute, value);
        self
    }

    /// Apply several assignments in order
    pub fn set_all<I, V>(&self, assignments: I) -> &Self
    where
        I: IntoIterator<Item = (Attribute, V)>,
        V: Into<Value>,
    {
        self.builder.lock().set_all(assignments);
        self
    }

    /// Serialize and validate the payload accumulated so far
    pub fn build(&self) -> Result<String, BuilderError> {
        self.builder.lock().build()
    }

    /// Copy of the builder's current state
    pub fn snapshot(&self) -> RequestBuilder {
        self.builder.lock().clone()
    }

    /// Whether both handles mutate the same builder
    pub fn shares_builder_with(&self, other: &Tracker) -> bool {
        Arc::ptr_eq(&self.builder, &other.builder)
    }

    /// Spawn a sub-task bound to this tracker's chain.
    ///
    /// Unlike the free [`spawn`], the binding comes from the tracker rather
    /// than the calling task, so it holds even when the tracker was moved
    /// into a task that left the chain. Other contexts bound in the calling
    /// task are carried along as well.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        tokio::spawn(ChainBinding::current().with(self.clone()).scope(future))
    }
}

/// Entry point for instrumented code.
///
/// A context hands one builder to every `track` call of a call chain and
/// dispatches the payload once the outermost call completes. Clones share
/// the same identity, so services holding clones of one context accumulate
/// into the same payload.
///
/// # Example
///
/// ```no_run
/// use std::convert::Infallible;
/// use std::sync::Arc;
/// use trackit_client::Attribute;
/// use trackit_tracking::{LogTransport, TrackingClient, TrackingContext};
///
/// # async fn run() {
/// let context = TrackingContext::new(TrackingClient::new(Arc::new(LogTransport)));
///
/// let answer = context
///     .track(|tracker| async move {
///         tracker.set(Attribute::PageName, "Home");
///         Ok::<_, Infallible>(42)
///     })
///     .await;
/// assert_eq!(answer.unwrap(), 42);
/// # }
/// ```
#[derive(Clone)]
pub struct TrackingContext {
    id: ContextId,
    client: TrackingClient,
}

impl TrackingContext {
    /// Create a context with a fresh identity
    pub fn new(client: TrackingClient) -> Self {
        Self {
            id: ContextId::next(),
            client,
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn client(&self) -> &TrackingClient {
        &self.client
    }

    /// Builder bound to this context in the current call chain, if any
    pub fn current(&self) -> Option<Tracker> {
        ChainBinding::current().lookup(self.id)
    }

    /// Run `block` against this context's builder and return its result.
    ///
    /// Inside an active chain the chain's builder is reused; otherwise a new
    /// chain starts with an empty builder. The block runs in its own task.
    /// Once the outermost block succeeds, the payload is built, validated
    /// and dispatched in a detached task; `track` does not wait for it.
    ///
    /// # Errors
    ///
    /// Returns the block's own error. Nothing is dispatched for a chain
    /// whose outermost block failed. Tracking failures are logged, never
    /// returned.
    ///
    /// # Panics
    ///
    /// A panic inside the block resumes on the caller.
    pub async fn track<F, Fut, R, E>(&self, block: F) -> Result<R, E>
    where
        F: FnOnce(Tracker) -> Fut + Send + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
    {
        self.client.track(self.id, block).await
    }
}

impl std::fmt::Debug for TrackingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingContext")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
