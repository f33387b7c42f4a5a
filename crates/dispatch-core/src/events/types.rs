use crate::errors::types::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Represents a type of host event, e.g. `"tab-removed"`.
pub type EventType = &'static str;

/// The positional arguments the host passes when an event fires. Treated as
/// an opaque payload by the mediator.
pub type RawEventArgs = Vec<Value>;

/// The value handed back to the host once an event is handled. `None` is the
/// benign empty success the host always accepts.
pub type HostResponse = Option<Value>;

/// Immediate outcome of a fire-and-forget listener.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncReturn {
    /// Nothing to report. A background continuation may still be running.
    Handled,
    /// Defect path: the listener produced a bare value where a responding
    /// listener (returning a future) was called for. The mediator logs this
    /// and passes the value through rather than crashing.
    Value(Value),
}

/// Handler trait for listeners that answer the host with a result.
#[async_trait]
pub trait RespondingListener: Send + Sync {
    /// Process an event and produce the host-facing response.
    async fn handle(&self, args: RawEventArgs) -> Result<HostResponse>;
}

/// Implementation of RespondingListener for closures
#[async_trait]
impl<F> RespondingListener for F
where
    F: Fn(RawEventArgs) -> futures::future::BoxFuture<'static, Result<HostResponse>>
        + Send
        + Sync
        + 'static,
{
    async fn handle(&self, args: RawEventArgs) -> Result<HostResponse> {
        (self)(args).await
    }
}

/// Handler trait for listeners that return immediately with no result.
pub trait FireAndForgetListener: Send + Sync {
    /// Process an event, returning at once.
    fn handle(&self, args: RawEventArgs) -> SyncReturn;
}

/// Implementation of FireAndForgetListener for closures
impl<F> FireAndForgetListener for F
where
    F: Fn(RawEventArgs) -> SyncReturn + Send + Sync + 'static,
{
    fn handle(&self, args: RawEventArgs) -> SyncReturn {
        (self)(args)
    }
}

/// The application's handler for one event type.
///
/// Exactly one listener may be bound per [`EventType`] at a time. The two
/// variants make the responding / fire-and-forget split explicit instead of
/// inferring it from what an invocation happens to return.
#[derive(Clone)]
pub enum ApplicationListener {
    /// Accepts the raw arguments and returns a future producing a result.
    Responding(Arc<dyn RespondingListener>),
    /// Accepts the raw arguments and returns immediately with no result.
    FireAndForget(Arc<dyn FireAndForgetListener>),
}

impl ApplicationListener {
    /// Wrap a responding listener.
    pub fn responding<L: RespondingListener + 'static>(listener: L) -> Self {
        ApplicationListener::Responding(Arc::new(listener))
    }

    /// Wrap a fire-and-forget listener.
    pub fn fire_and_forget<L: FireAndForgetListener + 'static>(listener: L) -> Self {
        ApplicationListener::FireAndForget(Arc::new(listener))
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ApplicationListener::Responding(_) => "responding",
            ApplicationListener::FireAndForget(_) => "fire-and-forget",
        }
    }
}

// Implement Debug manually
impl Debug for ApplicationListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationListener::Responding(_) => write!(f, "Responding(<listener>)"),
            ApplicationListener::FireAndForget(_) => write!(f, "FireAndForget(<listener>)"),
        }
    }
}
