use crate::config::schema::DispatchConfig;
use crate::errors::context::ErrorContext;
use crate::errors::types::{Error, Result};
use crate::events::completion::completion_pair;
use crate::events::deferred::{DeferredQueue, DeferredRecord};
use crate::events::registry::ListenerRegistry;
use crate::events::timeout::with_timeout;
use crate::events::types::{
    ApplicationListener, EventType, HostResponse, RawEventArgs, SyncReturn,
};
use crate::host::source::{HostEvent, HostShim};
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Keepalive-aware event dispatch mediator.
///
/// Sits between a host runtime that tears down idle background processes and
/// the application's own listeners. Every host-fired event gets a response
/// within the configured timeout (which must stay strictly inside the host's
/// own teardown deadline) whether or not a listener exists yet, and no
/// event-scoped failure ever reaches the host as a rejection.
///
/// Cheaply cloneable; clones share the same registry and deferred queue.
#[derive(Clone)]
pub struct KeepaliveMediator {
    inner: Arc<MediatorInner>,
}

struct MediatorInner {
    config: DispatchConfig,
    registry: ListenerRegistry,
    deferred: DeferredQueue,
}

impl KeepaliveMediator {
    /// Create a mediator with the given timing configuration.
    pub fn new(config: DispatchConfig) -> Self {
        KeepaliveMediator {
            inner: Arc::new(MediatorInner {
                config,
                registry: ListenerRegistry::new(),
                deferred: DeferredQueue::new(),
            }),
        }
    }

    /// The timing configuration this mediator runs with.
    pub fn config(&self) -> &DispatchConfig {
        &self.inner.config
    }

    /// Register a shim with each host event source that does not have one
    /// yet, independent of whether a listener is bound. Shims must exist
    /// before application startup completes so early events are captured
    /// rather than lost. Idempotent per event type.
    pub fn preregister_host_shims(&self, sources: HashMap<EventType, Arc<dyn HostEvent>>) {
        for (event_type, source) in sources {
            if self.inner.registry.has_shim(event_type) {
                debug!("host shim already registered for '{}'", event_type);
                continue;
            }
            let shim = self.make_shim(event_type);
            source.add_listener(Arc::clone(&shim));
            self.inner.registry.insert_source(event_type, source);
            self.inner.registry.insert_shim(event_type, shim);
            debug!("preregistered host shim for '{}'", event_type);
        }
    }

    /// Bind the application listener for an event type, then immediately
    /// drain any events of that type that arrived before it existed.
    ///
    /// Fails with [`Error::DuplicateListener`] if a listener is already
    /// bound, or [`Error::MissingShim`] if the event type was never
    /// preregistered. Binding without a shim means events before this point
    /// were already silently dropped, a startup-ordering bug.
    pub fn add_application_listener(
        &self,
        event_type: EventType,
        listener: ApplicationListener,
    ) -> Result<()> {
        self.inner.registry.bind(event_type, listener.clone())?;
        info!("bound {} listener for '{}'", listener.kind(), event_type);
        MediatorInner::drain_deferred(&self.inner, event_type, listener);
        Ok(())
    }

    /// Unregister the shim from its host source and drop the listener
    /// binding. Deferred entries already queued are left alone; their own
    /// timeouts settle them.
    pub fn remove_listeners(&self, event_type: EventType) {
        let registry = &self.inner.registry;
        let shim = registry.remove_shim(event_type);
        let source = registry.remove_source(event_type);
        if let (Some(shim), Some(source)) = (shim, source) {
            source.remove_listener(&shim);
            debug!("unregistered host shim for '{}'", event_type);
        }
        if registry.unbind(event_type).is_some() {
            info!("removed listener binding for '{}'", event_type);
        }
    }

    /// Whether a listener is currently bound for an event type.
    pub fn is_bound(&self, event_type: EventType) -> bool {
        self.inner.registry.is_bound(event_type)
    }

    /// Number of events currently waiting for their listener.
    pub fn deferred_len(&self) -> usize {
        self.inner.deferred.len()
    }

    fn make_shim(&self, event_type: EventType) -> HostShim {
        let inner = Arc::clone(&self.inner);
        Arc::new(move |args: RawEventArgs| {
            let inner = Arc::clone(&inner);
            async move { inner.handle_event(event_type, args).await }.boxed()
        })
    }
}

impl MediatorInner {
    /// The per-event algorithm behind every shim. Never fails: whatever the
    /// inner processing surfaces is absorbed into a benign empty success,
    /// because a host-visible rejection is liable to trigger immediate
    /// teardown of the whole process.
    async fn handle_event(&self, event_type: EventType, args: RawEventArgs) -> HostResponse {
        let outcome = match self.registry.listener(event_type) {
            Some(listener) => self.invoke_listener(event_type, &listener, args).await,
            None => self.defer_event(event_type, args).await,
        };
        match outcome {
            Ok(response) => response,
            Err(err @ Error::ListenerTimeout(_)) => {
                warn!("'{}': {}; acknowledging host with empty success", event_type, err);
                None
            }
            Err(err) => {
                error!("'{}': {}; acknowledging host with empty success", event_type, err);
                None
            }
        }
    }

    /// Invoke a bound listener per the invocation contract: responding
    /// listeners run under the event timeout; fire-and-forget listeners
    /// acknowledge after the grace period so background continuations get
    /// keepalive cover; a bare value from a fire-and-forget listener is a
    /// defect that is logged and passed through.
    async fn invoke_listener(
        &self,
        event_type: EventType,
        listener: &ApplicationListener,
        args: RawEventArgs,
    ) -> Result<HostResponse> {
        match listener {
            ApplicationListener::Responding(handler) => {
                let handler = Arc::clone(handler);
                let context =
                    ErrorContext::new("mediator", "invoke-listener").with_details(event_type);
                with_timeout(
                    async move { handler.handle(args).await },
                    self.config.event_timeout(),
                    context,
                )
                .await
            }
            ApplicationListener::FireAndForget(handler) => match handler.handle(args) {
                SyncReturn::Handled => {
                    let grace = self.config.fire_and_forget_grace();
                    if !grace.is_zero() {
                        debug!(
                            "holding acknowledgement of '{}' for {:?} grace",
                            event_type, grace
                        );
                        tokio::time::sleep(grace).await;
                    }
                    Ok(None)
                }
                SyncReturn::Value(value) => {
                    error!("{}", Error::UnexpectedSyncReturn(event_type));
                    Ok(Some(value))
                }
            },
        }
    }

    /// Queue an event that has no listener yet. The returned future is
    /// guarded by the event timeout so the host gets an answer even if no
    /// listener ever arrives; once that guard settles either way, the record
    /// is stale and must not be drained.
    async fn defer_event(&self, event_type: EventType, args: RawEventArgs) -> Result<HostResponse> {
        let (completion, hooks) = completion_pair();
        let record = DeferredRecord::new(event_type, args, hooks);
        let id = record.id();
        let stale = record.stale_flag();
        debug!("no listener for '{}' yet; deferring event {}", event_type, id);
        self.deferred.push(record);

        let context = ErrorContext::new("mediator", "await-deferred")
            .with_details(format!("{} ({})", event_type, id));
        let outcome = with_timeout(completion.wait(), self.config.event_timeout(), context).await;
        stale.store(true, Ordering::SeqCst);
        outcome
    }

    /// Process every queued event of the given type against the freshly
    /// bound listener. Each fresh record runs on its own task so one slow
    /// listener invocation cannot serialize the rest. Stale records are
    /// discarded with a warning: their host-facing response was already
    /// finalized, and the process it was meant for may be gone.
    fn drain_deferred(inner: &Arc<Self>, event_type: EventType, listener: ApplicationListener) {
        let records = inner.deferred.take_matching(event_type);
        if records.is_empty() {
            return;
        }
        info!("draining {} deferred event(s) for '{}'", records.len(), event_type);

        for record in records {
            if record.is_stale() {
                warn!("discarding {}: {}", record.id(), Error::StaleDeferred(event_type));
                continue;
            }
            let inner = Arc::clone(inner);
            let listener = listener.clone();
            tokio::spawn(async move {
                let (id, args, hooks) = record.into_parts();
                let settled = match inner.invoke_listener(event_type, &listener, args).await {
                    Ok(response) => hooks.resolve(response),
                    Err(err) => {
                        warn!("deferred event {} for '{}' failed: {}", id, event_type, err);
                        hooks.reject(err)
                    }
                };
                if !settled {
                    debug!("deferred event {} for '{}' had already settled", id, event_type);
                }
            });
        }
    }
}
