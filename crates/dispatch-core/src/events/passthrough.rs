use crate::errors::types::{Error, Result};
use crate::events::registry::ListenerRegistry;
use crate::events::types::{ApplicationListener, EventType, RawEventArgs, SyncReturn};
use crate::host::source::{HostEvent, HostShim};
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Passthrough event dispatch mediator.
///
/// For hosts with an always-resident execution context and no idle-teardown
/// risk: the application listener is wrapped directly as the host shim at
/// bind time, with no deferred queue, no timeout wrapping and no
/// fire-and-forget grace. The binding contract is the same as the keepalive
/// variant's, and listener failures are still absorbed before the host can
/// observe them.
#[derive(Clone)]
pub struct PassthroughMediator {
    inner: Arc<PassthroughInner>,
}

struct PassthroughInner {
    registry: ListenerRegistry,
}

impl PassthroughMediator {
    /// Create a passthrough mediator.
    pub fn new() -> Self {
        PassthroughMediator {
            inner: Arc::new(PassthroughInner {
                registry: ListenerRegistry::new(),
            }),
        }
    }

    /// Record the host source for each event type. No shim is registered
    /// until a listener is bound; with a resident host there is no gap for
    /// events to fall into. Idempotent per event type.
    pub fn preregister_host_shims(&self, sources: HashMap<EventType, Arc<dyn HostEvent>>) {
        for (event_type, source) in sources {
            if self.inner.registry.insert_source(event_type, source) {
                debug!("recorded host event source for '{}'", event_type);
            } else {
                debug!("host event source already recorded for '{}'", event_type);
            }
        }
    }

    /// Bind the application listener for an event type and register it with
    /// the host directly. Same failure contract as the keepalive variant:
    /// [`Error::DuplicateListener`] or [`Error::MissingShim`].
    pub fn add_application_listener(
        &self,
        event_type: EventType,
        listener: ApplicationListener,
    ) -> Result<()> {
        let source = self
            .inner
            .registry
            .source(event_type)
            .ok_or(Error::MissingShim(event_type))?;
        self.inner.registry.bind(event_type, listener.clone())?;

        let shim = Self::direct_shim(event_type, listener.clone());
        source.add_listener(Arc::clone(&shim));
        self.inner.registry.insert_shim(event_type, shim);
        info!("bound {} listener directly for '{}'", listener.kind(), event_type);
        Ok(())
    }

    /// Unregister the shim from its host source and drop the binding.
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

    /// A shim that invokes the listener with nothing in between. Failures
    /// are absorbed into an empty success; a bare value from a
    /// fire-and-forget listener is logged and passed through.
    fn direct_shim(event_type: EventType, listener: ApplicationListener) -> HostShim {
        Arc::new(move |args: RawEventArgs| {
            let listener = listener.clone();
            async move {
                match listener {
                    ApplicationListener::Responding(handler) => {
                        match handler.handle(args).await {
                            Ok(response) => response,
                            Err(err) => {
                                warn!(
                                    "'{}': {}; acknowledging host with empty success",
                                    event_type, err
                                );
                                None
                            }
                        }
                    }
                    ApplicationListener::FireAndForget(handler) => match handler.handle(args) {
                        SyncReturn::Handled => None,
                        SyncReturn::Value(value) => {
                            error!("{}", Error::UnexpectedSyncReturn(event_type));
                            Some(value)
                        }
                    },
                }
            }
            .boxed()
        })
    }
}

impl Default for PassthroughMediator {
    fn default() -> Self {
        Self::new()
    }
}
