//! Unified mediator API.
//!
//! This module provides a consistent interface for working with the two
//! scheduling variants, so application code can be written once and run
//! against either a keepalive-constrained host or a resident one.

use crate::errors::types::Result;
use crate::events::mediator::KeepaliveMediator;
use crate::events::passthrough::PassthroughMediator;
use crate::events::types::{ApplicationListener, EventType};
use crate::host::source::HostEvent;
use std::collections::HashMap;
use std::sync::Arc;

/// Unified dispatch mediator over both scheduling variants.
///
/// Both variants satisfy the same external contract; they differ only in
/// internal policy (deferral, timeouts, fire-and-forget grace), selected at
/// construction time via [`crate::events::builder::MediatorBuilder`].
#[derive(Clone)]
pub enum DispatchMediator {
    /// Full deferred-queue + timeout-guard behavior for hosts that tear
    /// down idle background processes.
    Keepalive(KeepaliveMediator),

    /// Direct registration for always-resident hosts.
    Passthrough(PassthroughMediator),
}

impl DispatchMediator {
    /// Register shims (keepalive) or record sources (passthrough) for each
    /// event type. Idempotent per event type.
    pub fn preregister_host_shims(&self, sources: HashMap<EventType, Arc<dyn HostEvent>>) {
        match self {
            Self::Keepalive(mediator) => mediator.preregister_host_shims(sources),
            Self::Passthrough(mediator) => mediator.preregister_host_shims(sources),
        }
    }

    /// Bind the application listener for an event type.
    ///
    /// # Arguments
    ///
    /// * `event_type` - The event type to bind for
    /// * `listener` - The application listener to invoke when it fires
    ///
    /// # Returns
    ///
    /// `Ok(())` on success; `DuplicateListener` if one is already bound, or
    /// `MissingShim` if the event type was never preregistered.
    pub fn add_application_listener(
        &self,
        event_type: EventType,
        listener: ApplicationListener,
    ) -> Result<()> {
        match self {
            Self::Keepalive(mediator) => mediator.add_application_listener(event_type, listener),
            Self::Passthrough(mediator) => mediator.add_application_listener(event_type, listener),
        }
    }

    /// Unregister the shim from its host source and drop the binding.
    pub fn remove_listeners(&self, event_type: EventType) {
        match self {
            Self::Keepalive(mediator) => mediator.remove_listeners(event_type),
            Self::Passthrough(mediator) => mediator.remove_listeners(event_type),
        }
    }

    /// Whether a listener is currently bound for an event type.
    pub fn is_bound(&self, event_type: EventType) -> bool {
        match self {
            Self::Keepalive(mediator) => mediator.is_bound(event_type),
            Self::Passthrough(mediator) => mediator.is_bound(event_type),
        }
    }

    /// Access the keepalive variant for operations that aren't part of the
    /// shared contract, such as deferred-queue introspection.
    ///
    /// # Returns
    ///
    /// Some reference to the `KeepaliveMediator` if using the keepalive
    /// variant, or None if using passthrough
    pub fn keepalive(&self) -> Option<&KeepaliveMediator> {
        match self {
            Self::Keepalive(mediator) => Some(mediator),
            Self::Passthrough(_) => None,
        }
    }
}
