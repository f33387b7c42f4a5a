use crate::errors::types::{Error, Result};
use crate::events::types::{ApplicationListener, EventType};
use crate::host::source::{HostEvent, HostShim};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Owns the per-event-type wiring: the host source supplied at
/// preregistration, the shim registered with it, and the application
/// listener currently bound.
///
/// Enforces the two binding invariants: a listener may only be bound for an
/// event type whose source was preregistered (`MissingShim`), and at most
/// one listener is bound per event type (`DuplicateListener`).
pub struct ListenerRegistry {
    sources: DashMap<EventType, Arc<dyn HostEvent>>,
    shims: DashMap<EventType, HostShim>,
    listeners: DashMap<EventType, ApplicationListener>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        ListenerRegistry {
            sources: DashMap::new(),
            shims: DashMap::new(),
            listeners: DashMap::new(),
        }
    }

    /// Record the host source for an event type. First registration wins;
    /// returns whether this call inserted it.
    pub fn insert_source(&self, event_type: EventType, source: Arc<dyn HostEvent>) -> bool {
        match self.sources.entry(event_type) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(source);
                true
            }
        }
    }

    /// Get the host source recorded for an event type.
    pub fn source(&self, event_type: EventType) -> Option<Arc<dyn HostEvent>> {
        self.sources.get(event_type).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop the host source recorded for an event type.
    pub fn remove_source(&self, event_type: EventType) -> Option<Arc<dyn HostEvent>> {
        self.sources.remove(event_type).map(|(_, source)| source)
    }

    /// Whether a host source was preregistered for an event type.
    pub fn has_source(&self, event_type: EventType) -> bool {
        self.sources.contains_key(event_type)
    }

    /// Record the shim registered with the host for an event type.
    pub fn insert_shim(&self, event_type: EventType, shim: HostShim) {
        self.shims.insert(event_type, shim);
    }

    /// Get the shim registered for an event type.
    pub fn shim(&self, event_type: EventType) -> Option<HostShim> {
        self.shims.get(event_type).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop the shim recorded for an event type.
    pub fn remove_shim(&self, event_type: EventType) -> Option<HostShim> {
        self.shims.remove(event_type).map(|(_, shim)| shim)
    }

    /// Whether a shim is registered for an event type.
    pub fn has_shim(&self, event_type: EventType) -> bool {
        self.shims.contains_key(event_type)
    }

    /// Bind the application listener for an event type.
    pub fn bind(&self, event_type: EventType, listener: ApplicationListener) -> Result<()> {
        if !self.has_source(event_type) {
            return Err(Error::MissingShim(event_type));
        }
        match self.listeners.entry(event_type) {
            Entry::Occupied(_) => Err(Error::DuplicateListener(event_type)),
            Entry::Vacant(vacant) => {
                vacant.insert(listener);
                Ok(())
            }
        }
    }

    /// Remove the listener binding for an event type.
    pub fn unbind(&self, event_type: EventType) -> Option<ApplicationListener> {
        self.listeners.remove(event_type).map(|(_, listener)| listener)
    }

    /// Get the listener currently bound for an event type.
    pub fn listener(&self, event_type: EventType) -> Option<ApplicationListener> {
        self.listeners.get(event_type).map(|entry| entry.value().clone())
    }

    /// Whether a listener is currently bound for an event type.
    pub fn is_bound(&self, event_type: EventType) -> bool {
        self.listeners.contains_key(event_type)
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
