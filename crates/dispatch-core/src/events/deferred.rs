use crate::events::completion::CompletionHooks;
use crate::events::types::{EventType, HostResponse, RawEventArgs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// An event that arrived before an application listener existed for its
/// type.
///
/// The record shares its completion hooks with whichever drain task
/// eventually processes it, and shares its stale flag with the timeout guard
/// watching the host-facing future. Once that guard settles, success or
/// failure alike, the record is stale and must never be handed to a
/// listener: its host-facing response has already been finalized.
pub struct DeferredRecord {
    id: Uuid,
    event_type: EventType,
    args: RawEventArgs,
    hooks: CompletionHooks<HostResponse>,
    stale: Arc<AtomicBool>,
}

impl DeferredRecord {
    /// Create a fresh record for an event with no listener yet.
    pub fn new(
        event_type: EventType,
        args: RawEventArgs,
        hooks: CompletionHooks<HostResponse>,
    ) -> Self {
        DeferredRecord {
            id: Uuid::new_v4(),
            event_type,
            args,
            hooks,
            stale: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Identifier used to correlate log lines about this record.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The event type this record belongs to.
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Whether this record's host-facing future has already settled.
    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::SeqCst)
    }

    /// Shared flag the timeout guard sets once it settles.
    pub fn stale_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stale)
    }

    /// Break the record apart for drain processing.
    pub fn into_parts(self) -> (Uuid, RawEventArgs, CompletionHooks<HostResponse>) {
        (self.id, self.args, self.hooks)
    }
}

/// Queue of events awaiting their listener.
///
/// Mutated only through `push` and `take_matching`; both hold the lock for
/// the duration of a vector operation and nothing more.
pub struct DeferredQueue {
    records: Mutex<Vec<DeferredRecord>>,
}

impl DeferredQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        DeferredQueue {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Append a record.
    pub fn push(&self, record: DeferredRecord) {
        self.lock().push(record);
    }

    /// Remove and return every record matching the event type, in arrival
    /// order. Records of other types stay queued.
    pub fn take_matching(&self, event_type: EventType) -> Vec<DeferredRecord> {
        let mut guard = self.lock();
        let all = std::mem::take(&mut *guard);
        let (matching, rest): (Vec<_>, Vec<_>) =
            all.into_iter().partition(|record| record.event_type == event_type);
        *guard = rest;
        matching
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DeferredRecord>> {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for DeferredQueue {
    fn default() -> Self {
        Self::new()
    }
}
