//! Shared helpers for mediator integration tests.

use dispatch_core::{
    ApplicationListener, DispatchMediator, Error, EventType, HostEvent, HostResponse,
    ManualHostEvent, MediatorBuilder, RawEventArgs, SchedulingMode, SyncReturn,
};
use futures::FutureExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A keepalive mediator with test-scale timings.
pub fn keepalive_mediator(timeout: Duration, grace: Duration) -> DispatchMediator {
    MediatorBuilder::new()
        .event_timeout(timeout)
        .fire_and_forget_grace(grace)
        .host_teardown_deadline(Duration::from_secs(60))
        .build()
        .unwrap()
}

/// A passthrough mediator.
pub fn passthrough_mediator() -> DispatchMediator {
    MediatorBuilder::new()
        .scheduling(SchedulingMode::Passthrough)
        .build()
        .unwrap()
}

/// Build a preregistration map from manual host events.
pub fn sources(
    entries: Vec<(EventType, Arc<ManualHostEvent>)>,
) -> HashMap<EventType, Arc<dyn HostEvent>> {
    entries
        .into_iter()
        .map(|(event_type, source)| (event_type, source as Arc<dyn HostEvent>))
        .collect()
}

/// Counts invocations and remembers the most recent arguments.
pub struct CallLog {
    calls: AtomicUsize,
    last_args: Mutex<Option<RawEventArgs>>,
}

impl CallLog {
    pub fn new() -> Arc<Self> {
        Arc::new(CallLog {
            calls: AtomicUsize::new(0),
            last_args: Mutex::new(None),
        })
    }

    pub fn record(&self, args: &RawEventArgs) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_args.lock().unwrap() = Some(args.clone());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_args(&self) -> Option<RawEventArgs> {
        self.last_args.lock().unwrap().clone()
    }
}

/// A responding listener that records the call and answers with `reply`.
pub fn respond_with(log: Arc<CallLog>, reply: Value) -> ApplicationListener {
    ApplicationListener::responding(move |args: RawEventArgs| {
        log.record(&args);
        let reply = reply.clone();
        async move { Ok::<HostResponse, Error>(Some(reply)) }.boxed()
    })
}

/// A responding listener that records the call, sleeps, then answers.
pub fn respond_slowly(log: Arc<CallLog>, delay: Duration, reply: Value) -> ApplicationListener {
    ApplicationListener::responding(move |args: RawEventArgs| {
        log.record(&args);
        let reply = reply.clone();
        async move {
            tokio::time::sleep(delay).await;
            Ok::<HostResponse, Error>(Some(reply))
        }
        .boxed()
    })
}

/// A responding listener whose future never settles.
pub fn never_resolves(log: Arc<CallLog>) -> ApplicationListener {
    ApplicationListener::responding(move |args: RawEventArgs| {
        log.record(&args);
        async move {
            futures::future::pending::<()>().await;
            Ok::<HostResponse, Error>(None)
        }
        .boxed()
    })
}

/// A responding listener that fails every call.
pub fn always_fails(log: Arc<CallLog>) -> ApplicationListener {
    ApplicationListener::responding(move |args: RawEventArgs| {
        log.record(&args);
        async move { Err::<HostResponse, Error>(Error::ListenerFailed("synthetic failure".to_string())) }
            .boxed()
    })
}

/// A fire-and-forget listener that records the call.
pub fn fire_and_forget(log: Arc<CallLog>) -> ApplicationListener {
    ApplicationListener::fire_and_forget(move |args: RawEventArgs| {
        log.record(&args);
        SyncReturn::Handled
    })
}

/// A defective fire-and-forget listener that returns a bare value.
pub fn bare_value(log: Arc<CallLog>, value: Value) -> ApplicationListener {
    ApplicationListener::fire_and_forget(move |args: RawEventArgs| {
        log.record(&args);
        SyncReturn::Value(value.clone())
    })
}
