//! End-to-end mediator behavior against a manually driven host.

mod common;

use common::*;
use dispatch_core::{Error, ManualHostEvent};
use serde_json::json;
use std::time::{Duration, Instant};

#[tokio::test]
async fn unbound_event_is_deferred_and_settles_within_the_timeout() {
    let mediator = keepalive_mediator(Duration::from_millis(150), Duration::from_millis(10));
    let source = ManualHostEvent::new("tab-removed");
    mediator.preregister_host_shims(sources(vec![("tab-removed", source.clone())]));

    let started = Instant::now();
    let handle = tokio::spawn(async move { source.fire_single(vec![json!({"tabId": 7})]).await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(mediator.keepalive().unwrap().deferred_len(), 1);

    // no listener ever arrives; the record's own timeout answers the host
    let response = handle.await.unwrap();
    assert_eq!(response, None);
    assert!(started.elapsed() >= Duration::from_millis(150));
}

#[tokio::test]
async fn bound_listener_is_invoked_exactly_once_with_original_args() {
    let mediator = keepalive_mediator(Duration::from_secs(5), Duration::from_millis(10));
    let source = ManualHostEvent::new("message");
    mediator.preregister_host_shims(sources(vec![("message", source.clone())]));

    let log = CallLog::new();
    mediator
        .add_application_listener("message", respond_with(log.clone(), json!("pong")))
        .unwrap();

    let response = source.fire_single(vec![json!("ping"), json!(3)]).await;
    assert_eq!(response, Some(json!("pong")));
    assert_eq!(log.calls(), 1);
    assert_eq!(log.last_args(), Some(vec![json!("ping"), json!(3)]));
}

#[tokio::test]
async fn duplicate_binding_is_rejected_and_the_first_listener_survives() {
    let mediator = keepalive_mediator(Duration::from_secs(5), Duration::from_millis(10));
    let source = ManualHostEvent::new("message");
    mediator.preregister_host_shims(sources(vec![("message", source.clone())]));

    let first = CallLog::new();
    let second = CallLog::new();
    mediator
        .add_application_listener("message", respond_with(first.clone(), json!("first")))
        .unwrap();
    let rejected =
        mediator.add_application_listener("message", respond_with(second.clone(), json!("second")));
    assert!(matches!(rejected, Err(Error::DuplicateListener("message"))));

    let response = source.fire_single(vec![]).await;
    assert_eq!(response, Some(json!("first")));
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 0);
}

#[tokio::test]
async fn binding_without_preregistration_fails_with_missing_shim() {
    let mediator = keepalive_mediator(Duration::from_secs(5), Duration::from_millis(10));

    // the host source exists but was never handed to the mediator, so any
    // events it fires have no shim and would be lost
    let source = ManualHostEvent::new("orphan");
    assert!(source.fire(vec![json!(1)]).is_empty());

    let log = CallLog::new();
    let result = mediator.add_application_listener("orphan", respond_with(log, json!(0)));
    assert!(matches!(result, Err(Error::MissingShim("orphan"))));
}

#[tokio::test]
async fn late_listener_drains_the_deferred_event_with_its_result() {
    let mediator = keepalive_mediator(Duration::from_secs(5), Duration::from_millis(10));
    let source = ManualHostEvent::new("tab-removed");
    mediator.preregister_host_shims(sources(vec![("tab-removed", source.clone())]));

    let fired = source.clone();
    let handle = tokio::spawn(async move { fired.fire_single(vec![json!({"tabId": 7})]).await });
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(mediator.keepalive().unwrap().deferred_len(), 1);

    let log = CallLog::new();
    mediator
        .add_application_listener("tab-removed", respond_with(log.clone(), json!({"closed": 7})))
        .unwrap();

    let response = handle.await.unwrap();
    assert_eq!(response, Some(json!({"closed": 7})));
    assert_eq!(log.calls(), 1);
    assert_eq!(log.last_args(), Some(vec![json!({"tabId": 7})]));
    assert_eq!(mediator.keepalive().unwrap().deferred_len(), 0);
}

#[tokio::test]
async fn hung_listener_resolves_to_empty_success_after_the_timeout() {
    let mediator = keepalive_mediator(Duration::from_millis(150), Duration::from_millis(10));
    let source = ManualHostEvent::new("message");
    mediator.preregister_host_shims(sources(vec![("message", source.clone())]));

    let log = CallLog::new();
    mediator
        .add_application_listener("message", never_resolves(log.clone()))
        .unwrap();

    let started = Instant::now();
    let response = source.fire_single(vec![json!("hello")]).await;
    assert_eq!(response, None);
    assert!(started.elapsed() >= Duration::from_millis(150));
    assert_eq!(log.calls(), 1);
}

#[tokio::test]
async fn failing_listener_never_rejects_the_host_facing_future() {
    let mediator = keepalive_mediator(Duration::from_secs(5), Duration::from_millis(10));
    let source = ManualHostEvent::new("message");
    mediator.preregister_host_shims(sources(vec![("message", source.clone())]));

    let log = CallLog::new();
    mediator
        .add_application_listener("message", always_fails(log.clone()))
        .unwrap();

    let response = source.fire_single(vec![json!("hello")]).await;
    assert_eq!(response, None);
    assert_eq!(log.calls(), 1);
}

#[tokio::test]
async fn stale_deferred_record_is_discarded_without_invoking_the_listener() {
    let mediator = keepalive_mediator(Duration::from_millis(50), Duration::from_millis(10));
    let source = ManualHostEvent::new("tab-removed");
    mediator.preregister_host_shims(sources(vec![("tab-removed", source.clone())]));

    // the host-facing future settles via its own timeout, marking the
    // record stale while it is still queued
    let response = source.fire_single(vec![json!({"tabId": 1})]).await;
    assert_eq!(response, None);
    assert_eq!(mediator.keepalive().unwrap().deferred_len(), 1);

    let log = CallLog::new();
    mediator
        .add_application_listener("tab-removed", respond_with(log.clone(), json!("too late")))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(log.calls(), 0);
    assert_eq!(mediator.keepalive().unwrap().deferred_len(), 0);
}

#[tokio::test]
async fn fire_and_forget_acknowledgement_waits_out_the_grace_period() {
    let mediator = keepalive_mediator(Duration::from_secs(5), Duration::from_millis(200));
    let source = ManualHostEvent::new("scan-finished");
    mediator.preregister_host_shims(sources(vec![("scan-finished", source.clone())]));

    let log = CallLog::new();
    mediator
        .add_application_listener("scan-finished", fire_and_forget(log.clone()))
        .unwrap();

    let started = Instant::now();
    let response = source.fire_single(vec![]).await;
    assert_eq!(response, None);
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert_eq!(log.calls(), 1);
}

#[tokio::test]
async fn bare_value_from_fire_and_forget_listener_passes_through() {
    let mediator = keepalive_mediator(Duration::from_secs(5), Duration::from_millis(10));
    let source = ManualHostEvent::new("message");
    mediator.preregister_host_shims(sources(vec![("message", source.clone())]));

    let log = CallLog::new();
    mediator
        .add_application_listener("message", bare_value(log.clone(), json!(42)))
        .unwrap();

    let response = source.fire_single(vec![]).await;
    assert_eq!(response, Some(json!(42)));
    assert_eq!(log.calls(), 1);
}

#[tokio::test]
async fn slow_invocation_does_not_delay_a_later_firing_of_the_same_type() {
    let mediator = keepalive_mediator(Duration::from_secs(5), Duration::from_millis(10));
    let source = ManualHostEvent::new("message");
    mediator.preregister_host_shims(sources(vec![("message", source.clone())]));

    let log = CallLog::new();
    mediator
        .add_application_listener(
            "message",
            respond_slowly(log.clone(), Duration::from_millis(300), json!("done")),
        )
        .unwrap();

    let started = Instant::now();
    let (first, second) = tokio::join!(
        source.fire_single(vec![json!(1)]),
        source.fire_single(vec![json!(2)]),
    );
    assert_eq!(first, Some(json!("done")));
    assert_eq!(second, Some(json!("done")));
    // serialized processing would need at least 600ms
    assert!(started.elapsed() < Duration::from_millis(550));
    assert_eq!(log.calls(), 2);
}

#[tokio::test]
async fn removing_listeners_unregisters_the_shim_and_requires_repreregistration() {
    let mediator = keepalive_mediator(Duration::from_secs(5), Duration::from_millis(10));
    let source = ManualHostEvent::new("message");
    mediator.preregister_host_shims(sources(vec![("message", source.clone())]));
    assert_eq!(source.shim_count(), 1);

    let log = CallLog::new();
    mediator
        .add_application_listener("message", respond_with(log.clone(), json!("pong")))
        .unwrap();
    mediator.remove_listeners("message");
    assert_eq!(source.shim_count(), 0);

    // the host no longer reaches the mediator for this type
    assert!(source.fire(vec![]).is_empty());

    // and binding again without preregistration is the startup-ordering bug
    let result = mediator.add_application_listener("message", respond_with(log, json!("pong")));
    assert!(matches!(result, Err(Error::MissingShim("message"))));
}

#[tokio::test]
async fn passthrough_dispatches_directly_and_enforces_the_binding_contract() {
    let mediator = passthrough_mediator();
    let source = ManualHostEvent::new("message");
    mediator.preregister_host_shims(sources(vec![("message", source.clone())]));

    // no shim reaches the host until a listener binds
    assert_eq!(source.shim_count(), 0);

    let log = CallLog::new();
    mediator
        .add_application_listener("message", respond_with(log.clone(), json!("pong")))
        .unwrap();
    assert_eq!(source.shim_count(), 1);

    let response = source.fire_single(vec![json!("ping")]).await;
    assert_eq!(response, Some(json!("pong")));
    assert_eq!(log.last_args(), Some(vec![json!("ping")]));

    let duplicate = mediator.add_application_listener("message", fire_and_forget(log.clone()));
    assert!(matches!(duplicate, Err(Error::DuplicateListener("message"))));

    let unregistered = mediator.add_application_listener("orphan", fire_and_forget(log));
    assert!(matches!(unregistered, Err(Error::MissingShim("orphan"))));
}

#[tokio::test]
async fn passthrough_acknowledges_fire_and_forget_immediately() {
    let mediator = passthrough_mediator();
    let source = ManualHostEvent::new("scan-finished");
    mediator.preregister_host_shims(sources(vec![("scan-finished", source.clone())]));

    let log = CallLog::new();
    mediator
        .add_application_listener("scan-finished", fire_and_forget(log.clone()))
        .unwrap();

    let started = Instant::now();
    let response = source.fire_single(vec![]).await;
    assert_eq!(response, None);
    assert!(started.elapsed() < Duration::from_millis(50));
    assert_eq!(log.calls(), 1);
}

#[tokio::test]
async fn passthrough_absorbs_listener_failures() {
    let mediator = passthrough_mediator();
    let source = ManualHostEvent::new("message");
    mediator.preregister_host_shims(sources(vec![("message", source.clone())]));

    let log = CallLog::new();
    mediator
        .add_application_listener("message", always_fails(log.clone()))
        .unwrap();

    let response = source.fire_single(vec![json!(1)]).await;
    assert_eq!(response, None);
    assert_eq!(log.calls(), 1);
}
