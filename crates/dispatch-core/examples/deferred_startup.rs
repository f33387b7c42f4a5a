//! Demonstrates the keepalive mediator riding out a slow application
//! startup: the host fires an event before any listener exists, the event is
//! deferred, and the late-arriving listener's result still reaches the host.

use anyhow::Result;
use dispatch_core::events::builder::{MediatorBuilder, SchedulingMode};
use dispatch_core::logging::{setup_logging, LoggingConfig};
use dispatch_core::{ApplicationListener, HostResponse, ManualHostEvent, RawEventArgs};
use futures::FutureExt;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging(LoggingConfig::new(Level::DEBUG, "deferred-startup"))?;

    let mediator = MediatorBuilder::new()
        .scheduling(SchedulingMode::Keepalive)
        .event_timeout(Duration::from_secs(5))
        .fire_and_forget_grace(Duration::from_millis(100))
        .build()?;

    // The host side: one event source, registered before startup finishes.
    let tab_removed = ManualHostEvent::new("tab-removed");
    let mut sources: HashMap<_, Arc<dyn dispatch_core::HostEvent>> = HashMap::new();
    sources.insert("tab-removed", tab_removed.clone() as _);
    mediator.preregister_host_shims(sources);

    // The host fires while the application is still starting up.
    println!("host fires tab-removed before any listener is bound");
    let pending = tokio::spawn({
        let tab_removed = tab_removed.clone();
        async move { tab_removed.fire_single(vec![json!({"tabId": 7})]).await }
    });

    // Startup takes a while...
    tokio::time::sleep(Duration::from_millis(500)).await;

    // ...then the application binds its listener and the deferred event
    // drains through it.
    mediator.add_application_listener(
        "tab-removed",
        ApplicationListener::responding(|args: RawEventArgs| {
            async move {
                let tab_id = args
                    .first()
                    .and_then(|arg| arg.get("tabId"))
                    .cloned()
                    .unwrap_or(json!(null));
                Ok::<HostResponse, dispatch_core::Error>(Some(json!({ "closed": tab_id })))
            }
            .boxed()
        }),
    )?;

    let response = pending.await?;
    println!("host received: {:?}", response);
    Ok(())
}
