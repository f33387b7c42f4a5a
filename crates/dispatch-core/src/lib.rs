//! Event lifecycle mediation for idle-teardown host runtimes.
//!
//! A restrictive host runtime will forcibly terminate a background process
//! when a dispatched event goes unacknowledged past its teardown deadline,
//! even while unrelated work is still in progress. This crate guarantees
//! every host event a timely, never-failing acknowledgement: events that
//! arrive before their listener exists are deferred and drained once the
//! listener binds, every wait is bounded by its own timeout, and no
//! event-scoped failure ever reaches the host as a rejection.
//!
//! The mediator comes in two scheduling variants behind one facade:
//! keepalive-aware (deferral, timeouts, fire-and-forget grace) for hosts
//! that tear down idle processes, and passthrough (direct registration) for
//! always-resident hosts. Both are built through
//! [`MediatorBuilder`](events::builder::MediatorBuilder).

pub mod config;
pub mod errors;
pub mod events;
pub mod host;
pub mod logging;

pub use config::schema::DispatchConfig;
pub use errors::types::{Error, Result};
pub use events::builder::{MediatorBuilder, SchedulingMode};
pub use events::system::DispatchMediator;
pub use events::types::{
    ApplicationListener, EventType, FireAndForgetListener, HostResponse, RawEventArgs,
    RespondingListener, SyncReturn,
};
pub use host::source::{HostEvent, HostShim, ManualHostEvent};
