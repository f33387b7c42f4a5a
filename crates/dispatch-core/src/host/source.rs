use crate::events::types::{HostResponse, RawEventArgs};
use futures::future::BoxFuture;
use std::sync::{Arc, Mutex};

/// The function registered directly with the host's event source.
///
/// A shim exists independently of whether an application listener is bound,
/// so events firing before startup completes are not lost. The host invokes
/// it with arbitrary positional arguments and may await or ignore the
/// returned future; the future always settles with a success.
pub type HostShim = Arc<dyn Fn(RawEventArgs) -> BoxFuture<'static, HostResponse> + Send + Sync>;

/// One host-side event source, e.g. the host object behind `"tab-removed"`.
///
/// This is the seam between the mediator and the host runtime: the mediator
/// registers shims here and never talks to the host any other way.
pub trait HostEvent: Send + Sync {
    /// Register a shim with this event source.
    fn add_listener(&self, shim: HostShim);

    /// Unregister a previously registered shim, compared by identity.
    fn remove_listener(&self, shim: &HostShim);
}

fn same_shim(a: &HostShim, b: &HostShim) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

/// An in-process [`HostEvent`] driven by hand.
///
/// Embedders outside a real host runtime, tests, examples and benches use
/// this to fire events at registered shims and observe the host-facing
/// futures directly.
pub struct ManualHostEvent {
    name: &'static str,
    shims: Mutex<Vec<HostShim>>,
}

impl ManualHostEvent {
    /// Create a new source for the given event name.
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(ManualHostEvent {
            name,
            shims: Mutex::new(Vec::new()),
        })
    }

    /// The event name this source stands for.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of currently registered shims.
    pub fn shim_count(&self) -> usize {
        self.lock().len()
    }

    /// Fire the event, invoking every registered shim with a copy of the
    /// arguments. Returns the host-facing futures in registration order;
    /// the caller decides whether to await or ignore them, as a real host
    /// would.
    pub fn fire(&self, args: RawEventArgs) -> Vec<BoxFuture<'static, HostResponse>> {
        let shims: Vec<HostShim> = self.lock().clone();
        shims.into_iter().map(|shim| shim(args.clone())).collect()
    }

    /// Fire the event and await the single registered shim's response.
    /// Returns `None` without waiting when no shim is registered, matching a
    /// host that fires into the void.
    pub async fn fire_single(&self, args: RawEventArgs) -> HostResponse {
        match self.fire(args).into_iter().next() {
            Some(future) => future.await,
            None => None,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<HostShim>> {
        self.shims.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HostEvent for ManualHostEvent {
    fn add_listener(&self, shim: HostShim) {
        self.lock().push(shim);
    }

    fn remove_listener(&self, shim: &HostShim) {
        self.lock().retain(|registered| !same_shim(registered, shim));
    }
}
