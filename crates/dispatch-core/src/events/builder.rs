use crate::config::schema::{DispatchConfig, SelfValidating};
use crate::errors::types::Result;
use crate::events::mediator::KeepaliveMediator;
use crate::events::passthrough::PassthroughMediator;
use crate::events::system::DispatchMediator;
use std::time::Duration;

/// Scheduling variant for the dispatch mediator
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchedulingMode {
    /// Deferred-queue + timeout behavior for hosts that tear down idle
    /// background processes
    Keepalive,

    /// Direct registration for always-resident hosts
    Passthrough,
}

/// Builder for configuring and creating a dispatch mediator
///
/// Provides one way to configure either scheduling variant with the same
/// interface. Timing knobs only apply to the keepalive variant; the
/// passthrough variant needs none of them.
///
/// # Examples
///
/// ```rust,no_run
/// use dispatch_core::events::builder::{MediatorBuilder, SchedulingMode};
/// use std::time::Duration;
///
/// # fn example() -> dispatch_core::Result<()> {
/// // Keepalive mediator with a tighter event deadline
/// let mediator = MediatorBuilder::new()
///     .scheduling(SchedulingMode::Keepalive)
///     .event_timeout(Duration::from_secs(30))
///     .fire_and_forget_grace(Duration::from_secs(5))
///     .build()?;
///
/// // Passthrough mediator for a resident host
/// let resident = MediatorBuilder::new()
///     .scheduling(SchedulingMode::Passthrough)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct MediatorBuilder {
    mode: SchedulingMode,
    event_timeout: Duration,
    fire_and_forget_grace: Duration,
    host_teardown_deadline: Duration,
}

impl MediatorBuilder {
    /// Create a new builder with sensible defaults
    pub fn new() -> Self {
        let defaults = DispatchConfig::default();
        Self {
            mode: SchedulingMode::Keepalive,
            event_timeout: defaults.event_timeout(),
            fire_and_forget_grace: defaults.fire_and_forget_grace(),
            host_teardown_deadline: defaults.host_teardown_deadline(),
        }
    }

    /// Seed the timing knobs from an existing configuration
    pub fn from_config(config: DispatchConfig) -> Self {
        Self {
            mode: SchedulingMode::Keepalive,
            event_timeout: config.event_timeout(),
            fire_and_forget_grace: config.fire_and_forget_grace(),
            host_teardown_deadline: config.host_teardown_deadline(),
        }
    }

    /// Set the scheduling variant
    pub fn scheduling(mut self, mode: SchedulingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the per-event listener deadline (keepalive only)
    pub fn event_timeout(mut self, timeout: Duration) -> Self {
        self.event_timeout = timeout;
        self
    }

    /// Set the fire-and-forget acknowledgement grace period (keepalive only)
    pub fn fire_and_forget_grace(mut self, grace: Duration) -> Self {
        self.fire_and_forget_grace = grace;
        self
    }

    /// Set the host's own teardown deadline, used to validate the event
    /// timeout stays strictly inside it (keepalive only)
    pub fn host_teardown_deadline(mut self, deadline: Duration) -> Self {
        self.host_teardown_deadline = deadline;
        self
    }

    /// Build the mediator with the configured settings
    pub fn build(self) -> Result<DispatchMediator> {
        match self.mode {
            SchedulingMode::Keepalive => {
                let config = DispatchConfig {
                    event_timeout_ms: self.event_timeout.as_millis() as u64,
                    fire_and_forget_grace_ms: self.fire_and_forget_grace.as_millis() as u64,
                    host_teardown_deadline_ms: self.host_teardown_deadline.as_millis() as u64,
                }
                .validate_after_load()?;

                Ok(DispatchMediator::Keepalive(KeepaliveMediator::new(config)))
            }
            SchedulingMode::Passthrough => {
                Ok(DispatchMediator::Passthrough(PassthroughMediator::new()))
            }
        }
    }
}

impl Default for MediatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
