use crate::errors::types::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Trait for configuration types that can validate themselves
pub trait SelfValidating: Sized {
    /// Validate the configuration
    fn validate(&self) -> Result<()>;

    /// Validate after loading
    fn validate_after_load(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }
}

/// Timing configuration for the keepalive mediator.
///
/// The host runtime enforces its own teardown deadline on unacknowledged
/// events; every deadline here must stay strictly inside it so the mediator
/// always answers before the host gives up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Maximum time a single event may wait on its listener, in milliseconds.
    /// Must be strictly shorter than `host_teardown_deadline_ms`.
    pub event_timeout_ms: u64,

    /// How long to hold the acknowledgement of a fire-and-forget event so
    /// background continuations can finish, in milliseconds. Must be shorter
    /// than `event_timeout_ms`.
    pub fire_and_forget_grace_ms: u64,

    /// The host's own teardown deadline for unacknowledged events, in
    /// milliseconds. Informational bound used for validation.
    pub host_teardown_deadline_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            event_timeout_ms: 60_000,
            fire_and_forget_grace_ms: 15_000,
            host_teardown_deadline_ms: 300_000,
        }
    }
}

impl DispatchConfig {
    /// Maximum time a single event may wait on its listener.
    pub fn event_timeout(&self) -> Duration {
        Duration::from_millis(self.event_timeout_ms)
    }

    /// Grace period before acknowledging a fire-and-forget event.
    pub fn fire_and_forget_grace(&self) -> Duration {
        Duration::from_millis(self.fire_and_forget_grace_ms)
    }

    /// The host's own teardown deadline.
    pub fn host_teardown_deadline(&self) -> Duration {
        Duration::from_millis(self.host_teardown_deadline_ms)
    }

    /// Parse a configuration from a TOML string and validate it.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: DispatchConfig = toml::from_str(input)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate_after_load()
    }

    /// Load a configuration from a TOML file and validate it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents)
    }
}

impl SelfValidating for DispatchConfig {
    fn validate(&self) -> Result<()> {
        if self.event_timeout_ms == 0 {
            return Err(Error::Config("event_timeout_ms must be non-zero".to_string()));
        }
        if self.event_timeout_ms >= self.host_teardown_deadline_ms {
            return Err(Error::Config(format!(
                "event_timeout_ms ({}) must be strictly shorter than host_teardown_deadline_ms ({})",
                self.event_timeout_ms, self.host_teardown_deadline_ms
            )));
        }
        if self.fire_and_forget_grace_ms >= self.event_timeout_ms {
            return Err(Error::Config(format!(
                "fire_and_forget_grace_ms ({}) must be shorter than event_timeout_ms ({})",
                self.fire_and_forget_grace_ms, self.event_timeout_ms
            )));
        }
        Ok(())
    }
}
