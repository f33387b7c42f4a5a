use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy for the dispatch mediator.
///
/// Only the binding-time variants (`DuplicateListener`, `MissingShim`,
/// `Config`) are ever surfaced to calling code; everything event-scoped is
/// absorbed at the shim boundary and observable through logging alone.
#[derive(Error, Debug)]
pub enum Error {
    #[error("a listener is already bound for event type '{0}'")]
    DuplicateListener(&'static str),

    #[error("no host shim was preregistered for event type '{0}'")]
    MissingShim(&'static str),

    #[error("listener timed out: {0}")]
    ListenerTimeout(String),

    #[error("listener failed: {0}")]
    ListenerFailed(String),

    #[error("listener panicked: {0}")]
    ListenerPanic(String),

    #[error("listener for event type '{0}' returned a bare value instead of a future")]
    UnexpectedSyncReturn(&'static str),

    #[error("deferred record for event type '{0}' went stale before a listener arrived")]
    StaleDeferred(&'static str),

    #[error("completion channel error: {0}")]
    Channel(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error is a binding-time programming error that should
    /// fail loudly, as opposed to an event-scoped condition the mediator
    /// absorbs.
    pub fn is_binding_error(&self) -> bool {
        matches!(self, Error::DuplicateListener(_) | Error::MissingShim(_))
    }
}
