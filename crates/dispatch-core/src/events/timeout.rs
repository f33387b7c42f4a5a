use crate::errors::context::ErrorContext;
use crate::errors::types::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time;

/// Bound an in-flight operation with a maximum duration.
///
/// The future is spawned as its own task and raced against the clock. On
/// expiry the task is detached, never aborted: the operation keeps running
/// to completion for its own side effects while the caller gets
/// [`Error::ListenerTimeout`] carrying the diagnostic `context`. A panic in
/// the operation surfaces as [`Error::ListenerPanic`] instead of unwinding
/// into the caller.
pub async fn with_timeout<T, F>(future: F, duration: Duration, context: ErrorContext) -> Result<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::spawn(future);
    match time::timeout(duration, handle).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_error)) => Err(Error::ListenerPanic(format!("{} {}", join_error, context))),
        Err(_) => Err(Error::ListenerTimeout(format!(
            "no result within {:?} {}",
            duration, context
        ))),
    }
}
