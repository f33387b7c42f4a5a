use crate::errors::types::{Error, Result};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Create an externally resolvable completion.
///
/// Returns a future-like [`Completion`] plus detached [`CompletionHooks`]
/// that any holder may use to settle it. Settling twice is a no-op, so a
/// deferred record and a drain task can share the hooks without coordination.
pub fn completion_pair<T>() -> (Completion<T>, CompletionHooks<T>) {
    let (tx, rx) = oneshot::channel();
    (
        Completion { rx },
        CompletionHooks {
            tx: Arc::new(Mutex::new(Some(tx))),
        },
    )
}

/// The waiting side of an externally resolvable completion.
pub struct Completion<T> {
    rx: oneshot::Receiver<Result<T>>,
}

impl<T> Completion<T> {
    /// Wait for the hooks to settle this completion.
    ///
    /// If every hook is dropped unsettled this yields a channel error rather
    /// than hanging or panicking.
    pub async fn wait(self) -> Result<T> {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(Error::Channel(
                "completion hooks dropped before settling".to_string(),
            )),
        }
    }
}

/// The settling side of an externally resolvable completion.
///
/// Cloneable; the first `resolve`/`reject` wins and later calls return
/// `false` without effect.
pub struct CompletionHooks<T> {
    tx: Arc<Mutex<Option<oneshot::Sender<Result<T>>>>>,
}

impl<T> Clone for CompletionHooks<T> {
    fn clone(&self) -> Self {
        CompletionHooks {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T> CompletionHooks<T> {
    /// Settle the completion with a success value. Returns whether this call
    /// performed the settlement.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    /// Settle the completion with a failure. Returns whether this call
    /// performed the settlement.
    pub fn reject(&self, error: Error) -> bool {
        self.settle(Err(error))
    }

    /// Whether the completion has already been settled through these hooks.
    pub fn is_settled(&self) -> bool {
        self.lock().is_none()
    }

    fn settle(&self, outcome: Result<T>) -> bool {
        match self.lock().take() {
            Some(tx) => {
                // a receiver that stopped listening is not our concern
                let _ = tx.send(outcome);
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<oneshot::Sender<Result<T>>>> {
        self.tx.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
