//! Single-slot debouncer.
//!
//! Holds at most one pending delayed action. Scheduling a new action cancels
//! the pending one first. Cancellation only reaches the waiting phase: once
//! the delay has elapsed the action runs to completion, and callers are
//! expected to discard stale results themselves (the listing controller
//! does this with a generation counter).

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;

/// Cancellable delayed task slot.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    /// Dropping the sender cancels the task waiting on its receiver.
    pending: Mutex<Option<oneshot::Sender<()>>>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// The quiescence window.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels any pending action, then schedules `action` to run after the delay.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                _ = cancel_rx => {
                    tracing::trace!("debounced action superseded");
                    return;
                }
            }
            action.await;
        });

        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(cancel_tx);
        drop(previous);
    }

    /// Cancels the pending action, if it has not started yet.
    ///
    /// Returns `true` if a pending slot was cleared.
    pub fn cancel(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }
}
