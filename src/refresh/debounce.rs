//! Debounced task scheduling
//!
//! Each call to [`Debouncer::schedule`] replaces the pending task: the
//! previous one is cancelled and the new one fires after the quiet window,
//! unless it is replaced in turn. A burst of triggers therefore runs the
//! last scheduled task exactly once.

use super::cancel::CancellationToken;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::trace;

#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Arc<Mutex<Option<CancellationToken>>>,
}

fn lock_slot(slot: &Mutex<Option<CancellationToken>>) -> MutexGuard<'_, Option<CancellationToken>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Run `task` once the quiet window passes without another schedule.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        if let Some(previous) = self.lock().replace(token.clone()) {
            previous.cancel();
            trace!("rescheduled pending task");
        }

        let quiet = self.quiet;
        let pending = Arc::clone(&self.pending);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(quiet) => {
                    {
                        let mut slot = lock_slot(&pending);
                        if slot.as_ref().is_some_and(|t| t.same_as(&token)) {
                            *slot = None;
                        }
                    }
                    if !token.is_cancelled() {
                        task().await;
                    }
                }
            }
        });
    }

    /// Drop the pending task, if any
    pub fn cancel(&self) {
        if let Some(token) = self.lock().take() {
            token.cancel();
        }
    }

    /// Whether a scheduled task is still waiting for its window
    pub fn is_pending(&self) -> bool {
        self.lock()
            .as_ref()
            .map(|token| !token.is_cancelled())
            .unwrap_or(false)
    }

    fn lock(&self) -> MutexGuard<'_, Option<CancellationToken>> {
        lock_slot(&self.pending)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
