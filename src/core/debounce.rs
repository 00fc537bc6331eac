//! Trailing-edge debouncing on the tokio timer.
//!
//! Every [`Debouncer::trigger`] aborts the previously scheduled run and
//! schedules a new one `delay` later, so a burst of triggers collapses into a
//! single callback carrying the arguments of the last trigger.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct Debouncer<T> {
    delay: Duration,
    callback: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: None,
        }
    }

    /// Restart the quiet period with `args` as the payload.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger(&mut self, args: T) {
        self.cancel();

        let callback = Arc::clone(&self.callback);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback(args);
        }));
    }
}

impl<T> Debouncer<T> {
    /// Drop the scheduled run, if any. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
