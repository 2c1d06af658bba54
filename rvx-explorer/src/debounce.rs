//! Cancellable delayed actions
//!
//! A [`Debouncer`] holds at most one pending action. Scheduling a new one
//! cancels the previous action if its quiet period has not elapsed yet; an
//! action that already fired always runs to completion.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct PendingTask {
    token: CancellationToken,
    fired: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl PendingTask {
    fn is_waiting(&self) -> bool {
        !self.fired.load(Ordering::SeqCst) && !self.handle.is_finished()
    }

    /// Returns whether the task was still waiting
    fn cancel(&self) -> bool {
        let waiting = self.is_waiting();
        self.token.cancel();
        waiting
    }
}

/// Schedule/cancel pair over one pending task
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<PendingTask>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `action` once the quiet period elapses without another call
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let fired = Arc::new(AtomicBool::new(false));
        let delay = self.delay;

        let task_token = token.clone();
        let task_fired = Arc::clone(&fired);
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    task_fired.store(true, Ordering::SeqCst);
                    action().await;
                }
            }
        });

        let previous = self.lock().replace(PendingTask {
            token,
            fired,
            handle,
        });
        if let Some(previous) = previous {
            if previous.cancel() {
                tracing::trace!("Debounced action superseded");
            }
        }
    }

    /// Cancel the pending action; returns whether one was still waiting
    pub fn cancel(&self) -> bool {
        self.lock()
            .take()
            .map(|task| task.cancel())
            .unwrap_or(false)
    }

    /// Whether an action is waiting for its quiet period
    pub fn is_pending(&self) -> bool {
        self.lock().as_ref().map(PendingTask::is_waiting).unwrap_or(false)
    }

    fn lock(&self) -> MutexGuard<'_, Option<PendingTask>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Background watcher handle; the watcher stops when this is dropped
pub struct AutoReload {
    handle: JoinHandle<()>,
}

impl AutoReload {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    pub fn stop(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for AutoReload {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
