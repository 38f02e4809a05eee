//! Deferred tasks with an optional cancel token
//!
//! A `DeferredTask` is a spawned tokio task paired with a `CancelToken`.
//! Cancelling drops the task's future at its next suspension point, so a
//! delayed callback that has not fired yet never fires. A detached task
//! has no remaining handle to cancel it and always runs to completion.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{Error, Result};

/// Shared cancellation flag; clones observe the same flag
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    pub fn cancel(&self) {
        self.flag.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.flag.borrow()
    }

    /// Resolves once `cancel` has been called
    pub async fn cancelled(&self) {
        let mut rx = self.flag.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// How a deferred task ended
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome<T> {
    Completed(T),
    Cancelled,
}

impl<T> TaskOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Cancelled => None,
        }
    }
}

/// Handle to a spawned, cancellable unit of work
#[derive(Debug)]
pub struct DeferredTask<T> {
    handle: JoinHandle<TaskOutcome<T>>,
    token: CancelToken,
}

impl<T: Send + 'static> DeferredTask<T> {
    /// Run a future on the current tokio runtime
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let token = CancelToken::new();
        let guard = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = guard.cancelled() => {
                    debug!("Deferred task cancelled");
                    TaskOutcome::Cancelled
                }
                value = future => TaskOutcome::Completed(value),
            }
        });
        Self { handle, token }
    }

    /// Run `f` once after `delay`
    pub fn after<F>(delay: Duration, f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self::spawn(async move {
            tokio::time::sleep(delay).await;
            f()
        })
    }

    /// Stop the task if it has not finished; no effect afterwards
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task to end
    ///
    /// A panic inside the task surfaces as `Error::Task`.
    pub async fn join(self) -> Result<TaskOutcome<T>> {
        self.handle
            .await
            .map_err(|e| Error::Task(format!("Deferred task failed: {}", e)))
    }

    /// Let the task run to completion with nobody waiting on it
    pub fn detach(self) {
        drop(self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_after_fires_once_after_delay() {
        let start = Instant::now();
        let task = DeferredTask::after(Duration::from_secs(1), || 42);
        assert!(!task.is_finished());

        let outcome = task.join().await.unwrap();
        assert_eq!(outcome, TaskOutcome::Completed(42));
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_fire() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        let task = DeferredTask::after(Duration::from_secs(1), move || {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(500)).await;
        task.cancel();
        assert_eq!(task.join().await.unwrap(), TaskOutcome::Cancelled);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_completion_keeps_result() {
        let task = DeferredTask::after(Duration::from_millis(10), || "done");
        tokio::time::sleep(Duration::from_millis(50)).await;
        task.cancel();
        assert_eq!(task.join().await.unwrap().completed(), Some("done"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_detached_task_still_fires() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        DeferredTask::after(Duration::from_secs(1), move || {
            let _ = tx.send(7);
        })
        .detach();

        assert_eq!(rx.await.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panic_surfaces_as_task_error() {
        let task = DeferredTask::<i32>::after(Duration::from_millis(1), || panic!("boom"));
        let err = task.join().await.unwrap_err();
        assert!(matches!(err, Error::Task(_)));
    }

    #[test]
    fn test_token_clones_share_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }
}
