//! Owned handles for spawned timers and the status poll.
//!
//! Cancelling is idempotent: a handle that was never armed, already
//! finished, or already cancelled can be cancelled again safely.

use tokio::task::JoinHandle;

/// A spawned task owned by the orchestrator.
#[derive(Debug, Default)]
pub struct TaskHandle {
    inner: Option<JoinHandle<()>>,
}

impl TaskHandle {
    /// Running and not yet cancelled.
    pub fn is_active(&self) -> bool {
        self.inner.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.inner.take() {
            handle.abort();
        }
    }

    /// Replaces the tracked task, cancelling the previous one first.
    pub fn replace(&mut self, handle: JoinHandle<()>) {
        self.cancel();
        self.inner = Some(handle);
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// The single outstanding repeating status check.
#[derive(Debug, Default)]
pub struct PollHandle(TaskHandle);

impl PollHandle {
    pub fn is_active(&self) -> bool {
        self.0.is_active()
    }

    /// Starts tracking a new poll loop; any previous loop is cancelled first.
    pub fn start(&mut self, handle: JoinHandle<()>) {
        self.0.replace(handle);
    }

    pub fn cancel(&mut self) {
        self.0.cancel();
    }
}
