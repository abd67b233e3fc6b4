//! Scoped notification subscriptions.
//!
//! A [`Registration`] owns the task that pumps one [`NotificationStream`]
//! into a handler. Dropping the registration aborts the task, so a session
//! holds exactly as many live subscriptions as it holds registrations.

use std::ops::ControlFlow;

use bridge_traits::NotificationStream;
use tokio::task::JoinHandle;
use tracing::trace;

/// Ownership of one notification pump task.
#[derive(Debug)]
pub struct Registration {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl Registration {
    /// Spawn a task feeding every item of `stream` to `handler`.
    ///
    /// The task ends when the stream closes or the handler breaks. Must be
    /// called from within a tokio runtime.
    pub fn spawn<T, F>(
        name: &'static str,
        mut stream: Box<dyn NotificationStream<T>>,
        mut handler: F,
    ) -> Self
    where
        T: Send + 'static,
        F: FnMut(T) -> ControlFlow<()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            while let Some(item) = stream.next().await {
                if handler(item).is_break() {
                    break;
                }
            }
            trace!(registration = name, "Notification pump finished");
        });

        Self {
            name,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` while the pump task is still running.
    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    /// Abort the pump task. Idempotent.
    pub fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            trace!(registration = self.name, "Registration released");
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.release();
    }
}
