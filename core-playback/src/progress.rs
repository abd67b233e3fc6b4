//! Progress ticker.
//!
//! While playback runs, the ticker reports the engine position to the session
//! listener: once after a short first delay, then at a fixed interval. Each
//! tick emits first and then checks `play_when_ready`, so the tick that
//! observes a pause is the last one.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::PlayerEngine;
use core_runtime::events::SessionEvent;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::relay::SessionListener;

struct RunningTicker {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Cancellable periodic progress task.
pub struct ProgressTicker {
    engine: Arc<dyn PlayerEngine>,
    listener: Arc<dyn SessionListener>,
    first_delay: Duration,
    interval: Duration,
    running: Mutex<Option<RunningTicker>>,
    /// Parent of every tick token. Once cancelled, no ticker runs again.
    shutdown: CancellationToken,
}

impl ProgressTicker {
    pub fn new(
        engine: Arc<dyn PlayerEngine>,
        listener: Arc<dyn SessionListener>,
        first_delay: Duration,
        interval: Duration,
    ) -> Self {
        Self {
            engine,
            listener,
            first_delay,
            interval,
            running: Mutex::new(None),
            shutdown: CancellationToken::new(),
        }
    }

    /// Start ticking, replacing any running ticker. Does nothing after
    /// [`shutdown`](Self::shutdown).
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        if self.shutdown.is_cancelled() {
            trace!("Progress ticker not started: shut down");
            return;
        }
        // A shutdown racing this call cancels the child token too
        let token = self.shutdown.child_token();
        let engine = Arc::clone(&self.engine);
        let listener = Arc::clone(&self.listener);
        let first_delay = self.first_delay;
        let interval = self.interval;
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut delay = first_delay;
            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
                if task_token.is_cancelled() {
                    break;
                }

                listener.on_event(SessionEvent::Progress {
                    position_ms: engine.current_position_ms(),
                });

                if !engine.play_when_ready() {
                    trace!("Progress ticker stopped: playback halted");
                    break;
                }
                delay = interval;
            }
        });

        let previous = self
            .running
            .lock()
            .replace(RunningTicker { token, handle });
        if let Some(previous) = previous {
            Self::cancel(previous);
        }
    }

    /// Cancel the ticker. No new tick starts after this returns.
    pub fn stop(&self) {
        let running = self.running.lock().take();
        if let Some(running) = running {
            Self::cancel(running);
        }
    }

    /// Cancel the ticker for good. Later [`start`](Self::start) calls are
    /// ignored.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
        self.stop();
    }

    /// Returns `true` while a tick is pending.
    pub fn is_scheduled(&self) -> bool {
        self.running
            .lock()
            .as_ref()
            .map_or(false, |running| !running.handle.is_finished())
    }

    fn cancel(running: RunningTicker) {
        running.token.cancel();
        running.handle.abort();
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for ProgressTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTicker")
            .field("first_delay", &self.first_delay)
            .field("interval", &self.interval)
            .field("scheduled", &self.is_scheduled())
            .finish()
    }
}
