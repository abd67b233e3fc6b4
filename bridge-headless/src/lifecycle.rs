//! Lifecycle observers for headless hosts.

use async_trait::async_trait;
use bridge_traits::{
    error::Result, LifecycleObserver, LifecyclePhase, NotificationStream,
};
use parking_lot::Mutex;
use tracing::debug;

use crate::subscribers::Subscribers;

/// Lifecycle driven explicitly by the host through [`set_phase`](Self::set_phase).
pub struct ChannelLifecycle {
    phase: Mutex<LifecyclePhase>,
    subscribers: Subscribers<LifecyclePhase>,
}

impl Default for ChannelLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelLifecycle {
    /// Create a lifecycle in the `Active` phase.
    pub fn new() -> Self {
        Self {
            phase: Mutex::new(LifecyclePhase::Active),
            subscribers: Subscribers::new(),
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        *self.phase.lock()
    }

    /// Enter `phase` and notify every subscriber.
    pub fn set_phase(&self, phase: LifecyclePhase) {
        *self.phase.lock() = phase;
        debug!(?phase, "Host lifecycle phase");
        self.subscribers.broadcast(phase);
    }

    /// Number of open phase streams.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.count()
    }
}

#[async_trait]
impl LifecycleObserver for ChannelLifecycle {
    async fn subscribe_changes(&self) -> Result<Box<dyn NotificationStream<LifecyclePhase>>> {
        Ok(Box::new(self.subscribers.subscribe()))
    }
}

/// Lifecycle of a host that is always in the foreground (never emits).
#[derive(Debug, Default, Clone, Copy)]
pub struct ForegroundLifecycle;

impl ForegroundLifecycle {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LifecycleObserver for ForegroundLifecycle {
    async fn subscribe_changes(&self) -> Result<Box<dyn NotificationStream<LifecyclePhase>>> {
        Ok(Box::new(ForegroundPhaseStream))
    }
}

struct ForegroundPhaseStream;

#[async_trait]
impl NotificationStream<LifecyclePhase> for ForegroundPhaseStream {
    async fn next(&mut self) -> Option<LifecyclePhase> {
        std::future::pending::<()>().await;
        None
    }
}
