//! # Lifecycle Binder
//!
//! Ties playback to the host component's lifecycle.
//!
//! ```text
//!            pause                     destroy
//!  Active ───────────> Paused ─────────────────> Destroyed
//!    ▲                   │                           ▲
//!    └───── resume ──────┘                           │
//!    └───────────────────── destroy ─────────────────┘
//! ```
//!
//! Leaving `Active` halts playback and records the position; returning from
//! `Paused` restarts playback at that position.

use std::sync::Arc;

use bridge_traits::LifecyclePhase;
use tracing::debug;

use crate::session::SessionCore;

/// Effect of one lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transition {
    Suspended { position_ms: u64 },
    Resumed { position_ms: u64 },
    Destroyed { position_ms: u64 },
    Ignored,
}

pub(crate) struct LifecycleBinder {
    core: Arc<SessionCore>,
}

impl LifecycleBinder {
    pub(crate) fn new(core: Arc<SessionCore>) -> Self {
        Self { core }
    }

    pub(crate) fn on_phase(&self, next: LifecyclePhase) -> Transition {
        let previous = {
            let mut state = self.core.state.lock();
            let previous = state.phase;
            let accepted = matches!(
                (previous, next),
                (LifecyclePhase::Active, LifecyclePhase::Paused)
                    | (LifecyclePhase::Paused, LifecyclePhase::Active)
                    | (LifecyclePhase::Active, LifecyclePhase::Destroyed)
                    | (LifecyclePhase::Paused, LifecyclePhase::Destroyed)
            );
            if !accepted {
                debug!(session = %self.core.id, ?previous, ?next, "Lifecycle change ignored");
                return Transition::Ignored;
            }
            state.phase = next;
            previous
        };

        debug!(session = %self.core.id, ?previous, ?next, "Lifecycle transition");

        match next {
            LifecyclePhase::Paused => Transition::Suspended {
                position_ms: self.suspend(),
            },
            LifecyclePhase::Destroyed => Transition::Destroyed {
                position_ms: self.suspend(),
            },
            LifecyclePhase::Active => Transition::Resumed {
                position_ms: self.resume(),
            },
        }
    }

    /// Halt playback and record the position, clamped to the known duration.
    fn suspend(&self) -> u64 {
        let engine = &self.core.engine;
        engine.set_play_when_ready(false);

        let position = engine.current_position_ms();
        let position = engine
            .duration_ms()
            .map_or(position, |duration| position.min(duration));

        self.core.state.lock().session.last_known_position_ms = position;
        position
    }

    /// Restart playback at the recorded position and consume it.
    fn resume(&self) -> u64 {
        let position = std::mem::take(&mut self.core.state.lock().session.last_known_position_ms);

        let engine = &self.core.engine;
        engine.set_play_when_ready(true);
        engine.seek_to(position);
        position
    }
}
