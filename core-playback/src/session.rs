//! Session model and the state shared between the controller and its
//! notification pumps.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bridge_traits::{
    LifecyclePhase, MediaReference, MediaSource, PlaybackState, PlayerEngine, RenderSurface,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::progress::ProgressTicker;
use crate::registration::Registration;
use crate::relay::SessionListener;

/// Identifier tagging one controller in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What the session is playing and how.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Reference passed to the last `set_media`.
    pub media_reference: Option<MediaReference>,
    pub desired_autoplay: bool,
    pub loop_enabled: bool,
    /// Position saved on suspend, restored on resume.
    pub last_known_position_ms: u64,
    /// Set when a source is handed to the engine, cleared on the next `Ready`.
    pub is_preparing: bool,
    /// Source currently loaded in the engine.
    pub current_source: Option<MediaSource>,
}

impl Session {
    pub fn new(loop_enabled: bool) -> Self {
        Self {
            media_reference: None,
            desired_autoplay: false,
            loop_enabled,
            last_known_position_ms: 0,
            is_preparing: false,
            current_source: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct SessionState {
    pub(crate) session: Session,
    pub(crate) phase: LifecyclePhase,
    pub(crate) playback_state: PlaybackState,
}

/// State and collaborators shared by the controller, the event relay and the
/// lifecycle binder.
pub(crate) struct SessionCore {
    pub(crate) id: SessionId,
    pub(crate) engine: Arc<dyn PlayerEngine>,
    pub(crate) surface: Arc<dyn RenderSurface>,
    pub(crate) listener: Arc<dyn SessionListener>,
    pub(crate) ticker: ProgressTicker,
    pub(crate) progress_updates: bool,
    pub(crate) state: Mutex<SessionState>,
    registrations: Mutex<Vec<Registration>>,
    torn_down: AtomicBool,
}

impl SessionCore {
    pub(crate) fn new(
        engine: Arc<dyn PlayerEngine>,
        surface: Arc<dyn RenderSurface>,
        listener: Arc<dyn SessionListener>,
        ticker: ProgressTicker,
        progress_updates: bool,
        loop_enabled: bool,
    ) -> Self {
        Self {
            id: SessionId::new(),
            engine,
            surface,
            listener,
            ticker,
            progress_updates,
            state: Mutex::new(SessionState {
                session: Session::new(loop_enabled),
                phase: LifecyclePhase::Active,
                playback_state: PlaybackState::Idle,
            }),
            registrations: Mutex::new(Vec::new()),
            torn_down: AtomicBool::new(false),
        }
    }

    pub(crate) fn phase(&self) -> LifecyclePhase {
        self.state.lock().phase
    }

    pub(crate) fn add_registration(&self, registration: Registration) {
        if self.torn_down.load(Ordering::SeqCst) {
            // Dropping releases it
            return;
        }
        self.registrations.lock().push(registration);
    }

    pub(crate) fn live_registrations(&self) -> usize {
        self.registrations
            .lock()
            .iter()
            .filter(|registration| registration.is_active())
            .count()
    }

    pub(crate) fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Cancel the ticker, release every subscription and unbind the surface.
    /// Idempotent.
    pub(crate) fn teardown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }

        // Pumps first, so a handler cannot restart the ticker afterwards
        let registrations = std::mem::take(&mut *self.registrations.lock());
        let released = registrations.len();
        drop(registrations);
        self.ticker.shutdown();
        self.surface.unbind_player();

        info!(session = %self.id, released, "Session torn down");
    }
}
