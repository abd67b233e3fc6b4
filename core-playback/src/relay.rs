//! # Event Relay
//!
//! Translates engine and surface notifications into [`SessionEvent`]s for the
//! application and drives the progress ticker.
//!
//! | Engine notification | Events, in order                                          |
//! |---------------------|-----------------------------------------------------------|
//! | `Buffering`         | `Buffering(true)`                                         |
//! | `Ready`             | `Buffering(false)`, `Start` or `Stop`, then `PlayerReady` once per prepare |
//! | `Idle`              | `Buffering(false)`, `Error(None)`                         |
//! | `Ended`             | `Buffering(false)`, `Stop`                                |
//! | error               | `Error(Some(cause))`                                      |

use std::sync::Arc;

use bridge_traits::{EngineEvent, PlaybackState};
use core_runtime::events::{EventBus, SessionEvent};
use tracing::{debug, trace, warn};

use crate::session::SessionCore;

/// Receiver of session notifications.
///
/// Closures implement this trait, as does [`EventBus`], which fans events out
/// to any number of subscribers.
///
/// # Example
///
/// ```ignore
/// use core_playback::SessionListener;
/// use core_runtime::events::SessionEvent;
///
/// let listener = |event: SessionEvent| {
///     if let SessionEvent::Progress { position_ms } = event {
///         println!("at {} ms", position_ms);
///     }
/// };
/// ```
pub trait SessionListener: Send + Sync {
    fn on_event(&self, event: SessionEvent);
}

impl<F> SessionListener for F
where
    F: Fn(SessionEvent) + Send + Sync,
{
    fn on_event(&self, event: SessionEvent) {
        self(event)
    }
}

impl SessionListener for EventBus {
    fn on_event(&self, event: SessionEvent) {
        // No subscribers is not an error for a session
        if self.emit(event).is_err() {
            trace!("Session event dropped: no subscribers");
        }
    }
}

pub(crate) struct EventRelay {
    core: Arc<SessionCore>,
}

impl EventRelay {
    pub(crate) fn new(core: Arc<SessionCore>) -> Self {
        Self { core }
    }

    fn emit(&self, event: SessionEvent) {
        if self.core.is_torn_down() {
            return;
        }
        self.core.listener.on_event(event);
    }

    pub(crate) fn on_engine_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::StateChanged {
                play_when_ready,
                state,
            } => self.on_state_changed(play_when_ready, state),
            EngineEvent::Error(cause) => {
                warn!(session = %self.core.id, error = %cause, "Engine reported an error");
                self.emit(SessionEvent::Error { cause: Some(cause) });
            }
        }
    }

    pub(crate) fn on_controller_visibility(&self, visible: bool) {
        self.emit(SessionEvent::ControllerVisibility { visible });
    }

    fn on_state_changed(&self, play_when_ready: bool, state: PlaybackState) {
        let was_preparing = {
            let mut guard = self.core.state.lock();
            guard.playback_state = state;
            if state == PlaybackState::Ready {
                std::mem::replace(&mut guard.session.is_preparing, false)
            } else {
                false
            }
        };
        debug!(session = %self.core.id, ?state, play_when_ready, "Engine state changed");

        match state {
            PlaybackState::Buffering => {
                self.emit(SessionEvent::Buffering { is_buffering: true });
            }
            PlaybackState::Ready => {
                self.emit(SessionEvent::Buffering {
                    is_buffering: false,
                });
                if play_when_ready {
                    if self.core.progress_updates {
                        self.core.ticker.start();
                    }
                    self.emit(SessionEvent::Start);
                } else {
                    self.core.ticker.stop();
                    self.emit(SessionEvent::Stop);
                }
                if was_preparing {
                    self.emit(SessionEvent::PlayerReady);
                }
            }
            PlaybackState::Idle => {
                self.core.ticker.stop();
                self.emit(SessionEvent::Buffering {
                    is_buffering: false,
                });
                self.emit(SessionEvent::Error { cause: None });
            }
            PlaybackState::Ended => {
                self.emit(SessionEvent::Buffering {
                    is_buffering: false,
                });
                self.core.ticker.stop();
                self.emit(SessionEvent::Stop);
            }
        }
    }
}
