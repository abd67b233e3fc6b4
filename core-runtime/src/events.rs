//! # Event Bus System
//!
//! Session notifications and a broadcast bus for fanning them out, built on
//! `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The event system consists of:
//! - **SessionEvent**: Every notification a playback session reports to the application
//! - **EventBus**: Broadcast channel for publishing session events to many consumers
//! - **EventStream**: Wrapper for consuming events with filtering
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  on_event   ┌───────────┐   subscribe   ┌────────────┐
//! │ Event Relay ├────────────>│ EventBus  ├──────────────>│ UI layer   │
//! └─────────────┘             │ (broadcast│               └────────────┘
//!                             │  channel) │   subscribe   ┌────────────┐
//!                             │           ├──────────────>│ Analytics  │
//!                             └───────────┘               └────────────┘
//! ```
//!
//! ## Usage
//!
//! ### Publishing Events
//!
//! ```rust
//! use core_runtime::events::{EventBus, SessionEvent};
//!
//! let event_bus = EventBus::new(100);
//! event_bus.emit(SessionEvent::Progress { position_ms: 1_500 }).ok();
//! ```
//!
//! ### Filtering Events
//!
//! ```rust
//! use core_runtime::events::{EventBus, EventStream, EventSeverity};
//!
//! let event_bus = EventBus::new(100);
//! let errors = EventStream::new(event_bus.subscribe())
//!     .filter(|event| event.severity() >= EventSeverity::Error);
//! ```

use bridge_traits::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, SendError},
};

pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Progress events arrive twice a second; subscribers that fall further behind
/// receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Session Events
// ============================================================================

/// Notification reported by a playback session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The engine became ready after `set_media`, a clip or a quality switch.
    PlayerReady,
    /// Playback is running.
    Start,
    /// Playback halted (paused while ready, or reached the end).
    Stop,
    /// Periodic playback position while playing.
    Progress {
        /// Current position (milliseconds).
        position_ms: u64,
    },
    /// Playback failed, or the engine fell back to idle.
    ///
    /// `cause` is `None` when the engine went idle without reporting a failure.
    Error {
        cause: Option<EngineError>,
    },
    /// Buffering started or finished.
    Buffering {
        is_buffering: bool,
    },
    /// The playback controls were shown or hidden.
    ControllerVisibility {
        visible: bool,
    },
}

impl SessionEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            SessionEvent::PlayerReady => "Player ready",
            SessionEvent::Start => "Playback started",
            SessionEvent::Stop => "Playback stopped",
            SessionEvent::Progress { .. } => "Playback progress",
            SessionEvent::Error { cause: Some(_) } => "Playback error",
            SessionEvent::Error { cause: None } => "Player idle",
            SessionEvent::Buffering { is_buffering: true } => "Buffering started",
            SessionEvent::Buffering {
                is_buffering: false,
            } => "Buffering finished",
            SessionEvent::ControllerVisibility { .. } => "Controller visibility changed",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            SessionEvent::Error { cause: Some(_) } => EventSeverity::Error,
            SessionEvent::Error { cause: None } => EventSeverity::Warning,
            SessionEvent::PlayerReady | SessionEvent::Start | SessionEvent::Stop => {
                EventSeverity::Info
            }
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast bus for session events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
///
/// # Example
///
/// ```rust
/// use core_runtime::events::{EventBus, SessionEvent};
///
/// let event_bus = EventBus::new(100);
/// let mut subscriber = event_bus.subscribe();
///
/// event_bus.emit(SessionEvent::Start).ok();
/// assert_eq!(subscriber.try_recv().unwrap(), SessionEvent::Start);
/// ```
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of events to buffer per subscriber.
    ///   When a subscriber falls behind by more than this amount, it will
    ///   receive a `RecvError::Lagged` error.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    /// Returns an error if there are no active subscribers.
    pub fn emit(&self, event: SessionEvent) -> Result<usize, SendError<SessionEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&SessionEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with additional filtering capabilities.
///
/// # Example
///
/// ```rust
/// use core_runtime::events::{EventBus, EventStream, SessionEvent};
///
/// let event_bus = EventBus::new(100);
/// let progress = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, SessionEvent::Progress { .. }));
/// ```
pub struct EventStream {
    receiver: Receiver<SessionEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<SessionEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter function to this stream.
    ///
    /// Only events that match the filter will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&SessionEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &SessionEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<SessionEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<SessionEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
