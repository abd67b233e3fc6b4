//! Player engine bridge trait and supporting types.
//!
//! The engine is the host's native media player. The session core treats it as
//! a black box: it configures the engine once, hands it media sources, drives
//! its transport and listens to its state notifications. Buffering policy,
//! adaptive bitrate selection, cache eviction and decoding all stay inside the
//! engine.
//!
//! ## Threading
//!
//! Control methods are synchronous and must return promptly. Anything slow
//! (preparing, seeking, buffering) completes asynchronously and is reported
//! through the stream returned by [`PlayerEngine::subscribe`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::{
    error::Result,
    media::{DataSourceConfig, MediaSource},
    platform::PlatformSendSync,
    stream::NotificationStream,
};

/// Engine playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// No media prepared, or playback stopped/failed.
    Idle,
    /// Waiting for data before playback can continue.
    Buffering,
    /// Able to play immediately from the current position.
    Ready,
    /// Reached the end of the media.
    Ended,
}

/// Playback failure reported by the engine.
///
/// The core never interprets these; they are forwarded to the application
/// verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("engine error {code}: {message}")]
pub struct EngineError {
    /// Engine-specific error code.
    pub code: i32,
    /// Human-readable description.
    pub message: String,
}

impl EngineError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Notification emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Playback state or play-when-ready flag changed.
    StateChanged {
        play_when_ready: bool,
        state: PlaybackState,
    },
    /// Playback failed.
    Error(EngineError),
}

/// Repeat behaviour of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    #[default]
    Off,
    One,
    All,
}

/// Speed and pitch applied to playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackParameters {
    /// Playback speed, `1.0` is normal speed.
    pub speed: f32,
    /// Pitch multiplier, `1.0` keeps the original pitch.
    pub pitch: f32,
}

impl PlaybackParameters {
    /// Parameters for the given speed at the original pitch.
    pub fn with_speed(speed: f32) -> Self {
        Self { speed, pitch: 1.0 }
    }
}

impl Default for PlaybackParameters {
    fn default() -> Self {
        Self::with_speed(1.0)
    }
}

/// Buffer durations the engine's load control should use, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadControl {
    /// Minimum media duration to keep buffered.
    #[serde(default = "default_min_buffer_ms")]
    pub min_buffer_ms: u32,
    /// Maximum media duration to buffer.
    #[serde(default = "default_max_buffer_ms")]
    pub max_buffer_ms: u32,
    /// Buffer required before playback starts or resumes after a seek.
    #[serde(default = "default_buffer_for_playback_ms")]
    pub buffer_for_playback_ms: u32,
    /// Buffer required to resume after a rebuffer.
    #[serde(default = "default_buffer_for_playback_ms")]
    pub buffer_for_playback_after_rebuffer_ms: u32,
}

fn default_min_buffer_ms() -> u32 {
    32 * 1024
}

fn default_max_buffer_ms() -> u32 {
    64 * 1024
}

fn default_buffer_for_playback_ms() -> u32 {
    1024
}

impl Default for LoadControl {
    fn default() -> Self {
        Self {
            min_buffer_ms: default_min_buffer_ms(),
            max_buffer_ms: default_max_buffer_ms(),
            buffer_for_playback_ms: default_buffer_for_playback_ms(),
            buffer_for_playback_after_rebuffer_ms: default_buffer_for_playback_ms(),
        }
    }
}

/// One-time engine configuration applied when a session attaches.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub load_control: LoadControl,
    pub data_source: Arc<DataSourceConfig>,
}

/// Trait for the host's native media player engine.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::engine::{PlayerEngine, RepeatMode};
///
/// fn restart_looping(engine: &dyn PlayerEngine) {
///     engine.set_repeat_mode(RepeatMode::All);
///     engine.seek_to(0);
///     engine.set_play_when_ready(true);
/// }
/// ```
pub trait PlayerEngine: PlatformSendSync {
    /// Apply load control and data-source settings.
    fn configure(&self, settings: &EngineSettings) -> Result<()>;

    /// Replace the current media source. Takes effect on the next `prepare`.
    fn set_media_source(&self, source: MediaSource);

    /// Start loading the current media source.
    fn prepare(&self);

    /// Whether playback proceeds as soon as the engine is ready.
    fn play_when_ready(&self) -> bool;

    fn set_play_when_ready(&self, play_when_ready: bool);

    /// Stop playback and release loaded media. The engine reports `Idle`.
    fn stop(&self);

    /// Seek to an absolute position in milliseconds.
    fn seek_to(&self, position_ms: u64);

    /// Current playback position in milliseconds.
    fn current_position_ms(&self) -> u64;

    /// Media duration in milliseconds, once known.
    fn duration_ms(&self) -> Option<u64>;

    fn set_repeat_mode(&self, mode: RepeatMode);

    /// Output volume in `0.0..=1.0`.
    fn volume(&self) -> f32;

    fn set_volume(&self, volume: f32);

    fn set_playback_parameters(&self, parameters: PlaybackParameters);

    /// Subscribe to state and error notifications.
    fn subscribe(&self) -> Result<Box<dyn NotificationStream<EngineEvent>>>;
}
