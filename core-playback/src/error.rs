//! # Playback Error Types
//!
//! Errors returned by session controller operations.
//!
//! Engine playback failures are not represented here: they are reported to the
//! session listener as [`SessionEvent::Error`](core_runtime::events::SessionEvent::Error).

use bridge_traits::{BridgeError, ContentType, MediaReference};
use thiserror::Error;

/// Errors that can occur during session operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Media Errors
    // ========================================================================
    /// The reference resolves to a delivery format the session cannot build.
    #[error("Unsupported media type {content_type:?} for {reference}")]
    UnsupportedMediaType {
        reference: MediaReference,
        content_type: ContentType,
    },

    /// Operation requires media set with `set_media` first.
    #[error("No media loaded")]
    NoMediaLoaded,

    /// Clip bounds do not describe a positive window.
    #[error("Invalid clip window: start {start_ms} ms must be before end {end_ms} ms")]
    InvalidClipWindow { start_ms: u64, end_ms: u64 },

    /// Clip bounds too large to express in microseconds.
    #[error("Clip window out of range: {start_ms}..{end_ms} ms")]
    ClipWindowOutOfRange { start_ms: u64, end_ms: u64 },

    // ========================================================================
    // Playback Control Errors
    // ========================================================================
    /// Playback speed must be finite and greater than zero.
    #[error("Invalid playback speed: {0}")]
    InvalidSpeed(f32),

    /// Session options failed validation.
    #[error("Invalid session options: {0}")]
    InvalidOptions(String),

    /// The session was destroyed and no longer accepts commands.
    #[error("Session destroyed")]
    SessionDestroyed,

    // ========================================================================
    // Cache Errors
    // ========================================================================
    /// Media cache configuration or setup failed.
    #[error("Cache error: {0}")]
    CacheError(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Host bridge reported a failure.
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// Runtime configuration error.
    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),
}

impl PlaybackError {
    /// Returns `true` if the error was caused by the arguments of the call
    /// rather than by the host or session state.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PlaybackError::UnsupportedMediaType { .. }
                | PlaybackError::InvalidClipWindow { .. }
                | PlaybackError::ClipWindowOutOfRange { .. }
                | PlaybackError::InvalidSpeed(_)
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
