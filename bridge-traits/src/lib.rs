//! # Host Bridge Traits
//!
//! Contracts between the playback session core and the host platform.
//!
//! ## Overview
//!
//! The session core owns no media machinery of its own. Every capability it
//! needs is supplied by the host through one of the traits below, and each host
//! platform ships its own implementations.
//!
//! ## Traits
//!
//! ### Playback
//! - [`PlayerEngine`](engine::PlayerEngine) - Native media player (configuration, transport, state notifications)
//! - [`RenderSurface`](surface::RenderSurface) - View that renders the engine and shows playback controls
//!
//! ### Platform Integration
//! - [`LifecycleObserver`](lifecycle::LifecycleObserver) - Host component resume/pause/destroy transitions
//! - [`NotificationStream`](stream::NotificationStream) - Async stream every collaborator reports changes through
//!
//! ### Utilities
//! - [`LoggerSink`](logger::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Headless | `bridge-headless`   | ✅ Reference |
//! | Android  | TBD                 | 📋 Planned |
//! | iOS      | TBD                 | 📋 Planned |
//!
//! ## Fail-Fast Strategy
//!
//! The core fails fast with descriptive errors when a required capability is
//! missing:
//!
//! ```ignore
//! use core_runtime::error::Error;
//!
//! let engine = builder.engine
//!     .ok_or_else(|| Error::CapabilityMissing {
//!         capability: "PlayerEngine".to_string(),
//!         message: "Inject the platform media player adapter.".to_string(),
//!     })?;
//! ```
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Engine playback
//! failures are not bridge errors: they are reported as
//! [`EngineEvent::Error`](engine::EngineEvent::Error) notifications.
//!
//! ## Thread Safety
//!
//! On native targets every bridge trait requires `Send + Sync` so the core can
//! move handles into the tasks that pump notifications.

pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod logger;
pub mod media;
pub mod platform;
pub mod stream;
pub mod surface;

pub use error::BridgeError;

// Re-export commonly used types
pub use engine::{
    EngineError, EngineEvent, EngineSettings, LoadControl, PlaybackParameters, PlaybackState,
    PlayerEngine, RepeatMode,
};
pub use lifecycle::{LifecycleObserver, LifecyclePhase};
pub use logger::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{
    CacheSpec, ClipWindow, ContentType, DataSourceConfig, EvictionPolicy, MediaReference,
    MediaSource, UpstreamConfig,
};
pub use stream::{notification_channel, ChannelStream, NotificationSender, NotificationStream};
pub use surface::{RenderSurface, ShutterColor};
