//! # Playback Session Module
//!
//! Lifecycle-aware playback sessions on top of a host media engine.
//!
//! ## Overview
//!
//! This module handles:
//! - Loading, clipping and switching renditions of media ([`SessionController`])
//! - Suspending and resuming playback with the host component (lifecycle binder)
//! - Translating engine notifications into [`SessionEvent`](core_runtime::events::SessionEvent)s
//! - Periodic progress reporting while playing
//! - Media cache location and data-source descriptors ([`cache`])

pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
mod lifecycle;
pub mod media;
pub mod progress;
pub mod registration;
mod relay;
pub mod session;

pub use cache::{CacheConfig, DataSourceFactory};
pub use config::SessionOptions;
pub use controller::SessionController;
pub use error::{PlaybackError, Result};
pub use media::{build_media_source, infer_content_type};
pub use progress::ProgressTicker;
pub use registration::Registration;
pub use relay::SessionListener;
pub use session::{Session, SessionId};
