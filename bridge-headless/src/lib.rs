//! # Headless Bridge Implementations
//!
//! In-process implementations of the host bridge traits, for tests, demos and
//! hosts without a screen.
//!
//! ## Overview
//!
//! - [`SimulatedEngine`] - `PlayerEngine` that records every call and reports
//!   state changes on demand
//! - [`ChannelLifecycle`] - `LifecycleObserver` driven by [`ChannelLifecycle::set_phase`]
//! - [`ForegroundLifecycle`] - `LifecycleObserver` that stays active forever
//! - [`HeadlessSurface`] - `RenderSurface` without pixels; controller visibility
//!   is driven by [`HeadlessSurface::set_controller_visible`]
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_headless::{ChannelLifecycle, HeadlessSurface, SimulatedEngine};
//! use bridge_traits::{LifecyclePhase, PlaybackState};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(SimulatedEngine::new());
//! let lifecycle = Arc::new(ChannelLifecycle::new());
//!
//! // ... attach a session ...
//!
//! engine.report_state(PlaybackState::Ready);
//! lifecycle.set_phase(LifecyclePhase::Paused);
//! ```

mod engine;
mod lifecycle;
mod subscribers;
mod surface;

pub use engine::{EngineCall, SimulatedEngine};
pub use lifecycle::{ChannelLifecycle, ForegroundLifecycle};
pub use subscribers::Subscribers;
pub use surface::HeadlessSurface;
