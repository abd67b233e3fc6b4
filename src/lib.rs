//! Workspace umbrella crate.
//!
//! Re-exports the bridge contracts, the runtime layer and the playback session
//! core so host applications can depend on a single crate. Enable the
//! `headless` feature to pull in the in-process reference adapters.

pub use bridge_traits;
pub use core_playback;
pub use core_runtime;

#[cfg(feature = "headless")]
pub use bridge_headless;

pub use core_playback::{PlaybackError, SessionController, SessionListener};
pub use core_runtime::events::SessionEvent;
