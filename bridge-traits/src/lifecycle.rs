//! Host component lifecycle.
//!
//! A playback session lives inside one host component (an activity, a
//! fragment, a window). The host reports that component's phase so the session
//! can suspend playback when it leaves the screen and resume it when it comes
//! back.

use serde::{Deserialize, Serialize};

use crate::{error::Result, platform::PlatformSendSync, stream::NotificationStream};

/// Lifecycle phase of the host component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    /// Component is visible and interactive.
    Active,
    /// Component left the foreground but may come back.
    Paused,
    /// Component is gone. No further phases follow.
    Destroyed,
}

impl LifecyclePhase {
    /// Returns `true` if no transition can leave this phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecyclePhase::Destroyed)
    }
}

/// Lifecycle observer trait
///
/// Notifies the core about host component transitions:
///
/// - **Android**: `DefaultLifecycleObserver` resume/pause/destroy callbacks
/// - **iOS**: view controller appearance plus scene background notifications
/// - **Desktop**: window focus/minimize/close events
/// - **Web**: Page Visibility API and `pagehide`
///
/// # Example
///
/// ```ignore
/// use bridge_traits::lifecycle::{LifecycleObserver, LifecyclePhase};
///
/// async fn watch(observer: &dyn LifecycleObserver) -> Result<()> {
///     let mut phases = observer.subscribe_changes().await?;
///     while let Some(phase) = phases.next().await {
///         if phase.is_terminal() {
///             break;
///         }
///     }
///     Ok(())
/// }
/// ```
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait LifecycleObserver: PlatformSendSync {
    /// Subscribe to lifecycle phase changes.
    ///
    /// The stream closes when the host stops reporting (typically after
    /// `Destroyed`).
    async fn subscribe_changes(&self) -> Result<Box<dyn NotificationStream<LifecyclePhase>>>;
}
