//! Render surface without a display.

use std::sync::Arc;

use bridge_traits::{
    error::Result, NotificationStream, PlayerEngine, RenderSurface, ShutterColor,
};
use parking_lot::Mutex;

use crate::subscribers::Subscribers;

/// `RenderSurface` that tracks its binding and shutter color and lets the host
/// toggle controller visibility.
#[derive(Default)]
pub struct HeadlessSurface {
    player: Mutex<Option<Arc<dyn PlayerEngine>>>,
    shutter_color: Mutex<Option<ShutterColor>>,
    visibility: Subscribers<bool>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        self.player.lock().is_some()
    }

    pub fn shutter_color(&self) -> Option<ShutterColor> {
        *self.shutter_color.lock()
    }

    /// Show or hide the playback controls.
    pub fn set_controller_visible(&self, visible: bool) {
        self.visibility.broadcast(visible);
    }

    /// Number of open visibility streams.
    pub fn subscriber_count(&self) -> usize {
        self.visibility.count()
    }
}

impl RenderSurface for HeadlessSurface {
    fn bind_player(&self, player: Arc<dyn PlayerEngine>) {
        *self.player.lock() = Some(player);
    }

    fn unbind_player(&self) {
        self.player.lock().take();
    }

    fn set_shutter_color(&self, color: ShutterColor) {
        *self.shutter_color.lock() = Some(color);
    }

    fn subscribe_visibility(&self) -> Result<Box<dyn NotificationStream<bool>>> {
        Ok(Box::new(self.visibility.subscribe()))
    }
}
