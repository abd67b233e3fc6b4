//! Rendering surface bridge trait.

use std::sync::Arc;

use crate::{
    engine::PlayerEngine, error::Result, platform::PlatformSendSync,
    stream::NotificationStream,
};

/// Color shown behind the video before the first frame is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutterColor {
    Transparent,
    /// Packed `0xAARRGGBB` color.
    Argb(u32),
}

/// View that renders video frames and hosts the playback controls.
pub trait RenderSurface: PlatformSendSync {
    /// Attach the engine whose output this surface renders.
    fn bind_player(&self, player: Arc<dyn PlayerEngine>);

    /// Detach the currently bound engine, if any.
    fn unbind_player(&self);

    fn set_shutter_color(&self, color: ShutterColor);

    /// Subscribe to playback-controller visibility changes (`true` = shown).
    fn subscribe_visibility(&self) -> Result<Box<dyn NotificationStream<bool>>>;
}
