//! # Core Configuration Module
//!
//! Provides configuration management for a playback session.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds the host bridges and settings a session needs. It
//! enforces fail-fast validation so a session is never attached with a missing
//! collaborator.
//!
//! ## Required Dependencies
//!
//! - `PlayerEngine` - The native media player the session drives
//! - `RenderSurface` - The view the engine renders into
//! - `LifecycleObserver` - Resume/pause/destroy notifications of the host component
//! - cache directory - Root under which the media cache directory is created
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .cache_dir("/data/user/0/app/cache")
//!     .cache_size_mb(500)
//!     .engine(Arc::new(MyEngine::new()))
//!     .surface(Arc::new(MySurface::new()))
//!     .lifecycle_observer(Arc::new(MyLifecycle::new()))
//!     .loop_playback(true)
//!     .progress_updates(true)
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Error Handling
//!
//! The builder reports missing bridges as
//! [`Error::CapabilityMissing`](crate::error::Error::CapabilityMissing) with a
//! message explaining what to inject.

use crate::error::{Error, Result};
use bridge_traits::{LifecycleObserver, PlayerEngine, RenderSurface};
use std::path::PathBuf;
use std::sync::Arc;

/// Default media cache budget in megabytes.
pub const DEFAULT_CACHE_SIZE_MB: u64 = 500;

/// Core configuration for one playback session.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Directory under which the media cache lives
    pub cache_dir: PathBuf,

    /// Maximum media cache size in megabytes
    pub cache_size_mb: u64,

    /// Native media player engine (required)
    pub engine: Arc<dyn PlayerEngine>,

    /// Rendering surface the engine is bound to (required)
    pub surface: Arc<dyn RenderSurface>,

    /// Host component lifecycle (required)
    pub lifecycle_observer: Arc<dyn LifecycleObserver>,

    /// Features flags
    pub features: FeatureFlags,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("cache_dir", &self.cache_dir)
            .field("cache_size_mb", &self.cache_size_mb)
            .field("engine", &"PlayerEngine { ... }")
            .field("surface", &"RenderSurface { ... }")
            .field("lifecycle_observer", &"LifecycleObserver { ... }")
            .field("features", &self.features)
            .finish()
    }
}

/// Feature flags control optional session behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Read through and write to the on-disk media cache
    pub enable_cache: bool,

    /// Repeat the whole media when it ends
    pub loop_playback: bool,

    /// Emit periodic progress events while playing
    pub progress_updates: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_cache: true,
            loop_playback: false,
            progress_updates: false,
        }
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Cache budget in bytes.
    pub fn cache_size_bytes(&self) -> u64 {
        self.cache_size_mb.saturating_mul(1024 * 1024)
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Cache directory is not empty
    /// - Cache size is reasonable (> 0 and < 100GB)
    pub fn validate(&self) -> Result<()> {
        if self.cache_dir.as_os_str().is_empty() {
            return Err(Error::Config("Cache directory cannot be empty".to_string()));
        }

        if self.cache_size_mb == 0 {
            return Err(Error::Config(
                "Cache size must be greater than 0 MB".to_string(),
            ));
        }

        if self.cache_size_mb > 100_000 {
            return Err(Error::Config(
                "Cache size exceeds maximum of 100GB (100,000 MB)".to_string(),
            ));
        }

        Ok(())
    }
}

fn engine_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "PlayerEngine".to_string(),
        message: "PlayerEngine implementation is required to play media. \
                 Android: wrap the platform media player in a PlayerEngine adapter. \
                 Tests and demos: use bridge_headless::SimulatedEngine."
            .to_string(),
    }
}

fn surface_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "RenderSurface".to_string(),
        message: "RenderSurface implementation is required to bind the engine to a view. \
                 Audio-only hosts: use bridge_headless::HeadlessSurface."
            .to_string(),
    }
}

fn lifecycle_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "LifecycleObserver".to_string(),
        message: "LifecycleObserver implementation is required so playback follows the host \
                 component. Inject an adapter over the activity/fragment/window lifecycle."
            .to_string(),
    }
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Use this builder to incrementally set configuration options and then
/// call [`build()`](CoreConfigBuilder::build) to create the final config.
#[derive(Default)]
pub struct CoreConfigBuilder {
    cache_dir: Option<PathBuf>,
    cache_size_mb: Option<u64>,
    engine: Option<Arc<dyn PlayerEngine>>,
    surface: Option<Arc<dyn RenderSurface>>,
    lifecycle_observer: Option<Arc<dyn LifecycleObserver>>,
    features: FeatureFlags,
}

impl CoreConfigBuilder {
    /// Sets the directory under which the media cache is created.
    pub fn cache_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.into());
        self
    }

    /// Sets the maximum cache size in megabytes.
    ///
    /// Default: 500 MB
    pub fn cache_size_mb(mut self, size_mb: u64) -> Self {
        self.cache_size_mb = Some(size_mb);
        self
    }

    /// Sets the player engine.
    pub fn engine(mut self, engine: Arc<dyn PlayerEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Sets the rendering surface.
    pub fn surface(mut self, surface: Arc<dyn RenderSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Sets the lifecycle observer.
    pub fn lifecycle_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.lifecycle_observer = Some(observer);
        self
    }

    /// Enables or disables the on-disk media cache.
    pub fn enable_cache(mut self, enabled: bool) -> Self {
        self.features.enable_cache = enabled;
        self
    }

    /// Enables or disables looping of the whole media.
    pub fn loop_playback(mut self, enabled: bool) -> Self {
        self.features.loop_playback = enabled;
        self
    }

    /// Enables or disables periodic progress events.
    pub fn progress_updates(mut self, enabled: bool) -> Self {
        self.features.progress_updates = enabled;
        self
    }

    /// Replaces all feature flags.
    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// Returns an error if a required bridge is missing or a value is invalid.
    pub fn build(self) -> Result<CoreConfig> {
        let cache_dir = self.cache_dir.ok_or_else(|| {
            Error::Config("Cache directory is required. Use .cache_dir() to set it.".to_string())
        })?;
        let engine = self.engine.ok_or_else(engine_missing_error)?;
        let surface = self.surface.ok_or_else(surface_missing_error)?;
        let lifecycle_observer = self.lifecycle_observer.ok_or_else(lifecycle_missing_error)?;

        let config = CoreConfig {
            cache_dir,
            cache_size_mb: self.cache_size_mb.unwrap_or(DEFAULT_CACHE_SIZE_MB),
            engine,
            surface,
            lifecycle_observer,
            features: self.features,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::{
        error::Result as BridgeResult, EngineEvent, EngineSettings, LifecyclePhase, MediaSource,
        NotificationStream, PlaybackParameters, RepeatMode, ShutterColor,
    };

    struct StubEngine;

    impl PlayerEngine for StubEngine {
        fn configure(&self, _settings: &EngineSettings) -> BridgeResult<()> {
            Ok(())
        }
        fn set_media_source(&self, _source: MediaSource) {}
        fn prepare(&self) {}
        fn play_when_ready(&self) -> bool {
            false
        }
        fn set_play_when_ready(&self, _play_when_ready: bool) {}
        fn stop(&self) {}
        fn seek_to(&self, _position_ms: u64) {}
        fn current_position_ms(&self) -> u64 {
            0
        }
        fn duration_ms(&self) -> Option<u64> {
            None
        }
        fn set_repeat_mode(&self, _mode: RepeatMode) {}
        fn volume(&self) -> f32 {
            1.0
        }
        fn set_volume(&self, _volume: f32) {}
        fn set_playback_parameters(&self, _parameters: PlaybackParameters) {}
        fn subscribe(&self) -> BridgeResult<Box<dyn NotificationStream<EngineEvent>>> {
            let (_sender, stream) = bridge_traits::notification_channel();
            Ok(Box::new(stream))
        }
    }

    struct StubSurface;

    impl RenderSurface for StubSurface {
        fn bind_player(&self, _player: Arc<dyn PlayerEngine>) {}
        fn unbind_player(&self) {}
        fn set_shutter_color(&self, _color: ShutterColor) {}
        fn subscribe_visibility(&self) -> BridgeResult<Box<dyn NotificationStream<bool>>> {
            let (_sender, stream) = bridge_traits::notification_channel();
            Ok(Box::new(stream))
        }
    }

    struct StubLifecycle;

    #[async_trait]
    impl LifecycleObserver for StubLifecycle {
        async fn subscribe_changes(
            &self,
        ) -> BridgeResult<Box<dyn NotificationStream<LifecyclePhase>>> {
            let (_sender, stream) = bridge_traits::notification_channel();
            Ok(Box::new(stream))
        }
    }

    fn complete_builder() -> CoreConfigBuilder {
        CoreConfig::builder()
            .cache_dir("/cache")
            .engine(Arc::new(StubEngine))
            .surface(Arc::new(StubSurface))
            .lifecycle_observer(Arc::new(StubLifecycle))
    }

    #[test]
    fn test_builder_defaults() {
        let config = complete_builder().build().unwrap();
        assert_eq!(config.cache_size_mb, DEFAULT_CACHE_SIZE_MB);
        assert_eq!(config.cache_size_bytes(), 500 * 1024 * 1024);
        assert!(config.features.enable_cache);
        assert!(!config.features.loop_playback);
        assert!(!config.features.progress_updates);
    }

    #[test]
    fn test_builder_feature_setters() {
        let config = complete_builder()
            .enable_cache(false)
            .loop_playback(true)
            .progress_updates(true)
            .cache_size_mb(64)
            .build()
            .unwrap();

        assert_eq!(
            config.features,
            FeatureFlags {
                enable_cache: false,
                loop_playback: true,
                progress_updates: true,
            }
        );
        assert_eq!(config.cache_size_mb, 64);
    }

    #[test]
    fn test_builder_requires_cache_dir() {
        let result = CoreConfig::builder()
            .engine(Arc::new(StubEngine))
            .surface(Arc::new(StubSurface))
            .lifecycle_observer(Arc::new(StubLifecycle))
            .build();

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Cache directory is required"));
    }

    #[test]
    fn test_builder_requires_engine() {
        let result = CoreConfig::builder()
            .cache_dir("/cache")
            .surface(Arc::new(StubSurface))
            .lifecycle_observer(Arc::new(StubLifecycle))
            .build();

        match result {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "PlayerEngine")
            }
            other => panic!("expected CapabilityMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_requires_surface_and_lifecycle() {
        let no_surface = CoreConfig::builder()
            .cache_dir("/cache")
            .engine(Arc::new(StubEngine))
            .lifecycle_observer(Arc::new(StubLifecycle))
            .build();
        assert!(matches!(
            no_surface,
            Err(Error::CapabilityMissing { ref capability, .. }) if capability == "RenderSurface"
        ));

        let no_lifecycle = CoreConfig::builder()
            .cache_dir("/cache")
            .engine(Arc::new(StubEngine))
            .surface(Arc::new(StubSurface))
            .build();
        assert!(matches!(
            no_lifecycle,
            Err(Error::CapabilityMissing { ref capability, .. }) if capability == "LifecycleObserver"
        ));
    }

    #[test]
    fn test_validate_cache_size_bounds() {
        assert!(complete_builder().cache_size_mb(0).build().is_err());
        assert!(complete_builder().cache_size_mb(100_001).build().is_err());
        assert!(complete_builder().cache_size_mb(100_000).build().is_ok());
    }

    #[test]
    fn test_validate_empty_cache_dir() {
        let result = complete_builder().cache_dir("").build();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Cache directory cannot be empty"));
    }
}
