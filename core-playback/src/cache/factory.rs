//! Data-source factory.
//!
//! Owns the media cache location and hands out the [`DataSourceConfig`] an
//! engine builds its media sources on. One factory can be shared by every
//! session of a host.

use std::sync::Arc;

use bridge_traits::{CacheSpec, DataSourceConfig, UpstreamConfig};
use core_runtime::logging::strip_path;
use parking_lot::Mutex;
use tracing::{debug, info};

use super::config::CacheConfig;
use crate::error::{PlaybackError, Result};

#[derive(Default)]
struct FactoryState {
    directory_ready: bool,
    /// Last built descriptor, keyed by the cache flag it was built for.
    current: Option<(bool, Arc<DataSourceConfig>)>,
}

/// Builds and memoizes data-source descriptors.
pub struct DataSourceFactory {
    config: CacheConfig,
    upstream: UpstreamConfig,
    state: Mutex<FactoryState>,
}

impl DataSourceFactory {
    /// Create a factory. Nothing touches the disk until
    /// [`initialize`](Self::initialize) or the first cached
    /// [`resolve`](Self::resolve).
    pub fn new(config: CacheConfig, upstream: UpstreamConfig) -> Result<Self> {
        config.validate().map_err(PlaybackError::CacheError)?;

        Ok(Self {
            config,
            upstream,
            state: Mutex::new(FactoryState::default()),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Create the cache directory. Repeated calls are no-ops.
    pub fn initialize(&self) -> Result<()> {
        let mut state = self.state.lock();
        self.ensure_directory(&mut state)
    }

    /// Descriptor for the given cache flag.
    ///
    /// Returns the same `Arc` for as long as the flag stays unchanged.
    pub fn resolve(&self, enable_cache: bool) -> Result<Arc<DataSourceConfig>> {
        let mut state = self.state.lock();

        if let Some((cached_flag, descriptor)) = &state.current {
            if *cached_flag == enable_cache {
                return Ok(Arc::clone(descriptor));
            }
        }

        let cache = if enable_cache {
            self.ensure_directory(&mut state)?;
            Some(CacheSpec {
                directory: self.config.directory(),
                max_bytes: self.config.max_cache_size_bytes,
                eviction_policy: self.config.eviction_policy,
                fragment_size_bytes: self.config.fragment_size_bytes,
                ignore_cache_on_error: self.config.ignore_cache_on_error,
            })
        } else {
            None
        };

        let descriptor = Arc::new(DataSourceConfig {
            upstream: self.upstream.clone(),
            cache,
        });
        debug!(enable_cache, "Built data-source descriptor");

        state.current = Some((enable_cache, Arc::clone(&descriptor)));
        Ok(descriptor)
    }

    fn ensure_directory(&self, state: &mut FactoryState) -> Result<()> {
        if state.directory_ready {
            return Ok(());
        }

        let directory = self.config.directory();
        std::fs::create_dir_all(&directory).map_err(|e| {
            PlaybackError::CacheError(format!(
                "failed to create cache directory {}: {}",
                strip_path(&directory.to_string_lossy()),
                e
            ))
        })?;

        info!(
            dir = %strip_path(&directory.to_string_lossy()),
            max_bytes = self.config.max_cache_size_bytes,
            eviction = ?self.config.eviction_policy,
            "Media cache ready"
        );
        state.directory_ready = true;
        Ok(())
    }
}

impl std::fmt::Debug for DataSourceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("DataSourceFactory")
            .field("config", &self.config)
            .field("directory_ready", &state.directory_ready)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::cache::EvictionPolicy;

    fn factory(root: &std::path::Path) -> DataSourceFactory {
        DataSourceFactory::new(CacheConfig::new(root), UpstreamConfig::default()).unwrap()
    }

    #[test]
    fn test_resolve_is_memoized_per_flag() {
        let dir = tempfile::tempdir().unwrap();
        let factory = factory(dir.path());

        let first = factory.resolve(true).unwrap();
        let second = factory.resolve(true).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let uncached = factory.resolve(false).unwrap();
        assert!(!uncached.is_cached());
        assert!(!Arc::ptr_eq(&first, &uncached));

        let cached_again = factory.resolve(true).unwrap();
        assert!(cached_again.is_cached());
        assert_eq!(*cached_again, *first);
    }

    #[test]
    fn test_resolve_creates_directory_once() {
        let dir = tempfile::tempdir().unwrap();
        let factory = factory(dir.path());
        let media_dir = dir.path().join("media");
        assert!(!media_dir.exists());

        let descriptor = factory.resolve(true).unwrap();
        assert!(media_dir.is_dir());
        let cache = descriptor.cache.as_ref().unwrap();
        assert_eq!(cache.directory, media_dir);
        assert_eq!(cache.max_bytes, 500 * 1024 * 1024);
        assert_eq!(cache.eviction_policy, EvictionPolicy::LeastRecentlyUsed);
        assert_eq!(cache.fragment_size_bytes, 2 * 1024 * 1024);
        assert!(cache.ignore_cache_on_error);

        // Removing the directory does not trigger a second creation
        std::fs::remove_dir(&media_dir).unwrap();
        factory.initialize().unwrap();
        assert!(!media_dir.exists());
    }

    #[test]
    fn test_uncached_resolve_does_not_touch_disk() {
        let dir = tempfile::tempdir().unwrap();
        let factory = factory(dir.path());

        let descriptor = factory.resolve(false).unwrap();
        assert!(descriptor.upstream.allow_cross_protocol_redirects);
        assert!(!dir.path().join("media").exists());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = DataSourceFactory::new(
            CacheConfig::new("/cache").with_max_size(0),
            UpstreamConfig::default(),
        );
        assert!(matches!(result, Err(PlaybackError::CacheError(_))));
    }

    #[test]
    fn test_directory_creation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let factory = factory(&blocker);
        assert!(matches!(
            factory.resolve(true),
            Err(PlaybackError::CacheError(_))
        ));
    }
}
