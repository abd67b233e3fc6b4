//! Cache configuration and policies

use std::path::{Path, PathBuf};

pub use bridge_traits::EvictionPolicy;

/// Configuration for the engine's media cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Root directory the cache directory is created under
    pub root: PathBuf,

    /// Maximum cache size in bytes (default: 500 MiB)
    pub max_cache_size_bytes: u64,

    /// Eviction policy when cache is full
    pub eviction_policy: EvictionPolicy,

    /// Size of each cache fragment written to disk (default: 2 MiB)
    pub fragment_size_bytes: u64,

    /// Read from upstream when a cached span cannot be read (default: true)
    pub ignore_cache_on_error: bool,

    /// Cache directory name (relative to `root`)
    pub cache_directory: String,
}

impl CacheConfig {
    /// Create a cache configuration rooted at `root` with default values.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_cache_size_bytes: 500 * 1024 * 1024,
            eviction_policy: EvictionPolicy::LeastRecentlyUsed,
            fragment_size_bytes: 2 * 1024 * 1024,
            ignore_cache_on_error: true,
            cache_directory: "media".to_string(),
        }
    }

    /// Set maximum cache size.
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_cache_size_bytes = bytes;
        self
    }

    /// Set eviction policy.
    pub fn with_eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = policy;
        self
    }

    /// Set fragment size.
    pub fn with_fragment_size(mut self, bytes: u64) -> Self {
        self.fragment_size_bytes = bytes;
        self
    }

    /// Set cache directory name.
    pub fn with_cache_directory(mut self, dir: impl Into<String>) -> Self {
        self.cache_directory = dir.into();
        self
    }

    /// Full path of the cache directory.
    pub fn directory(&self) -> PathBuf {
        self.root.join(Path::new(&self.cache_directory))
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_cache_size_bytes == 0 {
            return Err("max_cache_size_bytes must be greater than 0".to_string());
        }

        if self.fragment_size_bytes == 0 {
            return Err("fragment_size_bytes must be greater than 0".to_string());
        }

        if self.fragment_size_bytes > self.max_cache_size_bytes {
            return Err("fragment_size_bytes cannot exceed max_cache_size_bytes".to_string());
        }

        if self.cache_directory.is_empty() {
            return Err("cache_directory cannot be empty".to_string());
        }

        Ok(())
    }
}
