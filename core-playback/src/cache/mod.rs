//! # Media Cache Module
//!
//! Describes the on-disk cache the engine reads through. The engine owns the
//! cache contents; this module only decides where the cache lives, how large
//! it may grow, and whether a session uses it at all.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │     DataSourceFactory                  │
//! │  - initialize()                        │
//! │  - resolve(enable_cache)               │
//! └────────┬───────────────────────────────┘
//!          │
//!          ├──> CacheConfig (size, fragments, directory)
//!          └──> DataSourceConfig (handed to the engine)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_playback::cache::{CacheConfig, DataSourceFactory};
//! use bridge_traits::UpstreamConfig;
//!
//! let factory = DataSourceFactory::new(
//!     CacheConfig::new("/data/user/0/app/cache"),
//!     UpstreamConfig::default(),
//! )?;
//! factory.initialize()?;
//! let data_source = factory.resolve(true)?;
//! ```

pub mod config;
pub mod factory;

// Re-export commonly used types
pub use config::{CacheConfig, EvictionPolicy};
pub use factory::DataSourceFactory;
