//! Media references, media sources and data-source descriptors.
//!
//! These are the values the session core hands to the
//! [`PlayerEngine`](crate::engine::PlayerEngine). The engine owns everything behind them:
//! fetching, caching, demuxing and decoding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// Reference to a piece of media, as supplied by the application.
///
/// A reference is usually an absolute URI (`https://cdn/x/master.m3u8`,
/// `file:///sdcard/clip.mp4`) but bare paths such as `a.mp4` are accepted and
/// forwarded untouched. Two references denote the same media when their
/// strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaReference(String);

impl MediaReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the reference as an absolute URL, if it is one.
    pub fn url(&self) -> Option<Url> {
        Url::parse(&self.0).ok()
    }

    /// Lower-cased URI scheme, if the reference is an absolute URL.
    pub fn scheme(&self) -> Option<String> {
        self.url().map(|url| url.scheme().to_ascii_lowercase())
    }

    /// Path component without query or fragment.
    pub fn path(&self) -> String {
        match self.url() {
            Some(url) => url.path().to_string(),
            None => self
                .0
                .split(['?', '#'])
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

impl fmt::Display for MediaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MediaReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MediaReference {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MediaReference {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Url> for MediaReference {
    fn from(value: Url) -> Self {
        Self(value.into())
    }
}

/// Delivery format of a media reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// MPEG-DASH manifest (`.mpd`)
    Dash,
    /// HTTP Live Streaming playlist (`.m3u8`)
    Hls,
    /// Microsoft Smooth Streaming manifest (`.ism`, `.isml`)
    SmoothStreaming,
    /// Plain progressive file (mp4, mp3, webm, ...)
    Progressive,
    /// Real Time Streaming Protocol
    Rtsp,
}

/// Time window applied to a clipped source, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipWindow {
    pub start_us: u64,
    pub end_us: u64,
}

impl ClipWindow {
    /// Build a window from millisecond bounds.
    ///
    /// Returns `None` when a bound does not fit in microseconds.
    pub fn from_millis(start_ms: u64, end_ms: u64) -> Option<Self> {
        Some(Self {
            start_us: start_ms.checked_mul(1000)?,
            end_us: end_ms.checked_mul(1000)?,
        })
    }

    pub fn start_ms(&self) -> u64 {
        self.start_us / 1000
    }

    pub fn end_ms(&self) -> u64 {
        self.end_us / 1000
    }

    /// Returns `true` when the window has a positive length.
    pub fn is_valid(&self) -> bool {
        self.start_us < self.end_us
    }
}

/// Upstream (network/file) data-source settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Follow redirects between http and https.
    pub allow_cross_protocol_redirects: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            allow_cross_protocol_redirects: true,
        }
    }
}

/// Policy the engine applies when the cache is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Remove spans that haven't been read recently
    #[default]
    LeastRecentlyUsed,
}

/// Disk cache the engine should read through and write to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSpec {
    /// Directory holding cached spans.
    pub directory: PathBuf,
    /// Size bound the eviction policy enforces, in bytes.
    pub max_bytes: u64,
    pub eviction_policy: EvictionPolicy,
    /// Size of each written cache fragment, in bytes.
    pub fragment_size_bytes: u64,
    /// Fall back to upstream when a cache read fails.
    pub ignore_cache_on_error: bool,
}

/// Descriptor of the data-source stack an engine builds media sources on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataSourceConfig {
    pub upstream: UpstreamConfig,
    pub cache: Option<CacheSpec>,
}

impl DataSourceConfig {
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }
}

/// Media source handed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    /// Source built directly from a reference.
    Stream {
        reference: MediaReference,
        content_type: ContentType,
        data_source: Arc<DataSourceConfig>,
    },
    /// Another source restricted to a time window.
    Clipped {
        inner: Box<MediaSource>,
        window: ClipWindow,
    },
}

impl MediaSource {
    /// Reference of the underlying stream.
    pub fn reference(&self) -> &MediaReference {
        match self {
            MediaSource::Stream { reference, .. } => reference,
            MediaSource::Clipped { inner, .. } => inner.reference(),
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            MediaSource::Stream { content_type, .. } => *content_type,
            MediaSource::Clipped { inner, .. } => inner.content_type(),
        }
    }

    /// Outermost clip window, if the source is clipped.
    pub fn clip_window(&self) -> Option<ClipWindow> {
        match self {
            MediaSource::Stream { .. } => None,
            MediaSource::Clipped { window, .. } => Some(*window),
        }
    }

    /// Wrap this source in a clip window.
    pub fn clipped(self, window: ClipWindow) -> Self {
        MediaSource::Clipped {
            inner: Box::new(self),
            window,
        }
    }
}
