//! # Media Source Building
//!
//! Turns application media references into [`MediaSource`] values.
//!
//! The delivery format is inferred from the reference alone:
//!
//! | Reference                                   | Content type       |
//! |---------------------------------------------|--------------------|
//! | `rtsp://…`                                  | `Rtsp` (rejected)  |
//! | `….mpd`                                     | `Dash`             |
//! | `….m3u8`                                    | `Hls`              |
//! | `….ism/Manifest(format=mpd-time-csf)`       | `Dash`             |
//! | `….ism/Manifest(format=m3u8-aapl)`          | `Hls`              |
//! | `….ism`, `….isml`, `….ism/Manifest…`        | `SmoothStreaming`  |
//! | anything else                               | `Progressive`      |
//!
//! Matching is case-insensitive and ignores query strings and fragments.

use std::sync::Arc;

use bridge_traits::{ClipWindow, ContentType, DataSourceConfig, MediaReference, MediaSource};

use crate::error::{PlaybackError, Result};

/// Infer the delivery format of a reference.
pub fn infer_content_type(reference: &MediaReference) -> ContentType {
    if reference.scheme().as_deref() == Some("rtsp") {
        return ContentType::Rtsp;
    }

    let path = reference.path().to_ascii_lowercase();
    if path.ends_with(".mpd") {
        ContentType::Dash
    } else if path.ends_with(".m3u8") {
        ContentType::Hls
    } else if let Some(extensions) = smooth_streaming_extensions(&path) {
        if extensions.contains(ISM_DASH_FORMAT) {
            ContentType::Dash
        } else if extensions.contains(ISM_HLS_FORMAT) {
            ContentType::Hls
        } else {
            ContentType::SmoothStreaming
        }
    } else {
        ContentType::Progressive
    }
}

const ISM_DASH_FORMAT: &str = "format=mpd-time-csf";
const ISM_HLS_FORMAT: &str = "format=m3u8-aapl";

/// Matches `….ism` or `….isml`, optionally followed by `/manifest` and any
/// suffix. Returns the text after `manifest` (empty when absent).
fn smooth_streaming_extensions(path: &str) -> Option<&str> {
    if path.ends_with(".ism") || path.ends_with(".isml") {
        return Some("");
    }

    [".ism/manifest", ".isml/manifest"]
        .iter()
        .filter_map(|marker| path.rfind(marker).map(|index| index + marker.len()))
        .max()
        .map(|end| &path[end..])
}

/// Build a media source for `reference` over the given data source.
///
/// Fails with [`PlaybackError::UnsupportedMediaType`] for formats the session
/// cannot play.
pub fn build_media_source(
    reference: &MediaReference,
    data_source: Arc<DataSourceConfig>,
) -> Result<MediaSource> {
    let content_type = infer_content_type(reference);
    if content_type == ContentType::Rtsp {
        return Err(PlaybackError::UnsupportedMediaType {
            reference: reference.clone(),
            content_type,
        });
    }

    Ok(MediaSource::Stream {
        reference: reference.clone(),
        content_type,
        data_source,
    })
}

/// Restrict `source` to `[start_ms, end_ms)`.
pub fn clip_media_source(source: MediaSource, start_ms: u64, end_ms: u64) -> Result<MediaSource> {
    let window = ClipWindow::from_millis(start_ms, end_ms)
        .ok_or(PlaybackError::ClipWindowOutOfRange { start_ms, end_ms })?;
    if !window.is_valid() {
        return Err(PlaybackError::InvalidClipWindow { start_ms, end_ms });
    }
    Ok(source.clipped(window))
}
