//! # Session Options
//!
//! Tunables for a playback session that are not host capabilities.

use bridge_traits::{LoadControl, UpstreamConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session tuning options.
///
/// Every field has a serde default, so hosts can ship a partial JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Delay before the first progress tick after playback starts.
    ///
    /// Default: 17 ms.
    #[serde(default = "default_progress_first_delay_ms")]
    pub progress_first_delay_ms: u64,

    /// Period of progress ticks while playing.
    ///
    /// Default: 500 ms.
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,

    /// Buffer durations handed to the engine at attach time.
    #[serde(default)]
    pub load_control: LoadControl,

    /// Follow redirects between http and https.
    ///
    /// Default: true.
    #[serde(default = "default_allow_cross_protocol_redirects")]
    pub allow_cross_protocol_redirects: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            progress_first_delay_ms: default_progress_first_delay_ms(),
            progress_interval_ms: default_progress_interval_ms(),
            load_control: LoadControl::default(),
            allow_cross_protocol_redirects: default_allow_cross_protocol_redirects(),
        }
    }
}

impl SessionOptions {
    pub fn progress_first_delay(&self) -> Duration {
        Duration::from_millis(self.progress_first_delay_ms)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    /// Upstream data-source settings derived from these options.
    pub fn upstream(&self) -> UpstreamConfig {
        UpstreamConfig {
            allow_cross_protocol_redirects: self.allow_cross_protocol_redirects,
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.progress_interval_ms == 0 {
            return Err("progress_interval_ms must be > 0".to_string());
        }

        let load = &self.load_control;
        if load.max_buffer_ms == 0 {
            return Err("max_buffer_ms must be > 0".to_string());
        }

        if load.min_buffer_ms > load.max_buffer_ms {
            return Err("min_buffer_ms cannot exceed max_buffer_ms".to_string());
        }

        if load.buffer_for_playback_ms > load.min_buffer_ms {
            return Err("buffer_for_playback_ms cannot exceed min_buffer_ms".to_string());
        }

        if load.buffer_for_playback_after_rebuffer_ms > load.min_buffer_ms {
            return Err(
                "buffer_for_playback_after_rebuffer_ms cannot exceed min_buffer_ms".to_string(),
            );
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_progress_first_delay_ms() -> u64 {
    17
}

fn default_progress_interval_ms() -> u64 {
    500
}

fn default_allow_cross_protocol_redirects() -> bool {
    true
}
