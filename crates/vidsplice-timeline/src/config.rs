//! Session configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use vidsplice_core::{Result, SpliceError, TimeValue, DEFAULT_TIMESCALE};

/// Tunables for an editing session. Missing JSON fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Ticks per second when converting float seconds to time values.
    pub timescale: i64,
    /// Maximum undo steps kept.
    pub history_depth: usize,
    /// Capacity of each event channel subscription.
    pub event_channel_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timescale: DEFAULT_TIMESCALE,
            history_depth: 200,
            event_channel_capacity: 64,
        }
    }
}

impl SessionConfig {
    /// Check every field is usable.
    pub fn validate(&self) -> Result<()> {
        if self.timescale <= 0 {
            return Err(SpliceError::Config(format!(
                "timescale must be positive, got {}",
                self.timescale
            )));
        }
        if self.history_depth == 0 {
            return Err(SpliceError::Config("history_depth must be at least 1".into()));
        }
        if self.event_channel_capacity == 0 {
            return Err(SpliceError::Config(
                "event_channel_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| SpliceError::Config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    /// Convert float seconds to a time value at the configured timescale.
    pub fn seconds(&self, seconds: f64) -> TimeValue {
        TimeValue::from_seconds_f64(seconds, self.timescale)
    }
}
