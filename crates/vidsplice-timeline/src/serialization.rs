//! Session persistence with versioning and migration.
//!
//! Uses JSON with a schema version field for forward-compatible persistence.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vidsplice_core::{Filter, MediaAsset, Result, SpliceError};

use crate::segment::Segment;
use crate::timeline::Timeline;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Versioned snapshot of an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionFile {
    /// Schema version for migration.
    pub version: u32,
    /// The source asset descriptor.
    pub asset: MediaAsset,
    /// Segments in timeline order.
    pub segments: Vec<Segment>,
    /// Filter active when the snapshot was taken.
    #[serde(default)]
    pub active_filter: Option<Filter>,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl SessionFile {
    /// Snapshot a timeline and its filter.
    pub fn new(timeline: &Timeline, active_filter: Option<Filter>) -> Self {
        Self {
            version: CURRENT_VERSION,
            asset: MediaAsset::clone(timeline.asset()),
            segments: timeline.segments().to_vec(),
            active_filter,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Rebuild the timeline, re-checking the segments against the asset.
    pub fn into_timeline(self) -> Result<(Timeline, Option<Filter>)> {
        let timeline = Timeline::from_segments(Arc::new(self.asset), self.segments)?;
        Ok((timeline, self.active_filter))
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| SpliceError::Serialization(format!("Failed to serialize session: {}", e)))
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| SpliceError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;

        if version > CURRENT_VERSION {
            return Err(SpliceError::Serialization(format!(
                "Session file version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        serde_json::from_value(migrated)
            .map_err(|e| SpliceError::Serialization(format!("Failed to parse session: {}", e)))
    }

    /// Save the session to a file path.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load a session from a file path.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 → v1: bare {asset, segments} object without the wrapper fields
                if let Some(object) = data.as_object_mut() {
                    object.insert("version".into(), serde_json::json!(1));
                    object
                        .entry("app_version")
                        .or_insert_with(|| serde_json::json!("0.0.0"));
                }
                version = 1;
            }
            _ => {
                return Err(SpliceError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}
