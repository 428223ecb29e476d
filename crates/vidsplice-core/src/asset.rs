//! Source media handles.
//!
//! The editing core never decodes media. A [`MediaAsset`] only carries what
//! the timeline needs: how long the source is and which tracks it has.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use uuid::Uuid;

use crate::error::{Result, SpliceError};
use crate::time::{TimeRange, TimeValue};

/// Kind of media track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    Video,
    Audio,
}

impl TrackKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable, already-loaded source asset.
///
/// Owned by whatever loaded it; sessions share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMediaAsset")]
pub struct MediaAsset {
    id: Uuid,
    name: String,
    total_duration: TimeValue,
    has_video: bool,
    has_audio: bool,
}

#[derive(Deserialize)]
struct RawMediaAsset {
    id: Uuid,
    name: String,
    total_duration: TimeValue,
    has_video: bool,
    has_audio: bool,
}

impl TryFrom<RawMediaAsset> for MediaAsset {
    type Error = SpliceError;

    fn try_from(raw: RawMediaAsset) -> Result<Self> {
        let mut asset = Self::new(raw.name, raw.total_duration, raw.has_video, raw.has_audio)?;
        asset.id = raw.id;
        Ok(asset)
    }
}

impl MediaAsset {
    /// Describe a loaded asset. Fails if `total_duration` is negative.
    pub fn new(
        name: impl Into<String>,
        total_duration: TimeValue,
        has_video: bool,
        has_audio: bool,
    ) -> Result<Self> {
        let name = name.into();
        if total_duration.is_negative() {
            return Err(SpliceError::InvalidRange(format!(
                "asset '{name}' has negative duration {total_duration}"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            total_duration,
            has_video,
            has_audio,
        })
    }

    /// A typical camera clip: one video and one audio track.
    pub fn audio_visual(name: impl Into<String>, total_duration: TimeValue) -> Result<Self> {
        Self::new(name, total_duration, true, true)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_duration(&self) -> TimeValue {
        self.total_duration
    }

    pub fn has_video_track(&self) -> bool {
        self.has_video
    }

    pub fn has_audio_track(&self) -> bool {
        self.has_audio
    }

    /// Check whether the asset carries a track of `kind`.
    pub fn has_track(&self, kind: TrackKind) -> bool {
        match kind {
            TrackKind::Video => self.has_video,
            TrackKind::Audio => self.has_audio,
        }
    }

    /// Track kinds present, video first.
    pub fn track_kinds(&self) -> SmallVec<[TrackKind; 2]> {
        [TrackKind::Video, TrackKind::Audio]
            .into_iter()
            .filter(|kind| self.has_track(*kind))
            .collect()
    }

    /// `[0, total_duration)`.
    pub fn full_range(&self) -> TimeRange {
        // total_duration is checked non-negative at construction.
        TimeRange::new(TimeValue::ZERO, self.total_duration).unwrap_or(TimeRange::EMPTY)
    }
}
