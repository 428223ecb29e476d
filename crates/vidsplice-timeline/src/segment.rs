//! Segment types for the timeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use vidsplice_core::{Result, TimeRange, TimeValue};

/// Stable handle for a segment; survives reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(Uuid);

impl SegmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SegmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cut of the session's source asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Unique segment ID
    pub id: SegmentId,
    /// Range of the source asset this segment plays
    pub source_range: TimeRange,
}

impl Segment {
    /// Create a segment with a fresh ID.
    pub fn new(source_range: TimeRange) -> Self {
        Self {
            id: SegmentId::new(),
            source_range,
        }
    }

    /// Length of the segment.
    pub fn duration(&self) -> TimeValue {
        self.source_range.duration()
    }

    /// Source in point.
    pub fn source_in(&self) -> TimeValue {
        self.source_range.start()
    }

    /// Source out point (exclusive).
    pub fn source_out(&self) -> TimeValue {
        self.source_range.end()
    }

    /// Cut this segment at source time `at`.
    ///
    /// The left half keeps this segment's ID; the right half gets a new one.
    /// Cutting on either boundary leaves a zero-duration half.
    pub fn split(&self, at: TimeValue) -> Result<(Segment, Segment)> {
        let (head, tail) = self.source_range.split(at)?;
        Ok((
            Segment {
                id: self.id,
                source_range: head,
            },
            Segment::new(tail),
        ))
    }
}
