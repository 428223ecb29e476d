//! The ordered segment sequence cut from one source asset.

use std::sync::Arc;
use tracing::debug;
use vidsplice_core::{MediaAsset, Result, SpliceError, TimeRange, TimeValue};

use crate::segment::Segment;

/// An ordered, never-empty sequence of segments over a single asset.
///
/// Right after a split the segments are contiguous and cover
/// `[0, asset.total_duration())` exactly. Reordering permutes them without
/// touching their source ranges, so afterwards the sequence describes
/// "play these cuts in this order" and is generally no longer contiguous.
#[derive(Debug, Clone)]
pub struct Timeline {
    asset: Arc<MediaAsset>,
    segments: Vec<Segment>,
}

impl Timeline {
    /// A timeline holding one segment that spans the whole asset.
    pub fn new(asset: Arc<MediaAsset>) -> Self {
        let segments = vec![Segment::new(asset.full_range())];
        Self { asset, segments }
    }

    /// Rebuild a timeline from existing segments (e.g. a saved session).
    pub fn from_segments(asset: Arc<MediaAsset>, segments: Vec<Segment>) -> Result<Self> {
        check_segments(&asset, &segments)?;
        Ok(Self { asset, segments })
    }

    pub fn asset(&self) -> &Arc<MediaAsset> {
        &self.asset
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Get the segment at position `index`.
    pub fn segment_at(&self, index: usize) -> Result<&Segment> {
        self.segments
            .get(index)
            .ok_or_else(|| SpliceError::index(index, self.segments.len()))
    }

    /// Sum of all segment durations.
    pub fn duration(&self) -> TimeValue {
        self.segments.iter().map(Segment::duration).sum()
    }

    /// True when the segments, in their current order, tile the asset from
    /// zero to its end with no gaps or repeats.
    pub fn is_contiguous(&self) -> bool {
        let starts_at_zero = self
            .segments
            .first()
            .is_some_and(|s| s.source_in() == TimeValue::ZERO);
        let ends_at_end = self
            .segments
            .last()
            .is_some_and(|s| s.source_out() == self.asset.total_duration());
        starts_at_zero
            && ends_at_end
            && self
                .segments
                .windows(2)
                .all(|pair| pair[0].source_out() == pair[1].source_in())
    }

    /// Compute the segments a split at `times` would produce, without
    /// touching the timeline.
    ///
    /// Points are sorted and de-duplicated first. Every point must lie in
    /// `[0, total_duration]`; a point on a boundary yields a zero-duration
    /// segment there.
    pub fn plan_split(&self, times: &[TimeValue]) -> Result<Vec<Segment>> {
        let total = self.asset.total_duration();
        if let Some(&bad) = times.iter().find(|t| t.is_negative() || **t > total) {
            return Err(SpliceError::OutOfBounds {
                time: bad,
                min: TimeValue::ZERO,
                max: total,
            });
        }

        let mut points = times.to_vec();
        points.sort();
        points.dedup();

        let mut segments = Vec::with_capacity(points.len() + 1);
        let mut last = TimeValue::ZERO;
        for point in points {
            segments.push(Segment::new(TimeRange::from_start_end(last, point)?));
            last = point;
        }
        segments.push(Segment::new(TimeRange::from_start_end(last, total)?));
        Ok(segments)
    }

    /// Re-slice the whole asset at `times`, replacing the current sequence.
    ///
    /// All-or-nothing: on error the timeline is unchanged.
    pub fn split_at(&mut self, times: &[TimeValue]) -> Result<()> {
        let segments = self.plan_split(times)?;
        debug!(points = times.len(), segments = segments.len(), "Split timeline");
        self.segments = segments;
        Ok(())
    }

    /// Compute the sequence that results from cutting the segment at `index`
    /// at source time `at`.
    pub fn plan_split_segment(&self, index: usize, at: TimeValue) -> Result<Vec<Segment>> {
        let (left, right) = self.segment_at(index)?.split(at)?;
        let mut segments = self.segments.clone();
        segments[index] = left;
        segments.insert(index + 1, right);
        Ok(segments)
    }

    /// Cut one segment in two, in place.
    pub fn split_segment(&mut self, index: usize, at: TimeValue) -> Result<()> {
        self.segments = self.plan_split_segment(index, at)?;
        debug!(index, %at, "Split segment");
        Ok(())
    }

    /// Move the segment at `from` so it ends up at position `to`.
    ///
    /// Pure permutation; source ranges travel with their segments.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;
        let segment = self.segments.remove(from);
        self.segments.insert(to, segment);
        debug!(from, to, "Reordered segment");
        Ok(())
    }

    /// Exchange the segments at `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_index(a)?;
        self.check_index(b)?;
        self.segments.swap(a, b);
        debug!(a, b, "Swapped segments");
        Ok(())
    }

    /// Replace the whole sequence, returning the previous one.
    pub fn replace_segments(&mut self, segments: Vec<Segment>) -> Result<Vec<Segment>> {
        check_segments(&self.asset, &segments)?;
        Ok(std::mem::replace(&mut self.segments, segments))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.segments.len() {
            return Err(SpliceError::index(index, self.segments.len()));
        }
        Ok(())
    }
}

fn check_segments(asset: &MediaAsset, segments: &[Segment]) -> Result<()> {
    if segments.is_empty() {
        return Err(SpliceError::EmptyTimeline);
    }
    let total = asset.total_duration();
    if let Some(outside) = segments.iter().find(|s| s.source_out() > total) {
        return Err(SpliceError::OutOfBounds {
            time: outside.source_out(),
            min: TimeValue::ZERO,
            max: total,
        });
    }
    // Merge offsets accumulate segment durations.
    segments
        .iter()
        .try_fold(TimeValue::ZERO, |sum, s| sum.checked_add(s.duration()))
        .ok_or_else(|| {
            SpliceError::InvalidRange("combined segment duration is not representable".into())
        })?;
    Ok(())
}
