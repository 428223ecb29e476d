//! Render-ready composition descriptions.
//!
//! A [`Composition`] is an immutable snapshot: ordered track insertions plus
//! the filter that was active when it was built. Playback and export read
//! it; nothing in this crate mutates one after construction.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use vidsplice_core::{Filter, MediaAsset, Result, SpliceError, TimeRange, TimeValue, TrackKind};

use crate::segment::Segment;

/// How a composition was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompositionKind {
    /// Concatenation of the timeline's segments in sequence order.
    Merged,
    /// A single in/out range of the source asset.
    Trimmed,
}

/// Place `source_range` of `source` on track `track` at `destination_offset`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackInsertion {
    pub source: Arc<MediaAsset>,
    pub source_range: TimeRange,
    pub destination_offset: TimeValue,
    pub track: TrackKind,
}

impl TrackInsertion {
    /// Output time at which this insertion ends.
    pub fn destination_end(&self) -> TimeValue {
        self.destination_offset + self.source_range.duration()
    }
}

/// Output of a merge or trim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    kind: CompositionKind,
    insertions: Vec<TrackInsertion>,
    active_filter: Option<Filter>,
}

impl Composition {
    pub fn kind(&self) -> CompositionKind {
        self.kind
    }

    /// All insertions, per segment video first then audio.
    pub fn insertions(&self) -> &[TrackInsertion] {
        &self.insertions
    }

    /// `None` means render the insertions unmodified.
    pub fn active_filter(&self) -> Option<&Filter> {
        self.active_filter.as_ref()
    }

    pub fn track_insertions(&self, track: TrackKind) -> impl Iterator<Item = &TrackInsertion> {
        self.insertions.iter().filter(move |i| i.track == track)
    }

    pub fn video_insertions(&self) -> impl Iterator<Item = &TrackInsertion> {
        self.track_insertions(TrackKind::Video)
    }

    pub fn audio_insertions(&self) -> impl Iterator<Item = &TrackInsertion> {
        self.track_insertions(TrackKind::Audio)
    }

    /// Output length: where the last insertion ends.
    pub fn duration(&self) -> TimeValue {
        self.insertions
            .iter()
            .map(TrackInsertion::destination_end)
            .max()
            .unwrap_or(TimeValue::ZERO)
    }
}

/// What to build a composition from.
#[derive(Debug, Clone, Copy)]
pub enum EditSource<'a> {
    /// The timeline's segments, in order.
    Segments(&'a [Segment]),
    /// A trim range of the original asset.
    Trim(TimeRange),
}

/// Builds compositions for one source asset.
#[derive(Debug, Clone)]
pub struct CompositionBuilder {
    asset: Arc<MediaAsset>,
    filter: Option<Filter>,
}

impl CompositionBuilder {
    pub fn new(asset: Arc<MediaAsset>) -> Self {
        Self {
            asset,
            filter: None,
        }
    }

    /// Set the filter carried into built compositions.
    pub fn with_filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    /// Build from either source. Pure: the same inputs give equal outputs.
    pub fn build(&self, source: EditSource<'_>) -> Result<Composition> {
        match source {
            EditSource::Segments(segments) => self.merge_all(segments),
            EditSource::Trim(range) => self.trim(range),
        }
    }

    /// Lay `segments` back to back in the order given.
    ///
    /// Segment N starts at the summed durations of segments `0..N`, whatever
    /// their source chronology. Audio is added per segment only when the
    /// asset has an audio track; video is mandatory.
    pub fn merge_all(&self, segments: &[Segment]) -> Result<Composition> {
        if segments.is_empty() {
            return Err(SpliceError::EmptyTimeline);
        }
        self.require_video()?;

        let tracks = self.asset.track_kinds();
        let mut insertions = Vec::with_capacity(segments.len() * tracks.len());
        let mut offset = TimeValue::ZERO;
        for segment in segments {
            for &track in &tracks {
                insertions.push(TrackInsertion {
                    source: Arc::clone(&self.asset),
                    source_range: segment.source_range,
                    destination_offset: offset,
                    track,
                });
            }
            offset = offset + segment.duration();
        }

        debug!(
            segments = segments.len(),
            insertions = insertions.len(),
            duration = %offset,
            "Merged segments"
        );
        Ok(self.finish(CompositionKind::Merged, insertions))
    }

    /// Extract `range` of the original asset as a single-cut composition.
    ///
    /// The range must be non-empty and end within the asset.
    pub fn trim(&self, range: TimeRange) -> Result<Composition> {
        if range.is_empty() {
            return Err(SpliceError::InvalidRange(format!(
                "trim end must be after start ({range})"
            )));
        }
        let total = self.asset.total_duration();
        if range.end() > total {
            return Err(SpliceError::InvalidRange(format!(
                "trim {range} ends past asset duration {total}"
            )));
        }
        self.require_video()?;

        let insertions = self
            .asset
            .track_kinds()
            .into_iter()
            .map(|track| TrackInsertion {
                source: Arc::clone(&self.asset),
                source_range: range,
                destination_offset: TimeValue::ZERO,
                track,
            })
            .collect();

        debug!(%range, "Trimmed asset");
        Ok(self.finish(CompositionKind::Trimmed, insertions))
    }

    fn require_video(&self) -> Result<()> {
        if !self.asset.has_video_track() {
            return Err(SpliceError::MissingTrack {
                asset: self.asset.name().to_string(),
                track: TrackKind::Video.as_str(),
            });
        }
        Ok(())
    }

    fn finish(&self, kind: CompositionKind, insertions: Vec<TrackInsertion>) -> Composition {
        Composition {
            kind,
            insertions,
            active_filter: self.filter.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Timeline;

    fn secs(s: i64) -> TimeValue {
        TimeValue::from_secs(s)
    }

    fn range(start: i64, end: i64) -> TimeRange {
        TimeRange::from_start_end(secs(start), secs(end)).unwrap()
    }

    fn asset(video: bool, audio: bool) -> Arc<MediaAsset> {
        Arc::new(MediaAsset::new("source.mov", secs(100), video, audio).unwrap())
    }

    fn offsets(composition: &Composition) -> Vec<i64> {
        composition
            .video_insertions()
            .map(|i| i.destination_offset.to_ticks(1))
            .collect()
    }

    #[test]
    fn test_merge_after_reorder_follows_sequence() {
        let asset = asset(true, false);
        let mut tl = Timeline::new(Arc::clone(&asset));
        tl.split_at(&[secs(30), secs(70)]).unwrap();
        tl.reorder(0, 2).unwrap();

        let comp = CompositionBuilder::new(asset).merge_all(tl.segments()).unwrap();
        assert_eq!(comp.kind(), CompositionKind::Merged);
        assert_eq!(offsets(&comp), vec![0, 40, 70]);
        let sources: Vec<TimeRange> = comp.video_insertions().map(|i| i.source_range).collect();
        assert_eq!(sources, vec![range(30, 70), range(70, 100), range(0, 30)]);
        assert_eq!(comp.duration(), secs(100));
        assert_eq!(comp.audio_insertions().count(), 0);
    }

    #[test]
    fn test_merge_adds_audio_per_segment() {
        let asset = asset(true, true);
        let mut tl = Timeline::new(Arc::clone(&asset));
        tl.split_at(&[secs(50)]).unwrap();

        let comp = CompositionBuilder::new(asset).merge_all(tl.segments()).unwrap();
        let tracks: Vec<TrackKind> = comp.insertions().iter().map(|i| i.track).collect();
        assert_eq!(
            tracks,
            vec![TrackKind::Video, TrackKind::Audio, TrackKind::Video, TrackKind::Audio]
        );
        let audio: Vec<i64> = comp
            .audio_insertions()
            .map(|i| i.destination_offset.to_ticks(1))
            .collect();
        assert_eq!(audio, vec![0, 50]);
    }

    #[test]
    fn test_merge_keeps_zero_length_segments() {
        let asset = asset(true, false);
        let mut tl = Timeline::new(Arc::clone(&asset));
        tl.split_at(&[secs(0), secs(40)]).unwrap();

        let comp = CompositionBuilder::new(asset).merge_all(tl.segments()).unwrap();
        assert_eq!(comp.video_insertions().count(), 3);
        assert_eq!(offsets(&comp), vec![0, 0, 40]);
    }

    #[test]
    fn test_merge_empty_fails() {
        let err = CompositionBuilder::new(asset(true, true)).merge_all(&[]).unwrap_err();
        assert!(matches!(err, SpliceError::EmptyTimeline));
    }

    #[test]
    fn test_merge_without_video_fails() {
        let asset = asset(false, true);
        let tl = Timeline::new(Arc::clone(&asset));
        let err = CompositionBuilder::new(asset).merge_all(tl.segments()).unwrap_err();
        assert!(matches!(err, SpliceError::MissingTrack { track: "video", .. }));
    }

    #[test]
    fn test_trim_single_cut() {
        let comp = CompositionBuilder::new(asset(true, true))
            .trim(range(20, 45))
            .unwrap();
        assert_eq!(comp.kind(), CompositionKind::Trimmed);
        assert_eq!(comp.insertions().len(), 2);
        assert_eq!(comp.video_insertions().count(), 1);
        assert_eq!(comp.duration(), secs(25));
        assert!(comp
            .insertions()
            .iter()
            .all(|i| i.destination_offset == TimeValue::ZERO));
    }

    #[test]
    fn test_trim_without_audio_has_one_insertion() {
        let comp = CompositionBuilder::new(asset(true, false))
            .trim(range(0, 100))
            .unwrap();
        assert_eq!(comp.insertions().len(), 1);
    }

    #[test]
    fn test_trim_rejects_bad_ranges() {
        let builder = CompositionBuilder::new(asset(true, true));
        assert!(matches!(
            builder.trim(range(30, 30)),
            Err(SpliceError::InvalidRange(_))
        ));
        assert!(matches!(
            builder.trim(range(90, 101)),
            Err(SpliceError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_filter_is_carried() {
        let builder = CompositionBuilder::new(asset(true, true)).with_filter(Some(Filter::sepia()));
        let comp = builder.build(EditSource::Trim(range(0, 10))).unwrap();
        assert_eq!(comp.active_filter().map(Filter::id), Some(Filter::SEPIA));

        let plain = builder.with_filter(None).build(EditSource::Trim(range(0, 10))).unwrap();
        assert!(plain.active_filter().is_none());
    }

    #[test]
    fn test_build_is_repeatable() {
        let asset = asset(true, true);
        let tl = Timeline::new(Arc::clone(&asset));
        let builder = CompositionBuilder::new(asset);
        let a = builder.build(EditSource::Segments(tl.segments())).unwrap();
        let b = builder.build(EditSource::Segments(tl.segments())).unwrap();
        assert_eq!(a, b);
    }
}
