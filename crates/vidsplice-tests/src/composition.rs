//! Integration tests for splitting, reordering and merging.
//!
//! Exercises vidsplice-core time and asset types through the
//! vidsplice-timeline model and composition builder.

use proptest::prelude::*;
use std::sync::Arc;
use vidsplice_core::{MediaAsset, SpliceError, TimeRange, TimeValue, TrackKind};
use vidsplice_timeline::{CompositionBuilder, Timeline};

// ── Helpers ────────────────────────────────────────────────────

fn secs(s: i64) -> TimeValue {
    TimeValue::from_secs(s)
}

fn asset(duration: i64, audio: bool) -> Arc<MediaAsset> {
    Arc::new(MediaAsset::new("source.mov", secs(duration), true, audio).unwrap())
}

fn ranges(tl: &Timeline) -> Vec<TimeRange> {
    tl.segments().iter().map(|s| s.source_range).collect()
}

fn range(start: i64, end: i64) -> TimeRange {
    TimeRange::from_start_end(secs(start), secs(end)).unwrap()
}

// ── Worked scenario ────────────────────────────────────────────

#[test]
fn split_reorder_merge_scenario() {
    let asset = asset(100, false);
    let mut tl = Timeline::new(Arc::clone(&asset));

    tl.split_at(&[secs(30), secs(70)]).unwrap();
    assert_eq!(ranges(&tl), vec![range(0, 30), range(30, 70), range(70, 100)]);

    tl.reorder(0, 2).unwrap();
    assert_eq!(ranges(&tl), vec![range(30, 70), range(70, 100), range(0, 30)]);

    let comp = CompositionBuilder::new(asset).merge_all(tl.segments()).unwrap();
    let placed: Vec<(TimeValue, TimeValue)> = comp
        .video_insertions()
        .map(|i| (i.destination_offset, i.source_range.duration()))
        .collect();
    assert_eq!(
        placed,
        vec![
            (secs(0), secs(40)),
            (secs(40), secs(30)),
            (secs(70), secs(30))
        ]
    );
}

#[test]
fn timeline_cannot_be_built_empty() {
    let err = Timeline::from_segments(asset(10, true), Vec::new()).unwrap_err();
    assert!(matches!(err, SpliceError::EmptyTimeline));
}

#[test]
fn merged_insertions_share_the_source_asset() {
    let asset = asset(60, true);
    let mut tl = Timeline::new(Arc::clone(&asset));
    tl.split_at(&[secs(20)]).unwrap();

    let comp = CompositionBuilder::new(Arc::clone(&asset))
        .merge_all(tl.segments())
        .unwrap();
    assert!(comp.insertions().iter().all(|i| Arc::ptr_eq(&i.source, &asset)));
    assert_eq!(comp.track_insertions(TrackKind::Audio).count(), 2);
}

#[test]
fn trim_ignores_timeline_state() {
    let asset = asset(100, true);
    let mut tl = Timeline::new(Arc::clone(&asset));
    tl.split_at(&[secs(10), secs(90)]).unwrap();
    tl.swap(0, 2).unwrap();

    let comp = CompositionBuilder::new(asset).trim(range(5, 95)).unwrap();
    let video: Vec<_> = comp.video_insertions().collect();
    assert_eq!(video.len(), 1);
    assert_eq!(video[0].source_range, range(5, 95));
    assert_eq!(comp.audio_insertions().count(), 1);
}

#[test]
fn trim_end_before_start_is_invalid() {
    let builder = CompositionBuilder::new(asset(100, true));
    let backwards = TimeRange::from_start_end(secs(50), secs(40));
    assert!(matches!(backwards, Err(SpliceError::InvalidRange(_))));
    assert!(matches!(
        builder.trim(range(50, 50)),
        Err(SpliceError::InvalidRange(_))
    ));
}

// ── Properties ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn merge_offsets_follow_any_order(
        duration in 1i64..5_000,
        raw_points in proptest::collection::vec(0i64..5_000, 0..12),
        moves in proptest::collection::vec((0usize..13, 0usize..13), 0..8),
    ) {
        let asset = asset(duration, true);
        let mut tl = Timeline::new(Arc::clone(&asset));
        let points: Vec<TimeValue> =
            raw_points.iter().map(|p| secs(p % (duration + 1))).collect();
        tl.split_at(&points).unwrap();

        let n = tl.segment_count();
        for (from, to) in moves {
            tl.reorder(from % n, to % n).unwrap();
        }

        let comp = CompositionBuilder::new(asset).merge_all(tl.segments()).unwrap();
        let video: Vec<_> = comp.video_insertions().collect();
        prop_assert_eq!(video.len(), n);

        let mut expected_offset = TimeValue::ZERO;
        for (insertion, segment) in video.iter().zip(tl.segments()) {
            prop_assert_eq!(insertion.destination_offset, expected_offset);
            prop_assert_eq!(insertion.source_range, segment.source_range);
            expected_offset = expected_offset + segment.duration();
        }
        prop_assert!(video.windows(2).all(|w| w[0].destination_offset <= w[1].destination_offset));
        prop_assert_eq!(comp.duration(), secs(duration));
    }

    #[test]
    fn split_out_of_range_never_mutates(
        duration in 1i64..1_000,
        good in 0i64..1_000,
        overshoot in 1i64..1_000,
    ) {
        let mut tl = Timeline::new(asset(duration, false));
        tl.split_at(&[secs(good % (duration + 1))]).unwrap();
        let before = tl.segments().to_vec();

        let result = tl.split_at(&[secs(duration + overshoot)]);
        let is_out_of_bounds = matches!(result, Err(SpliceError::OutOfBounds { .. }));
        prop_assert!(is_out_of_bounds);
        prop_assert_eq!(tl.segments(), before.as_slice());
    }
}
