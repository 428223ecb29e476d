//! Integration tests for editing sessions.

use std::sync::{Arc, Mutex};
use vidsplice_core::{Filter, FilterCatalog, MediaAsset, SpliceError, TimeRange, TimeValue};
use vidsplice_timeline::{
    CompositionKind, EditSource, EditingSession, SessionConfig, SessionEvent, SessionFile,
    SessionState,
};

fn secs(s: i64) -> TimeValue {
    TimeValue::from_secs(s)
}

fn session_with(duration: i64, video: bool, audio: bool) -> EditingSession {
    let mut session = EditingSession::new(SessionConfig::default()).unwrap();
    let asset = MediaAsset::new("beach.mov", secs(duration), video, audio).unwrap();
    session.load(Arc::new(asset));
    session
}

#[test]
fn passthrough_builds_are_value_equal() {
    let mut session = session_with(100, true, true);
    session.split_at(&[secs(25)]).unwrap();
    session.attach_filter(None);

    let segments = session.timeline().unwrap().segments().to_vec();
    let first = session.build(EditSource::Segments(&segments)).unwrap();
    let second = session.build(EditSource::Segments(&segments)).unwrap();
    assert_eq!(first, second);
    assert!(first.active_filter().is_none());
}

#[test]
fn merge_then_resplit_produces_new_composition() {
    let mut session = session_with(100, true, false);
    session.split_at(&[secs(30), secs(70)]).unwrap();
    session.reorder(0, 2).unwrap();
    let montage = session.merge_all().unwrap();

    session.split_at(&[secs(50)]).unwrap();
    let halves = session.merge_all().unwrap();

    assert_eq!(montage.video_insertions().count(), 3);
    assert_eq!(halves.video_insertions().count(), 2);
    assert_eq!(session.current_composition(), Some(&halves));
}

#[test]
fn merge_without_video_reports_missing_track() {
    let mut session = session_with(30, false, true);
    let err = session.merge_all().unwrap_err();
    assert!(matches!(err, SpliceError::MissingTrack { .. }));
    assert_eq!(session.state(), SessionState::Loaded);
    assert!(session.current_composition().is_none());
}

#[test]
fn trim_with_catalog_filter() {
    let mut session = session_with(100, true, true);
    let filter = FilterCatalog::builtin().find(Filter::GRAYSCALE).unwrap();
    session.attach_filter(Some(filter));

    let range = TimeRange::from_start_end(secs(10), secs(40)).unwrap();
    let comp = session.trim(range).unwrap();
    assert_eq!(comp.kind(), CompositionKind::Trimmed);
    assert_eq!(comp.duration(), secs(30));
    assert_eq!(comp.insertions().len(), 2);
    assert_eq!(comp.active_filter().map(Filter::id), Some("grayscale"));
}

#[test]
fn bad_reorder_leaves_session_untouched() {
    let mut session = session_with(100, true, true);
    session.split_at(&[secs(40)]).unwrap();
    let before = session.timeline().unwrap().segments().to_vec();

    let err = session.reorder(0, 5).unwrap_err();
    assert!(matches!(err, SpliceError::IndexOutOfBounds { index: 5, len: 2 }));
    assert_eq!(session.timeline().unwrap().segments(), before.as_slice());
    assert_eq!(session.state(), SessionState::Split);
}

#[test]
fn segment_queries() {
    let mut session = session_with(90, true, true);
    session.split_at(&[secs(30), secs(60)]).unwrap();
    assert_eq!(session.segment_count(), 3);
    assert_eq!(session.segment_at(1).unwrap().source_in(), secs(30));
    assert!(matches!(
        session.segment_at(3),
        Err(SpliceError::IndexOutOfBounds { .. })
    ));
}

#[test]
fn callback_subscribers_see_every_change() {
    let mut session = EditingSession::new(SessionConfig::default()).unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    session.events_mut().subscribe(move |event| {
        if let Ok(mut events) = sink.lock() {
            events.push(event.clone());
        }
    });

    session.load(Arc::new(
        MediaAsset::audio_visual("a.mov", secs(10)).unwrap(),
    ));
    session.split_at(&[secs(4)]).unwrap();
    session.undo().unwrap();

    let events = log.lock().unwrap();
    let counts: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::TimelineChanged { segment_count } => Some(*segment_count),
            _ => None,
        })
        .collect();
    assert_eq!(counts, vec![1, 2, 1]);
}

#[test]
fn session_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edit.json");

    let mut session = session_with(100, true, true);
    session.split_at(&[secs(30), secs(70)]).unwrap();
    session.reorder(2, 0).unwrap();
    session.attach_filter(Some(Filter::sepia()));
    session.snapshot().unwrap().save_to_file(&path).unwrap();
    let expected = session.merge_all().unwrap();

    let file = SessionFile::load_from_file(&path).unwrap();
    let mut restored = EditingSession::restore(SessionConfig::default(), file).unwrap();
    let merged = restored.merge_all().unwrap();

    assert_eq!(merged.insertions().len(), expected.insertions().len());
    for (a, b) in merged.insertions().iter().zip(expected.insertions()) {
        assert_eq!(a.source_range, b.source_range);
        assert_eq!(a.destination_offset, b.destination_offset);
        assert_eq!(a.track, b.track);
    }
    assert_eq!(merged.active_filter(), Some(&Filter::sepia()));
}

#[test]
fn config_file_sets_timescale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, br#"{"timescale": 30}"#).unwrap();

    let config = SessionConfig::load_from_file(&path).unwrap();
    let session = EditingSession::new(config).unwrap();
    assert_eq!(session.time_from_seconds(0.5), TimeValue::from_ticks(15, 30));
}
