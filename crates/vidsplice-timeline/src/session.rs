//! One editing session: a bound asset, its timeline, the active filter and
//! the most recent composition.
//!
//! Sessions are constructed explicitly and owned by their caller; there is
//! no shared global state. Mutation takes `&mut self`, so the borrow checker
//! already keeps a build from interleaving with an edit on the same session.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use vidsplice_core::{Filter, MediaAsset, Result, SpliceError, TimeRange, TimeValue};

use crate::composition::{Composition, CompositionBuilder, CompositionKind, EditSource};
use crate::config::SessionConfig;
use crate::edit::{EditCommand, UndoStack};
use crate::events::{EventBus, SessionEvent};
use crate::segment::Segment;
use crate::serialization::SessionFile;
use crate::timeline::Timeline;

/// Where a session is in its edit cycle.
///
/// `Merged` and `Trimmed` are not terminal: any further edit moves the
/// session back to `Split` or `Reordered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Empty,
    Loaded,
    Split,
    Reordered,
    Merged,
    Trimmed,
}

/// An editing session over a single source asset.
#[derive(Debug)]
pub struct EditingSession {
    config: SessionConfig,
    state: SessionState,
    timeline: Option<Timeline>,
    active_filter: Option<Filter>,
    current: Option<Composition>,
    history: UndoStack,
    events: EventBus,
}

impl EditingSession {
    /// Create an empty session. Fails if `config` does not validate.
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: SessionState::Empty,
            timeline: None,
            active_filter: None,
            current: None,
            history: UndoStack::new(config.history_depth),
            events: EventBus::new(config.event_channel_capacity),
            config,
        })
    }

    /// Restore a session from a snapshot. The result is in `Split` state.
    pub fn restore(config: SessionConfig, file: SessionFile) -> Result<Self> {
        let mut session = Self::new(config)?;
        let (timeline, filter) = file.into_timeline()?;
        info!(
            asset = timeline.asset().name(),
            segments = timeline.segment_count(),
            "Restored session"
        );
        session.timeline = Some(timeline);
        session.active_filter = filter;
        session.state = SessionState::Split;
        Ok(session)
    }

    /// Snapshot the timeline and filter for persistence.
    pub fn snapshot(&self) -> Result<SessionFile> {
        Ok(SessionFile::new(self.timeline()?, self.active_filter.clone()))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Mutable access to the event bus, for subscribing.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Convert float seconds using the session's timescale.
    pub fn time_from_seconds(&self, seconds: f64) -> TimeValue {
        self.config.seconds(seconds)
    }

    // ── Asset binding ───────────────────────────────────────────

    /// Bind `asset` and start a fresh timeline of one full-length segment.
    ///
    /// Replaces any previous asset, clearing history and the current
    /// composition. The active filter is kept.
    pub fn load(&mut self, asset: Arc<MediaAsset>) {
        info!(
            asset = asset.name(),
            duration = %asset.total_duration(),
            video = asset.has_video_track(),
            audio = asset.has_audio_track(),
            "Loaded asset"
        );
        let event = SessionEvent::AssetLoaded {
            asset: asset.name().to_string(),
            duration: asset.total_duration(),
            has_video: asset.has_video_track(),
            has_audio: asset.has_audio_track(),
        };
        self.timeline = Some(Timeline::new(asset));
        self.current = None;
        self.history.clear();
        self.state = SessionState::Loaded;
        self.events.emit(event);
        self.emit_timeline_changed();
    }

    pub fn asset(&self) -> Option<&Arc<MediaAsset>> {
        self.timeline.as_ref().map(Timeline::asset)
    }

    pub fn timeline(&self) -> Result<&Timeline> {
        self.timeline.as_ref().ok_or(SpliceError::NotLoaded)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Number of segments; zero before an asset is loaded.
    pub fn segment_count(&self) -> usize {
        self.timeline.as_ref().map_or(0, Timeline::segment_count)
    }

    pub fn segment_at(&self, index: usize) -> Result<&Segment> {
        self.timeline()?.segment_at(index)
    }

    /// The composition produced by the last merge or trim.
    pub fn current_composition(&self) -> Option<&Composition> {
        self.current.as_ref()
    }

    pub fn active_filter(&self) -> Option<&Filter> {
        self.active_filter.as_ref()
    }

    // ── Timeline edits ──────────────────────────────────────────

    /// Re-slice the asset at `times` (sorted and de-duplicated internally).
    pub fn split_at(&mut self, times: &[TimeValue]) -> Result<()> {
        let segments = self.timeline()?.plan_split(times)?;
        self.execute(EditCommand::ReplaceSegments {
            segments,
            replaced: None,
        })
    }

    /// Cut the segment at `index` at source time `at`.
    pub fn split_segment(&mut self, index: usize, at: TimeValue) -> Result<()> {
        let segments = self.timeline()?.plan_split_segment(index, at)?;
        self.execute(EditCommand::ReplaceSegments {
            segments,
            replaced: None,
        })
    }

    /// Move the segment at `from` to position `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        self.execute(EditCommand::Reorder { from, to })
    }

    /// Exchange the segments at `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        self.execute(EditCommand::Swap { a, b })
    }

    /// Revert the most recent edit. Returns `false` if there was none.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(mut inverse) = self.history.undo() else {
            return Ok(false);
        };
        let timeline = self.timeline.as_mut().ok_or(SpliceError::NotLoaded)?;
        if let Err(e) = inverse.apply(timeline) {
            self.history.restore_undone();
            return Err(e);
        }
        debug!(
            command = ?inverse,
            undo = self.history.undo_count(),
            redo = self.history.redo_count(),
            "Undo"
        );
        self.after_edit(&inverse);
        Ok(true)
    }

    /// Re-apply the most recently undone edit. Returns `false` if there was none.
    pub fn redo(&mut self) -> Result<bool> {
        let Some(mut command) = self.history.redo() else {
            return Ok(false);
        };
        let timeline = self.timeline.as_mut().ok_or(SpliceError::NotLoaded)?;
        if let Err(e) = command.apply(timeline) {
            self.history.restore_redone();
            return Err(e);
        }
        debug!(
            command = ?command,
            undo = self.history.undo_count(),
            redo = self.history.redo_count(),
            "Redo"
        );
        self.after_edit(&command);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ── Filters and compositions ────────────────────────────────

    /// Set the single active filter; `None` means passthrough.
    ///
    /// Applies to the next merge or trim; compositions already handed out
    /// keep the filter they were built with.
    pub fn attach_filter(&mut self, filter: Option<Filter>) {
        debug!(filter = ?filter.as_ref().map(Filter::id), "Attach filter");
        let event = SessionEvent::FilterChanged {
            filter: filter.as_ref().map(|f| f.id().to_string()),
        };
        self.active_filter = filter;
        self.events.emit(event);
    }

    /// Builder for the bound asset with the active filter.
    pub fn builder(&self) -> Result<CompositionBuilder> {
        let asset = Arc::clone(self.timeline()?.asset());
        Ok(CompositionBuilder::new(asset).with_filter(self.active_filter.clone()))
    }

    /// Build a composition without recording it. Pure read of session state.
    pub fn build(&self, source: EditSource<'_>) -> Result<Composition> {
        self.builder()?.build(source)
    }

    /// Concatenate all segments in their current order.
    pub fn merge_all(&mut self) -> Result<Composition> {
        let composition = {
            let timeline = self.timeline()?;
            self.build(EditSource::Segments(timeline.segments()))
        };
        self.record(composition)
    }

    /// Cut `range` out of the original asset, ignoring the timeline.
    pub fn trim(&mut self, range: TimeRange) -> Result<Composition> {
        let composition = self.build(EditSource::Trim(range));
        self.record(composition)
    }

    // ── Internals ───────────────────────────────────────────────

    fn execute(&mut self, mut command: EditCommand) -> Result<()> {
        let timeline = self.timeline.as_mut().ok_or(SpliceError::NotLoaded)?;
        command.apply(timeline)?;
        debug!(command = ?command, "Applied edit");
        self.after_edit(&command);
        self.history.push(command);
        Ok(())
    }

    fn after_edit(&mut self, command: &EditCommand) {
        self.state = if command.is_permutation() {
            SessionState::Reordered
        } else {
            SessionState::Split
        };
        self.emit_timeline_changed();
    }

    fn record(&mut self, composition: Result<Composition>) -> Result<Composition> {
        let composition = match composition {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Composition build rejected");
                return Err(e);
            }
        };
        let kind = composition.kind();
        info!(
            ?kind,
            insertions = composition.insertions().len(),
            duration = %composition.duration(),
            filter = ?composition.active_filter().map(Filter::id),
            "Built composition"
        );
        self.events.emit(SessionEvent::CompositionBuilt {
            kind,
            insertions: composition.insertions().len(),
            duration: composition.duration(),
        });
        self.current = Some(composition.clone());
        self.state = kind.settled_state();
        Ok(composition)
    }

    fn emit_timeline_changed(&mut self) {
        let segment_count = self.segment_count();
        self.events
            .emit(SessionEvent::TimelineChanged { segment_count });
    }
}

impl CompositionKind {
    fn settled_state(self) -> SessionState {
        match self {
            Self::Merged => SessionState::Merged,
            Self::Trimmed => SessionState::Trimmed,
        }
    }
}
