//! VidSplice Timeline - segment editing on a single source asset
//!
//! Implements the editing model:
//! - Timelines of segments cut from one asset (split, reorder, swap)
//! - Edit commands with undo/redo
//! - Compositions built by merging segments or trimming the asset
//! - Editing sessions that tie it together and emit change events

pub mod composition;
pub mod config;
pub mod edit;
pub mod events;
pub mod segment;
pub mod serialization;
pub mod session;
pub mod timeline;

pub use composition::{Composition, CompositionBuilder, CompositionKind, EditSource, TrackInsertion};
pub use config::SessionConfig;
pub use edit::{EditCommand, UndoStack};
pub use events::{EventBus, SessionEvent};
pub use segment::{Segment, SegmentId};
pub use serialization::SessionFile;
pub use session::{EditingSession, SessionState};
pub use timeline::Timeline;
