//! Timeline edits with undo/redo support.
//!
//! Uses the Command pattern: every mutation is an `EditCommand` that knows
//! how to apply itself and produce its inverse for undo.

use vidsplice_core::Result;

use crate::segment::Segment;
use crate::timeline::Timeline;

// ── Edit commands ───────────────────────────────────────────────

/// A reversible edit on a timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Swap in a whole new segment sequence (result of a split).
    ReplaceSegments {
        segments: Vec<Segment>,
        /// Stored for undo. Populated when the command is executed.
        replaced: Option<Vec<Segment>>,
    },
    /// Move the segment at `from` to position `to`.
    Reorder { from: usize, to: usize },
    /// Exchange two segments.
    Swap { a: usize, b: usize },
}

impl EditCommand {
    /// Apply this command to a timeline.
    ///
    /// Mutable `&mut self` because `ReplaceSegments` records the sequence it
    /// replaced. On error the timeline is left as it was.
    pub fn apply(&mut self, timeline: &mut Timeline) -> Result<()> {
        match self {
            Self::ReplaceSegments { segments, replaced } => {
                let previous = timeline.replace_segments(segments.clone())?;
                *replaced = Some(previous);
            }
            Self::Reorder { from, to } => timeline.reorder(*from, *to)?,
            Self::Swap { a, b } => timeline.swap(*a, *b)?,
        }
        Ok(())
    }

    /// Produce the inverse command (for undo).
    ///
    /// `None` for a `ReplaceSegments` that has not been applied yet.
    pub fn inverse(&self) -> Option<Self> {
        match self {
            Self::ReplaceSegments { segments, replaced } => {
                replaced.as_ref().map(|previous| Self::ReplaceSegments {
                    segments: previous.clone(),
                    replaced: Some(segments.clone()),
                })
            }
            Self::Reorder { from, to } => Some(Self::Reorder {
                from: *to,
                to: *from,
            }),
            Self::Swap { a, b } => Some(Self::Swap { a: *a, b: *b }),
        }
    }

    /// True for edits that only permute the sequence.
    pub fn is_permutation(&self) -> bool {
        matches!(self, Self::Reorder { .. } | Self::Swap { .. })
    }
}

// ── Undo stack ──────────────────────────────────────────────────

/// Undo/redo history stack.
#[derive(Debug)]
pub struct UndoStack {
    /// Commands that have been executed (most recent last).
    undo: Vec<EditCommand>,
    /// Commands that have been undone (most recent last).
    redo: Vec<EditCommand>,
    /// Maximum history depth.
    max_depth: usize,
}

impl UndoStack {
    /// Create a new undo stack with the given maximum depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth,
        }
    }

    /// Push a command onto the undo stack after it has been executed.
    /// Clears the redo stack (new action invalidates redo history).
    pub fn push(&mut self, command: EditCommand) {
        self.redo.clear();
        self.undo.push(command);
        if self.undo.len() > self.max_depth {
            self.undo.remove(0);
        }
    }

    /// Pop the most recent command for undo. Returns the inverse command.
    pub fn undo(&mut self) -> Option<EditCommand> {
        let cmd = self.undo.pop()?;
        let inverse = cmd.inverse()?;
        self.redo.push(cmd);
        Some(inverse)
    }

    /// Pop the most recent undone command for redo. Returns the original command.
    pub fn redo(&mut self) -> Option<EditCommand> {
        let cmd = self.redo.pop()?;
        self.undo.push(cmd.clone());
        Some(cmd)
    }

    /// Put back a command whose inverse failed to apply.
    pub(crate) fn restore_undone(&mut self) {
        if let Some(cmd) = self.redo.pop() {
            self.undo.push(cmd);
        }
    }

    /// Put back a command whose redo failed to apply.
    pub(crate) fn restore_redone(&mut self) {
        if let Some(cmd) = self.undo.pop() {
            self.redo.push(cmd);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Clear all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub(crate) fn undo_count(&self) -> usize {
        self.undo.len()
    }

    pub(crate) fn redo_count(&self) -> usize {
        self.redo.len()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(200)
    }
}

// ── Tests ───────────────────────────────────────────────────────
