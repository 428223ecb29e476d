//! Error types for VidSplice.

use thiserror::Error;

use crate::time::TimeValue;

/// Main error type for editing operations.
#[derive(Error, Debug)]
pub enum SpliceError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Time {time} is outside [{min}, {max}]")]
    OutOfBounds {
        time: TimeValue,
        min: TimeValue,
        max: TimeValue,
    },

    #[error("Timeline has no segments")]
    EmptyTimeline,

    #[error("Index {index} is out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Asset '{asset}' has no {track} track")]
    MissingTrack { asset: String, track: &'static str },

    #[error("No asset loaded in this session")]
    NotLoaded,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpliceError {
    /// Shorthand for an index check failure.
    pub fn index(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }
}

/// Result type alias for editing operations.
pub type Result<T> = std::result::Result<T, SpliceError>;
