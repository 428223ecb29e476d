//! VidSplice Core - Foundation types for segment editing
//!
//! This crate provides the fundamental types used throughout VidSplice:
//! - Time representation (TimeValue, TimeRange)
//! - Source asset handles and track kinds
//! - Filter descriptors
//! - The shared error type

pub mod asset;
pub mod error;
pub mod filter;
pub mod time;

pub use asset::{MediaAsset, TrackKind};
pub use error::{Result, SpliceError};
pub use filter::{Filter, FilterCatalog};
pub use time::{TimeRange, TimeValue, DEFAULT_TIMESCALE};
