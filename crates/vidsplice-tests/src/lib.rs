//! Integration test crate for VidSplice.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the vidsplice crates to verify they work together.

#[cfg(test)]
mod composition;

#[cfg(test)]
mod session;
