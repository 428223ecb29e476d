//! Time representation for segment-accurate editing
//!
//! Uses rational numbers so that split points and concatenated offsets
//! never drift. A time value is a count of ticks over a timescale, reduced
//! to seconds as an exact fraction.

use num_rational::{Ratio, Rational64};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

use crate::error::{Result, SpliceError};

/// Ticks per second used when no other timescale is configured.
pub const DEFAULT_TIMESCALE: i64 = 600;

/// A point in (or a length of) media time, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Rational64", into = "Rational64")]
pub struct TimeValue {
    value: Rational64,
}

impl TryFrom<Rational64> for TimeValue {
    type Error = SpliceError;

    // Re-reduce so deserialized values compare and hash like constructed ones.
    // `i64::MIN` cannot be negated while normalizing the sign.
    fn try_from(value: Rational64) -> Result<Self> {
        let (numer, denom) = (*value.numer(), *value.denom());
        if numer == i64::MIN || denom == i64::MIN {
            return Err(SpliceError::InvalidRange(format!(
                "time {numer}/{denom} is not representable"
            )));
        }
        Ok(Self {
            value: Rational64::new(numer, denom),
        })
    }
}

impl From<TimeValue> for Rational64 {
    fn from(time: TimeValue) -> Self {
        time.value
    }
}

impl TimeValue {
    /// Zero time constant.
    pub const ZERO: Self = Self {
        value: Rational64::new_raw(0, 1),
    };

    /// Create a time of `ticks / timescale` seconds.
    ///
    /// Panics if `timescale` is zero.
    #[inline]
    pub fn from_ticks(ticks: i64, timescale: i64) -> Self {
        Self {
            value: Rational64::new(ticks, timescale),
        }
    }

    /// Whole seconds.
    #[inline]
    pub fn from_secs(seconds: i64) -> Self {
        Self {
            value: Rational64::from_integer(seconds),
        }
    }

    /// Create a time from float seconds, rounded to the nearest tick of `timescale`.
    pub fn from_seconds_f64(seconds: f64, timescale: i64) -> Self {
        let ticks = (seconds * timescale as f64).round() as i64;
        Self::from_ticks(ticks, timescale)
    }

    /// Convert to seconds as f64.
    #[inline]
    pub fn to_seconds_f64(self) -> f64 {
        *self.value.numer() as f64 / *self.value.denom() as f64
    }

    /// Whole ticks at `timescale`, rounded toward negative infinity.
    pub fn to_ticks(self, timescale: i64) -> i64 {
        (self.value * Rational64::from_integer(timescale))
            .floor()
            .to_integer()
    }

    /// Exact sum, or `None` if it does not fit in 64-bit ticks.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let widen = |r: Rational64| Ratio::<i128>::new_raw(*r.numer() as i128, *r.denom() as i128);
        let sum = widen(self.value) + widen(rhs.value);
        let numer = i64::try_from(*sum.numer()).ok()?;
        let denom = i64::try_from(*sum.denom()).ok()?;
        Some(Self {
            value: Rational64::new_raw(numer, denom),
        })
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        *self.value.numer() == 0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        *self.value.numer() < 0
    }
}

impl Default for TimeValue {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for TimeValue {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
        }
    }
}

impl Sub for TimeValue {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value - rhs.value,
        }
    }
}

impl Sum for TimeValue {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, t| acc + t)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_seconds_f64())
    }
}

/// A half-open interval `[start, start + duration)`.
///
/// Both `start` and `duration` are non-negative; the constructors enforce it
/// and deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    start: TimeValue,
    duration: TimeValue,
}

#[derive(Deserialize)]
struct RawTimeRange {
    start: TimeValue,
    duration: TimeValue,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = SpliceError;

    fn try_from(raw: RawTimeRange) -> Result<Self> {
        Self::new(raw.start, raw.duration)
    }
}

impl TimeRange {
    /// Empty range starting at zero.
    pub const EMPTY: Self = Self {
        start: TimeValue::ZERO,
        duration: TimeValue::ZERO,
    };

    /// Create a new time range from start and duration.
    pub fn new(start: TimeValue, duration: TimeValue) -> Result<Self> {
        if start.is_negative() {
            return Err(SpliceError::InvalidRange(format!(
                "start {start} is negative"
            )));
        }
        if duration.is_negative() {
            return Err(SpliceError::InvalidRange(format!(
                "duration {duration} is negative"
            )));
        }
        if start.checked_add(duration).is_none() {
            return Err(SpliceError::InvalidRange(format!(
                "range of {duration} starting at {start} ends past the representable time"
            )));
        }
        Ok(Self { start, duration })
    }

    /// Create a time range from start and end times.
    pub fn from_start_end(start: TimeValue, end: TimeValue) -> Result<Self> {
        Self::new(start, end - start)
    }

    #[inline]
    pub fn start(self) -> TimeValue {
        self.start
    }

    #[inline]
    pub fn duration(self) -> TimeValue {
        self.duration
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> TimeValue {
        self.start + self.duration
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.duration.is_zero()
    }

    /// Check if a time is within this range.
    #[inline]
    pub fn contains(self, time: TimeValue) -> bool {
        time >= self.start && time < self.end()
    }

    /// Check if two ranges overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// Compute the intersection of two ranges, if any.
    pub fn intersect(self, other: Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        let start = self.start.max(other.start);
        let end = self.end().min(other.end());
        Some(Self {
            start,
            duration: end - start,
        })
    }

    /// True when one range ends exactly where the other starts.
    pub fn is_contiguous_with(self, other: Self) -> bool {
        self.end() == other.start || other.end() == self.start
    }

    /// The part of this range left after cutting away everything before `at`.
    ///
    /// `at` may sit on either boundary; cutting at `end()` leaves an empty
    /// range there.
    pub fn subtract_prefix(self, at: TimeValue) -> Result<Self> {
        self.check_bounds(at)?;
        Ok(Self {
            start: at,
            duration: self.end() - at,
        })
    }

    /// Split into `[start, at)` and `[at, end)`.
    pub fn split(self, at: TimeValue) -> Result<(Self, Self)> {
        let rest = self.subtract_prefix(at)?;
        let head = Self {
            start: self.start,
            duration: at - self.start,
        };
        Ok((head, rest))
    }

    fn check_bounds(self, at: TimeValue) -> Result<()> {
        if at < self.start || at > self.end() {
            return Err(SpliceError::OutOfBounds {
                time: at,
                min: self.start,
                max: self.end(),
            });
        }
        Ok(())
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}
