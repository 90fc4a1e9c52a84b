//! Timestamps as 64-bit signed epoch seconds with infinity sentinels.
//!
//! The minimum and maximum `i64` values are reserved to mean `-inf` and
//! `+inf`; they compare like any other value but must never take part in
//! arithmetic (equality tests aside). Dates are ISO-8601 in UTC, with the
//! date-only shorthand meaning midnight.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error produced when a date token cannot be parsed.
#[derive(Error, Debug)]
#[error("invalid date: {0:?}")]
pub struct DateError(String);

/// A point in time, or one of the two infinity sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Sentinel for an unbounded past endpoint.
    pub const NEG_INF: Self = Timestamp(i64::MIN);

    /// Sentinel for an unbounded future endpoint; marks an open interval.
    pub const POS_INF: Self = Timestamp(i64::MAX);

    /// Creates a timestamp from epoch seconds.
    pub const fn from_secs(secs: i64) -> Self {
        Timestamp(secs)
    }

    /// Returns `true` unless this is one of the infinity sentinels.
    pub fn is_finite(self) -> bool {
        self != Self::NEG_INF && self != Self::POS_INF
    }

    /// Epoch seconds of a finite timestamp.
    ///
    /// # Panics
    ///
    /// Panics on a sentinel: infinities never take part in arithmetic, so a
    /// caller reaching for seconds here has corrupted an interval bound.
    pub fn finite_secs(self) -> i64 {
        assert!(self.is_finite(), "infinity sentinel used in arithmetic");
        self.0
    }
}

impl FromStr for Timestamp {
    type Err = DateError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    // Safety: midnight exists on every date
                    .map(|d| d.and_hms_opt(0, 0, 0).expect("midnight is valid"))
            })
            .map_err(|_| DateError(s.to_string()))?;
        Ok(Timestamp(naive.and_utc().timestamp()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NEG_INF {
            return write!(f, "-inf");
        }
        if *self == Self::POS_INF {
            return write!(f, "inf");
        }
        match DateTime::from_timestamp(self.0, 0) {
            Some(dt) if dt.time().num_seconds_from_midnight() == 0 => {
                write!(f, "{}", dt.format("%Y-%m-%d"))
            }
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            None => write!(f, "@{}", self.0),
        }
    }
}
