//! Time-window slicing into fixed 5-minute query quanta.
//!
//! The remote layer stores one record per observation point per 5-minute
//! slot and matches its time code exactly, so a window is queried one slot at
//! a time. Start and end are taken as given: a start that is not on the
//! 5-minute grid produces codes the service will not match.

use crate::error::{Result, TrafficError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use std::fmt;

/// Width of one quantum in minutes.
pub const QUANTUM_MINUTES: i64 = 5;

/// `strftime` pattern of the service's time code (minute granularity).
pub const TIME_CODE_FORMAT: &str = "%Y%m%d%H%M";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn quantum_width() -> TimeDelta {
    TimeDelta::minutes(QUANTUM_MINUTES)
}

/// One 5-minute slot, used as the time selector of a single remote query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeQuantum(NaiveDateTime);

impl TimeQuantum {
    pub fn new(instant: NaiveDateTime) -> Self {
        Self(instant)
    }

    pub fn instant(&self) -> NaiveDateTime {
        self.0
    }

    /// Fixed-width `YYYYMMDDHHMM` code matched by the service.
    pub fn time_code(&self) -> String {
        self.0.format(TIME_CODE_FORMAT).to_string()
    }
}

impl fmt::Display for TimeQuantum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))
    }
}

/// Parse a calendar timestamp.
///
/// Accepts ISO-8601 local date-times (with `T` or a space, seconds and
/// fractions optional), RFC 3339 with an offset (the wall-clock part is kept)
/// and bare dates, which map to midnight.
///
/// # Examples
///
/// ```
/// use jartic::compute::quanta::parse_timestamp;
///
/// let ts = parse_timestamp("2024-01-01T00:05:00").unwrap();
/// assert_eq!(ts.to_string(), "2024-01-01 00:05:00");
/// assert!(parse_timestamp("yesterday").is_err());
/// ```
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime> {
    let s = input.trim();

    for format in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.naive_local());
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(TrafficError::InvalidTimeFormat(format!(
        "'{}' is not a date-time (expected e.g. 2024-01-01T00:00:00)",
        input
    )))
}

/// Lazy, restartable sequence of quanta covering `[start, end]` inclusively.
///
/// Cloning the iterator restarts it from its current position; cloning a
/// fresh one from [`slice`] restarts the whole window.
#[derive(Debug, Clone)]
pub struct TimeQuanta {
    next: Option<NaiveDateTime>,
    end: NaiveDateTime,
}

impl Iterator for TimeQuanta {
    type Item = TimeQuantum;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|ts| *ts <= self.end)?;
        self.next = current.checked_add_signed(quantum_width());
        Some(TimeQuantum(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(next) if next <= self.end => {
                let span = (self.end - next).num_seconds() / (QUANTUM_MINUTES * 60);
                usize::try_from(span).map_or(usize::MAX, |n| n.saturating_add(1))
            }
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TimeQuanta {}

/// Slice `[start, end]` into 5-minute quanta.
///
/// # Examples
///
/// ```
/// use jartic::compute::quanta::{parse_timestamp, slice};
///
/// let start = parse_timestamp("2024-01-01T00:00:00").unwrap();
/// let end = parse_timestamp("2024-01-01T00:10:00").unwrap();
/// let codes: Vec<String> = slice(start, end).unwrap().map(|q| q.time_code()).collect();
/// assert_eq!(codes, ["202401010000", "202401010005", "202401010010"]);
/// ```
pub fn slice(start: NaiveDateTime, end: NaiveDateTime) -> Result<TimeQuanta> {
    if start > end {
        return Err(TrafficError::InvalidTimeRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(TimeQuanta {
        next: Some(start),
        end,
    })
}
