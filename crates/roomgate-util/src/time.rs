//! Time utilities for roomgate
//!
//! Booking data from the portal is scoped to a single calendar day, so
//! everything here works on wall-clock times of day rather than full
//! timestamps.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `ROOMGATE_MOCK_TIME` environment variable can be set
//! to override the system time used for default search windows.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2025-12-25 14:30:00`)

use chrono::{DateTime, Local, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;

use crate::SpanParseError;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "ROOMGATE_MOCK_TIME";

/// Separator between the two clock times of a booking span
pub const SPAN_SEPARATOR: &str = " - ";

/// Cached mock time offset from the real time when the process started.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

#[allow(clippy::disallowed_methods)] // This is the internal implementation that wraps Local::now()
fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                match NaiveDateTime::parse_from_str(&mock_time_str, "%Y-%m-%d %H:%M:%S") {
                    Ok(naive_dt) => {
                        if let Some(mock_dt) = Local.from_local_datetime(&naive_dt).single() {
                            let offset = mock_dt.signed_duration_since(chrono::Local::now());
                            tracing::info!(
                                mock_time = %mock_time_str,
                                offset_secs = offset.num_seconds(),
                                "Mock time enabled"
                            );
                            return Some(offset);
                        }
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            "Failed to convert mock time to local timezone"
                        );
                    }
                    Err(_) => {
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            expected_format = "%Y-%m-%d %H:%M:%S",
                            "Invalid mock time format"
                        );
                    }
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Get the current local time, respecting mock time settings in debug builds.
#[allow(clippy::disallowed_methods)] // This is the wrapper that provides mock time support
pub fn now() -> DateTime<Local> {
    let real_now = chrono::Local::now();

    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// A time of day with minute precision, as shown in the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    /// Returns seconds since midnight
    pub fn as_seconds_from_midnight(&self) -> u32 {
        (self.hour as u32) * 3600 + (self.minute as u32) * 60
    }

    /// Parse the portal's `H:MM` / `HH:MM` format.
    ///
    /// The hour may have one or two digits, the minute always has two.
    pub fn parse(s: &str) -> Result<Self, SpanParseError> {
        let invalid = || SpanParseError::InvalidClock(s.to_string());

        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !digits(h) || h.len() > 2 || !digits(m) || m.len() != 2 {
            return Err(invalid());
        }

        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl PartialOrd for ClockTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClockTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_seconds_from_midnight()
            .cmp(&other.as_seconds_from_midnight())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = SpanParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = SpanParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ClockTime> for String {
    fn from(t: ClockTime) -> Self {
        t.to_string()
    }
}

/// An existing booking on a room, `"HH:MM - HH:MM"` within one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingSpan {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl BookingSpan {
    pub fn parse(s: &str) -> Result<Self, SpanParseError> {
        let (start, end) = s
            .split_once(SPAN_SEPARATOR)
            .ok_or(SpanParseError::MissingSeparator)?;

        let start = ClockTime::parse(start)?;
        let end = ClockTime::parse(end)?;
        if end < start {
            return Err(SpanParseError::EndBeforeStart);
        }

        Ok(Self { start, end })
    }

    pub fn duration(&self) -> Duration {
        let secs = self.end.as_seconds_from_midnight() - self.start.as_seconds_from_midnight();
        Duration::from_secs(secs as u64)
    }
}

impl fmt::Display for BookingSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.start, SPAN_SEPARATOR, self.end)
    }
}

/// Default search window offered to the user: now rounded to the nearest
/// five minutes, lasting 45 minutes.
///
/// The stop bound is dropped when it would fall on the next day.
pub fn suggested_window(now: &DateTime<Local>) -> (ClockTime, Option<ClockTime>) {
    const STEP: u32 = 5 * 60;
    const LENGTH: u32 = 45 * 60;

    let secs = now.time().num_seconds_from_midnight();
    let rounded = ((secs + STEP / 2) / STEP) * STEP;

    let to_clock = |secs: u32| {
        NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).map(ClockTime::from_naive_time)
    };

    // Rounding 23:58 up lands on midnight; clamp to the last minute of the day.
    let start = to_clock(rounded).unwrap_or(ClockTime { hour: 23, minute: 59 });
    let stop = to_clock(rounded + LENGTH);

    (start, stop)
}

/// Helper to format booking durations in human-readable form
pub fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_time_parse() {
        assert_eq!(ClockTime::parse("14:30").unwrap(), ClockTime::new(14, 30).unwrap());
        assert_eq!(ClockTime::parse("9:05").unwrap(), ClockTime::new(9, 5).unwrap());
        assert_eq!(ClockTime::parse("00:00").unwrap(), ClockTime::new(0, 0).unwrap());

        assert!(ClockTime::parse("24:00").is_err());
        assert!(ClockTime::parse("12:60").is_err());
        assert!(ClockTime::parse("12:5").is_err());
        assert!(ClockTime::parse(" 12:00").is_err());
        assert!(ClockTime::parse("noon").is_err());
        assert!(ClockTime::parse("").is_err());
    }

    #[test]
    fn test_clock_time_ordering() {
        let morning = ClockTime::new(8, 0).unwrap();
        let noon = ClockTime::new(12, 0).unwrap();
        let evening = ClockTime::new(18, 30).unwrap();

        assert!(morning < noon);
        assert!(noon < evening);
    }

    #[test]
    fn test_clock_time_serde_as_string() {
        let t = ClockTime::new(7, 5).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"07:05\"");
        let parsed: ClockTime = serde_json::from_str("\"7:05\"").unwrap();
        assert_eq!(parsed, t);
        assert!(serde_json::from_str::<ClockTime>("\"25:00\"").is_err());
    }

    #[test]
    fn test_booking_span_parse() {
        let span = BookingSpan::parse("10:00 - 12:00").unwrap();
        assert_eq!(span.start, ClockTime::new(10, 0).unwrap());
        assert_eq!(span.end, ClockTime::new(12, 0).unwrap());
        assert_eq!(span.duration(), Duration::from_secs(2 * 3600));
        assert_eq!(span.to_string(), "10:00 - 12:00");
    }

    #[test]
    fn test_booking_span_rejects_malformed() {
        assert_eq!(
            BookingSpan::parse("10:00-12:00"),
            Err(SpanParseError::MissingSeparator)
        );
        assert!(matches!(
            BookingSpan::parse("10:00 - late"),
            Err(SpanParseError::InvalidClock(_))
        ));
        assert_eq!(
            BookingSpan::parse("23:00 - 01:00"),
            Err(SpanParseError::EndBeforeStart)
        );
    }

    #[test]
    fn test_suggested_window() {
        let dt = Local.with_ymd_and_hms(2025, 12, 25, 14, 32, 10).unwrap();
        let (start, stop) = suggested_window(&dt);
        assert_eq!(start, ClockTime::new(14, 30).unwrap());
        assert_eq!(stop, Some(ClockTime::new(15, 15).unwrap()));

        let dt = Local.with_ymd_and_hms(2025, 12, 25, 14, 33, 0).unwrap();
        assert_eq!(suggested_window(&dt).0, ClockTime::new(14, 35).unwrap());
    }

    #[test]
    fn test_suggested_window_near_midnight() {
        let dt = Local.with_ymd_and_hms(2025, 12, 25, 23, 40, 0).unwrap();
        let (start, stop) = suggested_window(&dt);
        assert_eq!(start, ClockTime::new(23, 40).unwrap());
        assert_eq!(stop, None);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(45 * 60)), "45m");
        assert_eq!(format_duration(Duration::from_secs(2 * 3600)), "2h 0m");
        assert_eq!(format_duration(Duration::from_secs(5 * 3600 + 30 * 60)), "5h 30m");
    }

    #[test]
    fn test_now_returns_time() {
        use chrono::Datelike;
        let t = now();
        assert!(t.year() >= 2020);
    }
}
