//! Time-window conflict filtering

use roomgate_api::{FilterRequest, Room};
use roomgate_config::ServiceConfig;
use roomgate_util::{format_duration, BookingSpan, ClockTime};
use std::time::Duration;
use tracing::warn;

use crate::AccessEvaluator;

/// The requested window after the grace margin is applied, in seconds
/// from midnight. The start bound is open, the stop bound closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictWindow {
    start: i64,
    stop: Option<i64>,
}

impl ConflictWindow {
    /// Narrow `start..stop` by `margin` on both ends
    pub fn narrowed(start: ClockTime, stop: Option<ClockTime>, margin: Duration) -> Self {
        let margin = margin.as_secs() as i64;
        Self {
            start: start.as_seconds_from_midnight() as i64 + margin,
            stop: stop.map(|s| s.as_seconds_from_midnight() as i64 - margin),
        }
    }

    /// An existing booking conflicts unless it ends by the window start or
    /// begins after the window stop.
    pub fn conflicts_with(&self, span: &BookingSpan) -> bool {
        let span_start = span.start.as_seconds_from_midnight() as i64;
        let span_end = span.end.as_seconds_from_midnight() as i64;

        if span_end <= self.start {
            return false;
        }
        if let Some(stop) = self.stop
            && span_start > stop
        {
            return false;
        }
        true
    }
}

/// Tunables of a filtering pass
#[derive(Debug, Clone, Copy)]
pub struct FilterSettings {
    pub fuzzy_margin: Duration,
    pub long_booking_threshold: Duration,
}

impl From<&ServiceConfig> for FilterSettings {
    fn from(service: &ServiceConfig) -> Self {
        Self {
            fuzzy_margin: service.fuzzy_margin,
            long_booking_threshold: service.long_booking_threshold,
        }
    }
}

/// Eligible rooms split by conflict, plus long-booking notices
#[derive(Debug, Clone, Default)]
pub struct RoomPartition {
    pub available: Vec<Room>,
    pub conflicting: Vec<Room>,
    pub long_booking_notices: Vec<String>,
}

/// Partition `rooms` into available and conflicting, keeping input order.
///
/// Rooms not used in study, rooms the user has no access to, and rooms
/// without a piano when one is required appear in neither list.
pub fn filter_rooms(
    rooms: Vec<Room>,
    access: &AccessEvaluator<'_>,
    request: &FilterRequest,
    settings: &FilterSettings,
) -> RoomPartition {
    let window = ConflictWindow::narrowed(request.start, request.stop, settings.fuzzy_margin);
    let mut partition = RoomPartition::default();

    for mut room in rooms {
        if !room.is_used_in_study {
            continue;
        }
        if !access.has_access(&mut room) {
            continue;
        }
        if request.needs_piano && room.piano_count < 1 {
            continue;
        }

        match first_conflict(&room, &window, settings, &mut partition.long_booking_notices) {
            Some(reason) => {
                room.conflict_reason = reason;
                partition.conflicting.push(room);
            }
            None => partition.available.push(room),
        }
    }

    partition
}

/// Scan a room's busy intervals in order, stopping at the first conflict.
///
/// Long-booking notices are collected for every valid interval scanned.
fn first_conflict(
    room: &Room,
    window: &ConflictWindow,
    settings: &FilterSettings,
    notices: &mut Vec<String>,
) -> Option<String> {
    for booking in &room.times {
        let span = match BookingSpan::parse(booking) {
            Ok(span) => span,
            Err(e) => {
                warn!(
                    anomaly = %booking,
                    room_code = %room.room_code,
                    error = %e,
                    "found unusual booking time"
                );
                continue;
            }
        };

        let duration = span.duration();
        if duration >= settings.long_booking_threshold {
            notices.push(format!(
                "{} on {} broneeritud {}",
                room.room_code,
                format_duration(duration),
                booking
            ));
        }

        if window.conflicts_with(&span) {
            return Some(format!(
                "{} on kinni {} ({})",
                room.room_code,
                booking,
                format_duration(duration)
            ));
        }
    }

    None
}
