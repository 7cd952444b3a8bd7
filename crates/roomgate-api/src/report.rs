//! Filter request and report types

use roomgate_util::{ClockTime, RequestId, RoomgateError};
use serde::{Deserialize, Serialize};

use crate::Room;

/// What the user asked for on the search form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRequest {
    /// Requested start of the booking
    pub start: ClockTime,
    /// Requested end; `None` searches through the end of the day
    #[serde(default)]
    pub stop: Option<ClockTime>,
    /// Only rooms with at least one piano
    #[serde(default)]
    pub needs_piano: bool,
}

impl FilterRequest {
    /// Build a request from raw form values. An empty `stop` means open-ended.
    pub fn from_form(start: &str, stop: &str, needs_piano: bool) -> roomgate_util::Result<Self> {
        let start = ClockTime::parse(start.trim())
            .map_err(|e| RoomgateError::invalid_request(format!("start time: {e}")))?;

        let stop = match stop.trim() {
            "" => None,
            s => Some(
                ClockTime::parse(s)
                    .map_err(|e| RoomgateError::invalid_request(format!("stop time: {e}")))?,
            ),
        };

        if let Some(stop) = stop
            && stop < start
        {
            return Err(RoomgateError::invalid_request(format!(
                "stop time {stop} is before start time {start}"
            )));
        }

        Ok(Self {
            start,
            stop,
            needs_piano,
        })
    }
}

/// Outcome of a filtering pass, ready for display
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterReport {
    pub request_id: RequestId,
    /// Bookable rooms with no conflicting interval, in input order
    pub available: Vec<Room>,
    /// Bookable rooms with a conflicting interval, in input order
    pub conflicting: Vec<Room>,
    /// One line per existing booking at or above the long-booking threshold
    pub long_booking_notices: Vec<String>,
    /// Advisories for roles whose group has no access mapping
    pub unknown_groups: Vec<String>,
    /// Some available room has no access mapping and could use an override
    pub has_crowdsource: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_with_open_end() {
        let req = FilterRequest::from_form("11:00", "", true).unwrap();
        assert_eq!(req.start, ClockTime::new(11, 0).unwrap());
        assert_eq!(req.stop, None);
        assert!(req.needs_piano);
    }

    #[test]
    fn form_with_both_bounds() {
        let req = FilterRequest::from_form("11:00", "13:00", false).unwrap();
        assert_eq!(req.stop, Some(ClockTime::new(13, 0).unwrap()));
    }

    #[test]
    fn form_rejects_garbage() {
        assert!(matches!(
            FilterRequest::from_form("", "13:00", false),
            Err(RoomgateError::InvalidRequest(_))
        ));
        assert!(FilterRequest::from_form("11:00", "soon", false).is_err());
        assert!(FilterRequest::from_form("13:00", "11:00", false).is_err());
    }

    #[test]
    fn report_serializes() {
        let report = FilterReport::default();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("long_booking_notices"));
        assert!(json.contains("has_crowdsource"));
    }
}
