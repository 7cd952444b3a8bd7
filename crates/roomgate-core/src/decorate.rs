//! Display decoration of rooms and bookings
//!
//! Nothing here affects access or conflict outcomes.

use std::collections::HashMap;

use roomgate_api::{only_code, Booking, Room};
use roomgate_config::PianoTable;

/// Leading marker on equipment names that are internal to the portal
const INTERNAL_MARKER: char = '_';

/// Set each room's piano count from the piano table
pub fn assign_piano_counts(rooms: &mut [Room], pianos: &PianoTable) {
    for room in rooms {
        room.piano_count = pianos.count(room.only_code());
    }
}

/// Resolve each room's equipment codes into one display string.
///
/// Codes missing from `names` leave an empty segment.
pub fn annotate_equipment(rooms: &mut [Room], names: &HashMap<String, String>) {
    for room in rooms {
        let resolved: Vec<&str> = room
            .flat_equipment()
            .map(|code| {
                names
                    .get(code)
                    .map(|name| display_name(name))
                    .unwrap_or_default()
            })
            .collect();
        room.resolved_equipment = resolved.join(", ");
    }
}

fn display_name(name: &str) -> &str {
    name.strip_prefix(INTERNAL_MARKER).unwrap_or(name)
}

/// The part of the equipment lookup referenced by `rooms`
pub fn referenced_equipment(
    names: &HashMap<String, String>,
    rooms: &[Room],
) -> HashMap<String, String> {
    rooms
        .iter()
        .flat_map(Room::flat_equipment)
        .map(|code| {
            let name = names.get(code).cloned().unwrap_or_default();
            (code.to_string(), name)
        })
        .collect()
}

/// Marker shown in front of a room code for its piano count
pub fn piano_marker(count: u8) -> Option<&'static str> {
    match count {
        1 => Some("🎹"),
        2 => Some("2️⃣"),
        _ => None,
    }
}

/// Fill in the display date and the comma-joined, piano-marked room list
pub fn decorate_bookings(bookings: &mut [Booking], pianos: &PianoTable) {
    for booking in bookings {
        let rooms: Vec<String> = booking
            .rooms
            .iter()
            .map(|room| match piano_marker(pianos.count(only_code(&room.room_code))) {
                Some(marker) => format!("{} {}", marker, room.room_code),
                None => room.room_code.clone(),
            })
            .collect();

        booking.room_str = rooms.join(",");
        booking.date_str = booking.date.format("%Y-%m-%d").to_string();
    }
}
