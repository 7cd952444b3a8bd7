//! Portal record types
//!
//! Field names follow the portal's JSON. Records are built fresh for every
//! request and discarded once the response is rendered.

use chrono::{DateTime, FixedOffset};
use roomgate_util::RoomId;
use serde::{Deserialize, Serialize};

/// A bookable room and its busy intervals for the queried date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Room {
    pub id: RoomId,
    /// Room number, often followed by a space and a type suffix
    pub room_code: String,
    pub room_name: String,
    #[serde(default)]
    pub building_name: String,
    /// Raw `"HH:MM - HH:MM"` busy intervals for the queried date
    #[serde(default)]
    pub times: Vec<String>,
    /// Seat count
    #[serde(default)]
    pub places: u32,
    /// False for rooms that cannot be booked for study at all
    #[serde(default)]
    pub is_used_in_study: bool,
    #[serde(default)]
    pub equipment: Vec<EquipmentListing>,

    // Derived while filtering
    #[serde(default)]
    pub conflict_reason: String,
    #[serde(default, rename = "MissingACL")]
    pub missing_acl: bool,
    #[serde(default)]
    pub piano_count: u8,
    /// Display string built by the equipment annotator
    #[serde(default)]
    pub resolved_equipment: String,
}

impl Room {
    /// Room code without its type suffix (`"D303 klass"` -> `"D303"`)
    pub fn only_code(&self) -> &str {
        only_code(&self.room_code)
    }

    /// Equipment codes in listing order
    pub fn flat_equipment(&self) -> impl Iterator<Item = &str> {
        self.equipment.iter().map(|e| e.equipment.as_str())
    }
}

/// Normalize a room code to the part before the first space
pub fn only_code(room_code: &str) -> &str {
    room_code
        .split_once(' ')
        .map_or(room_code, |(code, _)| code)
}

/// One equipment line of a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EquipmentListing {
    /// Equipment classifier code
    pub equipment: String,
    #[serde(default)]
    pub equipment_count: u32,
}

/// How a role takes part in access evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleCategory {
    /// Grants access tags through its student group
    #[default]
    Standard,
    /// Only allows booking; grants nothing and is left out of the
    /// composite identity and unknown-group reporting
    BookingOnly,
}

/// A role held by the authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserRole {
    pub id: i64,
    #[serde(default)]
    pub school_code: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub student_group: String,
    /// Assigned during role ingestion, never sent by the portal
    #[serde(skip)]
    pub category: RoleCategory,
}

impl UserRole {
    pub fn is_ignorable(&self) -> bool {
        self.category == RoleCategory::BookingOnly
    }
}

/// The authenticated portal user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "name")]
    pub id_code: String,
    #[serde(rename = "user", default)]
    pub user_id: i64,
    #[serde(rename = "person", default)]
    pub person_id: i64,
    #[serde(rename = "fullname", alias = "FullName", default)]
    pub full_name: String,
    /// Roles in the order the portal lists them
    #[serde(rename = "users", default)]
    pub roles: Vec<UserRole>,
    #[serde(rename = "sessionTimeoutInSeconds", default)]
    pub session_timeout_in_seconds: u64,
}

/// A booking made by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Booking {
    pub id: i64,
    pub date: DateTime<FixedOffset>,
    #[serde(default)]
    pub time_start: String,
    #[serde(default)]
    pub time_end: String,
    /// Only `Id` and `RoomCode` are filled in by the portal
    #[serde(default)]
    pub rooms: Vec<BookedRoom>,

    // Derived for display
    #[serde(default)]
    pub date_str: String,
    #[serde(default)]
    pub room_str: String,
}

/// The room part of a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookedRoom {
    pub id: RoomId,
    pub room_code: String,
}
