//! Validated policy structures

use crate::schema::{RawConfig, RawRolesConfig, RawServiceConfig};
use roomgate_util::default_data_dir;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

/// Existing bookings at least this long get a notice unless configured otherwise
pub const DEFAULT_LONG_BOOKING_THRESHOLD: Duration = Duration::from_secs(5 * 3600);

/// Grace margin applied to the requested window unless configured otherwise
pub const DEFAULT_FUZZY_MARGIN: Duration = Duration::from_secs(60);

/// Validated policy ready for use by the core engine
#[derive(Debug, Clone, Default)]
pub struct Policy {
    pub service: ServiceConfig,
    pub acl: AclTables,
    pub pianos: PianoTable,
}

impl Policy {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            service: ServiceConfig::from_raw(raw.service),
            acl: AclTables::from_raw(raw.roles, raw.group_tags, raw.room_tags),
            pianos: PianoTable::from_raw(raw.pianos),
        }
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
    /// Named in advisories about unmapped groups; may be empty
    pub admin_contact: String,
    pub long_booking_threshold: Duration,
    pub fuzzy_margin: Duration,
}

impl ServiceConfig {
    fn from_raw(raw: RawServiceConfig) -> Self {
        Self {
            data_dir: raw.data_dir.unwrap_or_else(default_data_dir),
            admin_contact: raw.admin_contact.unwrap_or_default(),
            long_booking_threshold: raw
                .long_booking_threshold_minutes
                .map(minutes)
                .unwrap_or(DEFAULT_LONG_BOOKING_THRESHOLD),
            fuzzy_margin: raw
                .fuzzy_margin_minutes
                .map(minutes)
                .unwrap_or(DEFAULT_FUZZY_MARGIN),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            admin_contact: String::new(),
            long_booking_threshold: DEFAULT_LONG_BOOKING_THRESHOLD,
            fuzzy_margin: DEFAULT_FUZZY_MARGIN,
        }
    }
}

/// Static access tables, read-only once loaded
#[derive(Debug, Clone, Default)]
pub struct AclTables {
    group_tags: HashMap<String, Vec<String>>,
    room_tags: HashMap<String, String>,
    locale_prefixes: Vec<String>,
    ignorable_role_ids: HashSet<i64>,
    sorted_identity: bool,
}

impl AclTables {
    fn from_raw(
        roles: RawRolesConfig,
        group_tags: BTreeMap<String, Vec<String>>,
        room_tags: BTreeMap<String, String>,
    ) -> Self {
        Self {
            group_tags: group_tags.into_iter().collect(),
            room_tags: room_tags.into_iter().collect(),
            locale_prefixes: roles.locale_prefixes,
            ignorable_role_ids: roles.ignorable_role_ids.into_iter().collect(),
            sorted_identity: roles.sorted_identity,
        }
    }

    pub fn with_group(mut self, prefix: impl Into<String>, tags: &[&str]) -> Self {
        self.group_tags
            .insert(prefix.into(), tags.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn with_room(mut self, room: impl Into<String>, tag: impl Into<String>) -> Self {
        self.room_tags.insert(room.into(), tag.into());
        self
    }

    pub fn with_locale_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.locale_prefixes.push(prefix.into());
        self
    }

    pub fn with_ignorable_role(mut self, role_id: i64) -> Self {
        self.ignorable_role_ids.insert(role_id);
        self
    }

    pub fn with_sorted_identity(mut self, sorted: bool) -> Self {
        self.sorted_identity = sorted;
        self
    }

    /// Tags granted by a group prefix, `None` when the prefix is unmapped
    pub fn tags_for_prefix(&self, prefix: &str) -> Option<&[String]> {
        self.group_tags.get(prefix).map(Vec::as_slice)
    }

    /// Tag required by a normalized room code
    pub fn room_tag(&self, only_code: &str) -> Option<&str> {
        self.room_tags.get(only_code).map(String::as_str)
    }

    pub fn locale_prefixes(&self) -> &[String] {
        &self.locale_prefixes
    }

    pub fn is_ignorable_role(&self, role_id: i64) -> bool {
        self.ignorable_role_ids.contains(&role_id)
    }

    pub fn sorted_identity(&self) -> bool {
        self.sorted_identity
    }

    pub fn group_count(&self) -> usize {
        self.group_tags.len()
    }

    pub fn room_count(&self) -> usize {
        self.room_tags.len()
    }
}

/// Number of pianos per normalized room code
#[derive(Debug, Clone, Default)]
pub struct PianoTable(HashMap<String, u8>);

impl PianoTable {
    fn from_raw(raw: BTreeMap<String, u8>) -> Self {
        Self(raw.into_iter().collect())
    }

    pub fn with_room(mut self, room: impl Into<String>, count: u8) -> Self {
        self.0.insert(room.into(), count);
        self
    }

    /// Piano count for a room, 0 when the room is not listed
    pub fn count(&self, only_code: &str) -> u8 {
        self.0.get(only_code).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn minutes(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}
