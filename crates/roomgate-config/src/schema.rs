//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Service-level settings
    #[serde(default)]
    pub service: RawServiceConfig,

    /// Role ingestion settings
    #[serde(default)]
    pub roles: RawRolesConfig,

    /// Student-group prefix -> access tags granted by that group
    #[serde(default)]
    pub group_tags: BTreeMap<String, Vec<String>>,

    /// Normalized room code -> access tag required by that room
    #[serde(default)]
    pub room_tags: BTreeMap<String, String>,

    /// Normalized room code -> number of pianos (1 or 2)
    #[serde(default)]
    pub pianos: BTreeMap<String, u8>,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// Data directory for the override store
    pub data_dir: Option<PathBuf>,

    /// Who users should write to about unmapped groups
    pub admin_contact: Option<String>,

    /// Existing bookings at least this long are reported (default: 300)
    pub long_booking_threshold_minutes: Option<u64>,

    /// Grace margin applied to both ends of the requested window (default: 1)
    pub fuzzy_margin_minutes: Option<u64>,
}

/// Role ingestion settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawRolesConfig {
    /// Role ids that only permit booking and carry no access
    #[serde(default)]
    pub ignorable_role_ids: Vec<i64>,

    /// Prefixes stripped from group codes before table lookup
    #[serde(default)]
    pub locale_prefixes: Vec<String>,

    /// Sort group codes before joining them into the composite identity
    #[serde(default)]
    pub sorted_identity: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_schema() {
        let toml_str = r#"
            config_version = 1

            [service]
            admin_contact = "admin@example.org"
            long_booking_threshold_minutes = 240
            fuzzy_margin_minutes = 2

            [roles]
            ignorable_role_ids = [223113]
            locale_prefixes = ["eõ-", "JÕ-"]

            [group_tags]
            LP = ["general", "classical", "practice", "percussion"]

            [room_tags]
            D301 = "practice"

            [pianos]
            D301 = 1
            D303 = 2
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.roles.ignorable_role_ids, vec![223113]);
        assert_eq!(config.roles.locale_prefixes.len(), 2);
        assert!(!config.roles.sorted_identity);
        assert_eq!(config.group_tags["LP"].len(), 4);
        assert_eq!(config.pianos["D303"], 2);
        assert_eq!(config.service.long_booking_threshold_minutes, Some(240));
    }

    #[test]
    fn empty_tables_default() {
        let config: RawConfig = toml::from_str("config_version = 1").unwrap();
        assert!(config.group_tags.is_empty());
        assert!(config.room_tags.is_empty());
        assert!(config.pianos.is_empty());
        assert!(config.service.admin_contact.is_none());
    }
}
