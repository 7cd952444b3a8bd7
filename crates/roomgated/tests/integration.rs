//! Integration tests for roomgated
//!
//! These tests run the configured engine end to end over portal-shaped JSON.

use roomgate_api::{FilterRequest, Room, User};
use roomgate_config::{parse_config, Policy};
use roomgate_core::RoomEngine;
use roomgate_store::{AuditEventType, OverrideStore, SqliteStore};
use roomgate_util::{RoomId, DATABASE_FILENAME};
use std::collections::HashMap;
use std::sync::Arc;

const EXAMPLE_CONFIG: &str = include_str!("../../../config.example.toml");

fn example_policy() -> Policy {
    parse_config(EXAMPLE_CONFIG).unwrap()
}

fn portal_user(groups: &[(i64, &str)]) -> User {
    let roles: Vec<String> = groups
        .iter()
        .map(|(id, group)| {
            format!(
                r#"{{"Id": {id}, "SchoolCode": "MUBA", "Role": "ROLL_T", "StudentGroup": "{group}"}}"#
            )
        })
        .collect();
    let json = format!(
        r#"{{"name": "49001010000", "user": 7, "person": 8, "fullname": "Mari Maasikas", "users": [{}], "sessionTimeoutInSeconds": 1800}}"#,
        roles.join(",")
    );
    serde_json::from_str(&json).unwrap()
}

fn portal_rooms() -> Vec<Room> {
    serde_json::from_str(
        r#"[
            {"Id": 101, "RoomCode": "D107 harjutusklass", "RoomName": "Harjutusklass", "BuildingName": "D",
             "Times": ["08:00 - 09:30"], "Places": 2, "IsUsedInStudy": true,
             "Equipment": [{"Equipment": "KLAVER", "EquipmentCount": 1}]},
            {"Id": 303, "RoomCode": "D303", "RoomName": "Klaveriklass", "BuildingName": "D",
             "Times": ["10:00 - 12:00"], "Places": 6, "IsUsedInStudy": true,
             "Equipment": [{"Equipment": "KLAVER", "EquipmentCount": 2}, {"Equipment": "NOODIPULT", "EquipmentCount": 1}]},
            {"Id": 500, "RoomCode": "E500", "RoomName": "Saal", "BuildingName": "E",
             "Times": ["08:00 - 16:00"], "Places": 200, "IsUsedInStudy": true, "Equipment": []},
            {"Id": 900, "RoomCode": "X900", "RoomName": "Ladu", "BuildingName": "X",
             "Times": [], "Places": 0, "IsUsedInStudy": false, "Equipment": []},
            {"Id": 777, "RoomCode": "G777", "RoomName": "Klass", "BuildingName": "G",
             "Times": [], "Places": 10, "IsUsedInStudy": true, "Equipment": []}
        ]"#,
    )
    .unwrap()
}

fn equipment() -> HashMap<String, String> {
    HashMap::from([
        ("KLAVER".to_string(), "Klaver".to_string()),
        ("NOODIPULT".to_string(), "_Noodipult".to_string()),
    ])
}

fn codes(rooms: &[Room]) -> Vec<&str> {
    rooms.iter().map(|r| r.only_code()).collect()
}

#[test]
fn test_example_config_loads() {
    let policy = example_policy();

    assert_eq!(policy.acl.group_count(), 3);
    assert_eq!(policy.acl.room_count(), 13);
    assert_eq!(policy.pianos.count("D303"), 2);
    assert_eq!(policy.pianos.count("D107"), 1);
    assert_eq!(policy.pianos.count("Z999"), 0);
    assert!(policy.acl.is_ignorable_role(223113));
    assert_eq!(policy.service.admin_contact, "admin@example.org");
}

#[test]
fn test_filtering_pass() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let engine = RoomEngine::new(example_policy(), store);
    let user = portal_user(&[(1, "KJ-21"), (223113, "Broneerija")]);

    let request = FilterRequest::from_form("11:00", "13:00", false).unwrap();
    let report = engine.search(&user, portal_rooms(), &request, &equipment());

    assert_eq!(codes(&report.available), vec!["D107", "G777"]);
    assert_eq!(codes(&report.conflicting), vec!["D303", "E500"]);

    let d303 = &report.conflicting[0];
    assert!(d303.conflict_reason.contains("D303"));
    assert!(d303.conflict_reason.contains("10:00 - 12:00"));
    assert_eq!(d303.piano_count, 2);
    assert_eq!(d303.resolved_equipment, "Klaver, Noodipult");

    // Only the eight-hour hall booking is long
    assert_eq!(report.long_booking_notices.len(), 1);
    assert!(report.long_booking_notices[0].contains("E500"));

    assert!(report.has_crowdsource);
    assert!(report.unknown_groups.is_empty());
}

#[test]
fn test_piano_search() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let engine = RoomEngine::new(example_policy(), store);
    let user = portal_user(&[(1, "KL-20")]);

    let request = FilterRequest::from_form("13:00", "", true).unwrap();
    let report = engine.search(&user, portal_rooms(), &request, &equipment());

    assert_eq!(codes(&report.available), vec!["D107", "D303"]);
    assert!(report.conflicting.is_empty());
}

#[test]
fn test_locale_prefixed_and_unknown_groups() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let engine = RoomEngine::new(example_policy(), store);
    let user = portal_user(&[(1, "eõ-KL-20"), (2, "RM-19")]);

    let request = FilterRequest::from_form("11:00", "", false).unwrap();
    let report = engine.search(&user, portal_rooms(), &request, &HashMap::new());

    // KL grants the practice-room tag
    assert!(codes(&report.available).contains(&"D107"));
    assert_eq!(report.unknown_groups.len(), 1);
    assert!(report.unknown_groups[0].contains("RM-19"));
}

#[test]
fn test_unmapped_group_is_unrestricted() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let engine = RoomEngine::new(example_policy(), store);
    // RP is not in the table: no tags at all, so nothing is restricted
    let unmapped = portal_user(&[(1, "RP-21")]);
    let request = FilterRequest::from_form("13:00", "", false).unwrap();

    let report = engine.search(&unmapped, portal_rooms(), &request, &HashMap::new());
    assert!(codes(&report.available).contains(&"D107"));
}

#[test]
fn test_crowdsourced_override_flow() {
    let store = Arc::new(SqliteStore::in_memory().unwrap());
    let engine = RoomEngine::new(example_policy(), store.clone());
    let user = portal_user(&[(1, "LP-22"), (223113, "Broneerija")]);
    let request = FilterRequest::from_form("13:00", "", false).unwrap();

    let before = engine.search(&user, portal_rooms(), &request, &HashMap::new());
    assert!(codes(&before.available).contains(&"G777"));
    assert!(before.has_crowdsource);

    engine.set_access(RoomId::new(777), &user, false).unwrap();
    assert_eq!(store.get_raw("777:LP-22").unwrap(), "0");

    let after = engine.search(&user, portal_rooms(), &request, &HashMap::new());
    assert!(!codes(&after.available).contains(&"G777"));

    // Same roles, different person: the override is shared
    let classmate = portal_user(&[(5, "LP-22")]);
    let shared = engine.search(&classmate, portal_rooms(), &request, &HashMap::new());
    assert!(!codes(&shared.available).contains(&"G777"));

    let audits = store.get_recent_audits(5).unwrap();
    assert!(matches!(audits[0].event, AuditEventType::OverrideSet { .. }));
}

#[test]
fn test_overrides_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join(DATABASE_FILENAME);
    let user = portal_user(&[(1, "KJ-21")]);

    {
        let store = Arc::new(SqliteStore::open(&db_path).unwrap());
        let engine = RoomEngine::new(example_policy(), store);
        engine.set_access(RoomId::new(101), &user, false).unwrap();
    }

    let store = Arc::new(SqliteStore::open(&db_path).unwrap());
    let engine = RoomEngine::new(example_policy(), store);
    let request = FilterRequest::from_form("13:00", "", false).unwrap();
    let report = engine.search(&user, portal_rooms(), &request, &HashMap::new());

    assert!(!codes(&report.available).contains(&"D107"));
    assert_eq!(engine.overrides().unwrap().len(), 1);
}
