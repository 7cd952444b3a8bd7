//! Configuration validation

use crate::schema::RawConfig;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Group prefix must not be empty")]
    EmptyGroupPrefix,

    #[error("Group prefix '{prefix}': {message}")]
    GroupError { prefix: String, message: String },

    #[error("Room '{room}': {message}")]
    RoomError { room: String, message: String },

    #[error("Room code '{0}' must not contain spaces; use the code before the first space")]
    RoomCodeNotNormalized(String),

    #[error("Room '{room}': piano count {count} must be 1 or 2")]
    InvalidPianoCount { room: String, count: u8 },

    #[error("Global config error: {0}")]
    GlobalError(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (prefix, tags) in &config.group_tags {
        if prefix.is_empty() {
            errors.push(ValidationError::EmptyGroupPrefix);
            continue;
        }
        if tags.iter().any(|t| t.is_empty()) {
            errors.push(ValidationError::GroupError {
                prefix: prefix.clone(),
                message: "access tags must not be empty".into(),
            });
        }
    }

    for (room, tag) in &config.room_tags {
        errors.extend(validate_room_code(room));
        if tag.is_empty() {
            errors.push(ValidationError::RoomError {
                room: room.clone(),
                message: "access tag must not be empty".into(),
            });
        }
    }

    for (room, &count) in &config.pianos {
        errors.extend(validate_room_code(room));
        if !(1..=2).contains(&count) {
            errors.push(ValidationError::InvalidPianoCount {
                room: room.clone(),
                count,
            });
        }
    }

    if config.service.long_booking_threshold_minutes == Some(0) {
        errors.push(ValidationError::GlobalError(
            "long_booking_threshold_minutes must be greater than 0".into(),
        ));
    }

    if let Some(contact) = &config.service.admin_contact
        && contact.trim().is_empty()
    {
        errors.push(ValidationError::GlobalError(
            "admin_contact must not be blank when set".into(),
        ));
    }

    if config.roles.locale_prefixes.iter().any(|p| p.is_empty()) {
        errors.push(ValidationError::GlobalError(
            "locale prefixes must not be empty".into(),
        ));
    }

    errors
}

fn validate_room_code(room: &str) -> Option<ValidationError> {
    if room.is_empty() {
        return Some(ValidationError::RoomError {
            room: room.to_string(),
            message: "room code must not be empty".into(),
        });
    }
    if room.contains(' ') {
        return Some(ValidationError::RoomCodeNotNormalized(room.to_string()));
    }
    None
}
