//! Audit event types

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::{AccessOverride, OverrideKey};

/// Types of audit events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEventType {
    /// Access tables loaded
    PolicyLoaded { group_count: usize, room_count: usize },

    /// A user granted or denied access to a room for their role set
    OverrideSet {
        key: OverrideKey,
        access: AccessOverride,
        previous: Option<AccessOverride>,
        user: String,
    },
}

/// Full audit event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID
    pub id: i64,

    /// Event timestamp
    pub timestamp: DateTime<Local>,

    /// Event type and details
    pub event: AuditEventType,
}

impl AuditEvent {
    pub fn new(event: AuditEventType) -> Self {
        Self {
            id: 0, // Will be set by store
            timestamp: roomgate_util::now(),
            event,
        }
    }
}
