//! Override keys and values

use roomgate_util::RoomId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::StoreError;

/// Identifies one override: a room and the composite identity of a role set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverrideKey {
    pub room_id: RoomId,
    pub identity: String,
}

impl OverrideKey {
    pub fn new(room_id: RoomId, identity: impl Into<String>) -> Self {
        Self {
            room_id,
            identity: identity.into(),
        }
    }
}

/// Renders as `"<roomId>:<identity>"`
impl fmt::Display for OverrideKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.room_id, self.identity)
    }
}

impl FromStr for OverrideKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (room, identity) = s
            .split_once(':')
            .ok_or_else(|| StoreError::InvalidKey(s.to_string()))?;
        let room_id = room
            .parse::<RoomId>()
            .map_err(|_| StoreError::InvalidKey(s.to_string()))?;
        Ok(Self::new(room_id, identity))
    }
}

/// A recorded allow/deny decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessOverride {
    Allow,
    Deny,
}

impl AccessOverride {
    pub fn from_allowed(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }

    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }

    /// Stored representation
    pub fn as_value(self) -> &'static str {
        match self {
            Self::Allow => "1",
            Self::Deny => "0",
        }
    }

    /// Read a stored value. Empty means no override; only `"1"` allows.
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "" => None,
            "1" => Some(Self::Allow),
            _ => Some(Self::Deny),
        }
    }
}

impl fmt::Display for AccessOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Deny => write!(f, "deny"),
        }
    }
}
