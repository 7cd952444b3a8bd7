//! Error types for roomgate

use thiserror::Error;

/// Core error type for roomgate operations
#[derive(Debug, Error)]
pub enum RoomgateError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Store error: {0}")]
    StoreError(String),
}

impl RoomgateError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::StoreError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RoomgateError>;

/// Why a clock time or booking span string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpanParseError {
    #[error("missing ' - ' separator")]
    MissingSeparator,

    #[error("invalid clock time '{0}'")]
    InvalidClock(String),

    #[error("span ends before it starts")]
    EndBeforeStart,
}
