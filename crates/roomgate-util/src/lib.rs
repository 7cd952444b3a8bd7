//! Shared utilities for roomgate
//!
//! This crate provides:
//! - ID types (RoomId, RequestId)
//! - Clock times and booking spans scoped to a single day
//! - Error types
//! - Default paths for config and data directories

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
