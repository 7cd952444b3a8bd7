//! Room access and time-conflict evaluation for roomgate
//!
//! This crate is the heart of roomgate, containing:
//! - ACL resolution (roles -> access tags, composite identity)
//! - Per-room access decisions, consulting crowdsourced overrides
//! - Partitioning of eligible rooms by conflict with a requested window
//! - Display decoration of equipment lists and bookings

mod access;
mod acl;
mod conflict;
mod decorate;
mod engine;

pub use access::*;
pub use acl::*;
pub use conflict::*;
pub use decorate::*;
pub use engine::*;
