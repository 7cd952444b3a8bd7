//! Data types for roomgate
//!
//! This crate defines the shapes roomgate exchanges with its callers:
//! - Portal records (rooms, users and their roles, bookings) as delivered
//!   by the scheduling portal's JSON API
//! - Filter requests and reports

mod report;
mod types;

pub use report::*;
pub use types::*;
