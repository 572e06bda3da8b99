//! Domain models for JCMap.
//!
//! These are the core types shared across all crates.

pub mod event;
pub mod notification;
pub mod organization;
pub mod user;

use serde::{Deserialize, Serialize};

/// A derived two-coordinate location value used for distance queries.
///
/// Stored longitude-first, matching geographic convention — the wire
/// representation of `POINT(2.39 6.37)` is longitude 2.39, latitude 6.37.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}
