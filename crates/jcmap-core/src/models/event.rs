//! Event domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::GeoPoint;
use crate::models::organization::Organization;
use crate::models::user::User;

/// A single evangelism activity instance.
///
/// Events are hard-deleted, unlike organizations. The organizer is set
/// at creation from the authenticated principal and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Free-form activity type, e.g. "Rue", "Croisade".
    pub kind: String,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location: Option<GeoPoint>,
    pub address: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub image_url: Option<String>,
    pub organizer_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An event with its eagerly loaded organizer, organization, and
/// participant set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetail {
    pub event: Event,
    pub organizer: User,
    pub organization: Option<Organization>,
    pub participants: Vec<User>,
}

/// Fields required to create a new event. Coordinates are mandatory.
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub category: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub image_url: Option<String>,
    pub organizer_id: Uuid,
    pub organization_id: Option<Uuid>,
}

/// Fields that can be updated on an existing event.
///
/// Carries no organizer field — the organizer of record is immutable.
#[derive(Debug, Clone, Default)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
    pub image_url: Option<Option<String>>,
    pub organization_id: Option<Option<Uuid>>,
}

/// Filters for listing events. All filters AND-combine.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Case-insensitive substring match against title OR description OR
    /// address.
    pub search: Option<String>,
    pub category: Option<String>,
    pub organization_id: Option<Uuid>,
}

/// Result of a favorite toggle: the membership state after the call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoriteStatus {
    pub favorited: bool,
}
