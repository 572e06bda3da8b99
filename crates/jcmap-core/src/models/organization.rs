//! Organization domain model.
//!
//! An organization represents a church or association. It is owned by a
//! user, starts unverified, and is soft-deleted (row retained with a
//! deletion timestamp) so member and event references stay intact.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::GeoPoint;
use crate::models::event::Event;
use crate::models::user::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Derived point, present iff both coordinates were supplied on the
    /// same write. Longitude first.
    pub location: Option<GeoPoint>,
    pub logo_url: Option<String>,
    pub is_verified: bool,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// An organization with its eagerly loaded owner and events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationDetail {
    pub organization: Organization,
    pub owner: User,
    pub events: Vec<Event>,
}

/// Fields required to create a new organization.
#[derive(Debug, Clone)]
pub struct CreateOrganization {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub logo_url: Option<String>,
    pub owner_id: Uuid,
}

/// Fields that can be updated on an existing organization.
#[derive(Debug, Clone, Default)]
pub struct UpdateOrganization {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub logo_url: Option<Option<String>>,
    pub is_verified: Option<bool>,
}

/// Filters for listing organizations. Both filters AND-combine.
#[derive(Debug, Clone, Default)]
pub struct OrganizationFilter {
    /// Case-insensitive substring match against name OR description.
    pub search: Option<String>,
    pub is_verified: Option<bool>,
}
