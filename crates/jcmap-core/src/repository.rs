//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations live in
//! `jcmap-db`; the service layer is generic over these traits so the
//! domain rules carry no database dependency.

use uuid::Uuid;

use crate::error::JcmapResult;
use crate::models::{
    event::{CreateEvent, Event, EventDetail, EventFilter, UpdateEvent},
    notification::{CreateNotification, Notification},
    organization::{CreateOrganization, Organization, OrganizationFilter, UpdateOrganization},
    user::{CreateUser, UpdateUser, User, UserRole},
};

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = JcmapResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = JcmapResult<User>> + Send;

    /// Look up a user whose email OR phone OR username equals the
    /// supplied identifier. Soft-deleted users never match.
    fn get_by_login_identifier(
        &self,
        identifier: &str,
    ) -> impl Future<Output = JcmapResult<User>> + Send;

    /// Whether any supplied identifier is already taken by another user.
    fn identifier_in_use(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
        username: Option<&str>,
    ) -> impl Future<Output = JcmapResult<bool>> + Send;

    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = JcmapResult<User>> + Send;

    /// Unconditional role overwrite. Transition policy is enforced by
    /// the service layer, not here.
    fn update_role(
        &self,
        id: Uuid,
        role: UserRole,
    ) -> impl Future<Output = JcmapResult<User>> + Send;

    /// Soft-delete: sets the deletion timestamp, row retained.
    fn soft_delete(&self, id: Uuid) -> impl Future<Output = JcmapResult<()>> + Send;

    fn list(&self) -> impl Future<Output = JcmapResult<Vec<User>>> + Send;

    /// Users whose home church is the given organization.
    fn list_by_home_church(
        &self,
        organization_id: Uuid,
    ) -> impl Future<Output = JcmapResult<Vec<User>>> + Send;
}

pub trait OrganizationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = JcmapResult<Organization>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = JcmapResult<Organization>> + Send;
    fn list(
        &self,
        filter: OrganizationFilter,
    ) -> impl Future<Output = JcmapResult<Vec<Organization>>> + Send;

    /// Organizations whose derived location lies within `radius_km`
    /// kilometres of the query point, nearest first. Soft-deleted rows
    /// are excluded.
    fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> impl Future<Output = JcmapResult<Vec<Organization>>> + Send;

    fn update(
        &self,
        id: Uuid,
        input: UpdateOrganization,
    ) -> impl Future<Output = JcmapResult<Organization>> + Send;

    /// Soft-delete: sets the deletion timestamp, row retained.
    fn soft_delete(&self, id: Uuid) -> impl Future<Output = JcmapResult<()>> + Send;
}

pub trait EventRepository: Send + Sync {
    fn create(&self, input: CreateEvent) -> impl Future<Output = JcmapResult<Event>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = JcmapResult<Event>> + Send;

    /// Event plus eagerly loaded organizer, organization, participants.
    fn get_detail(&self, id: Uuid) -> impl Future<Output = JcmapResult<EventDetail>> + Send;

    /// Filtered listing ordered by ascending start datetime.
    fn list(&self, filter: EventFilter) -> impl Future<Output = JcmapResult<Vec<Event>>> + Send;

    /// Events within `radius_km` kilometres of the query point, nearest
    /// first.
    fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> impl Future<Output = JcmapResult<Vec<Event>>> + Send;

    fn update(
        &self,
        id: Uuid,
        input: UpdateEvent,
    ) -> impl Future<Output = JcmapResult<Event>> + Send;

    /// Hard delete.
    fn delete(&self, id: Uuid) -> impl Future<Output = JcmapResult<()>> + Send;

    /// Idempotent participation upsert keyed by (event, user).
    fn add_participant(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = JcmapResult<()>> + Send;

    /// Idempotent participation removal.
    fn remove_participant(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = JcmapResult<()>> + Send;

    fn is_favorited(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = JcmapResult<bool>> + Send;

    fn add_favorite(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = JcmapResult<()>> + Send;

    fn remove_favorite(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = JcmapResult<()>> + Send;
}

pub trait NotificationRepository: Send + Sync {
    /// Append one row with `is_read = false`.
    fn create(
        &self,
        input: CreateNotification,
    ) -> impl Future<Output = JcmapResult<Notification>> + Send;

    /// All notifications for a user, newest first.
    fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = JcmapResult<Vec<Notification>>> + Send;

    /// Flip `is_read` to true. Ownership is part of the lookup
    /// predicate: a notification belonging to another user is NotFound.
    fn mark_as_read(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = JcmapResult<Notification>> + Send;

    fn count_unread(&self, user_id: Uuid) -> impl Future<Output = JcmapResult<u64>> + Send;
}
