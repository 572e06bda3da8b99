//! Event service — geo search, participation, favorites.

use jcmap_core::error::{JcmapError, JcmapResult};
use jcmap_core::media::{self, ImageStorage};
use jcmap_core::models::event::{
    CreateEvent, Event, EventDetail, EventFilter, FavoriteStatus, UpdateEvent,
};
use jcmap_core::models::user::{Principal, UserRole};
use jcmap_core::repository::EventRepository;
use tracing::warn;
use uuid::Uuid;

use crate::access::require_role;
use crate::organizations::DEFAULT_RADIUS_KM;

const CREATOR_ROLES: &[UserRole] = &[UserRole::Organizer, UserRole::Admin, UserRole::SuperAdmin];

pub struct EventsService<E: EventRepository, S: ImageStorage> {
    events: E,
    images: S,
}

impl<E: EventRepository, S: ImageStorage> EventsService<E, S> {
    pub fn new(events: E, images: S) -> Self {
        Self { events, images }
    }

    pub async fn find_all(&self, filter: EventFilter) -> JcmapResult<Vec<Event>> {
        self.events.list(filter).await
    }

    pub async fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    ) -> JcmapResult<Vec<Event>> {
        self.events
            .find_nearby(latitude, longitude, radius_km.unwrap_or(DEFAULT_RADIUS_KM))
            .await
    }

    pub async fn find_one(&self, id: Uuid) -> JcmapResult<EventDetail> {
        self.events.get_detail(id).await
    }

    /// Only organizers and admins may create events. The organizer of
    /// record is always the principal.
    pub async fn create(&self, input: CreateEvent, principal: &Principal) -> JcmapResult<Event> {
        require_role(principal, CREATOR_ROLES)?;
        let input = CreateEvent {
            organizer_id: principal.id,
            ..input
        };
        self.events.create(input).await
    }

    /// Organizer-of-record or admin. The patch cannot touch the
    /// organizer.
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateEvent,
        principal: &Principal,
    ) -> JcmapResult<Event> {
        self.authorize_mutation(id, principal).await?;
        self.events.update(id, patch).await
    }

    /// Organizer-of-record or admin. Releases the stored image
    /// best-effort before the hard delete; a storage failure is logged
    /// and never blocks the removal.
    pub async fn remove(&self, id: Uuid, principal: &Principal) -> JcmapResult<()> {
        let event = self.authorize_mutation(id, principal).await?;

        if let Some(public_id) = event.image_url.as_deref().and_then(media::extract_public_id) {
            if let Err(e) = self.images.delete(&public_id).await {
                warn!(event_id = %id, %public_id, error = %e, "image release failed");
            }
        }

        self.events.delete(id).await
    }

    /// Idempotent join; returns the refreshed detail.
    pub async fn join_event(&self, id: Uuid, principal: &Principal) -> JcmapResult<EventDetail> {
        self.events.add_participant(id, principal.id).await?;
        self.events.get_detail(id).await
    }

    /// Idempotent leave; returns the refreshed detail.
    pub async fn leave_event(&self, id: Uuid, principal: &Principal) -> JcmapResult<EventDetail> {
        self.events.remove_participant(id, principal.id).await?;
        self.events.get_detail(id).await
    }

    /// Strict toggle on the favorites edge; reports the state after the
    /// call.
    pub async fn toggle_favorite(
        &self,
        id: Uuid,
        principal: &Principal,
    ) -> JcmapResult<FavoriteStatus> {
        let favorited = self.events.is_favorited(id, principal.id).await?;
        if favorited {
            self.events.remove_favorite(id, principal.id).await?;
        } else {
            self.events.add_favorite(id, principal.id).await?;
        }
        Ok(FavoriteStatus {
            favorited: !favorited,
        })
    }

    async fn authorize_mutation(&self, id: Uuid, principal: &Principal) -> JcmapResult<Event> {
        let event = self.events.get_by_id(id).await?;
        if principal.id != event.organizer_id && !principal.role.is_admin() {
            return Err(JcmapError::AuthorizationDenied {
                reason: "only the organizer or an admin may modify an event".into(),
            });
        }
        Ok(event)
    }
}
