//! Organization service.
//!
//! Carries the two behaviors that span aggregates: the verification
//! flip that promotes a plain-user owner to organizer, and the system
//! notification sent to the owner when someone else deletes their
//! organization. Both are follow-up writes, not transactional.

use jcmap_core::error::{JcmapError, JcmapResult};
use jcmap_core::models::notification::{CreateNotification, NotificationType};
use jcmap_core::models::organization::{
    CreateOrganization, Organization, OrganizationDetail, OrganizationFilter, UpdateOrganization,
};
use jcmap_core::models::event::EventFilter;
use jcmap_core::models::user::{Principal, User};
use jcmap_core::repository::{
    EventRepository, NotificationRepository, OrganizationRepository, UserRepository,
};
use tracing::info;
use uuid::Uuid;

/// Radius applied when a nearby query does not specify one.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

pub struct OrganizationsService<O, U, E, N>
where
    O: OrganizationRepository,
    U: UserRepository,
    E: EventRepository,
    N: NotificationRepository,
{
    organizations: O,
    users: U,
    events: E,
    notifications: N,
}

impl<O, U, E, N> OrganizationsService<O, U, E, N>
where
    O: OrganizationRepository,
    U: UserRepository,
    E: EventRepository,
    N: NotificationRepository,
{
    pub fn new(organizations: O, users: U, events: E, notifications: N) -> Self {
        Self {
            organizations,
            users,
            events,
            notifications,
        }
    }

    /// Any authenticated caller may create an organization. The owner is
    /// always the principal and the organization starts unverified.
    pub async fn create(
        &self,
        input: CreateOrganization,
        principal: &Principal,
    ) -> JcmapResult<Organization> {
        let input = CreateOrganization {
            owner_id: principal.id,
            ..input
        };
        self.organizations.create(input).await
    }

    pub async fn find_all(&self, filter: OrganizationFilter) -> JcmapResult<Vec<Organization>> {
        self.organizations.list(filter).await
    }

    pub async fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: Option<f64>,
    ) -> JcmapResult<Vec<Organization>> {
        self.organizations
            .find_nearby(latitude, longitude, radius_km.unwrap_or(DEFAULT_RADIUS_KM))
            .await
    }

    /// One organization with its eager owner and events.
    pub async fn find_one(&self, id: Uuid) -> JcmapResult<OrganizationDetail> {
        let organization = self.organizations.get_by_id(id).await?;
        let owner = self.users.get_by_id(organization.owner_id).await?;
        let events = self
            .events
            .list(EventFilter {
                organization_id: Some(id),
                ..Default::default()
            })
            .await?;

        Ok(OrganizationDetail {
            organization,
            owner,
            events,
        })
    }

    /// Members are the users whose home church is this organization.
    pub async fn get_members(&self, id: Uuid) -> JcmapResult<Vec<User>> {
        self.organizations.get_by_id(id).await?;
        self.users.list_by_home_church(id).await
    }

    /// Owner or admin update. Flipping `is_verified` from false to true
    /// promotes a plain-user owner to organizer; that flip is the sole
    /// trigger of the promotion and repeating it is a no-op.
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateOrganization,
        principal: &Principal,
    ) -> JcmapResult<Organization> {
        let current = self.organizations.get_by_id(id).await?;
        if principal.id != current.owner_id && !principal.role.is_admin() {
            return Err(JcmapError::AuthorizationDenied {
                reason: "only the owner or an admin may update an organization".into(),
            });
        }

        let newly_verified = !current.is_verified && patch.is_verified == Some(true);
        let updated = self.organizations.update(id, patch).await?;

        if newly_verified {
            info!(organization_id = %id, owner_id = %current.owner_id, "organization verified");
            crate::users::promote_to_organizer_if_plain_user(&self.users, current.owner_id)
                .await?;
        }

        Ok(updated)
    }

    /// Owner or admin soft delete. An admin or super-admin must state a
    /// reason even for their own organization; when the deleter is not
    /// the owner, the owner gets one system notification naming the
    /// organization and the reason.
    pub async fn remove(
        &self,
        id: Uuid,
        principal: &Principal,
        reason: Option<&str>,
    ) -> JcmapResult<()> {
        let organization = self.organizations.get_by_id(id).await?;
        let is_owner = principal.id == organization.owner_id;

        if !is_owner && !principal.role.is_admin() {
            return Err(JcmapError::AuthorizationDenied {
                reason: "only the owner or an admin may delete an organization".into(),
            });
        }
        if principal.role.is_admin()
            && reason.map(str::trim).filter(|r| !r.is_empty()).is_none()
        {
            return Err(JcmapError::AuthorizationDenied {
                reason: "administrative deletion requires a reason".into(),
            });
        }

        self.organizations.soft_delete(id).await?;
        info!(organization_id = %id, deleted_by = %principal.id, "organization soft-deleted");

        if !is_owner {
            let reason = reason.unwrap_or_default();
            self.notifications
                .create(CreateNotification {
                    user_id: organization.owner_id,
                    title: "Organisation supprimée".into(),
                    message: format!(
                        "Votre organisation \"{}\" a été supprimée par l'administration. \
                         Motif : {reason}",
                        organization.name
                    ),
                    kind: NotificationType::System,
                })
                .await?;
        }

        Ok(())
    }
}
