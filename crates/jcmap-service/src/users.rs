//! User administration service.

use jcmap_core::error::{JcmapError, JcmapResult};
use jcmap_core::models::user::{CreateUser, Principal, UpdateUser, User, UserRole};
use jcmap_core::repository::UserRepository;
use tracing::{info, warn};
use uuid::Uuid;

use crate::access::require_role;

const ADMIN_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::SuperAdmin];

/// Promote a plain `user` to `organizer`. No-op for any other stored
/// role, so the caller may replay it safely.
pub async fn promote_to_organizer_if_plain_user<U: UserRepository>(
    users: &U,
    id: Uuid,
) -> JcmapResult<()> {
    let user = users.get_by_id(id).await?;
    if user.role == UserRole::User {
        users.update_role(id, UserRole::Organizer).await?;
        info!(user_id = %id, "promoted user to organizer");
    }
    Ok(())
}

pub struct UsersService<U: UserRepository> {
    users: U,
}

impl<U: UserRepository> UsersService<U> {
    pub fn new(users: U) -> Self {
        Self { users }
    }

    pub async fn find_one(&self, id: Uuid) -> JcmapResult<User> {
        self.users.get_by_id(id).await
    }

    pub async fn find_all(&self) -> JcmapResult<Vec<User>> {
        self.users.list().await
    }

    /// Admin-only direct creation. The password hash must already be
    /// computed; self-service signup goes through the auth service.
    pub async fn create(&self, input: CreateUser, principal: &Principal) -> JcmapResult<User> {
        require_role(principal, ADMIN_ROLES)?;
        self.users.create(input).await
    }

    /// Update profile fields. Users may edit themselves; admins may edit
    /// anyone. The patch carries no id, password, or role by
    /// construction.
    pub async fn update_profile(
        &self,
        id: Uuid,
        patch: UpdateUser,
        principal: &Principal,
    ) -> JcmapResult<User> {
        if principal.id != id {
            require_role(principal, ADMIN_ROLES)?;
        }
        self.users.update(id, patch).await
    }

    /// Admin-only role change, checked against the transition table.
    pub async fn update_role(
        &self,
        id: Uuid,
        role: UserRole,
        principal: &Principal,
    ) -> JcmapResult<User> {
        require_role(principal, ADMIN_ROLES)?;

        let current = self.users.get_by_id(id).await?;
        if !UserRole::transition_allowed(current.role, role) {
            return Err(JcmapError::Validation {
                message: format!(
                    "role transition {} -> {} is not permitted",
                    current.role.as_str(),
                    role.as_str()
                ),
            });
        }

        self.users.update_role(id, role).await
    }

    /// Admin-only soft delete. The reason is recorded in the log stream.
    pub async fn remove(&self, id: Uuid, principal: &Principal, reason: &str) -> JcmapResult<()> {
        require_role(principal, ADMIN_ROLES)?;

        self.users.soft_delete(id).await?;
        warn!(user_id = %id, deleted_by = %principal.id, reason, "user soft-deleted");
        Ok(())
    }
}
