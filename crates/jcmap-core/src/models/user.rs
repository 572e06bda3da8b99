//! User domain model and the role set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of user roles, serialized as the exact wire strings
/// used throughout the API (`user`, `organizer`, `admin`, `super-admin`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "organizer")]
    Organizer,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "super-admin")]
    SuperAdmin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Organizer => "organizer",
            UserRole::Admin => "admin",
            UserRole::SuperAdmin => "super-admin",
        }
    }

    pub fn parse(s: &str) -> Option<UserRole> {
        match s {
            "user" => Some(UserRole::User),
            "organizer" => Some(UserRole::Organizer),
            "admin" => Some(UserRole::Admin),
            "super-admin" => Some(UserRole::SuperAdmin),
            _ => None,
        }
    }

    /// Whether the caller has admin-level privileges.
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }

    /// Explicit role transition table.
    ///
    /// Every transition is currently permitted; the table exists so the
    /// allowed set is stated in one place instead of being implicit in
    /// an unchecked string overwrite.
    pub fn transition_allowed(from: UserRole, to: UserRole) -> bool {
        use UserRole::*;
        match (from, to) {
            (User, _) => true,
            (Organizer, _) => true,
            (Admin, _) => true,
            (SuperAdmin, _) => true,
        }
    }
}

/// The authenticated identity + role performing an operation.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub id: Uuid,
    pub role: UserRole,
}

/// Social media links attached to a user profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocialLinks {
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Each identifier is globally unique when present; at least one of
    /// email/phone/username is guaranteed by the registration flow, not
    /// by a storage constraint.
    pub email: Option<String>,
    pub phone: Option<String>,
    pub username: Option<String>,
    /// Argon2id PHC hash. Never returned to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub birthday: Option<DateTime<Utc>>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub address: Option<String>,
    pub job_title: Option<String>,
    pub avatar_url: Option<String>,
    pub social_links: SocialLinks,
    pub role: UserRole,
    /// Radius in kilometres used for proximity notifications.
    pub notification_radius: u32,
    /// Reference to the user's home organization, if any.
    pub home_church: Option<Uuid>,
    pub church_role: Option<String>,
    pub membership_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Fields required to create a new user row.
///
/// The password is hashed by the auth layer before it reaches the
/// repository; only the hash is ever stored.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub username: Option<String>,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: UserRole,
}

/// Profile fields a user (or an admin) may update.
///
/// Deliberately carries no id, password, or role — those change through
/// dedicated operations.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub birthday: Option<DateTime<Utc>>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub address: Option<String>,
    pub job_title: Option<String>,
    pub avatar_url: Option<Option<String>>,
    pub social_links: Option<SocialLinks>,
    pub notification_radius: Option<u32>,
    /// `Some(Some(id))` = set, `Some(None)` = clear, `None` = no change.
    pub home_church: Option<Option<Uuid>>,
    pub church_role: Option<String>,
    pub membership_date: Option<DateTime<Utc>>,
}

/// Public view of a user returned alongside access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: Option<String>,
    pub username: Option<String>,
    pub role: UserRole,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_strings_round_trip() {
        for role in [
            UserRole::User,
            UserRole::Organizer,
            UserRole::Admin,
            UserRole::SuperAdmin,
        ] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("root"), None);
    }

    #[test]
    fn super_admin_serializes_with_hyphen() {
        let json = serde_json::to_string(&UserRole::SuperAdmin).unwrap();
        assert_eq!(json, "\"super-admin\"");
    }

    #[test]
    fn all_transitions_are_permitted() {
        let roles = [
            UserRole::User,
            UserRole::Organizer,
            UserRole::Admin,
            UserRole::SuperAdmin,
        ];
        for from in roles {
            for to in roles {
                assert!(UserRole::transition_allowed(from, to));
            }
        }
    }
}
