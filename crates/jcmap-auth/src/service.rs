//! Authentication service — registration and login orchestration.

use jcmap_core::error::{JcmapError, JcmapResult};
use jcmap_core::models::user::{CreateUser, UserRole, UserSummary};
use jcmap_core::repository::UserRepository;
use tracing::info;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the registration flow. At least one of email/phone/username
/// must be supplied.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub username: Option<String>,
    pub password: String,
    pub full_name: Option<String>,
}

/// Successful registration or login result.
#[derive(Debug, Clone)]
pub struct AuthOutput {
    /// Signed JWT access token embedding { sub, email, role }.
    pub access_token: String,
    /// Summary view of the authenticated user. Never carries the
    /// password hash.
    pub user: UserSummary,
}

/// Authentication service.
///
/// Generic over the user repository so this layer has no dependency on
/// the database crate.
pub struct AuthService<U: UserRepository> {
    users: U,
    config: AuthConfig,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(users: U, config: AuthConfig) -> Self {
        Self { users, config }
    }

    /// Register a new user and immediately log them in.
    ///
    /// Fails with `Conflict` when any supplied identifier already
    /// belongs to another user, and with `Validation` when no
    /// identifier is supplied or the password is below the configured
    /// minimum length.
    pub async fn register(&self, input: RegisterInput) -> JcmapResult<AuthOutput> {
        let RegisterInput {
            email,
            phone,
            username,
            password,
            full_name,
        } = input;

        if email.is_none() && phone.is_none() && username.is_none() {
            return Err(AuthError::MissingIdentifier.into());
        }
        if password.chars().count() < self.config.min_password_length {
            return Err(AuthError::PasswordTooShort.into());
        }

        let taken = self
            .users
            .identifier_in_use(email.as_deref(), phone.as_deref(), username.as_deref())
            .await?;
        if taken {
            return Err(AuthError::IdentifierTaken.into());
        }

        let password_hash = password::hash_password(&password, self.config.pepper.as_deref())?;

        // Kept for the follow-up login; any supplied identifier works.
        let login_identifier = email
            .clone()
            .or_else(|| username.clone())
            .or_else(|| phone.clone())
            .unwrap_or_default();

        let user = self
            .users
            .create(CreateUser {
                email,
                phone,
                username,
                password_hash,
                full_name,
                role: UserRole::User,
            })
            .await?;

        info!(user_id = %user.id, "registered new user");

        self.login(&login_identifier, &password).await
    }

    /// Authenticate with any of the user's identifiers plus password and
    /// issue an access token.
    pub async fn login(&self, identifier: &str, password: &str) -> JcmapResult<AuthOutput> {
        let user = match self.users.get_by_login_identifier(identifier).await {
            Ok(user) => user,
            Err(JcmapError::NotFound { .. }) => {
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let valid =
            password::verify_password(password, &user.password_hash, self.config.pepper.as_deref())?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token =
            token::issue_access_token(user.id, user.email.as_deref(), user.role, &self.config)?;

        Ok(AuthOutput {
            access_token,
            user: UserSummary::from(&user),
        })
    }
}
