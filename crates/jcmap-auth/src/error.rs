//! Authentication error types.

use jcmap_core::error::JcmapError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("no login identifier supplied")]
    MissingIdentifier,

    #[error("password shorter than the configured minimum")]
    PasswordTooShort,

    #[error("email, phone or username already in use")]
    IdentifierTaken,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for JcmapError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => JcmapError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::MissingIdentifier | AuthError::PasswordTooShort => JcmapError::Validation {
                message: err.to_string(),
            },
            AuthError::IdentifierTaken => JcmapError::Conflict {
                entity: "user".into(),
            },
            AuthError::TokenExpired | AuthError::TokenInvalid(_) => {
                JcmapError::AuthenticationFailed {
                    reason: err.to_string(),
                }
            }
            AuthError::Crypto(msg) => JcmapError::Crypto(msg),
        }
    }
}
