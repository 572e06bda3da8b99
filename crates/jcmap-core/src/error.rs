//! Error types for the JCMap core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JcmapError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    Conflict { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Image storage error: {0}")]
    ImageStorage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type JcmapResult<T> = Result<T, JcmapError>;
