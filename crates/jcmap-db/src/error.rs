//! Database-specific error types and conversions.

use jcmap_core::error::JcmapError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Row decode failed: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for JcmapError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => JcmapError::NotFound { entity, id },
            other => JcmapError::Database(other.to_string()),
        }
    }
}
