//! SurrealDB implementation of [`NotificationRepository`].

use chrono::{DateTime, Utc};
use jcmap_core::error::JcmapResult;
use jcmap_core::models::notification::{CreateNotification, Notification, NotificationType};
use jcmap_core::repository::NotificationRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct NotificationRowWithId {
    record_id: String,
    title: String,
    message: String,
    kind: String,
    is_read: bool,
    user_id: String,
    created_at: DateTime<Utc>,
}

impl NotificationRowWithId {
    fn try_into_notification(self) -> Result<Notification, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Decode(format!("invalid user UUID: {e}")))?;
        let kind = NotificationType::parse(&self.kind)
            .ok_or_else(|| DbError::Decode(format!("unknown notification type: {}", self.kind)))?;
        Ok(Notification {
            id,
            title: self.title,
            message: self.message,
            kind,
            is_read: self.is_read,
            user_id,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Notification repository.
#[derive(Clone)]
pub struct SurrealNotificationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealNotificationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id_str: &str) -> Result<Notification, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('notification', $id)",
            )
            .bind(("id", id_str.to_string()))
            .await?;

        let rows: Vec<NotificationRowWithId> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "notification".into(),
            id: id_str.to_string(),
        })?;

        row.try_into_notification()
    }
}

impl<C: Connection> NotificationRepository for SurrealNotificationRepository<C> {
    async fn create(&self, input: CreateNotification) -> JcmapResult<Notification> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        self.db
            .query(
                "CREATE type::record('notification', $id) SET \
                 title = $title, message = $message, kind = $kind, \
                 user_id = $user_id \
                 RETURN NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("title", input.title))
            .bind(("message", input.message))
            .bind(("kind", input.kind.as_str().to_string()))
            .bind(("user_id", input.user_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        Ok(self.fetch(&id_str).await?)
    }

    async fn list_by_user(&self, user_id: Uuid) -> JcmapResult<Vec<Notification>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM notification \
                 WHERE user_id = $user_id \
                 ORDER BY created_at DESC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<NotificationRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_notification())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn mark_as_read(&self, id: Uuid, user_id: Uuid) -> JcmapResult<Notification> {
        let id_str = id.to_string();

        // Ownership is part of the predicate: someone else's
        // notification behaves like a missing one.
        self.db
            .query(
                "UPDATE type::record('notification', $id) SET is_read = true \
                 WHERE user_id = $user_id \
                 RETURN NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::from)?;

        let notification = self.fetch(&id_str).await?;
        if notification.user_id != user_id {
            return Err(DbError::NotFound {
                entity: "notification".into(),
                id: id_str,
            }
            .into());
        }

        Ok(notification)
    }

    async fn count_unread(&self, user_id: Uuid) -> JcmapResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM notification \
                 WHERE user_id = $user_id AND is_read = false \
                 GROUP ALL",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
