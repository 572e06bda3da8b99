//! Notification domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification categories, serialized as their lowercase wire strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationType {
    #[serde(rename = "event")]
    Event,
    #[serde(rename = "confirmation")]
    Confirmation,
    #[serde(rename = "reminder")]
    Reminder,
    #[serde(rename = "system")]
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Event => "event",
            NotificationType::Confirmation => "confirmation",
            NotificationType::Reminder => "reminder",
            NotificationType::System => "system",
        }
    }

    pub fn parse(s: &str) -> Option<NotificationType> {
        match s {
            "event" => Some(NotificationType::Event),
            "confirmation" => Some(NotificationType::Confirmation),
            "reminder" => Some(NotificationType::Reminder),
            "system" => Some(NotificationType::System),
            _ => None,
        }
    }
}

/// An append-only message addressed to one user.
///
/// Created only by other components as a side effect; the addressed
/// user may flip `is_read`, nothing else ever mutates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub is_read: bool,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationType,
}
