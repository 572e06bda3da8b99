//! Notification service. Thin by design: all rules live in the
//! repository predicate (ownership) and the callers that enqueue rows.

use jcmap_core::error::JcmapResult;
use jcmap_core::models::notification::{CreateNotification, Notification};
use jcmap_core::repository::NotificationRepository;
use uuid::Uuid;

pub struct NotificationsService<N: NotificationRepository> {
    notifications: N,
}

impl<N: NotificationRepository> NotificationsService<N> {
    pub fn new(notifications: N) -> Self {
        Self { notifications }
    }

    pub async fn create(&self, input: CreateNotification) -> JcmapResult<Notification> {
        self.notifications.create(input).await
    }

    pub async fn find_all_by_user(&self, user_id: Uuid) -> JcmapResult<Vec<Notification>> {
        self.notifications.list_by_user(user_id).await
    }

    pub async fn mark_as_read(&self, id: Uuid, user_id: Uuid) -> JcmapResult<Notification> {
        self.notifications.mark_as_read(id, user_id).await
    }

    pub async fn count_unread(&self, user_id: Uuid) -> JcmapResult<u64> {
        self.notifications.count_unread(user_id).await
    }
}
