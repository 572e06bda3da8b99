//! Integration tests for the Notification repository using in-memory
//! SurrealDB.

use jcmap_core::models::notification::{CreateNotification, NotificationType};
use jcmap_core::models::user::{CreateUser, UserRole};
use jcmap_core::repository::{NotificationRepository, UserRepository};
use jcmap_db::repository::{SurrealNotificationRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> (Surreal<Db>, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    jcmap_db::run_migrations(&db).await.unwrap();

    let users = SurrealUserRepository::new(db.clone());
    let user = users
        .create(CreateUser {
            email: Some("reader@example.com".into()),
            phone: None,
            username: None,
            password_hash: "hash".into(),
            full_name: None,
            role: UserRole::User,
        })
        .await
        .unwrap();

    (db, user.id)
}

fn new_notification(user_id: Uuid, title: &str) -> CreateNotification {
    CreateNotification {
        user_id,
        title: title.into(),
        message: "Un evenement demarre pres de chez vous".into(),
        kind: NotificationType::Event,
    }
}

#[tokio::test]
async fn create_starts_unread() {
    let (db, user_id) = setup().await;
    let repo = SurrealNotificationRepository::new(db);

    let notification = repo
        .create(new_notification(user_id, "Nouvel evenement"))
        .await
        .unwrap();

    assert_eq!(notification.user_id, user_id);
    assert_eq!(notification.kind, NotificationType::Event);
    assert!(!notification.is_read);
}

#[tokio::test]
async fn list_is_newest_first_and_scoped_to_user() {
    let (db, user_id) = setup().await;
    let repo = SurrealNotificationRepository::new(db.clone());

    let first = repo.create(new_notification(user_id, "first")).await.unwrap();
    let second = repo.create(new_notification(user_id, "second")).await.unwrap();

    let other = SurrealUserRepository::new(db)
        .create(CreateUser {
            email: Some("other@example.com".into()),
            phone: None,
            username: None,
            password_hash: "hash".into(),
            full_name: None,
            role: UserRole::User,
        })
        .await
        .unwrap();
    repo.create(new_notification(other.id, "elsewhere")).await.unwrap();

    let listed = repo.list_by_user(user_id).await.unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|n| n.id).collect();
    assert_eq!(ids, [second.id, first.id]);
}

#[tokio::test]
async fn mark_as_read_flips_the_flag() {
    let (db, user_id) = setup().await;
    let repo = SurrealNotificationRepository::new(db);

    let notification = repo
        .create(new_notification(user_id, "to read"))
        .await
        .unwrap();

    let read = repo.mark_as_read(notification.id, user_id).await.unwrap();
    assert!(read.is_read);
    assert_eq!(repo.count_unread(user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn mark_as_read_rejects_other_users() {
    let (db, user_id) = setup().await;
    let repo = SurrealNotificationRepository::new(db);

    let notification = repo
        .create(new_notification(user_id, "private"))
        .await
        .unwrap();

    let stranger = Uuid::new_v4();
    let result = repo.mark_as_read(notification.id, stranger).await;
    assert!(result.is_err(), "someone else's notification is not found");

    // The flag stays untouched.
    assert_eq!(repo.count_unread(user_id).await.unwrap(), 1);
}

#[tokio::test]
async fn count_unread_ignores_read_rows() {
    let (db, user_id) = setup().await;
    let repo = SurrealNotificationRepository::new(db);

    let a = repo.create(new_notification(user_id, "a")).await.unwrap();
    repo.create(new_notification(user_id, "b")).await.unwrap();
    assert_eq!(repo.count_unread(user_id).await.unwrap(), 2);

    repo.mark_as_read(a.id, user_id).await.unwrap();
    assert_eq!(repo.count_unread(user_id).await.unwrap(), 1);
}
