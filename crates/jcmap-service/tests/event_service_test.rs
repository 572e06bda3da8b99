//! Integration tests for the event service over in-memory SurrealDB
//! repositories.

use chrono::{Duration, Utc};
use jcmap_core::error::JcmapError;
use jcmap_core::media::NoopImageStorage;
use jcmap_core::models::event::{CreateEvent, UpdateEvent};
use jcmap_core::models::user::{CreateUser, Principal, UserRole};
use jcmap_core::repository::UserRepository;
use jcmap_db::repository::{SurrealEventRepository, SurrealUserRepository};
use jcmap_service::EventsService;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type EvtService = EventsService<SurrealEventRepository<Db>, NoopImageStorage>;

async fn setup() -> (Surreal<Db>, EvtService) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    jcmap_db::run_migrations(&db).await.unwrap();

    let service = EventsService::new(SurrealEventRepository::new(db.clone()), NoopImageStorage);
    (db, service)
}

async fn create_user(db: &Surreal<Db>, email: &str, role: UserRole) -> Principal {
    let user = SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            email: Some(email.into()),
            phone: None,
            username: None,
            password_hash: "hash".into(),
            full_name: None,
            role,
        })
        .await
        .unwrap();
    Principal {
        id: user.id,
        role: user.role,
    }
}

fn new_event(title: &str) -> CreateEvent {
    let start = Utc::now() + Duration::days(7);
    CreateEvent {
        title: title.into(),
        description: None,
        kind: "Rue".into(),
        category: None,
        latitude: 6.37,
        longitude: 2.39,
        address: "Carrefour".into(),
        start_datetime: start,
        end_datetime: start + Duration::hours(3),
        image_url: None,
        // Overwritten by the service with the principal.
        organizer_id: Uuid::nil(),
        organization_id: None,
    }
}

#[tokio::test]
async fn only_organizers_and_admins_may_create() {
    let (db, service) = setup().await;
    let plain = create_user(&db, "plain@example.com", UserRole::User).await;
    let organizer = create_user(&db, "organizer@example.com", UserRole::Organizer).await;

    let denied = service.create(new_event("Blocked"), &plain).await;
    assert!(matches!(
        denied,
        Err(JcmapError::AuthorizationDenied { .. })
    ));

    let event = service.create(new_event("Allowed"), &organizer).await.unwrap();
    // The organizer of record is always the principal.
    assert_eq!(event.organizer_id, organizer.id);
}

#[tokio::test]
async fn update_is_gated_to_organizer_or_admin() {
    let (db, service) = setup().await;
    let organizer = create_user(&db, "organizer@example.com", UserRole::Organizer).await;
    let other = create_user(&db, "other@example.com", UserRole::Organizer).await;
    let admin = create_user(&db, "admin@example.com", UserRole::Admin).await;

    let event = service.create(new_event("Guarded"), &organizer).await.unwrap();

    let patch = UpdateEvent {
        title: Some("Renamed".into()),
        ..Default::default()
    };

    let denied = service.update(event.id, patch.clone(), &other).await;
    assert!(matches!(
        denied,
        Err(JcmapError::AuthorizationDenied { .. })
    ));

    let renamed = service.update(event.id, patch, &admin).await.unwrap();
    assert_eq!(renamed.title, "Renamed");
    assert_eq!(renamed.organizer_id, organizer.id);
}

#[tokio::test]
async fn remove_hard_deletes() {
    let (db, service) = setup().await;
    let organizer = create_user(&db, "organizer@example.com", UserRole::Organizer).await;

    let event = service
        .create(
            CreateEvent {
                image_url: Some(
                    "https://res.cloudinary.com/demo/image/upload/v1/jcmap/events/pic.jpg".into(),
                ),
                ..new_event("Doomed")
            },
            &organizer,
        )
        .await
        .unwrap();

    service.remove(event.id, &organizer).await.unwrap();
    assert!(service.find_one(event.id).await.is_err());
}

#[tokio::test]
async fn stranger_cannot_remove() {
    let (db, service) = setup().await;
    let organizer = create_user(&db, "organizer@example.com", UserRole::Organizer).await;
    let other = create_user(&db, "other@example.com", UserRole::Organizer).await;

    let event = service.create(new_event("Safe"), &organizer).await.unwrap();

    let denied = service.remove(event.id, &other).await;
    assert!(matches!(
        denied,
        Err(JcmapError::AuthorizationDenied { .. })
    ));
}

#[tokio::test]
async fn join_and_leave_return_refreshed_detail() {
    let (db, service) = setup().await;
    let organizer = create_user(&db, "organizer@example.com", UserRole::Organizer).await;
    let joiner = create_user(&db, "joiner@example.com", UserRole::User).await;

    let event = service.create(new_event("Joinable"), &organizer).await.unwrap();

    let detail = service.join_event(event.id, &joiner).await.unwrap();
    assert_eq!(detail.participants.len(), 1);
    assert_eq!(detail.participants[0].id, joiner.id);

    // Joining again changes nothing.
    let detail = service.join_event(event.id, &joiner).await.unwrap();
    assert_eq!(detail.participants.len(), 1);

    let detail = service.leave_event(event.id, &joiner).await.unwrap();
    assert!(detail.participants.is_empty());
}

#[tokio::test]
async fn favorite_toggle_reports_parity() {
    let (db, service) = setup().await;
    let organizer = create_user(&db, "organizer@example.com", UserRole::Organizer).await;
    let fan = create_user(&db, "fan@example.com", UserRole::User).await;

    let event = service.create(new_event("Favorite"), &organizer).await.unwrap();

    let on = service.toggle_favorite(event.id, &fan).await.unwrap();
    assert!(on.favorited);

    let off = service.toggle_favorite(event.id, &fan).await.unwrap();
    assert!(!off.favorited);

    let on_again = service.toggle_favorite(event.id, &fan).await.unwrap();
    assert!(on_again.favorited);
}

#[tokio::test]
async fn joining_a_missing_event_is_not_found() {
    let (db, service) = setup().await;
    let joiner = create_user(&db, "joiner@example.com", UserRole::User).await;

    let result = service.join_event(Uuid::new_v4(), &joiner).await;
    assert!(matches!(result, Err(JcmapError::NotFound { .. })));
}
