//! Integration tests for the Event repository using in-memory SurrealDB.

use chrono::{Duration, Utc};
use jcmap_core::models::event::{CreateEvent, EventFilter, UpdateEvent};
use jcmap_core::models::organization::CreateOrganization;
use jcmap_core::models::user::{CreateUser, UserRole};
use jcmap_core::repository::{EventRepository, OrganizationRepository, UserRepository};
use jcmap_db::repository::{
    SurrealEventRepository, SurrealOrganizationRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

/// Helper: spin up in-memory DB, run migrations, create an organizer.
async fn setup() -> (Surreal<Db>, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    jcmap_db::run_migrations(&db).await.unwrap();

    let users = SurrealUserRepository::new(db.clone());
    let organizer = users
        .create(CreateUser {
            email: Some("organizer@example.com".into()),
            phone: None,
            username: None,
            password_hash: "hash".into(),
            full_name: Some("The Organizer".into()),
            role: UserRole::Organizer,
        })
        .await
        .unwrap();

    (db, organizer.id)
}

fn new_event(title: &str, organizer_id: Uuid) -> CreateEvent {
    let start = Utc::now() + Duration::days(7);
    CreateEvent {
        title: title.into(),
        description: None,
        kind: "Rue".into(),
        category: None,
        latitude: 6.37,
        longitude: 2.39,
        address: "Carrefour St Michel".into(),
        start_datetime: start,
        end_datetime: start + Duration::hours(3),
        image_url: None,
        organizer_id,
        organization_id: None,
    }
}

async fn new_user(db: &Surreal<Db>, email: &str) -> Uuid {
    SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            email: Some(email.into()),
            phone: None,
            username: None,
            password_hash: "hash".into(),
            full_name: None,
            role: UserRole::User,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn create_always_derives_location_and_defaults_category() {
    let (db, organizer_id) = setup().await;
    let repo = SurrealEventRepository::new(db);

    let event = repo.create(new_event("Croisade", organizer_id)).await.unwrap();

    assert_eq!(event.title, "Croisade");
    assert_eq!(event.category, "general");
    assert_eq!(event.organizer_id, organizer_id);
    let point = event.location.expect("location is always derived");
    assert_eq!(point.longitude, 2.39);
    assert_eq!(point.latitude, 6.37);
}

#[tokio::test]
async fn detail_loads_organizer_organization_and_participants() {
    let (db, organizer_id) = setup().await;

    let orgs = SurrealOrganizationRepository::new(db.clone());
    let org = orgs
        .create(CreateOrganization {
            name: "Host Church".into(),
            description: None,
            website: None,
            address: None,
            latitude: None,
            longitude: None,
            logo_url: None,
            owner_id: organizer_id,
        })
        .await
        .unwrap();

    let repo = SurrealEventRepository::new(db.clone());
    let event = repo
        .create(CreateEvent {
            organization_id: Some(org.id),
            ..new_event("Hosted", organizer_id)
        })
        .await
        .unwrap();

    let participant = new_user(&db, "joiner@example.com").await;
    repo.add_participant(event.id, participant).await.unwrap();

    let detail = repo.get_detail(event.id).await.unwrap();
    assert_eq!(detail.event.id, event.id);
    assert_eq!(detail.organizer.id, organizer_id);
    assert_eq!(detail.organization.unwrap().id, org.id);
    assert_eq!(detail.participants.len(), 1);
    assert_eq!(detail.participants[0].id, participant);
}

#[tokio::test]
async fn list_filters_and_orders_by_start() {
    let (db, organizer_id) = setup().await;
    let repo = SurrealEventRepository::new(db);

    let later = repo
        .create(CreateEvent {
            start_datetime: Utc::now() + Duration::days(30),
            end_datetime: Utc::now() + Duration::days(30) + Duration::hours(2),
            category: Some("conference".into()),
            ..new_event("Later", organizer_id)
        })
        .await
        .unwrap();
    let sooner = repo.create(new_event("Sooner", organizer_id)).await.unwrap();

    let all = repo.list(EventFilter::default()).await.unwrap();
    let ids: Vec<Uuid> = all.iter().map(|e| e.id).collect();
    assert_eq!(ids, [sooner.id, later.id]);

    let by_category = repo
        .list(EventFilter {
            category: Some("conference".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].id, later.id);

    let by_search = repo
        .list(EventFilter {
            search: Some("SOON".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_search.len(), 1);
    assert_eq!(by_search[0].id, sooner.id);
}

#[tokio::test]
async fn nearby_orders_by_distance_and_honors_radius() {
    let (db, organizer_id) = setup().await;
    let repo = SurrealEventRepository::new(db);

    let (lat, lng) = (6.37, 2.39);
    for (title, offset) in [("one-km", 0.009), ("five-km", 0.045), ("nine-km", 0.081)] {
        repo.create(CreateEvent {
            latitude: lat + offset,
            longitude: lng,
            ..new_event(title, organizer_id)
        })
        .await
        .unwrap();
    }

    let within_ten = repo.find_nearby(lat, lng, 10.0).await.unwrap();
    let titles: Vec<&str> = within_ten.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["one-km", "five-km", "nine-km"]);

    let within_six = repo.find_nearby(lat, lng, 6.0).await.unwrap();
    let titles: Vec<&str> = within_six.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["one-km", "five-km"]);
}

#[tokio::test]
async fn update_keeps_organizer_and_moves_location_with_both_coordinates() {
    let (db, organizer_id) = setup().await;
    let repo = SurrealEventRepository::new(db);

    let event = repo.create(new_event("Movable", organizer_id)).await.unwrap();

    let updated = repo
        .update(
            event.id,
            UpdateEvent {
                title: Some("Moved".into()),
                latitude: Some(7.0),
                longitude: Some(3.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Moved");
    assert_eq!(updated.organizer_id, organizer_id);
    let point = updated.location.expect("point should move");
    assert_eq!(point.latitude, 7.0);
    assert_eq!(point.longitude, 3.0);
}

#[tokio::test]
async fn participation_is_idempotent() {
    let (db, organizer_id) = setup().await;
    let repo = SurrealEventRepository::new(db.clone());

    let event = repo.create(new_event("Joinable", organizer_id)).await.unwrap();
    let user_id = new_user(&db, "joiner@example.com").await;

    repo.add_participant(event.id, user_id).await.unwrap();
    repo.add_participant(event.id, user_id).await.unwrap();

    let detail = repo.get_detail(event.id).await.unwrap();
    assert_eq!(detail.participants.len(), 1);

    repo.remove_participant(event.id, user_id).await.unwrap();
    // Leaving twice is fine.
    repo.remove_participant(event.id, user_id).await.unwrap();

    let detail = repo.get_detail(event.id).await.unwrap();
    assert!(detail.participants.is_empty());
}

#[tokio::test]
async fn joining_a_missing_event_is_not_found() {
    let (db, _organizer_id) = setup().await;
    let repo = SurrealEventRepository::new(db.clone());

    let user_id = new_user(&db, "joiner@example.com").await;
    let result = repo.add_participant(Uuid::new_v4(), user_id).await;
    assert!(result.is_err(), "joining a missing event should fail");
}

#[tokio::test]
async fn favorites_round_trip() {
    let (db, organizer_id) = setup().await;
    let repo = SurrealEventRepository::new(db.clone());

    let event = repo.create(new_event("Favoritable", organizer_id)).await.unwrap();
    let user_id = new_user(&db, "fan@example.com").await;

    assert!(!repo.is_favorited(event.id, user_id).await.unwrap());

    repo.add_favorite(event.id, user_id).await.unwrap();
    assert!(repo.is_favorited(event.id, user_id).await.unwrap());

    repo.remove_favorite(event.id, user_id).await.unwrap();
    assert!(!repo.is_favorited(event.id, user_id).await.unwrap());
}

#[tokio::test]
async fn hard_delete_removes_event_and_edges() {
    let (db, organizer_id) = setup().await;
    let repo = SurrealEventRepository::new(db.clone());

    let event = repo.create(new_event("Doomed", organizer_id)).await.unwrap();
    let user_id = new_user(&db, "joiner@example.com").await;
    repo.add_participant(event.id, user_id).await.unwrap();
    repo.add_favorite(event.id, user_id).await.unwrap();

    repo.delete(event.id).await.unwrap();

    assert!(repo.get_by_id(event.id).await.is_err());
    assert!(!repo.is_favorited(event.id, user_id).await.unwrap());
}
