//! Integration tests for the User repository using in-memory SurrealDB.

use jcmap_core::models::user::{CreateUser, SocialLinks, UpdateUser, UserRole};
use jcmap_core::repository::UserRepository;
use jcmap_db::repository::SurrealUserRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    jcmap_db::run_migrations(&db).await.unwrap();
    db
}

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: Some(email.into()),
        phone: None,
        username: None,
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
        full_name: Some("Test User".into()),
        role: UserRole::User,
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(new_user("alice@example.com")).await.unwrap();

    assert_eq!(user.email.as_deref(), Some("alice@example.com"));
    assert_eq!(user.role, UserRole::User);
    assert_eq!(user.notification_radius, 5);
    assert_eq!(user.social_links, SocialLinks::default());
    assert!(user.deleted_at.is_none());

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.email.as_deref(), Some("alice@example.com"));
}

#[tokio::test]
async fn login_identifier_matches_email_phone_or_username() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(CreateUser {
            email: Some("bob@example.com".into()),
            phone: Some("+22501020304".into()),
            username: Some("bob".into()),
            password_hash: "hash".into(),
            full_name: None,
            role: UserRole::User,
        })
        .await
        .unwrap();

    for ident in ["bob@example.com", "+22501020304", "bob"] {
        let found = repo.get_by_login_identifier(ident).await.unwrap();
        assert_eq!(found.id, user.id, "identifier {ident} should match");
    }

    let missing = repo.get_by_login_identifier("nobody@example.com").await;
    assert!(missing.is_err());
}

#[tokio::test]
async fn identifier_in_use_checks_all_supplied_identifiers() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(CreateUser {
        email: Some("carol@example.com".into()),
        phone: None,
        username: Some("carol".into()),
        password_hash: "hash".into(),
        full_name: None,
        role: UserRole::User,
    })
    .await
    .unwrap();

    assert!(
        repo.identifier_in_use(Some("carol@example.com"), None, None)
            .await
            .unwrap()
    );
    assert!(
        repo.identifier_in_use(None, None, Some("carol"))
            .await
            .unwrap()
    );
    // Union semantics: one taken identifier is enough.
    assert!(
        repo.identifier_in_use(Some("fresh@example.com"), None, Some("carol"))
            .await
            .unwrap()
    );
    assert!(
        !repo
            .identifier_in_use(Some("fresh@example.com"), Some("+2250000"), None)
            .await
            .unwrap()
    );
    // Nothing supplied, nothing taken.
    assert!(!repo.identifier_in_use(None, None, None).await.unwrap());
}

#[tokio::test]
async fn update_profile_fields() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(new_user("dave@example.com")).await.unwrap();

    let updated = repo
        .update(
            user.id,
            UpdateUser {
                full_name: Some("Dave D.".into()),
                bio: Some("evangelist".into()),
                notification_radius: Some(25),
                social_links: Some(SocialLinks {
                    facebook: Some("https://facebook.com/dave".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.full_name.as_deref(), Some("Dave D."));
    assert_eq!(updated.bio.as_deref(), Some("evangelist"));
    assert_eq!(updated.notification_radius, 25);
    assert_eq!(
        updated.social_links.facebook.as_deref(),
        Some("https://facebook.com/dave")
    );
    // Untouched fields stay.
    assert_eq!(updated.email.as_deref(), Some("dave@example.com"));
}

#[tokio::test]
async fn clear_avatar_with_double_option() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(new_user("erin@example.com")).await.unwrap();

    let with_avatar = repo
        .update(
            user.id,
            UpdateUser {
                avatar_url: Some(Some("https://cdn.example.com/a.png".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(with_avatar.avatar_url.is_some());

    let cleared = repo
        .update(
            user.id,
            UpdateUser {
                avatar_url: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.avatar_url.is_none());
}

#[tokio::test]
async fn update_role() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(new_user("frank@example.com")).await.unwrap();
    assert_eq!(user.role, UserRole::User);

    let promoted = repo.update_role(user.id, UserRole::Organizer).await.unwrap();
    assert_eq!(promoted.role, UserRole::Organizer);
}

#[tokio::test]
async fn soft_deleted_user_disappears_from_reads() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(new_user("grace@example.com")).await.unwrap();
    repo.soft_delete(user.id).await.unwrap();

    assert!(repo.get_by_id(user.id).await.is_err());
    assert!(repo.get_by_login_identifier("grace@example.com").await.is_err());
    assert!(repo.list().await.unwrap().is_empty());

    // The identifier stays reserved even after the soft delete.
    assert!(
        repo.identifier_in_use(Some("grace@example.com"), None, None)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn list_by_home_church() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let church_id = uuid::Uuid::new_v4();
    let other_church = uuid::Uuid::new_v4();

    let member = repo.create(new_user("member@example.com")).await.unwrap();
    repo.update(
        member.id,
        UpdateUser {
            home_church: Some(Some(church_id)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let outsider = repo.create(new_user("outsider@example.com")).await.unwrap();
    repo.update(
        outsider.id,
        UpdateUser {
            home_church: Some(Some(other_church)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let members = repo.list_by_home_church(church_id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, member.id);
}
