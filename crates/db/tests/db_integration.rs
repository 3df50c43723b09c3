//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `photoshare_test`)
//!   `TEST_DB_PASSWORD` (default: `photoshare_test`)
//!   `TEST_DB_NAME` (default: `photoshare_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::Utc;
use photoshare_db::entities::{category, photo, user};
use photoshare_db::repositories::{
    CategoryRepository, FollowRepository, PhotoRepository, UserRepository,
};
use photoshare_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::{Database, DatabaseConnection, Set};

fn ulid() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..26].to_string()
}

async fn setup() -> (TestDatabase, Arc<DatabaseConnection>) {
    let db = TestDatabase::create_unique().await.unwrap();
    photoshare_db::migrate(db.connection()).await.unwrap();
    let conn = Arc::new(Database::connect(db.config.database_url()).await.unwrap());
    (db, conn)
}

async fn insert_user(repo: &UserRepository, username: &str) -> user::Model {
    repo.create(user::ActiveModel {
        id: Set(ulid()),
        username: Set(username.to_string()),
        username_lower: Set(username.to_lowercase()),
        email: Set(format!("{username}@example.com")),
        password_hash: Set("x".to_string()),
        token: Set(Some(ulid())),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    })
    .await
    .unwrap()
}

async fn insert_photo(
    repo: &PhotoRepository,
    owner: &user::Model,
    category_id: Option<String>,
    is_public: bool,
) -> photo::Model {
    let id = ulid();
    repo.create(photo::ActiveModel {
        id: Set(id.clone()),
        user_id: Set(owner.id.clone()),
        category_id: Set(category_id),
        title: Set("Sunset".to_string()),
        image_key: Set(format!("photos/{}/{id}.jpg", owner.id)),
        image_url: Set(format!("/media/photos/{}/{id}.jpg", owner.id)),
        tags: Set(String::new()),
        is_public: Set(is_public),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    })
    .await
    .unwrap()
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_migrations_apply() {
    let config = TestDbConfig::default();
    let db = TestDatabase::with_config(config).await.unwrap();
    photoshare_db::migrate(db.connection()).await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_like_double_toggle_round_trips() {
    let (db, conn) = setup().await;
    let users = UserRepository::new(Arc::clone(&conn));
    let photos = PhotoRepository::new(Arc::clone(&conn));

    let owner = insert_user(&users, "owner").await;
    let liker = insert_user(&users, "liker").await;
    let photo = insert_photo(&photos, &owner, None, true).await;

    let (liked, count) = photos
        .toggle_like(&liker.id, &photo.id, ulid())
        .await
        .unwrap();
    assert!(liked);
    assert_eq!(count, 1);

    let (liked, count) = photos
        .toggle_like(&liker.id, &photo.id, ulid())
        .await
        .unwrap();
    assert!(!liked);
    assert_eq!(count, 0);

    // Denormalized mirror matches the edge set
    let reloaded = photos.get_by_id(&photo.id).await.unwrap();
    assert_eq!(reloaded.like_count, 0);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_follow_toggle_updates_counts() {
    let (db, conn) = setup().await;
    let users = UserRepository::new(Arc::clone(&conn));
    let follows = FollowRepository::new(Arc::clone(&conn));

    let a = insert_user(&users, "alice").await;
    let b = insert_user(&users, "bob").await;

    let (following, followers) = follows.toggle_follow(&a.id, &b.id, ulid()).await.unwrap();
    assert!(following);
    assert_eq!(followers, 1);
    assert_eq!(users.get_by_id(&b.id).await.unwrap().followers_count, 1);
    assert_eq!(users.get_by_id(&a.id).await.unwrap().following_count, 1);

    let (following, followers) = follows.toggle_follow(&a.id, &b.id, ulid()).await.unwrap();
    assert!(!following);
    assert_eq!(followers, 0);
    assert_eq!(users.get_by_id(&b.id).await.unwrap().followers_count, 0);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_self_follow_rejected_by_check_constraint() {
    let (db, conn) = setup().await;
    let users = UserRepository::new(Arc::clone(&conn));
    let follows = FollowRepository::new(Arc::clone(&conn));

    let a = insert_user(&users, "alice").await;

    // A direct insert bypassing the request layer still fails.
    let result = follows.toggle_follow(&a.id, &a.id, ulid()).await;
    assert!(result.is_err());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_view_count_increments_by_one() {
    let (db, conn) = setup().await;
    let users = UserRepository::new(Arc::clone(&conn));
    let photos = PhotoRepository::new(Arc::clone(&conn));

    let owner = insert_user(&users, "owner").await;
    let photo = insert_photo(&photos, &owner, None, true).await;

    for _ in 0..5 {
        photos.increment_view_count(&photo.id).await.unwrap();
    }
    assert_eq!(photos.get_by_id(&photo.id).await.unwrap().view_count, 5);

    photos.increment_view_count(&photo.id).await.unwrap();
    assert_eq!(photos.get_by_id(&photo.id).await.unwrap().view_count, 6);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_public_listing_sorts_and_excludes_private() {
    use photoshare_db::repositories::{PhotoQuery, PhotoSort};

    let (db, conn) = setup().await;
    let users = UserRepository::new(Arc::clone(&conn));
    let photos = PhotoRepository::new(Arc::clone(&conn));

    let owner = insert_user(&users, "owner").await;
    for i in 0..3 {
        let id = ulid();
        photos
            .create(photo::ActiveModel {
                id: Set(id.clone()),
                user_id: Set(owner.id.clone()),
                title: Set(format!("public {i}")),
                image_key: Set(format!("photos/{}/{id}.jpg", owner.id)),
                image_url: Set(format!("/media/photos/{}/{id}.jpg", owner.id)),
                tags: Set(String::new()),
                is_public: Set(true),
                created_at: Set((Utc::now() + chrono::Duration::seconds(i)).into()),
                ..Default::default()
            })
            .await
            .unwrap();
    }
    insert_photo(&photos, &owner, None, false).await;

    let public = PhotoQuery::public();
    assert_eq!(photos.count_filtered(&public).await.unwrap(), 3);

    let oldest = PhotoQuery {
        sort: PhotoSort::Oldest,
        ..PhotoQuery::public()
    };
    let listed = photos.find_filtered(&oldest, 10, 0).await.unwrap();
    assert!(listed.windows(2).all(|w| w[0].created_at <= w[1].created_at));

    let newest = photos.find_filtered(&public, 10, 0).await.unwrap();
    assert!(newest.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    assert!(newest.iter().all(|p| p.is_public));

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_category_delete_clears_photo_reference() {
    let (db, conn) = setup().await;
    let users = UserRepository::new(Arc::clone(&conn));
    let photos = PhotoRepository::new(Arc::clone(&conn));
    let categories = CategoryRepository::new(Arc::clone(&conn));

    let owner = insert_user(&users, "owner").await;
    let cat = categories
        .create(category::ActiveModel {
            id: Set(ulid()),
            name: Set("Nature".to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .await
        .unwrap();
    let photo = insert_photo(&photos, &owner, Some(cat.id.clone()), true).await;

    categories.delete(&cat.id).await.unwrap();

    let reloaded = photos.get_by_id(&photo.id).await.unwrap();
    assert_eq!(reloaded.category_id, None);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_owner_delete_cascades_to_photos() {
    let (db, conn) = setup().await;
    let users = UserRepository::new(Arc::clone(&conn));
    let photos = PhotoRepository::new(Arc::clone(&conn));

    let owner = insert_user(&users, "owner").await;
    let photo = insert_photo(&photos, &owner, None, true).await;

    use sea_orm::{EntityTrait, ModelTrait};
    owner.delete(conn.as_ref()).await.unwrap();

    let gone = photoshare_db::entities::Photo::find_by_id(photo.id.as_str())
        .one(conn.as_ref())
        .await
        .unwrap();
    assert!(gone.is_none());

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}
