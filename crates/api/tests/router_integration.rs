//! Router integration tests.
//!
//! These tests drive the assembled router with `tower::ServiceExt::oneshot`
//! against a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
};
use chrono::Utc;
use photoshare_api::{AppState, middleware::auth_middleware, router as api_router};
use photoshare_common::LocalStorage;
use photoshare_core::{
    AlbumService, CategoryService, CommentService, FollowService, LikeService, MediaService,
    PhotoService, SeoService, UserService,
};
use photoshare_db::entities::user;
use photoshare_db::repositories::{
    AlbumRepository, CategoryRepository, CommentRepository, FollowRepository, PhotoRepository,
    UserRepository,
};
use sea_orm::{DatabaseConnection, MockDatabase, DatabaseBackend};
use tower::ServiceExt;

fn test_user(id: &str, username: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        username_lower: username.to_lowercase(),
        email: format!("{username}@example.com"),
        password_hash: "hash".to_string(),
        token: Some("testtoken".to_string()),
        bio: None,
        website: None,
        location: None,
        avatar_url: None,
        followers_count: 0,
        following_count: 0,
        photos_count: 0,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Assemble the full router over a prepared mock connection.
fn test_app(db: DatabaseConnection) -> Router {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let photo_repo = PhotoRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let album_repo = AlbumRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));

    let storage = Arc::new(LocalStorage::new(
        PathBuf::from(std::env::temp_dir()).join("photoshare-router-tests"),
        "/media".to_string(),
    ));
    let media_service = MediaService::new(storage, 1024 * 1024);

    let user_service = UserService::new(
        user_repo.clone(),
        photo_repo.clone(),
        follow_repo.clone(),
    );
    let comment_service = CommentService::new(
        comment_repo.clone(),
        photo_repo.clone(),
        user_repo.clone(),
    );
    let photo_service = PhotoService::new(
        photo_repo.clone(),
        user_repo.clone(),
        category_repo.clone(),
        comment_service.clone(),
        media_service.clone(),
    );
    let like_service = LikeService::new(photo_repo.clone());
    let follow_service = FollowService::new(follow_repo, user_repo.clone());
    let album_service = AlbumService::new(
        album_repo.clone(),
        photo_repo.clone(),
        user_repo.clone(),
    );
    let category_service = CategoryService::new(category_repo.clone());
    let seo_service = SeoService::new(
        photo_repo,
        album_repo,
        category_repo,
        user_repo,
        "https://example.com",
    );

    let state = AppState {
        user_service,
        photo_service,
        like_service,
        follow_service,
        album_service,
        category_service,
        comment_service,
        media_service,
        seo_service,
    };

    Router::new()
        .merge(api_router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_robots_txt_is_plain_text() {
    let app = test_app(
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/robots.txt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain"
    );

    let body = body_string(response).await;
    assert!(body.starts_with("User-agent: *"));
    assert!(body.contains("Sitemap: https://example.com/sitemap.xml"));
}

#[tokio::test]
async fn test_sitemap_xml_content_type() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<photoshare_db::entities::photo::Model>::new()])
        .append_query_results([Vec::<photoshare_db::entities::album::Model>::new()])
        .append_query_results([Vec::<photoshare_db::entities::category::Model>::new()])
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();

    let response = test_app(db)
        .oneshot(
            Request::builder()
                .uri("/sitemap.xml")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/xml"
    );

    let body = body_string(response).await;
    assert!(body.contains("<loc>https://example.com/photos/</loc>"));
}

#[tokio::test]
async fn test_like_requires_authentication() {
    let app = test_app(
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/photo/p1/like/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_requires_authentication() {
    let app = test_app(
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/photo/upload/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_self_follow_is_rejected_with_400() {
    let alice = test_user("u1", "alice");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // token resolution in the auth middleware
        .append_query_results([[alice.clone()]])
        // follow target lookup
        .append_query_results([[alice]])
        .into_connection();

    let response = test_app(db)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/profile/alice/follow/")
                .header(header::AUTHORIZATION, "Bearer testtoken")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_string(response).await;
    assert!(body.contains("cannot follow yourself"));
}

#[tokio::test]
async fn test_search_with_empty_query_returns_empty_page() {
    let app = test_app(
        MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/search/?q=")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("\"total\":0"));
    assert!(body.contains("\"items\":[]"));
}

#[tokio::test]
async fn test_unknown_photo_detail_is_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<photoshare_db::entities::photo::Model>::new()])
        .into_connection();

    let response = test_app(db)
        .oneshot(
            Request::builder()
                .uri("/photo/missing/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
