//! Photoshare-rs server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, middleware};
use photoshare_api::{AppState, router as api_router};
use photoshare_common::{Config, LocalStorage};
use photoshare_core::{
    AlbumService, CategoryService, CommentService, FollowService, LikeService, MediaService,
    PhotoService, SeoService, UserService,
};
use photoshare_db::repositories::{
    AlbumRepository, CategoryRepository, CommentRepository, FollowRepository, PhotoRepository,
    UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pick up a local .env before reading configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photoshare=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting photoshare-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = photoshare_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    photoshare_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let photo_repo = PhotoRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let album_repo = AlbumRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));

    // Initialize file storage
    let storage = Arc::new(LocalStorage::new(
        PathBuf::from(&config.storage.path),
        config.storage.base_url.clone(),
    ));
    let media_service = MediaService::new(storage, config.storage.max_upload_bytes);

    // Initialize services
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
    let follow_service = FollowService::new(follow_repo.clone(), user_repo.clone());
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
        &config.server.url,
    );

    // Create app state
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

    // Build router
    let app = Router::new()
        .merge(api_router())
        .nest_service(
            config.storage.base_url.as_str(),
            ServeDir::new(&config.storage.path),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            photoshare_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
