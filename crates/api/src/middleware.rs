//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use photoshare_core::{
    AlbumService, CategoryService, CommentService, FollowService, LikeService, MediaService,
    PhotoService, SeoService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub photo_service: PhotoService,
    pub like_service: LikeService,
    pub follow_service: FollowService,
    pub album_service: AlbumService,
    pub category_service: CategoryService,
    pub comment_service: CommentService,
    pub media_service: MediaService,
    pub seo_service: SeoService,
}

/// Authentication middleware.
///
/// Resolves a `Bearer` token to a user and stores it in the request
/// extensions for the `AuthUser`/`MaybeAuthUser` extractors.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.user_service.authenticate_by_token(token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(_) => {
                tracing::debug!("Presented bearer token did not resolve to a user");
            }
        }
    }

    next.run(req).await
}
