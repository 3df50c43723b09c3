//! Album endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use photoshare_common::AppResult;
use photoshare_core::{
    AlbumListing, AlbumResponse, CreateAlbumInput, album::AlbumDetailResponse,
};
use serde::Deserialize;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Album listing query parameters.
#[derive(Debug, Deserialize)]
pub struct AlbumListQuery {
    /// Sort key: `newest`, `oldest`, `popular`, `photos`.
    pub sort: Option<String>,
    /// 1-indexed page number.
    pub page: Option<u64>,
}

/// Public album listing with sorting, pagination, and site totals.
async fn list_albums(
    State(state): State<AppState>,
    Query(query): Query<AlbumListQuery>,
) -> AppResult<ApiResponse<AlbumListing>> {
    let listing = state
        .album_service
        .list_public(query.sort.as_deref(), query.page)
        .await?;
    Ok(ApiResponse::ok(listing))
}

/// Album detail with its visible photos.
async fn album_detail(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(album_id): Path<String>,
) -> AppResult<ApiResponse<AlbumDetailResponse>> {
    let viewer_id = viewer.as_ref().map(|u| u.id.as_str());
    let detail = state.album_service.detail(&album_id, viewer_id).await?;
    Ok(ApiResponse::ok(detail))
}

/// Create a new album.
async fn create_album(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAlbumInput>,
) -> AppResult<ApiResponse<AlbumResponse>> {
    let album = state.album_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(album))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/albums/", get(list_albums))
        .route("/album/create/", post(create_album))
        .route("/album/{id}/", get(album_detail))
}
