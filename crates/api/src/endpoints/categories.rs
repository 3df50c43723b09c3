//! Category endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use photoshare_common::{AppResult, Page};
use photoshare_core::{CategoryResponse, PhotoResponse};
use serde::{Deserialize, Serialize};

use crate::{extractors::MaybeAuthUser, middleware::AppState, response::ApiResponse};

/// Pagination query.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

/// Category page payload.
#[derive(Serialize)]
pub struct CategoryPageResponse {
    pub category: CategoryResponse,
    pub photos: Page<PhotoResponse>,
}

/// All categories with their public photo counts.
async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<CategoryResponse>>> {
    let categories = state.category_service.list().await?;
    Ok(ApiResponse::ok(categories))
}

/// Public photos in a category, newest first.
async fn category_photos(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<CategoryPageResponse>> {
    let viewer_id = viewer.as_ref().map(|u| u.id.as_str());

    let category = state.category_service.get(&category_id).await?;
    let photos = state
        .photo_service
        .list_for_category(&category.id, query.page, viewer_id)
        .await?;

    Ok(ApiResponse::ok(CategoryPageResponse { category, photos }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories/", get(list_categories))
        .route("/category/{id}/", get(category_photos))
}
