//! Home page endpoint.

use axum::{Router, extract::State, routing::get};
use photoshare_common::AppResult;
use photoshare_core::{CategoryResponse, PhotoResponse};
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

/// Number of featured photos on the home page.
const FEATURED_LIMIT: u64 = 12;

/// Number of recent photos on the home page.
const RECENT_LIMIT: u64 = 8;

/// Number of top categories on the home page.
const TOP_CATEGORIES: usize = 6;

/// Home page payload.
#[derive(Serialize)]
pub struct HomeResponse {
    pub featured_photos: Vec<PhotoResponse>,
    pub recent_photos: Vec<PhotoResponse>,
    pub categories: Vec<CategoryResponse>,
}

/// Home page: featured photos, recent uploads, and top categories.
async fn home(State(state): State<AppState>) -> AppResult<ApiResponse<HomeResponse>> {
    let featured_photos = state.photo_service.featured(FEATURED_LIMIT).await?;
    let recent_photos = state.photo_service.recent(RECENT_LIMIT).await?;
    let categories = state.category_service.top(TOP_CATEGORIES).await?;

    Ok(ApiResponse::ok(HomeResponse {
        featured_photos,
        recent_photos,
        categories,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home))
}
