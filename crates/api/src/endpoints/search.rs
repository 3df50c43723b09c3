//! Search endpoint.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use photoshare_common::{AppResult, Page, Paginator};
use photoshare_core::PhotoResponse;
use serde::{Deserialize, Serialize};

use crate::{extractors::MaybeAuthUser, middleware::AppState, response::ApiResponse};

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Free-text term.
    pub q: Option<String>,
    /// 1-indexed page number.
    pub page: Option<u64>,
}

/// Search payload.
#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(flatten)]
    pub results: Page<PhotoResponse>,
}

/// Free-text search over public photos. An empty query yields an empty
/// result set, not an error.
async fn search(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<ApiResponse<SearchResponse>> {
    let viewer_id = viewer.as_ref().map(|u| u.id.as_str());
    let term = query.q.unwrap_or_default();

    let results = if term.trim().is_empty() {
        Paginator::photos().page_of(Vec::new(), 1, 0)
    } else {
        state
            .photo_service
            .search(term.trim(), query.page, viewer_id)
            .await?
    };

    Ok(ApiResponse::ok(SearchResponse {
        query: term,
        results,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/search/", get(search))
}
