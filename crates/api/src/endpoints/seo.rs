//! SEO endpoints: sitemap.xml and robots.txt.
//!
//! Both are served with their non-HTML content types.

use axum::{
    Router,
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
};
use photoshare_common::AppResult;

use crate::middleware::AppState;

/// XML sitemap for search engines.
async fn sitemap_xml(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let xml = state.seo_service.sitemap_xml().await?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml))
}

/// robots.txt for crawlers.
async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.seo_service.robots_txt();
    ([(header::CONTENT_TYPE, "text/plain")], body)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sitemap.xml", get(sitemap_xml))
        .route("/robots.txt", get(robots_txt))
}
