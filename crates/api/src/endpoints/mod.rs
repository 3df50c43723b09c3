//! API endpoints.

mod albums;
mod auth;
mod categories;
mod home;
mod photos;
mod profiles;
mod search;
mod seo;

use axum::Router;

use crate::middleware::AppState;

/// Create the application router over the full HTTP surface.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(home::router())
        .merge(auth::router())
        .merge(photos::router())
        .merge(profiles::router())
        .merge(albums::router())
        .merge(categories::router())
        .merge(search::router())
        .merge(seo::router())
}
