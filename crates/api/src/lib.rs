//! HTTP API layer for photoshare-rs.
//!
//! This crate provides the JSON API:
//!
//! - **Endpoints**: photos, albums, categories, profiles, search, auth, SEO
//! - **Extractors**: Authentication via bearer tokens
//! - **Middleware**: Request logging, CORS, auth resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
