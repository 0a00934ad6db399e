mod archive;
mod error;
mod images;
mod middleware;
mod proxy;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::AppState;

pub use error::ApiError;

/// Request body cap for JSON payloads.
pub const JSON_BODY_LIMIT: usize = 2 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/fetch-images", get(images::fetch_images))
        .route("/api/proxy-image", get(proxy::proxy_image))
        .route("/api/download-zip", post(archive::download_zip))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
