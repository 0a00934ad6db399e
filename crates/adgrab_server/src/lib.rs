//! Adgrab HTTP surface: image discovery, image proxy and zip download endpoints.
mod api;
mod config;
mod state;

pub use api::{build_router, ApiError, JSON_BODY_LIMIT};
pub use config::{ConfigError, ExtractMode, ServerConfig};
pub use state::AppState;
