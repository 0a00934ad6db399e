use adgrab_core::parse_http_url;
use adgrab_engine::DEFAULT_IMAGE_LIMIT;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct FetchImagesQuery {
    url: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FetchImagesResponse {
    ok: bool,
    count: usize,
    images: Vec<String>,
}

pub async fn fetch_images(
    State(state): State<AppState>,
    Query(query): Query<FetchImagesQuery>,
) -> Result<Json<FetchImagesResponse>, ApiError> {
    let url = query
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::BadInput("parameter 'url' is required".to_string()))?;
    parse_http_url(&url).map_err(|err| ApiError::BadInput(err.to_string()))?;
    let limit = parse_limit(query.limit.as_deref())?;

    let images = state
        .extractor()
        .extract(&url, limit)
        .await
        .map_err(ApiError::PageLoad)?;

    Ok(Json(FetchImagesResponse {
        ok: true,
        count: images.len(),
        images,
    }))
}

fn parse_limit(raw: Option<&str>) -> Result<usize, ApiError> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(DEFAULT_IMAGE_LIMIT),
        Some(raw) => raw.parse::<usize>().map_err(|_| {
            ApiError::BadInput(format!("parameter 'limit' must be a non-negative integer, got {raw:?}"))
        }),
    }
}
