use adgrab_core::parse_http_url;
use adgrab_engine::FALLBACK_CONTENT_TYPE;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    url: Option<String>,
}

pub async fn proxy_image(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, ApiError> {
    let raw = query.url.unwrap_or_default();
    parse_http_url(&raw).map_err(|err| ApiError::ProxyInput(err.to_string()))?;

    let image = state
        .proxy()
        .open(&raw)
        .await
        .map_err(ApiError::ProxyUpstream)?;

    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(&image.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(FALLBACK_CONTENT_TYPE));
    headers.insert(CONTENT_TYPE, content_type);
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(image.cache_control));
    if let Some(length) = image.content_length {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
    }

    Ok((headers, Body::from_stream(image.body)).into_response())
}
