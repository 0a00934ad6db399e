use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;

use super::error::empty_urls_message;
use crate::{ApiError, AppState};

const ARCHIVE_FILENAME: &str = "images.zip";
const ENTRIES_HEADER: HeaderName = HeaderName::from_static("x-archive-entries");
const SKIPPED_HEADER: HeaderName = HeaderName::from_static("x-archive-skipped");

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    urls: Vec<Value>,
}

impl DownloadRequest {
    /// Non-string entries are kept as their JSON text so the archiver
    /// rejects and skips them like any other malformed url.
    fn into_urls(self) -> Vec<String> {
        self.urls
            .into_iter()
            .map(|value| match value {
                Value::String(url) => url,
                other => other.to_string(),
            })
            .collect()
    }
}

/// Body is taken raw so every malformed payload maps to the same 400 shape.
pub async fn download_zip(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: DownloadRequest = serde_json::from_slice(&body)
        .map_err(|err| ApiError::BadInput(format!("{} ({err})", empty_urls_message())))?;
    if request.urls.is_empty() {
        return Err(ApiError::BadInput(empty_urls_message()));
    }

    let output = state.archiver().build(request.into_urls()).await?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/zip"));
    let disposition = format!("attachment; filename=\"{ARCHIVE_FILENAME}\"");
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(CONTENT_DISPOSITION, value);
    }
    headers.insert(ENTRIES_HEADER, HeaderValue::from(output.summary.succeeded));
    headers.insert(SKIPPED_HEADER, HeaderValue::from(output.summary.skipped));

    Ok((headers, output.bytes).into_response())
}
