use adgrab_engine::{ArchiveError, FetchError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use engine_logging::{engine_error, engine_warn};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadInput(String),
    #[error("failed to load target page")]
    PageLoad(#[source] FetchError),
    #[error("{0}")]
    ProxyInput(String),
    #[error("failed to fetch image")]
    ProxyUpstream(#[source] FetchError),
    #[error("failed to build archive")]
    Archive(#[source] ArchiveError),
}

impl From<ArchiveError> for ApiError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::NoUrls => ApiError::BadInput(empty_urls_message()),
            other => ApiError::Archive(other),
        }
    }
}

pub(crate) fn empty_urls_message() -> String {
    "send { \"urls\": [ ... ] } with at least one url".to_string()
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadInput(message) => json_error(StatusCode::BAD_REQUEST, message, None),
            ApiError::PageLoad(ref err) => {
                engine_warn!("page load failed kind={} detail={}", err.kind, err.message);
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    self.to_string(),
                    Some(err.to_string()),
                )
            }
            ApiError::ProxyInput(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::ProxyUpstream(ref err) => {
                engine_warn!("proxy failed kind={} detail={}", err.kind, err.message);
                (StatusCode::BAD_GATEWAY, self.to_string()).into_response()
            }
            ApiError::Archive(ref err) => {
                engine_error!("archive failed err={}", err);
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    self.to_string(),
                    Some(err.to_string()),
                )
            }
        }
    }
}

fn json_error(status: StatusCode, error: String, detail: Option<String>) -> Response {
    (status, Json(ErrorBody { error, detail })).into_response()
}
