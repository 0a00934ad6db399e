use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("url is required")]
    Missing,
    #[error("malformed url: {0}")]
    Malformed(String),
    #[error("unsupported url scheme `{0}`; only http and https are accepted")]
    UnsupportedScheme(String),
}

/// Parse caller-supplied input into an absolute `http`/`https` URL.
pub fn parse_http_url(raw: &str) -> Result<Url, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::Missing);
    }
    let url = Url::parse(trimmed).map_err(|err| InputError::Malformed(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(InputError::UnsupportedScheme(other.to_string())),
    }
}
