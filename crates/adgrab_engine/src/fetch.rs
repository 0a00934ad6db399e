use std::time::Duration;

use bytes::Bytes;
use engine_logging::engine_debug;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER};
use reqwest::StatusCode;
use url::Url;

use crate::{FailureKind, FetchError, FetchMetadata, FetchOutput, FetchPurpose};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/118.0 Safari/537.36";
const PAGE_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/*,*/*;q=0.8";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub page_timeout: Duration,
    pub image_timeout: Duration,
    pub redirect_limit: usize,
    pub max_page_bytes: u64,
    pub max_image_bytes: u64,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            page_timeout: Duration::from_secs(15),
            image_timeout: Duration::from_secs(20),
            redirect_limit: 5,
            max_page_bytes: 5 * 1024 * 1024,
            max_image_bytes: 25 * 1024 * 1024,
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9,pt-BR;q=0.8".to_string(),
        }
    }
}

impl FetchSettings {
    pub fn timeout_for(&self, purpose: FetchPurpose) -> Duration {
        match purpose {
            FetchPurpose::Page => self.page_timeout,
            FetchPurpose::Image => self.image_timeout,
        }
    }

    pub fn max_bytes_for(&self, purpose: FetchPurpose) -> u64 {
        match purpose {
            FetchPurpose::Page => self.max_page_bytes,
            FetchPurpose::Image => self.max_image_bytes,
        }
    }
}

/// Upstream response whose body has not been read yet.
pub struct FetchStream {
    pub final_url: String,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub body: BoxStream<'static, Result<Bytes, FetchError>>,
}

impl std::fmt::Debug for FetchStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchStream")
            .field("final_url", &self.final_url)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Download the whole body, enforcing the per-purpose byte cap.
    async fn fetch(&self, url: &Url, purpose: FetchPurpose) -> Result<FetchOutput, FetchError>;

    /// Check status and headers, then hand the body back as a stream.
    async fn open(&self, url: &Url, purpose: FetchPurpose) -> Result<FetchStream, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    async fn send(&self, url: &Url, purpose: FetchPurpose) -> Result<reqwest::Response, FetchError> {
        let mut request = self
            .client
            .get(url.clone())
            .timeout(self.settings.timeout_for(purpose))
            .header(ACCEPT_LANGUAGE, self.settings.accept_language.as_str());
        request = match purpose {
            FetchPurpose::Page => request.header(ACCEPT, PAGE_ACCEPT),
            // Strict image hosts refuse hotlinks without a same-site referer.
            FetchPurpose::Image => request
                .header(ACCEPT, IMAGE_ACCEPT)
                .header(REFERER, referer_for(url)),
        };

        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !is_status_accepted(status, purpose) {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes_for(purpose);
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        engine_debug!(
            "upstream ok purpose={:?} status={} url={}",
            purpose,
            status.as_u16(),
            response.url()
        );
        Ok(response)
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &Url, purpose: FetchPurpose) -> Result<FetchOutput, FetchError> {
        let response = self.send(url, purpose).await?;
        let final_url = response.url().to_string();
        let content_type = header_content_type(&response);
        let max_bytes = self.settings.max_bytes_for(purpose);

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let metadata = FetchMetadata {
            original_url: url.to_string(),
            final_url,
            content_type,
            byte_len: bytes.len() as u64,
        };

        Ok(FetchOutput { bytes, metadata })
    }

    async fn open(&self, url: &Url, purpose: FetchPurpose) -> Result<FetchStream, FetchError> {
        let response = self.send(url, purpose).await?;
        let final_url = response.url().to_string();
        let content_type = header_content_type(&response);
        let content_length = response.content_length();
        let body = response.bytes_stream().map_err(map_reqwest_error).boxed();

        Ok(FetchStream {
            final_url,
            content_type,
            content_length,
            body,
        })
    }
}

fn is_status_accepted(status: StatusCode, purpose: FetchPurpose) -> bool {
    match purpose {
        FetchPurpose::Page => status.is_success() || status.is_redirection(),
        FetchPurpose::Image => status.is_success(),
    }
}

fn referer_for(url: &Url) -> String {
    format!("{}/", url.origin().ascii_serialization())
}

fn header_content_type(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
        .filter(|value| !value.trim().is_empty())
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
