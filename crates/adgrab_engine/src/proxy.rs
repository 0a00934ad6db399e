use std::sync::Arc;

use adgrab_core::parse_http_url;
use bytes::Bytes;
use engine_logging::engine_info;
use futures_util::stream::BoxStream;

use crate::fetch::Fetcher;
use crate::{FetchError, FetchPurpose};

pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
pub const PROXY_CACHE_CONTROL: &str = "public, max-age=300";

/// Image relayed from upstream; the body is streamed, never buffered whole.
pub struct ProxiedImage {
    pub content_type: String,
    pub content_length: Option<u64>,
    pub cache_control: &'static str,
    pub body: BoxStream<'static, Result<Bytes, FetchError>>,
}

pub struct ImageProxy {
    fetcher: Arc<dyn Fetcher>,
}

impl ImageProxy {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Open `raw_url` upstream. Input errors are reported before any request is made.
    pub async fn open(&self, raw_url: &str) -> Result<ProxiedImage, FetchError> {
        let url = parse_http_url(raw_url)?;
        let upstream = self.fetcher.open(&url, FetchPurpose::Image).await?;
        let content_type = upstream
            .content_type
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());
        engine_info!(
            "proxying image content_type={} length={:?} url={}",
            content_type,
            upstream.content_length,
            url
        );
        Ok(ProxiedImage {
            content_type,
            content_length: upstream.content_length,
            cache_control: PROXY_CACHE_CONTROL,
            body: upstream.body,
        })
    }
}
