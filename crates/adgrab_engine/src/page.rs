use std::sync::Arc;

use url::Url;

use crate::decode::decode_html;
use crate::fetch::Fetcher;
use crate::{FetchError, FetchPurpose};

/// Markup of a page ready for image extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    pub html: String,
    /// URL after redirects; relative image references resolve against its origin.
    pub final_url: Url,
}

/// Strategy that turns a page URL into markup.
///
/// Static pages are served from the raw response body; script-driven pages
/// need a rendered DOM snapshot. Callers of the extractor never see which.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn load(&self, url: &Url) -> Result<LoadedPage, FetchError>;

    fn name(&self) -> &'static str;
}

/// Plain HTTP download followed by charset decoding.
pub struct HttpPageSource {
    fetcher: Arc<dyn Fetcher>,
}

impl HttpPageSource {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait::async_trait]
impl PageSource for HttpPageSource {
    async fn load(&self, url: &Url) -> Result<LoadedPage, FetchError> {
        let output = self.fetcher.fetch(url, FetchPurpose::Page).await?;
        let html = decode_html(&output.bytes, output.metadata.content_type.as_deref())?;
        let final_url = Url::parse(&output.metadata.final_url).unwrap_or_else(|_| url.clone());
        Ok(LoadedPage { html, final_url })
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[cfg(feature = "headless")]
pub use headless::HeadlessPageSource;

#[cfg(feature = "headless")]
mod headless {
    use std::time::Duration;

    use chromiumoxide::browser::{Browser, BrowserConfig};
    use engine_logging::{engine_debug, engine_warn};
    use futures_util::StreamExt;
    use url::Url;

    use super::{LoadedPage, PageSource};
    use crate::{FailureKind, FetchError};

    /// Launches a headless Chromium per request and snapshots the rendered DOM.
    #[derive(Debug, Clone)]
    pub struct HeadlessPageSource {
        timeout: Duration,
    }

    impl HeadlessPageSource {
        pub fn new(timeout: Duration) -> Self {
            Self { timeout }
        }

        async fn render(&self, url: &Url) -> Result<LoadedPage, FetchError> {
            let config = BrowserConfig::builder()
                .build()
                .map_err(|err| FetchError::new(FailureKind::Browser, err))?;
            let (mut browser, mut handler) = Browser::launch(config)
                .await
                .map_err(browser_error)?;
            let events = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let snapshot = async {
                let page = browser.new_page(url.as_str()).await.map_err(browser_error)?;
                page.wait_for_navigation().await.map_err(browser_error)?;
                let html = page.content().await.map_err(browser_error)?;
                let final_url = page
                    .url()
                    .await
                    .map_err(browser_error)?
                    .and_then(|raw| Url::parse(&raw).ok())
                    .unwrap_or_else(|| url.clone());
                if let Err(err) = page.close().await {
                    engine_debug!("headless page close failed url={} err={}", url, err);
                }
                Ok::<_, FetchError>(LoadedPage { html, final_url })
            }
            .await;

            if let Err(err) = browser.close().await {
                engine_warn!("headless browser close failed err={}", err);
            }
            if let Err(err) = browser.wait().await {
                engine_debug!("headless browser wait failed err={}", err);
            }
            events.abort();
            snapshot
        }
    }

    #[async_trait::async_trait]
    impl PageSource for HeadlessPageSource {
        async fn load(&self, url: &Url) -> Result<LoadedPage, FetchError> {
            match tokio::time::timeout(self.timeout, self.render(url)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::new(
                    FailureKind::Timeout,
                    format!("page did not render within {:?}", self.timeout),
                )),
            }
        }

        fn name(&self) -> &'static str {
            "headless"
        }
    }

    fn browser_error(err: chromiumoxide::error::CdpError) -> FetchError {
        FetchError::new(FailureKind::Browser, err.to_string())
    }
}
