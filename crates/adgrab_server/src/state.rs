use std::sync::Arc;

use adgrab_engine::{
    ArchiveSettings, Archiver, FetchSettings, Fetcher, HttpPageSource, ImageExtractor,
    ImageProxy, PageSource, ReqwestFetcher,
};

use crate::config::{ConfigError, ExtractMode, ServerConfig};

struct Services {
    extractor: ImageExtractor,
    proxy: ImageProxy,
    archiver: Archiver,
}

/// Shared, read-only handles to the three services. Requests never mutate it.
#[derive(Clone)]
pub struct AppState {
    services: Arc<Services>,
}

impl AppState {
    pub fn new(extractor: ImageExtractor, proxy: ImageProxy, archiver: Archiver) -> Self {
        Self {
            services: Arc::new(Services {
                extractor,
                proxy,
                archiver,
            }),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, ConfigError> {
        let settings = FetchSettings {
            page_timeout: config.page_timeout,
            image_timeout: config.image_timeout,
            ..FetchSettings::default()
        };
        let fetcher: Arc<dyn Fetcher> = Arc::new(
            ReqwestFetcher::new(settings).map_err(|err| ConfigError::Client(err.to_string()))?,
        );
        let source = page_source(config, fetcher.clone())?;
        let archive_settings = ArchiveSettings {
            max_total_bytes: config.max_archive_bytes,
            ..ArchiveSettings::default()
        };

        Ok(Self::new(
            ImageExtractor::new(source),
            ImageProxy::new(fetcher.clone()),
            Archiver::new(fetcher, archive_settings),
        ))
    }

    pub fn extractor(&self) -> &ImageExtractor {
        &self.services.extractor
    }

    pub fn proxy(&self) -> &ImageProxy {
        &self.services.proxy
    }

    pub fn archiver(&self) -> &Archiver {
        &self.services.archiver
    }
}

fn page_source(
    config: &ServerConfig,
    fetcher: Arc<dyn Fetcher>,
) -> Result<Arc<dyn PageSource>, ConfigError> {
    match config.extract_mode {
        ExtractMode::Static => Ok(Arc::new(HttpPageSource::new(fetcher))),
        #[cfg(feature = "headless")]
        ExtractMode::Headless => Ok(Arc::new(adgrab_engine::HeadlessPageSource::new(
            config.page_timeout,
        ))),
        #[cfg(not(feature = "headless"))]
        ExtractMode::Headless => Err(ConfigError::HeadlessUnavailable),
    }
}
