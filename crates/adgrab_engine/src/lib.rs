//! Adgrab engine: upstream IO, image discovery, proxying and archiving.
mod archive;
mod decode;
mod extract;
mod fetch;
mod page;
mod proxy;
mod types;

pub use archive::{ArchiveEntry, ArchiveError, ArchiveOutput, ArchiveSettings, Archiver};
pub use decode::decode_html;
pub use extract::{collect_image_urls, ImageExtractor, DEFAULT_IMAGE_LIMIT, MAX_IMAGE_LIMIT};
pub use fetch::{FetchSettings, FetchStream, Fetcher, ReqwestFetcher};
#[cfg(feature = "headless")]
pub use page::HeadlessPageSource;
pub use page::{HttpPageSource, LoadedPage, PageSource};
pub use proxy::{ImageProxy, ProxiedImage, FALLBACK_CONTENT_TYPE, PROXY_CACHE_CONTROL};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, FetchPurpose};
