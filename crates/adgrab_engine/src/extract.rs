use std::sync::Arc;

use adgrab_core::{
    first_srcset_url, is_excluded_candidate, parse_http_url, resolve_candidate, CandidateSet,
};
use engine_logging::{engine_debug, engine_info};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::page::PageSource;
use crate::FetchError;

pub const DEFAULT_IMAGE_LIMIT: usize = 60;
pub const MAX_IMAGE_LIMIT: usize = 500;

const IMAGE_ATTRS: &[&str] = &["src", "data-src"];
const SRCSET_ATTRS: &[&str] = &["srcset", "data-srcset"];

/// Discovers content images referenced by a page.
///
/// Loading the page is all-or-nothing; extraction over the loaded markup is
/// best-effort and silently drops references it cannot resolve.
pub struct ImageExtractor {
    source: Arc<dyn PageSource>,
}

impl ImageExtractor {
    pub fn new(source: Arc<dyn PageSource>) -> Self {
        Self { source }
    }

    pub fn strategy(&self) -> &'static str {
        self.source.name()
    }

    pub async fn extract(&self, page_url: &str, limit: usize) -> Result<Vec<String>, FetchError> {
        let url = parse_http_url(page_url)?;
        let limit = limit.min(MAX_IMAGE_LIMIT);
        let page = self.source.load(&url).await?;
        let images = collect_image_urls(&page.html, &page.final_url, limit);
        engine_info!(
            "extracted images strategy={} count={} limit={} url={}",
            self.source.name(),
            images.len(),
            limit,
            url
        );
        Ok(images)
    }
}

/// Walk `img` and `source` elements in document order and return up to
/// `limit` unique, absolute, content-looking image URLs.
pub fn collect_image_urls(html: &str, page_url: &Url, limit: usize) -> Vec<String> {
    let Ok(selector) = Selector::parse("img, source") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    let base = origin_base(page_url);
    let mut found = CandidateSet::with_limit(limit);

    for element in document.select(&selector) {
        if found.is_full() {
            break;
        }
        for raw in raw_references(element) {
            let Some(url) = resolve_candidate(raw, &base) else {
                engine_debug!("dropping unresolvable image reference {:?}", raw);
                continue;
            };
            if !matches!(url.scheme(), "http" | "https") || is_excluded_candidate(url.as_str()) {
                continue;
            }
            found.offer(url.to_string());
        }
    }

    found.into_vec()
}

fn raw_references(element: ElementRef<'_>) -> Vec<&str> {
    let value = element.value();
    let mut refs = Vec::new();
    if value.name().eq_ignore_ascii_case("img") {
        refs.extend(IMAGE_ATTRS.iter().filter_map(|attr| value.attr(attr)));
    }
    refs.extend(
        SRCSET_ATTRS
            .iter()
            .filter_map(|attr| value.attr(attr))
            .filter_map(first_srcset_url),
    );
    refs
}

fn origin_base(page_url: &Url) -> Url {
    let origin = page_url.origin();
    if !origin.is_tuple() {
        return page_url.clone();
    }
    Url::parse(&format!("{}/", origin.ascii_serialization())).unwrap_or_else(|_| page_url.clone())
}
