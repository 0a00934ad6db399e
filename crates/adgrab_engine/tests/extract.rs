use std::sync::Arc;

use adgrab_engine::{
    collect_image_urls, FailureKind, FetchSettings, HttpPageSource, ImageExtractor,
    ReqwestFetcher, DEFAULT_IMAGE_LIMIT,
};
use pretty_assertions::assert_eq;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_url() -> Url {
    Url::parse("https://example.com/campaigns/summer/index.html").unwrap()
}

fn extractor() -> ImageExtractor {
    let fetcher = Arc::new(ReqwestFetcher::new(FetchSettings::default()).unwrap());
    ImageExtractor::new(Arc::new(HttpPageSource::new(fetcher)))
}

#[test]
fn icons_and_sprites_are_filtered_out() {
    let html = r#"<html><body>
        <img src="/a.jpg">
        <img src="icon-sprite.png">
    </body></html>"#;
    let base = Url::parse("https://example.com").unwrap();

    assert_eq!(
        collect_image_urls(html, &base, DEFAULT_IMAGE_LIMIT),
        vec!["https://example.com/a.jpg".to_string()]
    );
}

#[test]
fn lazy_sources_and_srcset_are_collected_in_document_order() {
    let html = r#"
        <picture>
            <source srcset="/hero-480.webp 480w, /hero-1080.webp 1080w">
            <img src="data:image/gif;base64,R0lGOD" data-src="/hero.jpg">
        </picture>
        <img src="https://cdn.example.net/banner.png">
        <img src="/hero.jpg">
        <img src="/chart.svg">
        <img src="/company-logo.png">
    "#;

    assert_eq!(
        collect_image_urls(html, &page_url(), 60),
        vec![
            "https://example.com/hero-480.webp".to_string(),
            "https://example.com/hero.jpg".to_string(),
            "https://cdn.example.net/banner.png".to_string(),
        ]
    );
}

#[test]
fn srcset_urls_with_commas_are_kept_whole() {
    let html = r#"<picture>
        <source srcset="https://res.cloudinary.com/demo/image/upload/w_400,h_300/ad.jpg 1x, https://res.cloudinary.com/demo/image/upload/w_800,h_600/ad.jpg 2x">
    </picture>"#;
    let base = Url::parse("https://example.com").unwrap();

    assert_eq!(
        collect_image_urls(html, &base, 60),
        vec!["https://res.cloudinary.com/demo/image/upload/w_400,h_300/ad.jpg".to_string()]
    );
}

#[test]
fn relative_paths_resolve_against_page_origin() {
    let html = r#"<img src="img/a.png"><img src="../b.png">"#;
    assert_eq!(
        collect_image_urls(html, &page_url(), 60),
        vec![
            "https://example.com/img/a.png".to_string(),
            "https://example.com/b.png".to_string(),
        ]
    );
}

#[test]
fn malformed_references_are_skipped_not_fatal() {
    let html = r#"<img src="http://[bad"><img src="javascript:void(0)"><img src="/ok.gif">"#;
    assert_eq!(
        collect_image_urls(html, &page_url(), 60),
        vec!["https://example.com/ok.gif".to_string()]
    );
}

#[test]
fn results_respect_limit_and_stay_unique() {
    let html: String = (0..20)
        .map(|i| format!(r#"<img src="/p{}.jpg"><img src="/p{}.jpg">"#, i % 7, i % 7))
        .collect();

    let urls = collect_image_urls(&html, &page_url(), 5);
    assert_eq!(urls.len(), 5);
    let mut deduped = urls.clone();
    deduped.dedup();
    assert_eq!(deduped, urls);
    assert_eq!(urls[0], "https://example.com/p0.jpg");

    let all = collect_image_urls(&html, &page_url(), 60);
    assert_eq!(all.len(), 7);
    assert!(collect_image_urls(&html, &page_url(), 0).is_empty());
}

#[tokio::test]
async fn extractor_loads_page_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><img src="/creative/1.jpg"><img src="/static/icon.png"></body></html>"#,
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;

    let images = extractor()
        .extract(&format!("{}/landing", server.uri()), 60)
        .await
        .expect("extract ok");
    assert_eq!(images, vec![format!("{}/creative/1.jpg", server.uri())]);
}

#[tokio::test]
async fn extractor_fails_whole_request_when_page_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = extractor()
        .extract(&format!("{}/gone", server.uri()), 60)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn extractor_rejects_non_http_input() {
    let err = extractor().extract("ftp://example.com/page", 60).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
