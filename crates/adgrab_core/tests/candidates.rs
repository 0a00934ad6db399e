use std::sync::Once;

use adgrab_core::{first_srcset_url, is_excluded_candidate, resolve_candidate, CandidateSet};
use pretty_assertions::assert_eq;
use url::Url;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn base() -> Url {
    Url::parse("https://example.com").unwrap()
}

#[test]
fn relative_references_resolve_against_base() {
    init_logging();
    let url = resolve_candidate("/a.jpg", &base()).unwrap();
    assert_eq!(url.as_str(), "https://example.com/a.jpg");

    let url = resolve_candidate("  img/b.png ", &base()).unwrap();
    assert_eq!(url.as_str(), "https://example.com/img/b.png");

    let url = resolve_candidate("//cdn.example.net/c.webp", &base()).unwrap();
    assert_eq!(url.as_str(), "https://cdn.example.net/c.webp");
}

#[test]
fn absolute_references_are_kept() {
    let url = resolve_candidate("http://other.example.org/x.gif", &base()).unwrap();
    assert_eq!(url.as_str(), "http://other.example.org/x.gif");
}

#[test]
fn unusable_references_are_dropped() {
    assert_eq!(resolve_candidate("", &base()), None);
    assert_eq!(resolve_candidate("   ", &base()), None);
    assert_eq!(resolve_candidate("#top", &base()), None);
    assert_eq!(resolve_candidate("javascript:void(0)", &base()), None);
    assert_eq!(resolve_candidate("http://[::1", &base()), None);
}

#[test]
fn srcset_yields_first_url_without_descriptor() {
    assert_eq!(
        first_srcset_url("/small.jpg 480w, /large.jpg 1080w"),
        Some("/small.jpg")
    );
    assert_eq!(first_srcset_url("  /only.png  "), Some("/only.png"));
    assert_eq!(first_srcset_url(""), None);
    assert_eq!(first_srcset_url(" , /b.png 2x"), None);
}

#[test]
fn srcset_urls_keep_embedded_commas() {
    assert_eq!(
        first_srcset_url(
            "https://res.cloudinary.com/demo/image/upload/w_400,h_300/ad.jpg 1x, \
             https://res.cloudinary.com/demo/image/upload/w_800,h_600/ad.jpg 2x"
        ),
        Some("https://res.cloudinary.com/demo/image/upload/w_400,h_300/ad.jpg")
    );
    assert_eq!(first_srcset_url("/a.jpg, /b.jpg"), Some("/a.jpg"));
    assert_eq!(first_srcset_url("/a.jpg,"), Some("/a.jpg"));
}

#[test]
fn non_content_candidates_are_excluded() {
    assert!(is_excluded_candidate("data:image/png;base64,AAAA"));
    assert!(is_excluded_candidate("https://example.com/badge.svg"));
    assert!(is_excluded_candidate("https://example.com/badge.SVG?v=2"));
    assert!(is_excluded_candidate("https://example.com/icon-sprite.png"));
    assert!(is_excluded_candidate("https://example.com/img/Logo_big.jpg"));
    assert!(is_excluded_candidate("https://example.com/favicon.ico"));

    assert!(!is_excluded_candidate("https://example.com/a.jpg"));
    assert!(!is_excluded_candidate("https://example.com/svg-gallery/photo.png"));
}

#[test]
fn candidate_set_keeps_first_occurrence_order() {
    let mut set = CandidateSet::with_limit(10);
    assert!(set.offer("https://e.com/2.jpg"));
    assert!(set.offer("https://e.com/1.jpg"));
    assert!(!set.offer("https://e.com/2.jpg"));
    assert!(set.offer("https://e.com/3.jpg"));

    assert_eq!(
        set.into_vec(),
        vec![
            "https://e.com/2.jpg".to_string(),
            "https://e.com/1.jpg".to_string(),
            "https://e.com/3.jpg".to_string(),
        ]
    );
}

#[test]
fn candidate_set_stops_at_limit() {
    let mut set = CandidateSet::with_limit(2);
    assert!(set.offer("a"));
    assert!(set.offer("b"));
    assert!(set.is_full());
    assert!(!set.offer("c"));
    assert_eq!(set.into_vec(), vec!["a".to_string(), "b".to_string()]);

    let mut empty = CandidateSet::with_limit(0);
    assert!(empty.is_full());
    assert!(!empty.offer("a"));
    assert!(empty.into_vec().is_empty());
}
