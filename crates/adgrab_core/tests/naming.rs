use adgrab_core::{entry_name, infer_extension, parse_http_url, ArchiveJob, InputError, JobSummary};
use pretty_assertions::assert_eq;

#[test]
fn content_type_decides_extension() {
    assert_eq!(infer_extension(Some("image/jpeg"), "https://e.com/x"), "jpg");
    assert_eq!(infer_extension(Some("image/PNG; charset=binary"), "https://e.com/x.jpg"), "png");
    assert_eq!(infer_extension(Some("image/webp"), "https://e.com/x"), "webp");
    assert_eq!(infer_extension(Some("image/gif"), "https://e.com/x"), "gif");
    assert_eq!(infer_extension(Some("image/bmp"), "https://e.com/x"), "bmp");
    assert_eq!(infer_extension(Some("image/svg+xml"), "https://e.com/x"), "svg");
}

#[test]
fn url_path_refines_unknown_content_type() {
    assert_eq!(
        infer_extension(Some("application/octet-stream"), "https://e.com/a/photo.PNG?w=300"),
        "png"
    );
    assert_eq!(infer_extension(None, "https://e.com/a/photo.jpeg"), "jpg");
    assert_eq!(infer_extension(None, "https://e.com/a/photo.bmp"), "bmp");
}

#[test]
fn fallback_extension_when_nothing_matches() {
    assert_eq!(infer_extension(None, "https://e.com/render?id=7"), "jpg");
    assert_eq!(infer_extension(Some("text/plain"), "https://e.com/file.txt"), "jpg");
    assert_eq!(infer_extension(None, "not a url"), "jpg");
}

#[test]
fn entry_names_are_zero_padded() {
    assert_eq!(entry_name(1, "png"), "ad-001.png");
    assert_eq!(entry_name(42, "jpg"), "ad-042.jpg");
    assert_eq!(entry_name(1000, "gif"), "ad-1000.gif");
}

#[test]
fn failures_do_not_consume_entry_indices() {
    let urls = vec![
        "https://a/1".to_string(),
        "https://b/2".to_string(),
        "https://c/3".to_string(),
        "https://d/4".to_string(),
    ];
    let mut job = ArchiveJob::new(urls);

    job.record_failure("https://a/1", "http status 404");
    assert_eq!(job.commit_entry("png"), "ad-001.png");
    job.record_failure("https://c/3", "timeout");
    assert_eq!(job.commit_entry("jpg"), "ad-002.jpg");

    assert_eq!(
        job.summary(),
        JobSummary {
            requested: 4,
            succeeded: 2,
            skipped: 2,
        }
    );
    let skipped = job.into_skipped();
    assert_eq!(skipped[1].url, "https://c/3");
    assert_eq!(skipped[1].reason, "timeout");
}

#[test]
fn http_urls_are_accepted() {
    let url = parse_http_url("  https://example.com/a.png ").unwrap();
    assert_eq!(url.as_str(), "https://example.com/a.png");
    assert!(parse_http_url("http://example.com").is_ok());
}

#[test]
fn non_http_input_is_rejected() {
    assert_eq!(parse_http_url(""), Err(InputError::Missing));
    assert_eq!(parse_http_url("   "), Err(InputError::Missing));
    assert_eq!(
        parse_http_url("ftp://x"),
        Err(InputError::UnsupportedScheme("ftp".to_string()))
    );
    assert_eq!(
        parse_http_url("data:image/png;base64,AA"),
        Err(InputError::UnsupportedScheme("data".to_string()))
    );
    assert!(matches!(parse_http_url("example.com/a.png"), Err(InputError::Malformed(_))));
}
