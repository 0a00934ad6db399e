use url::Url;

/// Extension used when neither the content type nor the URL names a known image format.
pub const FALLBACK_EXTENSION: &str = "jpg";

const URL_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

/// Pick a file extension for a downloaded image.
///
/// Content type wins (`image/jpeg` -> `jpg`, `image/svg+xml` -> `svg`, ...);
/// otherwise the URL path's extension is used if it names a raster format;
/// otherwise [`FALLBACK_EXTENSION`].
pub fn infer_extension(content_type: Option<&str>, url: &str) -> &'static str {
    content_type
        .and_then(extension_from_content_type)
        .or_else(|| extension_from_url(url))
        .unwrap_or(FALLBACK_EXTENSION)
}

fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase();
    let subtype = essence.split_once('/').map(|(_, sub)| sub)?;
    match subtype {
        "jpeg" | "jpg" | "pjpeg" => Some("jpg"),
        "png" => Some("png"),
        "webp" => Some("webp"),
        "gif" => Some("gif"),
        "bmp" | "x-bmp" | "x-ms-bmp" => Some("bmp"),
        s if s.starts_with("svg") => Some("svg"),
        _ => None,
    }
}

fn extension_from_url(url: &str) -> Option<&'static str> {
    let parsed = Url::parse(url).ok()?;
    let last_segment = parsed.path_segments()?.next_back()?.to_ascii_lowercase();
    let (_, ext) = last_segment.rsplit_once('.')?;
    let known = URL_EXTENSIONS.iter().copied().find(|known| *known == ext)?;
    Some(if known == "jpeg" { "jpg" } else { known })
}
