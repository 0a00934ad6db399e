use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use crate::{FailureKind, FetchError};

/// Decode page bytes into UTF-8: BOM, then the Content-Type charset, then chardetng.
///
/// Malformed sequences are replaced rather than rejected; a page that is
/// mostly readable still yields its image tags.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> Result<String, FetchError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(charset_label) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches(['"', '\'']);
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<String, FetchError> {
    let (text, _, _) = enc.decode(bytes);
    if text.is_empty() && !bytes.is_empty() {
        return Err(FetchError::new(
            FailureKind::Decode,
            format!("could not decode page as {}", enc.name()),
        ));
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_charset_is_honoured() {
        let decoded = decode_html(b"caf\xe9", Some("text/html; Charset=\"ISO-8859-1\"")).unwrap();
        assert_eq!(decoded, "caf\u{e9}");
    }

    #[test]
    fn utf8_bom_wins_over_header() {
        let decoded = decode_html(b"\xEF\xBB\xBFhello", Some("text/html; charset=latin1")).unwrap();
        assert_eq!(decoded, "hello");
    }

    #[test]
    fn missing_charset_falls_back_to_detection() {
        let decoded = decode_html(b"<img src=\"/a.jpg\">", None).unwrap();
        assert_eq!(decoded, "<img src=\"/a.jpg\">");
    }
}
