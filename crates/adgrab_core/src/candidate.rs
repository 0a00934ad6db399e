use std::collections::HashSet;

use url::Url;

const NON_CONTENT_MARKERS: &[&str] = &["sprite", "icon", "logo"];

/// Resolve a raw attribute value against the page base.
///
/// Empty values, fragment-only references and `javascript:` pseudo-URLs are
/// dropped, as is anything the URL parser refuses.
pub fn resolve_candidate(reference: &str, base: &Url) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with("javascript:") {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url);
    }
    base.join(trimmed).ok()
}

/// First URL of a `srcset` list, without its width/density descriptor.
///
/// A srcset URL ends at whitespace, so commas inside it (CDN transform
/// paths such as `w_400,h_300`) are kept; only trailing commas are stripped.
pub fn first_srcset_url(srcset: &str) -> Option<&str> {
    srcset
        .split_whitespace()
        .next()
        .map(|token| token.trim_end_matches(','))
        .filter(|url| !url.is_empty())
}

/// True for inline data, vector art and sprite/icon/logo assets.
pub fn is_excluded_candidate(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    if lower.starts_with("data:") {
        return true;
    }
    let without_query = lower.split(['?', '#']).next().unwrap_or(&lower);
    if without_query.ends_with(".svg") {
        return true;
    }
    NON_CONTENT_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Insertion-ordered set of candidate URLs capped at a fixed size.
///
/// The first occurrence of a URL wins; once `limit` URLs are held every
/// further offer is refused.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    limit: usize,
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl CandidateSet {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            seen: HashSet::new(),
            ordered: Vec::new(),
        }
    }

    /// Returns true when the URL was new and room remained.
    pub fn offer(&mut self, url: impl Into<String>) -> bool {
        if self.is_full() {
            return false;
        }
        let url = url.into();
        if !self.seen.insert(url.clone()) {
            return false;
        }
        self.ordered.push(url);
        true
    }

    pub fn is_full(&self) -> bool {
        self.ordered.len() >= self.limit
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}
