//! Content hashing for conditional search responses.

use axum::http::{HeaderMap, header};
use sha2::{Digest, Sha256};
use showtime_catalog::SearchPage;

/// Quoted SHA-256 over the page's content fields.
///
/// `served_from_cache` is not part of the content, so a cache hit and a fresh
/// build of the same page share one tag.
pub fn compute_etag(page: &SearchPage) -> String {
    let mut canonical = format!("{}|{}|{}", page.page, page.total_pages, page.total_results);
    for item in &page.items {
        canonical.push_str(&format!(
            ";{}|{}|{}|{}|{}|{}|{}",
            item.external_id,
            item.kind,
            item.title,
            item.subtitle,
            item.primary_source.as_deref().unwrap_or_default(),
            item.release_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            item.popularity
        ));
    }

    let digest = Sha256::digest(canonical.as_bytes());
    format!("\"{}\"", hex::encode_upper(digest))
}

/// Whether any tag in `If-None-Match` equals `etag` (or is `*`).
pub fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .any(|tag| tag == "*" || tag == etag || tag.strip_prefix("W/") == Some(etag))
}
