//! Raw provider item → [`SearchItem`] normalization.
//!
//! Everything here is pure: no I/O, no logging, nothing that can fail loudly.
//! Items that cannot be represented are dropped by returning `None`.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use showtime_core::types::MediaKind;

use crate::SearchItem;
use crate::models::{ImageConfiguration, RawSearchItem};

pub const DEFAULT_POSTER_SIZE: &str = "w342";

/// Poster URL builder bound to one image configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PosterUrls {
    base_url: String,
    size: String,
}

impl PosterUrls {
    pub fn new(images: &ImageConfiguration) -> Self {
        let base_url = if images.secure_base_url.trim().is_empty() {
            images.base_url.clone()
        } else {
            images.secure_base_url.clone()
        };
        Self {
            base_url,
            size: select_poster_size(&images.poster_sizes).to_string(),
        }
    }

    pub fn url(&self, path: Option<&str>) -> Option<String> {
        build_poster_url(&self.base_url, &self.size, path?)
    }
}

/// Prefer `w342` when advertised, otherwise the largest advertised size.
pub fn select_poster_size(sizes: &[String]) -> &str {
    if sizes.iter().any(|s| s == DEFAULT_POSTER_SIZE) {
        return DEFAULT_POSTER_SIZE;
    }
    sizes
        .last()
        .map(String::as_str)
        .unwrap_or(DEFAULT_POSTER_SIZE)
}

/// Join base, size and path with exactly one `/` between each part.
pub fn build_poster_url(base_url: &str, size: &str, path: &str) -> Option<String> {
    let base_url = base_url.trim();
    let path = path.trim();
    if base_url.is_empty() || path.is_empty() {
        return None;
    }
    Some(format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        size.trim_matches('/'),
        path.trim_start_matches('/')
    ))
}

/// Parse a provider date. Accepts plain dates and ISO-8601 timestamps; anything
/// else is treated as absent.
pub fn normalize_date(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// `"Movie • 2010"`, `"TV"`, `"Person"`.
pub fn subtitle(kind: MediaKind, release_date: Option<NaiveDate>) -> String {
    match (kind, release_date) {
        (MediaKind::Person, _) => MediaKind::Person.label().to_string(),
        (kind, Some(date)) => format!("{} • {}", kind.label(), date.year()),
        (kind, None) => kind.label().to_string(),
    }
}

/// Normalize one raw search entry.
///
/// `implied_kind` stands in for a missing `media_type` tag; typed searches
/// (`search/movie`, `search/tv`) return untagged entries.
pub fn normalize_item(
    raw: &RawSearchItem,
    implied_kind: Option<MediaKind>,
    posters: &PosterUrls,
) -> Option<SearchItem> {
    if raw.id <= 0 {
        return None;
    }

    let kind = match raw.media_type.as_deref().map(str::trim) {
        Some(tag) if !tag.is_empty() => MediaKind::from_tag(tag)?,
        _ => implied_kind?,
    };

    let (title, release_date, poster_path) = match kind {
        MediaKind::Movie => (
            first_non_blank(&[raw.title.as_deref(), raw.name.as_deref()]).unwrap_or("Untitled"),
            normalize_date(raw.release_date.as_deref()),
            raw.poster_path.as_deref(),
        ),
        MediaKind::Tv => (
            first_non_blank(&[raw.name.as_deref(), raw.title.as_deref()]).unwrap_or("Untitled"),
            normalize_date(raw.first_air_date.as_deref().or(raw.release_date.as_deref())),
            raw.poster_path.as_deref(),
        ),
        MediaKind::Person => (
            first_non_blank(&[raw.name.as_deref()]).unwrap_or("Unknown"),
            None,
            raw.profile_path.as_deref(),
        ),
    };

    Some(SearchItem {
        external_id: raw.id,
        kind,
        title: title.to_string(),
        subtitle: subtitle(kind, release_date),
        overview: raw.overview.clone(),
        poster_url: posters.url(poster_path),
        popularity: raw.popularity.unwrap_or_default(),
        primary_source: None,
        release_date,
    })
}

pub(crate) fn first_non_blank<'a>(values: &[Option<&'a str>]) -> Option<&'a str> {
    values
        .iter()
        .flatten()
        .copied()
        .find(|v| !v.trim().is_empty())
}
