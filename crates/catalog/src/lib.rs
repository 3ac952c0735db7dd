pub mod models;
pub mod normalize;
pub mod provider;
pub mod tmdb;
pub mod watch;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use showtime_core::types::MediaKind;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Display-ready search result for one title or person.
///
/// `primary_source` is bound late by the enrichment stage through
/// [`SearchItem::with_primary_source`]; items are otherwise never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    #[serde(rename = "id")]
    pub external_id: i64,
    #[serde(rename = "mediaType")]
    pub kind: MediaKind,
    pub title: String,
    #[serde(rename = "subTitle")]
    pub subtitle: String,
    pub overview: Option<String>,
    pub poster_url: Option<String>,
    pub popularity: f64,
    #[serde(rename = "source")]
    pub primary_source: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl SearchItem {
    pub fn with_primary_source(self, primary_source: Option<String>) -> Self {
        Self {
            primary_source,
            ..self
        }
    }
}

/// One internal page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(rename = "results")]
    pub items: Vec<SearchItem>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub served_from_cache: bool,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            total_pages: 1,
            total_results: 0,
            served_from_cache: false,
        }
    }

    /// Copy of this page with the cache flag overridden.
    pub fn with_served_from_cache(&self, served_from_cache: bool) -> Self {
        Self {
            served_from_cache,
            ..self.clone()
        }
    }
}
