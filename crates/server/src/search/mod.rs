//! Search aggregation pipeline.
//!
//! query → page or person aggregation → normalization → source enrichment →
//! page cache. ETags are computed at the HTTP edge from the returned page.

pub mod enrich;
pub mod pages;
pub mod people;

#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;
use std::time::Instant;

use showtime_catalog::normalize::PosterUrls;
use showtime_catalog::provider::CatalogProvider;
use showtime_catalog::{CatalogError, SearchPage};
use showtime_core::types::{MediaKind, SearchType};
use thiserror::Error;
use tracing::{debug, info};

use crate::cache::{PageCache, SourceCache, page_cache, source_cache};
use crate::config::SearchConfig;

#[derive(Error, Debug, Clone)]
pub enum SearchError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NoData(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Logical identity of a cached search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKey<'a> {
    People {
        query: &'a str,
        language: &'a str,
    },
    Trending {
        page: u32,
        language: &'a str,
        region: &'a str,
    },
    Keyword {
        search_type: SearchType,
        query: &'a str,
        page: u32,
        language: &'a str,
        region: &'a str,
    },
}

impl PageKey<'_> {
    pub fn cache_key(&self) -> String {
        match self {
            Self::People { query, language } => {
                format!("tmdb:people:{}:{language}", escape_query(query))
            }
            Self::Trending {
                page,
                language,
                region,
            } => format!("tmdb:trending:{page}:{language}:{region}"),
            Self::Keyword {
                search_type,
                query,
                page,
                language,
                region,
            } => format!(
                "tmdb:search:{search_type}:{}:{page}:{language}:{region}",
                escape_query(query)
            ),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::People { .. } => "search:person".to_string(),
            Self::Trending { .. } => "trending".to_string(),
            Self::Keyword { search_type, .. } => format!("search:{search_type}"),
        }
    }
}

/// Lower-cased query with the key separator escaped, so no query can spill
/// into the neighbouring key segments.
fn escape_query(query: &str) -> String {
    query
        .to_lowercase()
        .replace('%', "%25")
        .replace(':', "%3A")
}

pub fn source_cache_key(kind: MediaKind, external_id: i64) -> String {
    format!("tmdb:source:{kind}:{external_id}")
}

/// Process-wide search entry point. Owns both shared caches.
pub struct SearchService {
    catalog: Arc<dyn CatalogProvider>,
    config: SearchConfig,
    pages: PageCache,
    sources: SourceCache,
}

impl SearchService {
    pub fn new(catalog: Arc<dyn CatalogProvider>, config: SearchConfig) -> Self {
        let pages = page_cache(config.page_ttl, config.page_cache_capacity);
        let sources = source_cache(config.source_ttl, config.source_cache_capacity);
        Self {
            catalog,
            config,
            pages,
            sources,
        }
    }

    /// Run a search as requested over HTTP.
    ///
    /// An empty query lists trending titles. Person searches ignore `page`.
    /// Concurrent requests for one cache key share a single page build; a
    /// build that fails or is dropped stores nothing.
    pub async fn search(
        &self,
        query: Option<&str>,
        search_type: Option<&str>,
        page: Option<i64>,
    ) -> Result<SearchPage, SearchError> {
        let query = query.unwrap_or_default().trim();
        let search_type = SearchType::normalize(search_type);
        let is_person = search_type == SearchType::Person;

        if is_person {
            people::validate_query(query, self.config.person_min_query_len)?;
        } else if !query.is_empty() && query.chars().count() < self.config.keyword_min_query_len {
            return Ok(SearchPage::empty());
        }

        let page = match page {
            Some(p) if p > 0 && !is_person => u32::try_from(p).unwrap_or(u32::MAX),
            _ => 1,
        };

        let language = self.config.language.as_str();
        let region = self.config.region.as_str();
        let key = if is_person {
            PageKey::People { query, language }
        } else if query.is_empty() {
            PageKey::Trending {
                page,
                language,
                region,
            }
        } else {
            PageKey::Keyword {
                search_type,
                query,
                page,
                language,
                region,
            }
        };

        let started = Instant::now();
        let entry = self
            .pages
            .entry(key.cache_key())
            .or_try_insert_with(self.build_page(query, search_type, page))
            .await
            .map_err(|e| SearchError::clone(&e))?;

        if !entry.is_fresh() {
            debug!(kind = %key.label(), query, page, "TMDB cache hit");
            return Ok(entry.into_value().with_served_from_cache(true));
        }

        let built = entry.into_value();
        info!(
            kind = %key.label(),
            query,
            page,
            results = built.items.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "TMDB cache miss"
        );
        Ok(built)
    }

    async fn build_page(
        &self,
        query: &str,
        search_type: SearchType,
        page: u32,
    ) -> Result<SearchPage, SearchError> {
        let images = self.catalog.image_configuration().await?;
        let posters = PosterUrls::new(&images);

        let built = if search_type == SearchType::Person {
            people::aggregate(self.catalog.as_ref(), query, &posters, &self.config).await?
        } else {
            pages::aggregate(
                self.catalog.as_ref(),
                query,
                search_type,
                page,
                &posters,
                &self.config,
            )
            .await?
        };

        let enriched = enrich::enrich_sources(
            self.catalog.as_ref(),
            &self.sources,
            self.config.enrich_concurrency,
            built,
        )
        .await;
        Ok(enriched.with_served_from_cache(false))
    }
}
