use std::time::Duration;

use showtime_catalog::tmdb::TmdbConfig;

/// Tunables for the search pipeline.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Page size presented to our own callers.
    pub internal_page_size: usize,
    /// Native page size of the provider.
    pub provider_page_size: usize,
    /// Highest page number the provider will serve.
    pub provider_max_page: u32,
    pub person_max_pages: u32,
    pub person_max_people: usize,
    pub person_min_query_len: usize,
    pub keyword_min_query_len: usize,
    /// Simultaneous watch-provider lookups per page.
    pub enrich_concurrency: usize,
    pub page_ttl: Duration,
    pub page_cache_capacity: usize,
    pub source_ttl: Duration,
    pub source_cache_capacity: usize,
    pub language: String,
    pub region: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            internal_page_size: 200,
            provider_page_size: 20,
            provider_max_page: 500,
            person_max_pages: 5,
            person_max_people: 10,
            person_min_query_len: 4,
            keyword_min_query_len: 2,
            enrich_concurrency: 3,
            page_ttl: Duration::from_secs(10 * 60),
            page_cache_capacity: 200,
            source_ttl: Duration::from_secs(6 * 60 * 60),
            source_cache_capacity: 10_000,
            language: "en-US".to_string(),
            region: "US".to_string(),
        }
    }
}

impl SearchConfig {
    /// Provider pages requested per internal page.
    pub fn pages_per_batch(&self) -> u32 {
        (self.internal_page_size / self.provider_page_size.max(1)).max(1) as u32
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub cors_origin: Option<String>,
    pub tmdb: TmdbConfig,
    pub search: SearchConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut tmdb = TmdbConfig {
            api_key: var("SHOWTIME_TMDB_KEY"),
            ..Default::default()
        };
        if let Some(base_url) = var("SHOWTIME_TMDB_BASE_URL") {
            tmdb.base_url = base_url;
        }
        if let Some(language) = var("SHOWTIME_TMDB_LANGUAGE") {
            tmdb.language = language;
        }
        if let Some(region) = var("SHOWTIME_TMDB_REGION") {
            tmdb.region = region;
        }

        let search = SearchConfig {
            enrich_concurrency: var("SHOWTIME_ENRICH_CONCURRENCY")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(3),
            language: tmdb.language.clone(),
            region: tmdb.region.clone(),
            ..Default::default()
        };

        Self {
            bind: var("SHOWTIME_BIND").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            cors_origin: var("SHOWTIME_CORS_ORIGIN"),
            tmdb,
            search,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert!(config.tmdb.api_key.is_none());
        assert_eq!(config.search.enrich_concurrency, 3);
        assert_eq!(config.search.pages_per_batch(), 10);
        assert_eq!(config.search.provider_max_page, 500);
        assert_eq!(config.search.language, "en-US");
    }

    #[test]
    fn reads_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SHOWTIME_TMDB_KEY", " abc "),
            ("SHOWTIME_TMDB_LANGUAGE", "de-DE"),
            ("SHOWTIME_TMDB_REGION", "DE"),
            ("SHOWTIME_ENRICH_CONCURRENCY", "0"),
            ("SHOWTIME_BIND", "127.0.0.1:9000"),
        ]);
        let config = Config::from_lookup(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.tmdb.api_key.as_deref(), Some("abc"));
        assert_eq!(config.search.language, "de-DE");
        assert_eq!(config.search.region, "DE");
        assert_eq!(config.search.enrich_concurrency, 3);
        assert_eq!(config.bind, "127.0.0.1:9000");
    }
}
