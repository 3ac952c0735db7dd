//! In-memory caches shared across requests.
//!
//! Both are bounded by entry count and expire entries by age from insertion.
//! Reads never extend an entry's life.

use std::time::Duration;

use moka::future::Cache;
use showtime_catalog::SearchPage;

/// Assembled search pages keyed by [`PageKey::cache_key`](crate::search::PageKey::cache_key).
pub type PageCache = Cache<String, SearchPage>;

/// Primary source per title. An empty string records that no source is known.
pub type SourceCache = Cache<String, String>;

pub fn page_cache(ttl: Duration, capacity: usize) -> PageCache {
    Cache::builder()
        .max_capacity(capacity.max(1) as u64)
        .time_to_live(ttl)
        .build()
}

pub fn source_cache(ttl: Duration, capacity: usize) -> SourceCache {
    Cache::builder()
        .max_capacity(capacity.max(1) as u64)
        .time_to_live(ttl)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn entries_expire_after_their_ttl() {
        let cache = source_cache(Duration::from_millis(50), 10);
        cache.insert("tmdb:source:movie:1".into(), "Netflix".into()).await;
        assert_eq!(
            cache.get("tmdb:source:movie:1").await.as_deref(),
            Some("Netflix")
        );

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(cache.get("tmdb:source:movie:1").await, None);
    }

    #[tokio::test]
    async fn reads_do_not_extend_an_entry() {
        let cache = page_cache(Duration::from_millis(100), 10);
        cache.insert("tmdb:trending:1:en-US:US".into(), SearchPage::empty()).await;

        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(40)).await;
            let _ = cache.get("tmdb:trending:1:en-US:US").await;
        }
        assert!(cache.get("tmdb:trending:1:en-US:US").await.is_none());
    }
}
