//! Late binding of each title's primary "where to watch" source.
//!
//! Lookups for one page run concurrently behind a counting gate. A lookup
//! that fails leaves the item without a source and is not remembered, so the
//! next page build tries again.

use futures::future::join_all;
use showtime_catalog::provider::CatalogProvider;
use showtime_catalog::watch::select_primary_provider;
use showtime_catalog::{CatalogError, SearchItem, SearchPage};
use showtime_core::types::MediaKind;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::source_cache_key;
use crate::cache::SourceCache;

/// Resolve `primary_source` for every movie and series on `page`.
///
/// Never fails. At most `concurrency` provider lookups are in flight at once;
/// cached answers (including the cached "none known" empty string) skip the
/// gate entirely.
pub async fn enrich_sources(
    catalog: &dyn CatalogProvider,
    sources: &SourceCache,
    concurrency: usize,
    page: SearchPage,
) -> SearchPage {
    let gate = Semaphore::new(concurrency.max(1));
    let SearchPage {
        items,
        page,
        total_pages,
        total_results,
        served_from_cache,
    } = page;

    let items = join_all(
        items
            .into_iter()
            .map(|item| enrich_item(catalog, sources, &gate, item)),
    )
    .await;

    SearchPage {
        items,
        page,
        total_pages,
        total_results,
        served_from_cache,
    }
}

async fn enrich_item(
    catalog: &dyn CatalogProvider,
    sources: &SourceCache,
    gate: &Semaphore,
    item: SearchItem,
) -> SearchItem {
    if !item.kind.is_title() {
        return item.with_primary_source(None);
    }

    let key = source_cache_key(item.kind, item.external_id);
    if let Some(cached) = sources.get(&key).await {
        return item.with_primary_source(Some(cached).filter(|s| !s.is_empty()));
    }

    let Ok(_permit) = gate.acquire().await else {
        return item.with_primary_source(None);
    };

    match lookup_source(catalog, item.kind, item.external_id).await {
        Ok(source) => {
            debug!(kind = %item.kind, id = item.external_id, source = ?source, "resolved primary source");
            sources
                .insert(key, source.clone().unwrap_or_default())
                .await;
            item.with_primary_source(source)
        }
        Err(e) => {
            warn!(kind = %item.kind, id = item.external_id, error = %e, "source lookup failed");
            item.with_primary_source(None)
        }
    }
}

/// Series without any listed offer fall back to their first network.
async fn lookup_source(
    catalog: &dyn CatalogProvider,
    kind: MediaKind,
    id: i64,
) -> Result<Option<String>, CatalogError> {
    match kind {
        MediaKind::Movie => Ok(catalog
            .movie_details(id)
            .await?
            .and_then(|details| select_primary_provider(&details.watch_providers))),
        MediaKind::Tv => Ok(catalog.tv_details(id).await?.and_then(|details| {
            select_primary_provider(&details.watch_providers).or_else(|| {
                details
                    .networks
                    .iter()
                    .map(|n| n.name.trim())
                    .find(|name| !name.is_empty())
                    .map(str::to_string)
            })
        })),
        MediaKind::Person => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use showtime_catalog::models::{Network, TvDetails};

    use super::*;
    use crate::cache::source_cache;
    use crate::search::fake::{FakeCatalog, movie_details};

    fn sources() -> SourceCache {
        source_cache(Duration::from_secs(6 * 60 * 60), 1_000)
    }

    fn item(id: i64, kind: MediaKind) -> SearchItem {
        SearchItem {
            external_id: id,
            kind,
            title: format!("Item {id}"),
            subtitle: kind.label().to_string(),
            overview: None,
            poster_url: None,
            popularity: 1.0,
            primary_source: None,
            release_date: None,
        }
    }

    fn page_of(items: Vec<SearchItem>) -> SearchPage {
        SearchPage {
            total_results: items.len() as u32,
            items,
            page: 1,
            total_pages: 1,
            served_from_cache: false,
        }
    }

    #[tokio::test]
    async fn never_exceeds_the_concurrency_limit() {
        let mut fake = FakeCatalog {
            details_delay: Duration::from_millis(10),
            ..Default::default()
        };
        for id in 1..=60 {
            fake.movies.insert(id, movie_details(id, Some(("US", "Netflix"))));
        }
        let page = page_of((1..=60).map(|id| item(id, MediaKind::Movie)).collect());

        let enriched = enrich_sources(&fake, &sources(), 3, page).await;

        assert_eq!(fake.details_calls(), 60);
        assert_eq!(fake.max_in_flight(), 3);
        assert!(
            enriched
                .items
                .iter()
                .all(|i| i.primary_source.as_deref() == Some("Netflix"))
        );
        let ids: Vec<i64> = enriched.items.iter().map(|i| i.external_id).collect();
        assert_eq!(ids, (1..=60).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn outage_leaves_every_source_empty_and_uncached() {
        let fake = FakeCatalog {
            details_fail: true,
            ..Default::default()
        };
        let cache = sources();
        let page = page_of(vec![item(1, MediaKind::Movie), item(2, MediaKind::Tv)]);

        let enriched = enrich_sources(&fake, &cache, 3, page).await;

        assert!(enriched.items.iter().all(|i| i.primary_source.is_none()));
        assert_eq!(cache.get(&source_cache_key(MediaKind::Movie, 1)).await, None);
        assert_eq!(cache.get(&source_cache_key(MediaKind::Tv, 2)).await, None);
        assert_eq!(enriched.total_results, 2);
    }

    #[tokio::test]
    async fn confirmed_absence_is_cached_as_empty() {
        let mut fake = FakeCatalog::default();
        fake.movies.insert(5, movie_details(5, None));
        let cache = sources();

        let first = enrich_sources(&fake, &cache, 3, page_of(vec![item(5, MediaKind::Movie)])).await;
        let second = enrich_sources(&fake, &cache, 3, page_of(vec![item(5, MediaKind::Movie)])).await;

        assert_eq!(first.items[0].primary_source, None);
        assert_eq!(second.items[0].primary_source, None);
        assert_eq!(
            cache.get(&source_cache_key(MediaKind::Movie, 5)).await.as_deref(),
            Some("")
        );
        assert_eq!(fake.details_calls(), 1);
    }

    #[tokio::test]
    async fn cached_sources_skip_the_provider() {
        let fake = FakeCatalog::default();
        let cache = sources();
        cache
            .insert(source_cache_key(MediaKind::Tv, 9), "Hulu".to_string())
            .await;

        let enriched = enrich_sources(&fake, &cache, 3, page_of(vec![item(9, MediaKind::Tv)])).await;

        assert_eq!(enriched.items[0].primary_source.as_deref(), Some("Hulu"));
        assert_eq!(fake.details_calls(), 0);
    }

    #[tokio::test]
    async fn people_are_not_looked_up() {
        let fake = FakeCatalog::default();
        let mut person = item(31, MediaKind::Person);
        person.primary_source = Some("stale".into());

        let enriched = enrich_sources(&fake, &sources(), 3, page_of(vec![person])).await;

        assert_eq!(enriched.items[0].primary_source, None);
        assert_eq!(fake.details_calls(), 0);
    }

    #[tokio::test]
    async fn series_fall_back_to_network() {
        let mut fake = FakeCatalog::default();
        fake.tvs.insert(
            1399,
            TvDetails {
                id: 1399,
                name: "Game of Thrones".into(),
                networks: vec![
                    Network {
                        id: 1,
                        name: " ".into(),
                        origin_country: None,
                    },
                    Network {
                        id: 49,
                        name: "HBO".into(),
                        origin_country: Some("US".into()),
                    },
                ],
                ..Default::default()
            },
        );

        let enriched =
            enrich_sources(&fake, &sources(), 3, page_of(vec![item(1399, MediaKind::Tv)])).await;

        assert_eq!(enriched.items[0].primary_source.as_deref(), Some("HBO"));
    }
}
