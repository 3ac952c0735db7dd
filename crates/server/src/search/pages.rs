//! Builds one internal page from consecutive provider pages.

use showtime_catalog::normalize::{PosterUrls, normalize_item};
use showtime_catalog::provider::CatalogProvider;
use showtime_catalog::{CatalogError, SearchPage};
use showtime_core::types::{MediaKind, SearchType};
use tracing::debug;

use crate::config::SearchConfig;

/// Internal page `page` starts at provider page `(page - 1) * pages_per_batch + 1`.
pub fn provider_start_page(page: u32, pages_per_batch: u32) -> u32 {
    page.max(1)
        .saturating_sub(1)
        .saturating_mul(pages_per_batch)
        .saturating_add(1)
}

/// Keyword search, or trending when `query` is empty.
///
/// Provider pages are fetched one after another until the batch is used up,
/// the provider runs out of pages, or enough items have been collected.
/// Internal pages that start beyond the provider's page cap are empty.
/// People are never listed here; they are dropped and subtracted from the
/// reported total.
pub async fn aggregate(
    catalog: &dyn CatalogProvider,
    query: &str,
    search_type: SearchType,
    page: u32,
    posters: &PosterUrls,
    config: &SearchConfig,
) -> Result<SearchPage, CatalogError> {
    let per_batch = config.pages_per_batch();
    let start = provider_start_page(page, per_batch);
    let implied_kind = search_type.implied_kind();
    let limit = config.internal_page_size;

    if start > config.provider_max_page {
        debug!(query, page, start_page = start, "page is beyond the provider page cap");
        return Ok(SearchPage {
            page: page.max(1),
            ..SearchPage::empty()
        });
    }

    let mut items = Vec::new();
    let mut removed: u32 = 0;
    let mut totals: Option<(u32, u32)> = None;

    for offset in 0..per_batch {
        let provider_page = start.saturating_add(offset);
        let response = if query.is_empty() {
            catalog.trending(provider_page).await?
        } else {
            catalog.search(query, search_type, provider_page).await?
        };

        // Totals are stable for a query; only the first response is trusted.
        let (provider_total_pages, _) =
            *totals.get_or_insert((response.total_pages, response.total_results));

        for raw in &response.results {
            match normalize_item(raw, implied_kind, posters) {
                Some(item) if item.kind == MediaKind::Person => removed += 1,
                Some(item) => items.push(item),
                None => {}
            }
        }

        if response.results.is_empty()
            || items.len() >= limit
            || provider_page >= provider_total_pages
            || provider_page >= config.provider_max_page
        {
            break;
        }
    }

    let Some((provider_total_pages, provider_total_results)) = totals else {
        return Ok(SearchPage::empty());
    };

    items.truncate(limit);

    let mut total_results = provider_total_results.saturating_sub(removed);
    if total_results == 0 && !items.is_empty() {
        total_results = items.len() as u32;
    }
    let total_pages = if total_results > 0 {
        total_results.div_ceil(limit.max(1) as u32)
    } else {
        provider_total_pages.div_ceil(per_batch)
    }
    .max(1);

    debug!(
        query,
        page,
        start_page = start,
        items = items.len(),
        people_removed = removed,
        "aggregated provider pages"
    );

    Ok(SearchPage {
        items,
        page: page.max(1),
        total_pages,
        total_results,
        served_from_cache: false,
    })
}
