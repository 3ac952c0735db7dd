//! Primary "where to watch" selection.

use crate::models::{WatchProviderCountry, WatchProviderEntry, WatchProviders};

pub const PRIORITY_COUNTRIES: [&str; 4] = ["US", "CA", "GB", "AU"];

/// Offer tiers in preference order: subscription, ad-supported, rental, purchase.
fn offers(country: &WatchProviderCountry) -> impl Iterator<Item = &WatchProviderEntry> {
    [&country.flatrate, &country.ads, &country.rent, &country.buy]
        .into_iter()
        .flatten()
        .flatten()
        .filter(|entry| !entry.provider_name.trim().is_empty())
}

/// Pick the single provider name to show for a title.
///
/// The first priority country with any offer wins, taking its best tier.
/// Without a priority match, countries are scanned in code order and the
/// first offer of any tier is used.
pub fn select_primary_provider(providers: &WatchProviders) -> Option<String> {
    for code in PRIORITY_COUNTRIES {
        if let Some(entry) = providers.results.get(code).and_then(|c| offers(c).next()) {
            return Some(entry.provider_name.clone());
        }
    }

    providers
        .results
        .values()
        .flat_map(offers)
        .next()
        .map(|entry| entry.provider_name.clone())
}
