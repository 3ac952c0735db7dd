//! In-memory catalog used by the pipeline tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use showtime_catalog::CatalogError;
use showtime_catalog::models::{
    ImageConfiguration, MovieDetails, PersonMovieCredits, PersonPage, ProviderPage,
    RawSearchItem, SeasonDetails, TvDetails, WatchProviderCountry, WatchProviderEntry,
};
use showtime_catalog::provider::CatalogProvider;
use showtime_core::types::SearchType;

#[derive(Default)]
pub(crate) struct FakeCatalog {
    pub search_pages: HashMap<u32, ProviderPage>,
    pub trending_pages: HashMap<u32, ProviderPage>,
    pub people_pages: HashMap<u32, PersonPage>,
    pub credits: HashMap<i64, PersonMovieCredits>,
    pub failing_credits: HashSet<i64>,
    pub movies: HashMap<i64, MovieDetails>,
    pub tvs: HashMap<i64, TvDetails>,
    pub images: ImageConfiguration,
    pub search_fails: bool,
    pub details_fail: bool,
    pub details_delay: Duration,
    pub requested_pages: Mutex<Vec<u32>>,
    pub(crate) search_calls: AtomicUsize,
    pub(crate) people_calls: AtomicUsize,
    pub(crate) details_calls: AtomicUsize,
    pub(crate) in_flight: AtomicUsize,
    pub(crate) max_in_flight: AtomicUsize,
}

impl FakeCatalog {
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn people_calls(&self) -> usize {
        self.people_calls.load(Ordering::SeqCst)
    }

    pub fn details_calls(&self) -> usize {
        self.details_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested_pages.lock().unwrap().clone()
    }

    async fn details<T: Clone>(
        &self,
        store: &HashMap<i64, T>,
        id: i64,
    ) -> Result<Option<T>, CatalogError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.details_delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.details_fail {
            return Err(CatalogError::Unavailable("simulated outage".into()));
        }
        Ok(store.get(&id).cloned())
    }
}

#[async_trait::async_trait]
impl CatalogProvider for FakeCatalog {
    async fn search(
        &self,
        _query: &str,
        _search_type: SearchType,
        page: u32,
    ) -> Result<ProviderPage, CatalogError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_pages.lock().unwrap().push(page);
        if self.search_fails {
            return Err(CatalogError::Unavailable("simulated outage".into()));
        }
        Ok(self.search_pages.get(&page).cloned().unwrap_or_default())
    }

    async fn trending(&self, page: u32) -> Result<ProviderPage, CatalogError> {
        self.requested_pages.lock().unwrap().push(page);
        Ok(self.trending_pages.get(&page).cloned().unwrap_or_default())
    }

    async fn search_people(&self, _query: &str, page: u32) -> Result<PersonPage, CatalogError> {
        self.people_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_pages.lock().unwrap().push(page);
        Ok(self.people_pages.get(&page).cloned().unwrap_or_default())
    }

    async fn person_movie_credits(
        &self,
        person_id: i64,
    ) -> Result<Option<PersonMovieCredits>, CatalogError> {
        if self.failing_credits.contains(&person_id) {
            return Err(CatalogError::Unavailable("simulated outage".into()));
        }
        Ok(self.credits.get(&person_id).cloned())
    }

    async fn movie_details(&self, id: i64) -> Result<Option<MovieDetails>, CatalogError> {
        self.details(&self.movies, id).await
    }

    async fn tv_details(&self, id: i64) -> Result<Option<TvDetails>, CatalogError> {
        self.details(&self.tvs, id).await
    }

    async fn tv_season(
        &self,
        _id: i64,
        _season_number: i32,
    ) -> Result<Option<SeasonDetails>, CatalogError> {
        Ok(None)
    }

    async fn image_configuration(&self) -> Result<ImageConfiguration, CatalogError> {
        Ok(self.images.clone())
    }
}

pub(crate) fn raw_movie(id: i64, title: &str, popularity: f64) -> RawSearchItem {
    RawSearchItem {
        id,
        media_type: Some("movie".into()),
        title: Some(title.into()),
        popularity: Some(popularity),
        ..Default::default()
    }
}

pub(crate) fn raw_person(id: i64, name: &str) -> RawSearchItem {
    RawSearchItem {
        id,
        media_type: Some("person".into()),
        name: Some(name.into()),
        ..Default::default()
    }
}

/// Movie details with at most one subscription offer in one country.
pub(crate) fn movie_details(id: i64, offer: Option<(&str, &str)>) -> MovieDetails {
    let mut details = MovieDetails {
        id,
        title: format!("Movie {id}"),
        ..Default::default()
    };
    if let Some((country, provider)) = offer {
        details.watch_providers.results.insert(
            country.to_string(),
            WatchProviderCountry {
                flatrate: Some(vec![WatchProviderEntry {
                    provider_id: 1,
                    provider_name: provider.to_string(),
                }]),
                ..Default::default()
            },
        );
    }
    details
}
