//! Person search: "movies featuring people matching this name".
//!
//! Matching people are looked up page by page, their movie credits are
//! fetched concurrently, and every credited movie becomes one result whose
//! subtitle names the matched people and their roles.

use std::collections::HashMap;

use chrono::NaiveDate;
use futures::future::join_all;
use showtime_catalog::SearchItem;
use showtime_catalog::SearchPage;
use showtime_catalog::models::{MovieCredit, PersonResult};
use showtime_catalog::normalize::{PosterUrls, normalize_date, subtitle};
use showtime_catalog::provider::CatalogProvider;
use showtime_core::types::MediaKind;
use tracing::{debug, warn};

use super::SearchError;
use crate::config::SearchConfig;

const SUBTITLE_CONTRIBUTORS: usize = 3;

/// Person queries shorter than `min_len` characters are rejected outright.
pub fn validate_query(query: &str, min_len: usize) -> Result<(), SearchError> {
    if query.trim().chars().count() < min_len {
        return Err(SearchError::Validation(format!(
            "Person search requires at least {min_len} characters."
        )));
    }
    Ok(())
}

/// Accumulates every credit pointing at one movie during a single search.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonMovieAggregation {
    pub id: i64,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub popularity: f64,
    contributors: Vec<String>,
}

impl PersonMovieAggregation {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            release_date: None,
            overview: None,
            poster_path: None,
            popularity: 0.0,
            contributors: Vec::new(),
        }
    }

    /// Fill in fields still missing and keep the highest popularity.
    pub fn update(
        &mut self,
        release_date: Option<NaiveDate>,
        overview: Option<&str>,
        poster_path: Option<&str>,
        popularity: Option<f64>,
    ) {
        if self.release_date.is_none() {
            self.release_date = release_date;
        }
        if self.overview.is_none() {
            self.overview = non_blank(overview);
        }
        if self.poster_path.is_none() {
            self.poster_path = non_blank(poster_path);
        }
        if let Some(popularity) = popularity {
            self.popularity = self.popularity.max(popularity);
        }
    }

    pub fn add_contribution(&mut self, name: &str, role: &str) {
        let name = name.trim();
        let role = role.trim();
        let label = if role.is_empty() {
            name.to_string()
        } else {
            format!("{name} ({role})")
        };
        if label.is_empty() {
            return;
        }

        let lowered = label.to_lowercase();
        if !self.contributors.iter().any(|c| c.to_lowercase() == lowered) {
            self.contributors.push(label);
        }
    }

    /// Contributor labels in case-insensitive alphabetical order.
    pub fn contributors(&self) -> Vec<&str> {
        let mut sorted: Vec<&str> = self.contributors.iter().map(String::as_str).collect();
        sorted.sort_by_key(|c| c.to_lowercase());
        sorted
    }

    fn subtitle(&self) -> String {
        let base = subtitle(MediaKind::Movie, self.release_date);
        let contributors = self.contributors();
        if contributors.is_empty() {
            return base;
        }

        let mut text = contributors
            .iter()
            .take(SUBTITLE_CONTRIBUTORS)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        if contributors.len() > SUBTITLE_CONTRIBUTORS {
            text.push_str(&format!(
                " +{} more",
                contributors.len() - SUBTITLE_CONTRIBUTORS
            ));
        }
        format!("{base} • {text}")
    }

    fn into_item(self, posters: &PosterUrls) -> SearchItem {
        SearchItem {
            external_id: self.id,
            kind: MediaKind::Movie,
            subtitle: self.subtitle(),
            poster_url: posters.url(self.poster_path.as_deref()),
            title: self.title,
            overview: self.overview,
            popularity: self.popularity,
            primary_source: None,
            release_date: self.release_date,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn cast_role(credit: &MovieCredit) -> &str {
    non_blank_ref(credit.character.as_deref()).unwrap_or("Cast")
}

fn crew_role(credit: &MovieCredit) -> &str {
    non_blank_ref(credit.job.as_deref())
        .or_else(|| non_blank_ref(credit.department.as_deref()))
        .unwrap_or("Crew")
}

fn non_blank_ref(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Movies credited to people matching `query`, most popular first.
///
/// Failing credit lookups are logged and skipped; only a failing people
/// search fails the request.
pub async fn aggregate(
    catalog: &dyn CatalogProvider,
    query: &str,
    posters: &PosterUrls,
    config: &SearchConfig,
) -> Result<SearchPage, SearchError> {
    let people = find_people(catalog, query, config).await?;
    if people.is_empty() {
        return Ok(SearchPage::empty());
    }

    let lookups = join_all(people.iter().map(|person| async move {
        (person, catalog.person_movie_credits(person.id).await)
    }))
    .await;

    let mut movies: HashMap<i64, PersonMovieAggregation> = HashMap::new();
    for (person, result) in lookups {
        let credits = match result {
            Ok(Some(credits)) => credits,
            Ok(None) => continue,
            Err(e) => {
                warn!(person_id = person.id, error = %e, "person credits lookup failed");
                continue;
            }
        };

        let roles = credits
            .cast
            .iter()
            .map(|c| (c, cast_role(c)))
            .chain(credits.crew.iter().map(|c| (c, crew_role(c))));
        for (credit, role) in roles {
            merge_credit(&mut movies, &person.name, credit, role);
        }
    }

    let mut merged: Vec<PersonMovieAggregation> = movies.into_values().collect();
    merged.sort_by(|a, b| {
        b.popularity
            .total_cmp(&a.popularity)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
            .then(a.id.cmp(&b.id))
    });
    merged.truncate(config.internal_page_size);

    let items: Vec<SearchItem> = merged.into_iter().map(|m| m.into_item(posters)).collect();
    debug!(
        query,
        people = people.len(),
        movies = items.len(),
        "merged person credits"
    );

    Ok(SearchPage {
        total_results: items.len() as u32,
        items,
        page: 1,
        total_pages: 1,
        served_from_cache: false,
    })
}

async fn find_people(
    catalog: &dyn CatalogProvider,
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<PersonResult>, SearchError> {
    let mut people = Vec::new();
    for page in 1..=config.person_max_pages {
        let response = catalog.search_people(query, page).await?;
        let returned = response.results.len();
        people.extend(response.results.into_iter().filter(|p| p.id > 0));

        if people.len() >= config.person_max_people
            || returned < config.provider_page_size
            || page >= response.total_pages
        {
            break;
        }
    }
    people.truncate(config.person_max_people);
    Ok(people)
}

fn merge_credit(
    movies: &mut HashMap<i64, PersonMovieAggregation>,
    person: &str,
    credit: &MovieCredit,
    role: &str,
) {
    if credit.id <= 0 {
        return;
    }
    let Some(title) = non_blank_ref(credit.title.as_deref())
        .or_else(|| non_blank_ref(credit.original_title.as_deref()))
    else {
        return;
    };

    let movie = movies
        .entry(credit.id)
        .or_insert_with(|| PersonMovieAggregation::new(credit.id, title));
    movie.update(
        normalize_date(credit.release_date.as_deref()),
        credit.overview.as_deref(),
        credit.poster_path.as_deref(),
        credit.popularity,
    );
    movie.add_contribution(person, role);
}
