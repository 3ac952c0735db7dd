//! Single-title preview shown before a title is imported.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use showtime_catalog::models::{CastMember, Genre, MovieDetails, TvDetails};
use showtime_catalog::normalize::{PosterUrls, normalize_date};
use showtime_catalog::provider::CatalogProvider;
use showtime_catalog::watch::select_primary_provider;
use showtime_core::types::{MediaKind, SearchType};
use tracing::debug;

use crate::search::SearchError;

const MAX_GENRES: usize = 5;
const MAX_MOVIE_CAST: usize = 6;
const MAX_TV_CAST: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitlePreview {
    pub tmdb_id: i64,
    pub media_type: MediaKind,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub poster_url: Option<String>,
    pub genres: Vec<String>,
    pub cast: Vec<String>,
    pub available_on: Option<String>,
    pub seasons: Vec<SeasonPreview>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonPreview {
    pub season_number: i32,
    pub episode_count: i32,
    pub air_date: Option<NaiveDate>,
}

/// Fetch and condense one movie or series.
///
/// `id` must be positive and `media_type` must name a movie or series.
/// A title the provider does not know is reported as [`SearchError::NoData`].
pub async fn preview(
    catalog: &dyn CatalogProvider,
    id: Option<i64>,
    media_type: Option<&str>,
) -> Result<TitlePreview, SearchError> {
    let id = id
        .filter(|id| *id > 0)
        .ok_or_else(|| SearchError::Validation("A valid TMDB id is required.".into()))?;

    let kind = match SearchType::normalize(media_type) {
        SearchType::Movie => MediaKind::Movie,
        SearchType::Tv => MediaKind::Tv,
        SearchType::Person => {
            return Err(SearchError::Validation(
                "Person details are not supported.".into(),
            ));
        }
        SearchType::Multi => {
            return Err(SearchError::Validation(
                "type must be 'movie' or 'tv'.".into(),
            ));
        }
    };

    let fetched_at = Utc::now();
    let preview = match kind {
        MediaKind::Movie => catalog
            .movie_details(id)
            .await?
            .map(|movie| movie_preview(movie, fetched_at)),
        _ => catalog
            .tv_details(id)
            .await?
            .map(|tv| tv_preview(tv, fetched_at)),
    };
    let Some(mut preview) = preview else {
        return Err(SearchError::NoData(
            "Unable to retrieve details from TMDB.".into(),
        ));
    };

    let images = catalog.image_configuration().await?;
    preview.poster_url = PosterUrls::new(&images).url(preview.poster_path.as_deref());
    debug!(id, kind = %kind, "built title preview");
    Ok(preview)
}

fn genre_names(genres: &[Genre]) -> Vec<String> {
    genres
        .iter()
        .map(|g| g.name.trim())
        .filter(|name| !name.is_empty())
        .take(MAX_GENRES)
        .map(str::to_string)
        .collect()
}

/// Names in billing order.
fn cast_names(cast: &[CastMember], limit: usize) -> Vec<String> {
    let mut billed: Vec<&CastMember> = cast.iter().collect();
    billed.sort_by_key(|c| c.order);
    billed
        .into_iter()
        .map(|c| c.name.trim())
        .filter(|name| !name.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

fn title_or_untitled(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        "Untitled".to_string()
    } else {
        title.to_string()
    }
}

fn movie_preview(movie: MovieDetails, fetched_at: DateTime<Utc>) -> TitlePreview {
    TitlePreview {
        tmdb_id: movie.id,
        media_type: MediaKind::Movie,
        title: title_or_untitled(&movie.title),
        release_date: normalize_date(movie.release_date.as_deref()),
        genres: genre_names(&movie.genres),
        cast: cast_names(&movie.credits.cast, MAX_MOVIE_CAST),
        available_on: select_primary_provider(&movie.watch_providers),
        overview: movie.overview,
        poster_path: movie.poster_path,
        poster_url: None,
        seasons: Vec::new(),
        fetched_at,
    }
}

fn tv_preview(tv: TvDetails, fetched_at: DateTime<Utc>) -> TitlePreview {
    let cast = match &tv.aggregate_credits {
        Some(aggregate) if !aggregate.cast.is_empty() => &aggregate.cast,
        _ => &tv.credits.cast,
    };

    TitlePreview {
        tmdb_id: tv.id,
        media_type: MediaKind::Tv,
        title: title_or_untitled(&tv.name),
        release_date: normalize_date(tv.first_air_date.as_deref()),
        genres: genre_names(&tv.genres),
        cast: cast_names(cast, MAX_TV_CAST),
        available_on: select_primary_provider(&tv.watch_providers),
        seasons: tv
            .seasons
            .iter()
            .map(|s| SeasonPreview {
                season_number: s.season_number,
                episode_count: s.episode_count,
                air_date: normalize_date(s.air_date.as_deref()),
            })
            .collect(),
        overview: tv.overview,
        poster_path: tv.poster_path,
        poster_url: None,
        fetched_at,
    }
}
