//! Wire models for TMDB API v3 responses.
//!
//! Every field the provider may omit or send as `null` is optional or
//! defaulted, so a sparse payload still decodes.

use std::collections::BTreeMap;

use serde::Deserialize;

/// One page of `search/*` or `trending/*` results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub results: Vec<RawSearchItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchItem {
    #[serde(default)]
    pub id: i64,
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub profile_path: Option<String>,
    pub popularity: Option<f64>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigurationResponse {
    #[serde(default)]
    images: ImageConfiguration,
}

/// Image CDN settings from `/configuration`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageConfiguration {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub secure_base_url: String,
    #[serde(default)]
    pub poster_sizes: Vec<String>,
}

impl ImageConfiguration {
    pub(crate) fn from_response(body: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value::<ConfigurationResponse>(body).map(|c| c.images)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub results: Vec<PersonResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonResult {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// `/person/{id}/movie_credits`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonMovieCredits {
    #[serde(default)]
    pub cast: Vec<MovieCredit>,
    #[serde(default)]
    pub crew: Vec<MovieCredit>,
}

/// A single cast or crew entry on a person's filmography.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieCredit {
    #[serde(default)]
    pub id: i64,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub popularity: Option<f64>,
    pub character: Option<String>,
    pub job: Option<String>,
    pub department: Option<String>,
}

/// `watch/providers` block. Countries are keyed by ISO 3166-1 code; the
/// ordered map keeps iteration deterministic.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProviders {
    #[serde(default)]
    pub results: BTreeMap<String, WatchProviderCountry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProviderCountry {
    pub link: Option<String>,
    pub flatrate: Option<Vec<WatchProviderEntry>>,
    pub ads: Option<Vec<WatchProviderEntry>>,
    pub rent: Option<Vec<WatchProviderEntry>>,
    pub buy: Option<Vec<WatchProviderEntry>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProviderEntry {
    #[serde(default)]
    pub provider_id: i64,
    #[serde(default)]
    pub provider_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CastMember {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub character: Option<String>,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDetails {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub credits: Credits,
    #[serde(default, rename = "watch/providers")]
    pub watch_providers: WatchProviders,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TvDetails {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub overview: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub credits: Credits,
    pub aggregate_credits: Option<Credits>,
    #[serde(default, rename = "watch/providers")]
    pub watch_providers: WatchProviders,
    #[serde(default)]
    pub seasons: Vec<SeasonInfo>,
    #[serde(default)]
    pub networks: Vec<Network>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeasonInfo {
    #[serde(default)]
    pub season_number: i32,
    #[serde(default)]
    pub episode_count: i32,
    pub air_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Network {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeasonDetails {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub season_number: i32,
    #[serde(default)]
    pub episodes: Vec<EpisodeSummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EpisodeSummary {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    #[serde(default)]
    pub season_number: i32,
    #[serde(default)]
    pub episode_number: i32,
    pub still_path: Option<String>,
}
