//! TMDB (The Movie Database) provider client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use std::time::Duration;

use rand::Rng;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use showtime_core::types::SearchType;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::CatalogError;
use crate::models::{
    ImageConfiguration, MovieDetails, PersonMovieCredits, PersonPage, ProviderPage,
    SeasonDetails, TvDetails,
};
use crate::provider::CatalogProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Retry policy for transient provider failures (429, 5xx, transport errors).
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(250),
            max_jitter: Duration::from_millis(150),
        }
    }
}

impl RetryPolicy {
    /// Exponential delay before retry number `attempt` (1-based), without jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }

    fn delay(&self, attempt: u32) -> Duration {
        let jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter = rand::thread_rng().gen_range(0..=jitter_ms);
        self.backoff(attempt) + Duration::from_millis(jitter)
    }
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub language: String,
    pub region: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "en-US".to_string(),
            region: "US".to_string(),
            timeout: Duration::from_secs(20),
            retry: RetryPolicy::default(),
        }
    }
}

pub struct TmdbClient {
    config: TmdbConfig,
    client: reqwest::Client,
    images: OnceCell<ImageConfiguration>,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CatalogError::Configuration(format!("http client: {e}")))?;

        Ok(Self {
            config,
            client,
            images: OnceCell::new(),
        })
    }

    /// Warm the image configuration. Safe to call more than once; a failed
    /// attempt leaves the cell empty for the next caller.
    pub async fn initialize(&self) -> Result<(), CatalogError> {
        let images = self.image_configuration().await?;
        info!(
            sizes = images.poster_sizes.len(),
            "TMDB image configuration loaded"
        );
        Ok(())
    }

    fn api_key(&self) -> Result<&str, CatalogError> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                CatalogError::Configuration("TMDB API key is not configured".into())
            })
    }

    /// Issue a GET, retrying transient failures. Only this layer retries.
    async fn send(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<reqwest::Response, CatalogError> {
        let api_key = self.api_key()?;
        let url = format!("{}{path}", self.config.base_url.trim_end_matches('/'));
        let retry = &self.config.retry;

        let mut attempt = 0;
        let result = loop {
            debug!(url = %url, attempt, "TMDB request");
            let result = self
                .client
                .get(&url)
                .query(&[("api_key", api_key)])
                .query(params)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await;

            let failure = match &result {
                Ok(resp) if is_transient(resp.status()) => Some(resp.status().to_string()),
                Ok(_) => None,
                Err(e) => Some(e.to_string()),
            };
            let Some(failure) = failure else {
                break result;
            };
            if attempt >= retry.max_retries {
                break result;
            }

            attempt += 1;
            let delay = retry.delay(attempt);
            warn!(
                path,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %failure,
                "TMDB request failed, retrying"
            );
            tokio::time::sleep(delay).await;
        };

        result.map_err(|e| CatalogError::Unavailable(format!("{path}: {e}")))
    }

    /// GET and decode; a 404 is `Ok(None)`.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<T>, CatalogError> {
        let resp = self.send(path, params).await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !resp.status().is_success() {
            return Err(CatalogError::Unavailable(format!(
                "{path}: TMDB returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map(Some)
            .map_err(|e| CatalogError::Decode(format!("{path}: {e}")))
    }

    /// GET and decode where absence is itself a provider failure.
    async fn get_required<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        self.get_optional(path, params)
            .await?
            .ok_or_else(|| CatalogError::Unavailable(format!("{path}: TMDB returned 404")))
    }

    async fn fetch_image_configuration(&self) -> Result<ImageConfiguration, CatalogError> {
        let body: serde_json::Value = self.get_required("/configuration", &[]).await?;
        ImageConfiguration::from_response(body)
            .map_err(|e| CatalogError::Decode(format!("/configuration: {e}")))
    }
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbClient {
    async fn search(
        &self,
        query: &str,
        search_type: SearchType,
        page: u32,
    ) -> Result<ProviderPage, CatalogError> {
        let path = match search_type {
            SearchType::Movie => "/search/movie",
            SearchType::Tv => "/search/tv",
            SearchType::Multi | SearchType::Person => "/search/multi",
        };
        let page = page.max(1).to_string();

        self.get_required(
            path,
            &[
                ("query", query.trim()),
                ("page", page.as_str()),
                ("include_adult", "false"),
                ("language", self.config.language.as_str()),
                ("region", self.config.region.as_str()),
            ],
        )
        .await
    }

    async fn trending(&self, page: u32) -> Result<ProviderPage, CatalogError> {
        let page = page.max(1).to_string();
        self.get_required(
            "/trending/all/week",
            &[("page", page.as_str()), ("language", self.config.language.as_str())],
        )
        .await
    }

    async fn search_people(&self, query: &str, page: u32) -> Result<PersonPage, CatalogError> {
        let page = page.max(1).to_string();
        self.get_required(
            "/search/person",
            &[
                ("query", query.trim()),
                ("page", page.as_str()),
                ("include_adult", "false"),
                ("language", self.config.language.as_str()),
            ],
        )
        .await
    }

    async fn person_movie_credits(
        &self,
        person_id: i64,
    ) -> Result<Option<PersonMovieCredits>, CatalogError> {
        if person_id <= 0 {
            return Ok(None);
        }
        self.get_optional(
            &format!("/person/{person_id}/movie_credits"),
            &[("language", self.config.language.as_str())],
        )
        .await
    }

    async fn movie_details(&self, id: i64) -> Result<Option<MovieDetails>, CatalogError> {
        if id <= 0 {
            return Ok(None);
        }
        self.get_optional(
            &format!("/movie/{id}"),
            &[
                ("append_to_response", "credits,watch/providers"),
                ("language", self.config.language.as_str()),
            ],
        )
        .await
    }

    async fn tv_details(&self, id: i64) -> Result<Option<TvDetails>, CatalogError> {
        if id <= 0 {
            return Ok(None);
        }
        self.get_optional(
            &format!("/tv/{id}"),
            &[
                (
                    "append_to_response",
                    "credits,aggregate_credits,watch/providers",
                ),
                ("language", self.config.language.as_str()),
            ],
        )
        .await
    }

    async fn tv_season(
        &self,
        id: i64,
        season_number: i32,
    ) -> Result<Option<SeasonDetails>, CatalogError> {
        if id <= 0 || season_number < 0 {
            return Ok(None);
        }
        self.get_optional(
            &format!("/tv/{id}/season/{season_number}"),
            &[("language", self.config.language.as_str())],
        )
        .await
    }

    async fn image_configuration(&self) -> Result<ImageConfiguration, CatalogError> {
        // Concurrent first callers wait on the same in-flight fetch.
        self.images
            .get_or_try_init(|| self.fetch_image_configuration())
            .await
            .cloned()
    }
}
