use showtime_core::types::SearchType;

use crate::CatalogError;
use crate::models::{
    ImageConfiguration, MovieDetails, PersonMovieCredits, PersonPage, ProviderPage,
    SeasonDetails, TvDetails,
};

/// A catalog provider that can search titles and people and fetch details.
///
/// Lookups that return `Ok(None)` mean the provider answered and the entity
/// does not exist. Errors mean the provider could not be asked.
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// One provider page of keyword results. `SearchType::Multi` (and
    /// `Person`, which the people pipeline never routes here) use the mixed
    /// endpoint.
    async fn search(
        &self,
        query: &str,
        search_type: SearchType,
        page: u32,
    ) -> Result<ProviderPage, CatalogError>;

    /// One provider page of trending titles.
    async fn trending(&self, page: u32) -> Result<ProviderPage, CatalogError>;

    async fn search_people(&self, query: &str, page: u32) -> Result<PersonPage, CatalogError>;

    async fn person_movie_credits(
        &self,
        person_id: i64,
    ) -> Result<Option<PersonMovieCredits>, CatalogError>;

    /// Movie details with credits and watch providers appended.
    async fn movie_details(&self, id: i64) -> Result<Option<MovieDetails>, CatalogError>;

    /// Series details with credits, aggregate credits and watch providers appended.
    async fn tv_details(&self, id: i64) -> Result<Option<TvDetails>, CatalogError>;

    async fn tv_season(
        &self,
        id: i64,
        season_number: i32,
    ) -> Result<Option<SeasonDetails>, CatalogError>;

    /// Image CDN configuration; fetched once per provider instance.
    async fn image_configuration(&self) -> Result<ImageConfiguration, CatalogError>;
}
