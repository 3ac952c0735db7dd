use axum::extract::State;
use axum::http::header::{self, HeaderName};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::details::{TitlePreview, preview};
use crate::error::AppError;
use crate::etag::{compute_etag, if_none_match};
use crate::extract::ApiQuery;
use crate::state::AppState;

pub const SEARCH_CACHE_CONTROL: &str = "public,max-age=300";
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(tmdb_router())
        .nest("/api/tmdb", tmdb_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn tmdb_router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search))
        .route("/details", get(details))
}

/// Permissive unless a single allowed origin is configured.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, header::InvalidHeaderValue> {
    let Some(origin) = origin else {
        return Ok(CorsLayer::permissive());
    };
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(HeaderValue::from_str(origin)?))
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::IF_NONE_MATCH, header::CONTENT_TYPE])
        .expose_headers([header::ETAG, X_CACHE]))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(alias = "query")]
    q: Option<String>,
    #[serde(rename = "type", alias = "mediaType")]
    search_type: Option<String>,
    page: Option<i64>,
}

async fn search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let page = state
        .search
        .search(
            params.q.as_deref(),
            params.search_type.as_deref(),
            params.page,
        )
        .await?;

    let etag = compute_etag(&page);
    let cache_status = if page.served_from_cache { "HIT" } else { "MISS" };
    let response_headers = [
        (header::CACHE_CONTROL, SEARCH_CACHE_CONTROL.to_string()),
        (header::ETAG, etag.clone()),
        (X_CACHE, cache_status.to_string()),
    ];

    if if_none_match(&headers, &etag) {
        return Ok((StatusCode::NOT_MODIFIED, response_headers).into_response());
    }
    Ok((response_headers, Json(page)).into_response())
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct DetailsQuery {
    #[serde(alias = "tmdbId")]
    id: Option<i64>,
    #[serde(rename = "type", alias = "mediaType")]
    media_type: Option<String>,
}

async fn details(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<DetailsQuery>,
) -> Result<Json<TitlePreview>, AppError> {
    let preview = preview(
        state.catalog.as_ref(),
        params.id,
        params.media_type.as_deref(),
    )
    .await?;
    Ok(Json(preview))
}
