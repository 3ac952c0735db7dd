use std::sync::Arc;

use anyhow::Context;
use showtime_catalog::tmdb::TmdbClient;
use showtime_server::config::Config;
use showtime_server::routes::{build_router, cors_layer};
use showtime_server::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();
    if config.tmdb.api_key.is_none() {
        warn!("SHOWTIME_TMDB_KEY is not set; catalog requests will fail");
    }

    let tmdb = Arc::new(
        TmdbClient::new(config.tmdb.clone()).context("failed to build TMDB client")?,
    );

    // A failed warm-up is retried lazily by the first search.
    if let Err(e) = tmdb.initialize().await {
        warn!(error = %e, "TMDB image configuration warm-up failed");
    }

    let state = AppState::new(tmdb, config.search.clone());
    let cors = cors_layer(config.cors_origin.as_deref()).context("invalid SHOWTIME_CORS_ORIGIN")?;
    let app = build_router(state, cors);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .context("failed to bind")?;
    info!(
        addr = %config.bind,
        language = %config.search.language,
        region = %config.search.region,
        "server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
