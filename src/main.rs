use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cinematch::{
    api::{create_router, AppState},
    cache::{create_redis_client, Cache, CacheWriterHandle},
    config::Config,
    index::RecommendationIndex,
    services::{PosterFetcher, PosterUrls, Recommender, TmdbPosterProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinematch=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Without the artifacts there is nothing to serve
    let index = RecommendationIndex::load(&config.artifacts_dir)
        .context("Failed to load recommendation artifacts")?;
    let recommender = Recommender::new(Arc::new(index), config.recommender_options());

    let (cache, cache_handle) = match &config.redis_url {
        Some(redis_url) => {
            let client = create_redis_client(redis_url)?;
            let (cache, handle) = Cache::new(client);
            tracing::info!("Poster cache enabled");
            (Some(cache), Some(handle))
        }
        None => {
            tracing::info!("REDIS_URL not set, poster cache disabled");
            (None, None)
        }
    };

    let provider = TmdbPosterProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.poster_timeout(),
        cache,
    )?;
    let posters = PosterFetcher::new(
        Arc::new(provider),
        PosterUrls {
            base: config.poster_base_url.clone(),
            placeholder: config.poster_placeholder_url.clone(),
        },
    );

    let state = AppState::new(recommender, posters, config.default_keywords.clone());
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cache_handle))
        .await?;

    Ok(())
}

/// Waits for Ctrl-C, then flushes pending cache writes
async fn shutdown_signal(cache_handle: Option<CacheWriterHandle>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }
}
