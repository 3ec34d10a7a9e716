//! TMDB poster provider
//!
//! API Flow:
//! 1. `GET {api_url}/movie/{id}?api_key=...` returns the movie details
//! 2. The `poster_path` field is joined with the image CDN prefix by the caller
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::{AppError, AppResult},
    services::posters::PosterProvider,
};

const POSTER_CACHE_TTL: u64 = 604800; // 1 week

/// The only field of the movie details response we read
#[derive(Debug, Deserialize)]
struct MovieDetails {
    #[serde(default)]
    poster_path: Option<String>,
}

#[derive(Clone)]
pub struct TmdbPosterProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Option<Cache>,
}

impl TmdbPosterProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        timeout: Duration,
        cache: Option<Cache>,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    async fn request_poster_path(&self, movie_id: i64) -> AppResult<String> {
        let url = format!("{}/movie/{}", self.api_url, movie_id);

        tracing::debug!(movie_id, "Fetching poster path from TMDB");

        // without_url keeps the api_key query parameter out of error messages
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                AppError::PosterUnavailable(format!(
                    "TMDB request for movie {} failed: {}",
                    movie_id,
                    e.without_url()
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(movie_id, status = %status, body = %body, "TMDB request rejected");
            return Err(AppError::PosterUnavailable(format!(
                "TMDB returned status {} for movie {}",
                status, movie_id
            )));
        }

        let details: MovieDetails = response.json().await.map_err(|e| {
            AppError::PosterUnavailable(format!(
                "Invalid TMDB response for movie {}: {}",
                movie_id,
                e.without_url()
            ))
        })?;

        details
            .poster_path
            .filter(|path| !path.trim().is_empty())
            .ok_or_else(|| {
                AppError::PosterUnavailable(format!("TMDB has no poster for movie {}", movie_id))
            })
    }
}

#[async_trait::async_trait]
impl PosterProvider for TmdbPosterProvider {
    async fn fetch_poster_path(&self, movie_id: i64) -> AppResult<String> {
        let key = CacheKey::PosterPath(movie_id);
        cached!(
            &self.cache,
            key,
            POSTER_CACHE_TTL,
            self.request_poster_path(movie_id)
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::posters::{PosterFetcher, PosterUrls};
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    const API_KEY: &str = "test-key";

    async fn movie_details(
        Path(movie_id): Path<i64>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Response {
        if params.get("api_key").map(String::as_str) != Some(API_KEY) {
            return (StatusCode::UNAUTHORIZED, Json(json!({"status_code": 7}))).into_response();
        }

        match movie_id {
            27205 => Json(json!({
                "id": 27205,
                "title": "Inception",
                "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg"
            }))
            .into_response(),
            11 => Json(json!({"id": 11, "poster_path": null})).into_response(),
            12 => Json(json!({"id": 12, "poster_path": ""})).into_response(),
            42 => "definitely not json".into_response(),
            500 => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
            _ => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "status_code": 34,
                    "status_message": "The resource you requested could not be found."
                })),
            )
                .into_response(),
        }
    }

    /// Serves a fake TMDB on an ephemeral port and returns its base URL
    async fn spawn_fake_tmdb() -> String {
        let app = Router::new().route("/movie/:id", get(movie_details));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn provider(api_url: String, api_key: &str) -> TmdbPosterProvider {
        TmdbPosterProvider::new(
            api_key.to_string(),
            api_url,
            Duration::from_secs(5),
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_poster_path() {
        let provider = provider(spawn_fake_tmdb().await, API_KEY);
        let path = provider.fetch_poster_path(27205).await.unwrap();
        assert_eq!(path, "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg");
    }

    #[tokio::test]
    async fn test_unknown_movie_is_unavailable() {
        let provider = provider(spawn_fake_tmdb().await, API_KEY);
        let err = provider.fetch_poster_path(999999).await.unwrap_err();
        assert!(matches!(err, AppError::PosterUnavailable(msg) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_null_and_empty_poster_path() {
        let provider = provider(spawn_fake_tmdb().await, API_KEY);
        assert!(matches!(
            provider.fetch_poster_path(11).await,
            Err(AppError::PosterUnavailable(_))
        ));
        assert!(matches!(
            provider.fetch_poster_path(12).await,
            Err(AppError::PosterUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_and_server_error() {
        let provider = provider(spawn_fake_tmdb().await, API_KEY);
        assert!(matches!(
            provider.fetch_poster_path(42).await,
            Err(AppError::PosterUnavailable(_))
        ));
        assert!(matches!(
            provider.fetch_poster_path(500).await,
            Err(AppError::PosterUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_rejected_key_does_not_leak_into_error() {
        let provider = provider(spawn_fake_tmdb().await, "wrong-key");
        let err = provider.fetch_poster_path(27205).await.unwrap_err();

        assert!(matches!(err, AppError::PosterUnavailable(_)));
        assert!(!err.to_string().contains("wrong-key"));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = provider(format!("http://{}", addr), API_KEY);
        let err = provider.fetch_poster_path(27205).await.unwrap_err();
        assert!(matches!(err, AppError::PosterUnavailable(_)));
        assert!(!err.to_string().contains(API_KEY));
    }

    #[tokio::test]
    async fn test_fetcher_degrades_failures_without_aborting() {
        let provider = provider(spawn_fake_tmdb().await, API_KEY);
        let fetcher = PosterFetcher::new(
            Arc::new(provider),
            PosterUrls {
                base: "https://image.tmdb.org/t/p/w500/".to_string(),
                placeholder: "placeholder.png".to_string(),
            },
        );

        let posters = fetcher.fetch(&[999999, 27205, 11]).await;

        assert_eq!(posters.len(), 3);
        assert!(!posters[0].available);
        assert_eq!(posters[0].url, "placeholder.png");
        assert_eq!(
            posters[1].url,
            "https://image.tmdb.org/t/p/w500/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg"
        );
        assert!(!posters[2].available);
    }
}
