//! Poster lookup
//!
//! A [`PosterProvider`] turns a catalog movie id into a poster path on the
//! image CDN. [`PosterFetcher`] runs those lookups concurrently for a list of
//! recommendations and degrades each failed lookup to a placeholder image,
//! since posters are display-only.
use std::sync::Arc;

use serde::Serialize;

use crate::error::{AppError, AppResult};

pub mod tmdb;

pub use tmdb::TmdbPosterProvider;

/// Source of poster paths keyed by catalog movie id
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PosterProvider: Send + Sync {
    /// Returns the provider's poster path for a movie, such as `/abc.jpg`.
    ///
    /// Fails with [`AppError::PosterUnavailable`] when the movie is unknown,
    /// has no poster, or the provider cannot be reached.
    async fn fetch_poster_path(&self, movie_id: i64) -> AppResult<String>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Where display URLs point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterUrls {
    /// CDN prefix poster paths are appended to
    pub base: String,
    /// Image used when no poster can be fetched
    pub placeholder: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Poster {
    pub url: String,
    /// False when `url` is the placeholder
    pub available: bool,
}

#[derive(Clone)]
pub struct PosterFetcher {
    provider: Arc<dyn PosterProvider>,
    urls: PosterUrls,
}

impl PosterFetcher {
    pub fn new(provider: Arc<dyn PosterProvider>, urls: PosterUrls) -> Self {
        Self { provider, urls }
    }

    /// Joins the CDN prefix and a poster path with exactly one slash
    pub fn poster_url(&self, poster_path: &str) -> String {
        format!(
            "{}/{}",
            self.urls.base.trim_end_matches('/'),
            poster_path.trim_start_matches('/')
        )
    }

    pub fn placeholder(&self) -> Poster {
        Poster {
            url: self.urls.placeholder.clone(),
            available: false,
        }
    }

    /// Looks up every id concurrently and returns one outcome per id, in
    /// input order. A failed lookup never affects the others.
    pub async fn fetch_each(&self, movie_ids: &[i64]) -> Vec<AppResult<String>> {
        let tasks: Vec<_> = movie_ids
            .iter()
            .map(|&movie_id| {
                let provider = Arc::clone(&self.provider);
                tokio::spawn(async move { provider.fetch_poster_path(movie_id).await })
            })
            .collect();

        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            let outcome = match task.await {
                Ok(result) => result.map(|path| self.poster_url(&path)),
                Err(e) => Err(AppError::PosterUnavailable(format!(
                    "poster task failed: {}",
                    e
                ))),
            };
            results.push(outcome);
        }

        results
    }

    /// Poster for each id in input order, placeholders where lookups failed
    pub async fn fetch(&self, movie_ids: &[i64]) -> Vec<Poster> {
        let outcomes = self.fetch_each(movie_ids).await;

        let mut unavailable = 0;
        let posters: Vec<Poster> = outcomes
            .into_iter()
            .zip(movie_ids)
            .map(|(outcome, movie_id)| match outcome {
                Ok(url) => Poster {
                    url,
                    available: true,
                },
                Err(e) => {
                    tracing::warn!(
                        movie_id = movie_id,
                        provider = self.provider.name(),
                        error = %e,
                        "Poster unavailable, using placeholder"
                    );
                    unavailable += 1;
                    self.placeholder()
                }
            })
            .collect();

        if unavailable > 0 {
            tracing::warn!(
                requested = movie_ids.len(),
                unavailable,
                "Partial poster fetch failure"
            );
        }

        posters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const BASE: &str = "https://image.tmdb.org/t/p/w500/";
    const PLACEHOLDER: &str = "https://example.org/no-poster.png";

    fn urls() -> PosterUrls {
        PosterUrls {
            base: BASE.to_string(),
            placeholder: PLACEHOLDER.to_string(),
        }
    }

    fn mock_provider() -> MockPosterProvider {
        let mut provider = MockPosterProvider::new();
        provider.expect_fetch_poster_path().returning(|movie_id| {
            if movie_id == 404 {
                Err(AppError::PosterUnavailable(format!(
                    "movie {} not recognized",
                    movie_id
                )))
            } else {
                Ok(format!("/{}.jpg", movie_id))
            }
        });
        provider.expect_name().return_const("mock");
        provider
    }

    /// Answers later ids first to exercise ordering
    struct SlowProvider;

    #[async_trait::async_trait]
    impl PosterProvider for SlowProvider {
        async fn fetch_poster_path(&self, movie_id: i64) -> AppResult<String> {
            tokio::time::sleep(Duration::from_millis(10 * (5 - movie_id as u64))).await;
            Ok(format!("/{}.jpg", movie_id))
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[test]
    fn test_poster_url_single_slash() {
        let fetcher = PosterFetcher::new(Arc::new(mock_provider()), urls());
        assert_eq!(
            fetcher.poster_url("/gC3tW9a45RGOzzSh6wv91pFnmFr.jpg"),
            "https://image.tmdb.org/t/p/w500/gC3tW9a45RGOzzSh6wv91pFnmFr.jpg"
        );
        assert_eq!(
            fetcher.poster_url("abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[tokio::test]
    async fn test_fetch_builds_urls_in_order() {
        let fetcher = PosterFetcher::new(Arc::new(mock_provider()), urls());
        let posters = fetcher.fetch(&[27205, 155, 77]).await;

        let urls: Vec<&str> = posters.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://image.tmdb.org/t/p/w500/27205.jpg",
                "https://image.tmdb.org/t/p/w500/155.jpg",
                "https://image.tmdb.org/t/p/w500/77.jpg",
            ]
        );
        assert!(posters.iter().all(|p| p.available));
    }

    #[tokio::test]
    async fn test_unrecognized_id_is_isolated() {
        let fetcher = PosterFetcher::new(Arc::new(mock_provider()), urls());
        let outcomes = fetcher.fetch_each(&[27205, 404, 77]).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_ok());
        assert!(matches!(outcomes[1], Err(AppError::PosterUnavailable(_))));
        assert!(outcomes[2].is_ok());
    }

    #[tokio::test]
    async fn test_fetch_substitutes_placeholder() {
        let fetcher = PosterFetcher::new(Arc::new(mock_provider()), urls());
        let posters = fetcher.fetch(&[404, 155]).await;

        assert_eq!(
            posters[0],
            Poster {
                url: PLACEHOLDER.to_string(),
                available: false
            }
        );
        assert!(posters[1].available);
    }

    #[tokio::test]
    async fn test_concurrent_fetch_preserves_order() {
        let fetcher = PosterFetcher::new(Arc::new(SlowProvider), urls());
        let posters = fetcher.fetch(&[1, 2, 3, 4]).await;

        let urls: Vec<&str> = posters.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://image.tmdb.org/t/p/w500/1.jpg",
                "https://image.tmdb.org/t/p/w500/2.jpg",
                "https://image.tmdb.org/t/p/w500/3.jpg",
                "https://image.tmdb.org/t/p/w500/4.jpg",
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_empty_list() {
        let mut provider = MockPosterProvider::new();
        provider.expect_fetch_poster_path().never();
        let fetcher = PosterFetcher::new(Arc::new(provider), urls());

        assert!(fetcher.fetch(&[]).await.is_empty());
    }
}
