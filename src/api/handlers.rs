use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        RecommendationItem, RecommendationMode, RecommendationRequest, RecommendationResponse,
    },
    services::recommender::normalize_keywords,
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub movies: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Options for the movie selector and keyword field
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub titles: Vec<String>,
    pub default_keywords: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        movies: state.recommender.index().catalog().len(),
        loaded_at: state.loaded_at,
    })
}

/// Lists catalog titles in catalog order
pub async fn list_movies(State(state): State<AppState>) -> Json<CatalogResponse> {
    let titles = state
        .recommender
        .index()
        .catalog()
        .titles()
        .map(str::to_string)
        .collect();

    Json(CatalogResponse {
        titles,
        default_keywords: state.default_keywords.to_string(),
    })
}

/// Recommends movies by title or keywords, with posters
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(request) = payload?;

    let (mode, query, scored) = match request {
        RecommendationRequest::Movie { title } => {
            if title.trim().is_empty() {
                return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
            }
            tracing::info!(request_id = %request_id, title = %title, "Recommending by movie");
            let scored = state.recommender.by_title(&title)?;
            (RecommendationMode::Movie, title, scored)
        }
        RecommendationRequest::Keywords { keywords } => {
            let keywords = normalize_keywords(
                keywords.as_deref().unwrap_or(&*state.default_keywords),
            );
            tracing::info!(request_id = %request_id, keywords = %keywords, "Recommending by keywords");
            let scored = state.recommender.by_keywords(&keywords);
            (RecommendationMode::Keywords, keywords, scored)
        }
    };

    let ids: Vec<i64> = scored.iter().map(|s| s.movie.id).collect();
    let posters = state.posters.fetch(&ids).await;

    let results: Vec<RecommendationItem> = scored
        .into_iter()
        .zip(posters)
        .map(|(scored, poster)| RecommendationItem {
            id: scored.movie.id,
            title: scored.movie.title,
            rating: scored.movie.rating,
            score: scored.score,
            poster_url: poster.url,
            poster_available: poster.available,
        })
        .collect();

    tracing::info!(
        request_id = %request_id,
        results = results.len(),
        posters_missing = results.iter().filter(|r| !r.poster_available).count(),
        "Recommendations served"
    );

    Ok(Json(RecommendationResponse {
        mode,
        query,
        results,
    }))
}
