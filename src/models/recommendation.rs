use serde::{Deserialize, Serialize};

/// How a recommendation request is interpreted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationMode {
    /// Movies similar to a catalog title
    Movie,
    /// Movies matching free-text cast, crew, tags or genre
    Keywords,
}

/// Body of `POST /api/v1/recommendations`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RecommendationRequest {
    Movie {
        title: String,
    },
    Keywords {
        #[serde(default)]
        keywords: Option<String>,
    },
}

/// One recommended movie with its poster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationItem {
    pub id: i64,
    pub title: String,
    pub rating: f64,
    pub score: f64,
    pub poster_url: String,
    /// False when `poster_url` is the placeholder image
    pub poster_available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub mode: RecommendationMode,
    /// The title or normalized keyword text that was queried
    pub query: String,
    pub results: Vec<RecommendationItem>,
}
