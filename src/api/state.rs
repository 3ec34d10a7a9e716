use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::services::{PosterFetcher, Recommender};

/// Shared application state.
///
/// Everything here is read-only after startup, so no locking is needed.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub posters: PosterFetcher,
    /// Keyword text used when a keyword request omits it
    pub default_keywords: Arc<str>,
    pub loaded_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        recommender: Recommender,
        posters: PosterFetcher,
        default_keywords: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            recommender,
            posters,
            default_keywords: default_keywords.into(),
            loaded_at: Utc::now(),
        }
    }
}
