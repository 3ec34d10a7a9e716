use serde::{Deserialize, Serialize};

/// A catalog entry. Immutable once the catalog is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// TMDB movie identifier, used for poster lookups
    pub id: i64,
    /// Unique title, the lookup key for title queries
    pub title: String,
    /// Average user vote
    #[serde(rename = "vote_average")]
    pub rating: f64,
}

impl Movie {
    pub fn new(id: i64, title: impl Into<String>, rating: f64) -> Self {
        Self {
            id,
            title: title.into(),
            rating,
        }
    }
}
