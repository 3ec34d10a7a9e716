use std::sync::Arc;

use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    index::RecommendationIndex,
    models::Movie,
};

/// What to do with the best keyword match.
///
/// The original app always dropped the first keyword result, which looks like
/// the self-exclusion of the title path carried over by mistake. The as-built
/// behaviour stays the default until product confirms otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeywordHeadPolicy {
    /// Discard the top-ranked match and return the next `count`
    #[default]
    SkipTopMatch,
    /// Return the top `count` matches
    KeepAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommenderOptions {
    pub count: usize,
    pub keyword_head: KeywordHeadPolicy,
}

impl Default for RecommenderOptions {
    fn default() -> Self {
        Self {
            count: 5,
            keyword_head: KeywordHeadPolicy::default(),
        }
    }
}

/// A recommended movie and its similarity to the query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredMovie {
    /// Catalog row
    pub row: usize,
    pub movie: Movie,
    pub score: f64,
}

/// Content-based recommender over a loaded [`RecommendationIndex`]
#[derive(Debug, Clone)]
pub struct Recommender {
    index: Arc<RecommendationIndex>,
    options: RecommenderOptions,
}

impl Recommender {
    pub fn new(index: Arc<RecommendationIndex>, options: RecommenderOptions) -> Self {
        Self { index, options }
    }

    pub fn index(&self) -> &RecommendationIndex {
        &self.index
    }

    pub fn options(&self) -> RecommenderOptions {
        self.options
    }

    /// Movies most similar to a catalog title, excluding the title itself.
    ///
    /// Returns `min(count, catalog size - 1)` movies, highest score first,
    /// ties in catalog order.
    pub fn by_title(&self, title: &str) -> AppResult<Vec<ScoredMovie>> {
        let row = self
            .index
            .catalog()
            .position(title)
            .ok_or_else(|| AppError::NotFound(title.to_string()))?;

        let scores = self.index.similarity().row(row).ok_or_else(|| {
            AppError::Internal(format!("similarity matrix has no row {}", row))
        })?;

        let ranked = rank(scores)
            .into_iter()
            .filter(|(candidate, _)| *candidate != row)
            .take(self.options.count);

        let results = self.collect(ranked);
        tracing::debug!(title = %title, results = results.len(), "Title recommendations ranked");

        Ok(results)
    }

    /// Movies whose metadata best matches free text such as cast, crew,
    /// genre or tags.
    ///
    /// Never fails: text with no known terms scores zero against every movie
    /// and the ranking falls back to catalog order.
    pub fn by_keywords(&self, keywords: &str) -> Vec<ScoredMovie> {
        let keywords = normalize_keywords(keywords);
        let query = self.index.vectorizer().transform(&keywords);
        let scores = self.index.terms().cosine_scores(&query);

        let skip = match self.options.keyword_head {
            KeywordHeadPolicy::SkipTopMatch => 1,
            KeywordHeadPolicy::KeepAll => 0,
        };

        let ranked = rank(&scores)
            .into_iter()
            .skip(skip)
            .take(self.options.count);

        let results = self.collect(ranked);
        tracing::debug!(
            keywords = %keywords,
            matched_terms = query.len(),
            results = results.len(),
            "Keyword recommendations ranked"
        );

        results
    }

    fn collect(&self, ranked: impl Iterator<Item = (usize, f64)>) -> Vec<ScoredMovie> {
        let catalog = self.index.catalog();
        ranked
            .filter_map(|(row, score)| {
                catalog.get(row).map(|movie| ScoredMovie {
                    row,
                    movie: movie.clone(),
                    score,
                })
            })
            .collect()
    }
}

/// Collapses runs of whitespace to single spaces and trims the ends
pub fn normalize_keywords(keywords: &str) -> String {
    keywords.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `(row, score)` pairs sorted by descending score. The sort is stable, so
/// equal scores keep row order.
fn rank(scores: &[f64]) -> Vec<(usize, f64)> {
    // -0.0 would otherwise sort below 0.0 under total_cmp
    let mut ranked: Vec<(usize, f64)> = scores
        .iter()
        .map(|&score| if score == 0.0 { 0.0 } else { score })
        .enumerate()
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}
