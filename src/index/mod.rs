//! Precomputed catalog and similarity artifacts.
//!
//! The four artifacts are produced offline and must stay row-aligned: row `i`
//! of the similarity matrix and of the term matrix both describe catalog row
//! `i`. [`RecommendationIndex::new`] checks that alignment once at load time.
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

pub mod catalog;
pub mod similarity;
pub mod vectorizer;

#[cfg(test)]
pub(crate) mod fixtures;

pub use catalog::Catalog;
pub use similarity::{cosine_similarity, SimilarityMatrix, SparseVector, TermMatrix};
pub use vectorizer::{Norm, TfidfVectorizer};

pub const MOVIES_FILE: &str = "movies.json";
pub const SIMILARITY_FILE: &str = "similarity.json";
pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const TERM_MATRIX_FILE: &str = "term_matrix.json";

/// On-disk shape of the term matrix
#[derive(Deserialize)]
struct TermMatrixFile {
    n_features: usize,
    rows: Vec<SparseVector>,
}

/// Immutable bundle of the catalog and both similarity indexes
#[derive(Debug)]
pub struct RecommendationIndex {
    catalog: Catalog,
    similarity: SimilarityMatrix,
    vectorizer: TfidfVectorizer,
    terms: TermMatrix,
}

impl RecommendationIndex {
    /// Assembles an index after checking that all artifacts are row-aligned
    pub fn new(
        catalog: Catalog,
        similarity: SimilarityMatrix,
        vectorizer: TfidfVectorizer,
        terms: TermMatrix,
    ) -> AppResult<Self> {
        let n = catalog.len();

        if similarity.len() != n {
            return Err(AppError::IndexUnavailable(format!(
                "similarity matrix has {} rows but catalog has {} movies",
                similarity.len(),
                n
            )));
        }
        if let Some(row) = similarity.first_ragged_row() {
            return Err(AppError::IndexUnavailable(format!(
                "similarity matrix is not square: row {} does not have {} columns",
                row, n
            )));
        }
        if terms.len() != n {
            return Err(AppError::IndexUnavailable(format!(
                "term matrix has {} rows but catalog has {} movies",
                terms.len(),
                n
            )));
        }
        if terms.n_features() != vectorizer.n_features() {
            return Err(AppError::IndexUnavailable(format!(
                "term matrix has {} features but vectorizer vocabulary has {} terms",
                terms.n_features(),
                vectorizer.n_features()
            )));
        }
        if let Some((row, column)) = terms.first_out_of_range() {
            return Err(AppError::IndexUnavailable(format!(
                "term matrix row {} references column {} outside the vocabulary",
                row, column
            )));
        }
        if let Some(problem) = vectorizer.inconsistency() {
            return Err(AppError::IndexUnavailable(format!(
                "vectorizer is inconsistent: {}",
                problem
            )));
        }

        Ok(Self {
            catalog,
            similarity,
            vectorizer,
            terms,
        })
    }

    /// Loads and validates the four artifacts from `dir`
    pub fn load(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref();
        tracing::info!(dir = %dir.display(), "Loading recommendation artifacts");

        let movies: Vec<Movie> = read_artifact(dir, MOVIES_FILE)?;
        let similarity: SimilarityMatrix = read_artifact(dir, SIMILARITY_FILE)?;
        let vectorizer: TfidfVectorizer = read_artifact(dir, VECTORIZER_FILE)?;
        let terms: TermMatrixFile = read_artifact(dir, TERM_MATRIX_FILE)?;

        let index = Self::new(
            Catalog::new(movies),
            similarity,
            vectorizer,
            TermMatrix::new(terms.n_features, terms.rows),
        )?;

        tracing::info!(
            movies = index.catalog.len(),
            vocabulary = index.vectorizer.n_features(),
            "Recommendation artifacts loaded"
        );

        Ok(index)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn terms(&self) -> &TermMatrix {
        &self.terms
    }
}

fn read_artifact<T: DeserializeOwned>(dir: &Path, name: &str) -> AppResult<T> {
    let path = dir.join(name);
    let raw = std::fs::read_to_string(&path).map_err(|e| {
        AppError::IndexUnavailable(format!("cannot read {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&raw).map_err(|e| {
        AppError::IndexUnavailable(format!("cannot parse {}: {}", path.display(), e))
    })
}
