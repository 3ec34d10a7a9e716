//! Small hand-built index shared by unit tests.
use std::collections::HashMap;

use super::{Catalog, RecommendationIndex, SimilarityMatrix, TermMatrix, TfidfVectorizer};
use crate::models::Movie;

pub(crate) const VOCABULARY: [&str; 9] = [
    "christopher",
    "nolan",
    "dream",
    "space",
    "batman",
    "magic",
    "romance",
    "ship",
    "memory",
];

pub(crate) fn movies() -> Vec<Movie> {
    vec![
        Movie::new(27205, "Inception", 8.1),
        Movie::new(157336, "Interstellar", 8.1),
        Movie::new(155, "The Dark Knight", 8.2),
        Movie::new(1124, "The Prestige", 8.0),
        Movie::new(77, "Memento", 8.1),
        Movie::new(597, "Titanic", 7.5),
        Movie::new(11036, "The Notebook", 7.7),
    ]
}

/// Symmetric with a unit diagonal. Inception ties The Dark Knight and
/// The Prestige at 0.5.
pub(crate) fn similarity_rows() -> Vec<Vec<f64>> {
    vec![
        vec![1.0, 0.6, 0.5, 0.5, 0.4, 0.1, 0.0],
        vec![0.6, 1.0, 0.3, 0.2, 0.2, 0.1, 0.1],
        vec![0.5, 0.3, 1.0, 0.4, 0.3, 0.0, 0.0],
        vec![0.5, 0.2, 0.4, 1.0, 0.6, 0.0, 0.1],
        vec![0.4, 0.2, 0.3, 0.6, 1.0, 0.0, 0.0],
        vec![0.1, 0.1, 0.0, 0.0, 0.0, 1.0, 0.7],
        vec![0.0, 0.1, 0.0, 0.1, 0.0, 0.7, 1.0],
    ]
}

/// Raw term weights per movie, columns indexing [`VOCABULARY`]
pub(crate) fn term_rows() -> Vec<Vec<(usize, f64)>> {
    vec![
        vec![(0, 1.0), (1, 1.0), (2, 1.0)],
        vec![(0, 1.0), (1, 1.0), (3, 1.0)],
        vec![(1, 1.0), (4, 1.0)],
        vec![(0, 1.0), (1, 1.0), (5, 1.0), (8, 1.0)],
        vec![(1, 1.0), (8, 2.0)],
        vec![(6, 1.0), (7, 1.0)],
        vec![(6, 1.0), (8, 1.0)],
    ]
}

pub(crate) fn vectorizer() -> TfidfVectorizer {
    let vocabulary: HashMap<String, usize> = VOCABULARY
        .iter()
        .enumerate()
        .map(|(i, term)| (term.to_string(), i))
        .collect();
    TfidfVectorizer::new(vocabulary, vec![])
}

pub(crate) fn sample_index() -> RecommendationIndex {
    RecommendationIndex::new(
        Catalog::new(movies()),
        SimilarityMatrix::new(similarity_rows()),
        vectorizer(),
        TermMatrix::new(VOCABULARY.len(), term_rows()),
    )
    .expect("fixture artifacts are aligned")
}
