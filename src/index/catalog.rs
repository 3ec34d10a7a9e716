use std::collections::HashMap;

use crate::models::Movie;

/// Movie table in artifact row order, with a title lookup.
///
/// Row positions are the shared coordinate system of the similarity matrix
/// and the term matrix.
#[derive(Debug, Clone)]
pub struct Catalog {
    movies: Vec<Movie>,
    by_title: HashMap<String, usize>,
}

impl Catalog {
    /// Builds the catalog. A repeated title resolves to its first row.
    pub fn new(movies: Vec<Movie>) -> Self {
        let mut by_title = HashMap::with_capacity(movies.len());
        for (row, movie) in movies.iter().enumerate() {
            by_title.entry(movie.title.clone()).or_insert(row);
        }

        Self { movies, by_title }
    }

    /// Row of an exact title match
    pub fn position(&self, title: &str) -> Option<usize> {
        self.by_title.get(title).copied()
    }

    pub fn get(&self, row: usize) -> Option<&Movie> {
        self.movies.get(row)
    }

    pub fn find(&self, title: &str) -> Option<&Movie> {
        self.position(title).and_then(|row| self.get(row))
    }

    /// Titles in row order, as offered by the movie selector
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|m| m.title.as_str())
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
