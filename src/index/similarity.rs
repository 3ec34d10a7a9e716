use serde::Deserialize;

/// Sparse vector as `(column, weight)` pairs sorted by column
pub type SparseVector = Vec<(usize, f64)>;

/// Precomputed movie-by-movie similarity scores
#[derive(Debug, Clone, Deserialize)]
pub struct SimilarityMatrix {
    rows: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first row whose width differs from the row count
    pub(crate) fn first_ragged_row(&self) -> Option<usize> {
        let n = self.rows.len();
        self.rows.iter().position(|row| row.len() != n)
    }
}

/// TF-IDF weights of every catalog movie, one sparse row per movie
#[derive(Debug, Clone)]
pub struct TermMatrix {
    n_features: usize,
    rows: Vec<SparseVector>,
    norms: Vec<f64>,
}

impl TermMatrix {
    /// Sorts each row by column and sums the weights of repeated columns
    pub fn new(n_features: usize, rows: Vec<SparseVector>) -> Self {
        let rows: Vec<SparseVector> = rows.into_iter().map(merge_columns).collect();
        let norms = rows.iter().map(|row| norm(row)).collect();

        Self {
            n_features,
            rows,
            norms,
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[(usize, f64)]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Row and column of the first entry outside `n_features`
    pub(crate) fn first_out_of_range(&self) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(i, row)| {
            row.iter()
                .find(|(column, _)| *column >= self.n_features)
                .map(|(column, _)| (i, *column))
        })
    }

    /// Cosine similarity of `query` against every row, in row order
    pub fn cosine_scores(&self, query: &[(usize, f64)]) -> Vec<f64> {
        let query_norm = norm(query);
        if query_norm == 0.0 {
            return vec![0.0; self.rows.len()];
        }

        self.rows
            .iter()
            .zip(&self.norms)
            .map(|(row, &row_norm)| {
                if row_norm == 0.0 {
                    0.0
                } else {
                    dot(query, row) / (query_norm * row_norm)
                }
            })
            .collect()
    }
}

fn merge_columns(mut row: SparseVector) -> SparseVector {
    row.sort_by_key(|(column, _)| *column);
    let mut merged: SparseVector = Vec::with_capacity(row.len());
    for (column, weight) in row {
        if let Some((last, total)) = merged.last_mut() {
            if *last == column {
                *total += weight;
                continue;
            }
        }
        merged.push((column, weight));
    }
    merged
}

/// Cosine of the angle between two sparse vectors; 0.0 if either is zero
pub fn cosine_similarity(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (norm_a, norm_b) = (norm(a), norm(b));
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot(a, b) / (norm_a * norm_b)
}

fn norm(v: &[(usize, f64)]) -> f64 {
    v.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
}

// Both inputs sorted by column.
fn dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}
