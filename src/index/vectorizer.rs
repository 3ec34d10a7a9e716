use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Deserialize;

use super::similarity::SparseVector;

/// Normalization applied to transformed vectors
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    None,
}

/// Fitted TF-IDF vectorizer.
///
/// Vocabulary and idf weights come from the offline build; this type only
/// transforms query text into the same weighted space.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    /// Per-column idf weights. Empty means raw term frequencies.
    #[serde(default)]
    idf: Vec<f64>,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default)]
    norm: Norm,
    #[serde(default)]
    stop_words: HashSet<String>,
}

fn default_lowercase() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

impl TfidfVectorizer {
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Self {
        Self {
            vocabulary,
            idf,
            lowercase: default_lowercase(),
            ngram_range: default_ngram_range(),
            sublinear_tf: false,
            norm: Norm::L2,
            stop_words: HashSet::new(),
        }
    }

    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.ngram_range = (min_n, max_n);
        self
    }

    pub fn with_sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.sublinear_tf = sublinear_tf;
        self
    }

    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Number of columns in the vector space
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Describes the first inconsistency in the fitted parameters, if any
    pub(crate) fn inconsistency(&self) -> Option<String> {
        let n = self.n_features();
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Some(format!("invalid ngram_range ({}, {})", min_n, max_n));
        }
        if !self.idf.is_empty() && self.idf.len() != n {
            return Some(format!(
                "idf has {} weights for a vocabulary of {} terms",
                self.idf.len(),
                n
            ));
        }
        let mut seen = vec![false; n];
        for (term, &column) in &self.vocabulary {
            if column >= n || std::mem::replace(&mut seen[column], true) {
                return Some(format!("term '{}' has invalid column {}", term, column));
            }
        }
        None
    }

    /// Maps text into the fitted TF-IDF space.
    ///
    /// Terms outside the vocabulary are ignored, so unknown text yields the
    /// zero vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let tokens = self.tokenize(text);

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n.max(1)..=max_n {
            for gram in tokens.windows(n) {
                if let Some(&column) = self.vocabulary.get(&gram.join(" ")) {
                    *counts.entry(column).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(column, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                let idf = self.idf.get(column).copied().unwrap_or(1.0);
                (column, tf * idf)
            })
            .collect();

        if self.norm == Norm::L2 {
            let length = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if length > 0.0 {
                vector.iter_mut().for_each(|(_, w)| *w /= length);
            }
        }

        vector
    }

    /// Word tokens of two or more word characters, minus stop words
    fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().count() >= 2)
            .filter(|token| !self.stop_words.contains(*token))
            .map(str::to_string)
            .collect()
    }
}
