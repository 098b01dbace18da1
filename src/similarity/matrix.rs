// Dense N×N cosine similarity matrix over one feature space.

use super::vectorizer::{cosine_similarity, TermVector};

/// Square, symmetric similarity matrix stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dimension: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute pairwise cosine similarity for every pair of vectors.
    ///
    /// Only the upper triangle is computed; the lower one is mirrored.
    pub fn from_vectors(vectors: &[TermVector]) -> Self {
        let n = vectors.len();
        let mut values = vec![0.0; n * n];

        for i in 0..n {
            for j in i..n {
                let sim = cosine_similarity(&vectors[i], &vectors[j]);
                values[i * n + j] = sim;
                values[j * n + i] = sim;
            }
        }

        Self {
            dimension: n,
            values,
        }
    }

    /// Number of rows (= number of columns).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.dimension + j]
    }

    /// Similarities of row `i` against every row.
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.dimension;
        &self.values[start..start + self.dimension]
    }
}
