// Similarity engine: review-text and category-tag cosine matrices.
//
// Two independent bag-of-words spaces are built over the catalog: one from
// review text (whitespace tokens) and one from category tags (`|` tokens).
// Each yields an N×N cosine similarity matrix. The matrices are computed
// once per catalog load and are read-only afterwards, so one index can serve
// any number of recommendation queries.

pub mod matrix;
pub mod vectorizer;

use tracing::info;

use crate::catalog::Catalog;
use crate::error::RecommendError;

use self::matrix::SimilarityMatrix;
use self::vectorizer::{CountVectorizer, Tokenizer};

/// Review and category similarity matrices for one catalog.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    pub review: SimilarityMatrix,
    pub category: SimilarityMatrix,
}

impl SimilarityIndex {
    /// Vectorize the catalog and compute both similarity matrices.
    ///
    /// An empty catalog is rejected before any vectorization happens.
    pub fn build(catalog: &Catalog) -> Result<Self, RecommendError> {
        if catalog.is_empty() {
            return Err(RecommendError::EmptyCatalog);
        }

        let reviews = CountVectorizer::new(Tokenizer::Whitespace)
            .fit_transform(catalog.iter().map(|p| p.review.as_str()));
        let categories = CountVectorizer::new(Tokenizer::category())
            .fit_transform(catalog.iter().map(|p| p.category.as_str()));

        let index = Self {
            review: SimilarityMatrix::from_vectors(&reviews.vectors),
            category: SimilarityMatrix::from_vectors(&categories.vectors),
        };

        info!(
            places = catalog.len(),
            review_terms = reviews.vocabulary.len(),
            category_tags = categories.vocabulary.len(),
            "Built similarity matrices"
        );

        Ok(index)
    }

    /// Number of places the index covers.
    pub fn dimension(&self) -> usize {
        self.review.dimension()
    }

    /// Weighted similarity between two rows:
    /// `review_weight * review[i][j] + category_weight * category[i][j]`.
    pub fn combined(&self, i: usize, j: usize, review_weight: f64, category_weight: f64) -> f64 {
        review_weight * self.review.get(i, j) + category_weight * self.category.get(i, j)
    }

    /// Weighted similarity of row `i` against every row. Not re-normalized.
    pub fn combined_row(&self, i: usize, review_weight: f64, category_weight: f64) -> Vec<f64> {
        self.review
            .row(i)
            .iter()
            .zip(self.category.row(i))
            .map(|(r, c)| review_weight * r + category_weight * c)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Place;

    #[test]
    fn test_empty_catalog_rejected() {
        let err = SimilarityIndex::build(&Catalog::default()).unwrap_err();
        assert_eq!(err, RecommendError::EmptyCatalog);
    }

    #[test]
    fn test_spaces_are_independent() {
        let catalog = Catalog::new(vec![
            Place::new("홍대", "A", "한식", "good food"),
            Place::new("홍대", "B", "양식", "good food"),
        ]);
        let index = SimilarityIndex::build(&catalog).unwrap();
        assert!((index.review.get(0, 1) - 1.0).abs() < 1e-9);
        assert_eq!(index.category.get(0, 1), 0.0);
    }

    #[test]
    fn test_category_is_case_insensitive() {
        let catalog = Catalog::new(vec![
            Place::new("홍대", "A", "Cafe", ""),
            Place::new("홍대", "B", "cafe", ""),
        ]);
        let index = SimilarityIndex::build(&catalog).unwrap();
        assert!((index.category.get(0, 1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_combined_row_is_weighted_sum() {
        let catalog = Catalog::new(vec![
            Place::new("홍대", "A", "한식|고기", "good food"),
            Place::new("홍대", "B", "한식", "good service"),
        ]);
        let index = SimilarityIndex::build(&catalog).unwrap();
        let row = index.combined_row(0, 1.0, 3.0);
        let expected = index.review.get(0, 1) + 3.0 * index.category.get(0, 1);
        assert!((row[1] - expected).abs() < 1e-12);
        assert!((row[1] - index.combined(0, 1, 1.0, 3.0)).abs() < 1e-12);
        // Self-similarity is not capped at 1.0 after weighting
        assert!((row[0] - 4.0).abs() < 1e-9);
    }
}
