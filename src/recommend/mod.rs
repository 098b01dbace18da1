// Similarity recommender: "places like this one".
//
// Given a target title, the review and category similarity rows of that
// place are combined with configurable weights, every place is ranked by the
// combined score, and the top candidates are returned. Two rules make the
// list useful rather than merely similar:
//
//   - the target itself is never recommended;
//   - no two recommended places share identical review text, and none shares
//     the target's review. Scraped catalogs contain boilerplate reviews that
//     would otherwise fill the list with clones.
//
// An empty or unknown target is not an error: the full catalog comes back
// unchanged, tagged with the reason so callers can tell it apart from a
// real ranking.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{Catalog, Place};
use crate::error::RecommendError;
use crate::similarity::SimilarityIndex;

/// Weights for combining the two similarity spaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendWeights {
    /// Weight of review-text similarity (default 1.0)
    pub review_weight: f64,
    /// Weight of category-tag similarity (default 3.0). Category overlap is
    /// the stronger signal: two 한식 places are alike even when their
    /// reviewers used different words.
    pub category_weight: f64,
}

impl Default for RecommendWeights {
    fn default() -> Self {
        Self {
            review_weight: 1.0,
            category_weight: 3.0,
        }
    }
}

impl RecommendWeights {
    fn validate(&self) -> Result<(), RecommendError> {
        if !self.review_weight.is_finite() {
            return Err(RecommendError::InvalidWeight {
                name: "review",
                value: self.review_weight,
            });
        }
        if !self.category_weight.is_finite() {
            return Err(RecommendError::InvalidWeight {
                name: "category",
                value: self.category_weight,
            });
        }
        Ok(())
    }
}

/// Knobs for a single recommendation query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendOptions {
    pub weights: RecommendWeights,
    /// Maximum number of places to return (default 5)
    pub limit: usize,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            weights: RecommendWeights::default(),
            limit: 5,
        }
    }
}

/// The columns shown for a recommended place. Review text is left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceSummary {
    #[serde(rename = "검색어")]
    pub search_term: String,
    pub title: String,
    pub category: String,
}

impl From<&Place> for PlaceSummary {
    fn from(place: &Place) -> Self {
        Self {
            search_term: place.search_term.clone(),
            title: place.title.clone(),
            category: place.category.clone(),
        }
    }
}

/// Why no ranking was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackReason {
    /// The target name was empty.
    NoTarget,
    /// No place in the catalog has the target title.
    NotFound,
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::NoTarget => write!(f, "no target place given"),
            FallbackReason::NotFound => write!(f, "target place not found"),
        }
    }
}

/// Outcome of a recommendation query.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    /// A ranked list of similar places, best first.
    Ranked {
        /// Row index of the target place
        target: usize,
        places: Vec<PlaceSummary>,
    },
    /// No ranking was computed; the full catalog is returned unchanged.
    Fallback {
        reason: FallbackReason,
        places: Vec<Place>,
    },
}

impl Recommendation {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Recommendation::Fallback { .. })
    }

    /// The result rows reduced to the display columns.
    pub fn summaries(&self) -> Vec<PlaceSummary> {
        match self {
            Recommendation::Ranked { places, .. } => places.clone(),
            Recommendation::Fallback { places, .. } => {
                places.iter().map(PlaceSummary::from).collect()
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Recommendation::Ranked { places, .. } => places.len(),
            Recommendation::Fallback { places, .. } => places.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Recommend places similar to `target`.
///
/// The catalog and index must describe the same rows. Ranking is a stable
/// descending sort on the combined score, so ties keep catalog order and
/// repeated calls with the same inputs return the same list.
pub fn recommend_place(
    catalog: &Catalog,
    index: &SimilarityIndex,
    target: &str,
    options: &RecommendOptions,
) -> Result<Recommendation, RecommendError> {
    if catalog.is_empty() {
        return Err(RecommendError::EmptyCatalog);
    }
    if index.dimension() != catalog.len() {
        return Err(RecommendError::DimensionMismatch {
            index: index.dimension(),
            catalog: catalog.len(),
        });
    }
    options.weights.validate()?;

    if target.is_empty() {
        return Ok(fallback(catalog, FallbackReason::NoTarget));
    }

    let Some(target_idx) = catalog.position(target) else {
        debug!(target = target, "Target place not in catalog, returning full table");
        return Ok(fallback(catalog, FallbackReason::NotFound));
    };

    let weights = options.weights;
    let combined = index.combined_row(target_idx, weights.review_weight, weights.category_weight);

    // Vec::sort_by is stable: equal scores keep their catalog order
    let mut ranked: Vec<usize> = (0..catalog.len()).collect();
    ranked.sort_by(|&a, &b| combined[b].total_cmp(&combined[a]));

    let places = catalog.places();
    let target_review = places[target_idx].review.as_str();

    let mut seen_reviews: HashSet<&str> = HashSet::new();
    if !target_review.is_empty() {
        seen_reviews.insert(target_review);
    }

    let mut accepted = Vec::with_capacity(options.limit);
    for idx in ranked {
        if accepted.len() >= options.limit {
            break;
        }
        if idx == target_idx {
            continue;
        }
        let review = places[idx].review.as_str();
        if !seen_reviews.insert(review) {
            continue;
        }
        accepted.push(PlaceSummary::from(&places[idx]));
    }

    info!(
        target = target,
        results = accepted.len(),
        limit = options.limit,
        "Computed recommendations"
    );

    Ok(Recommendation::Ranked {
        target: target_idx,
        places: accepted,
    })
}

fn fallback(catalog: &Catalog, reason: FallbackReason) -> Recommendation {
    Recommendation::Fallback {
        reason,
        places: catalog.places().to_vec(),
    }
}

/// A catalog paired with its similarity index, ready to answer queries.
///
/// Both halves are immutable and reference-counted; cloning a Recommender
/// or sharing it across threads never recomputes the matrices.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Catalog,
    index: Arc<SimilarityIndex>,
}

impl Recommender {
    /// Build the similarity index for `catalog`.
    pub fn new(catalog: Catalog) -> Result<Self, RecommendError> {
        let index = SimilarityIndex::build(&catalog)?;
        Ok(Self {
            catalog,
            index: Arc::new(index),
        })
    }

    /// Pair a catalog with an index computed earlier for the same rows.
    pub fn with_index(catalog: Catalog, index: Arc<SimilarityIndex>) -> Result<Self, RecommendError> {
        if catalog.is_empty() {
            return Err(RecommendError::EmptyCatalog);
        }
        if index.dimension() != catalog.len() {
            return Err(RecommendError::DimensionMismatch {
                index: index.dimension(),
                catalog: catalog.len(),
            });
        }
        Ok(Self { catalog, index })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &Arc<SimilarityIndex> {
        &self.index
    }

    pub fn recommend(
        &self,
        target: &str,
        options: &RecommendOptions,
    ) -> Result<Recommendation, RecommendError> {
        recommend_place(&self.catalog, &self.index, target, options)
    }
}
