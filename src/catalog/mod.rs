// Place catalog: the in-memory table every recommender works over.
//
// A catalog is loaded once from a CSV or JSON export and then treated as
// read-only. Missing review/category cells become empty strings; rows are
// never dropped at load time. Cloning a Catalog is cheap (shared slice), so
// it can be handed to several recommenders without copying the rows.

pub mod cache;
pub mod loader;
pub mod traits;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Column holding the region tag a place was collected under.
pub const REGION_COLUMN: &str = "검색어";
pub const TITLE_COLUMN: &str = "title";
pub const CATEGORY_COLUMN: &str = "category";
pub const REVIEW_COLUMN: &str = "review";

/// Separator between tags in the `category` column.
pub const CATEGORY_DELIMITER: char = '|';

/// A single row of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    /// Region tag (the search term the place was collected under)
    #[serde(rename = "검색어")]
    pub search_term: String,
    /// Display name; identity key within a catalog
    pub title: String,
    /// Pipe-delimited category tags, e.g. `한식|고기`
    pub category: String,
    /// Free-text review, possibly empty
    pub review: String,
}

impl Place {
    pub fn new(search_term: &str, title: &str, category: &str, review: &str) -> Self {
        Self {
            search_term: search_term.to_string(),
            title: title.to_string(),
            category: category.to_string(),
            review: review.to_string(),
        }
    }
}

/// Immutable table of places, indexed by row position.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    places: Arc<[Place]>,
}

impl Catalog {
    pub fn new(places: Vec<Place>) -> Self {
        Self {
            places: places.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn get(&self, index: usize) -> Option<&Place> {
        self.places.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Place> {
        self.places.iter()
    }

    /// Row index of the first place whose title matches exactly (case-sensitive).
    pub fn position(&self, title: &str) -> Option<usize> {
        self.places.iter().position(|p| p.title == title)
    }

    /// Distinct region tags in first-seen order.
    pub fn regions(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.places
            .iter()
            .map(|p| p.search_term.as_str())
            .filter(|r| seen.insert(*r))
            .collect()
    }
}

impl From<Vec<Place>> for Catalog {
    fn from(places: Vec<Place>) -> Self {
        Self::new(places)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Place;
    type IntoIter = std::slice::Iter<'a, Place>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
