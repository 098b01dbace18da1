// Keyword filter recommender: "places matching these words".
//
// The second recommendation mode next to the similarity recommender. A user
// types any of a region, a category word and a review word; the catalog is
// narrowed step by step, ranked by how often the review word appears, and
// deduplicated by review text. When fewer than `top_n` places survive, the
// list is topped up with random places that have a review not yet shown.
//
// Category and review terms are case-insensitive regular expressions (so
// `한식|양식` matches either); a term that fails to compile is matched as a
// literal string instead. The region term is always a literal substring.

use std::collections::HashSet;

use rand::Rng;
use regex_lite::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{Catalog, Place};
use crate::output::truncate_chars;

/// Reviews longer than this are cut and suffixed with "...".
pub const REVIEW_PREVIEW_CHARS: usize = 300;

/// A keyword query. Empty or missing terms are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub search_term: Option<String>,
    pub category_term: Option<String>,
    pub review_term: Option<String>,
    /// Number of places to return (default 5)
    pub top_n: usize,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            search_term: None,
            category_term: None,
            review_term: None,
            top_n: 5,
        }
    }
}

impl FilterQuery {
    /// True when at least one of the three terms is set.
    pub fn has_terms(&self) -> bool {
        active(&self.search_term).is_some()
            || active(&self.category_term).is_some()
            || active(&self.review_term).is_some()
    }
}

/// One row of a keyword filter result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterHit {
    #[serde(rename = "검색어")]
    pub search_term: String,
    pub title: String,
    pub category: String,
    /// Review text, truncated to `REVIEW_PREVIEW_CHARS` characters
    pub review: String,
}

impl From<&Place> for FilterHit {
    fn from(place: &Place) -> Self {
        Self {
            search_term: place.search_term.clone(),
            title: place.title.clone(),
            category: place.category.clone(),
            review: truncate_chars(&place.review, REVIEW_PREVIEW_CHARS),
        }
    }
}

fn active(term: &Option<String>) -> Option<&str> {
    term.as_deref().filter(|t| !t.is_empty())
}

/// Case-insensitive matcher for a user-supplied term.
///
/// regex-lite's `(?i)` only folds ASCII, so both the pattern and the text
/// are lowercased with Unicode rules instead and matched case-sensitively.
enum TermMatcher {
    Pattern(Regex),
    Literal(String),
}

impl TermMatcher {
    fn new(term: &str) -> Self {
        match Regex::new(&fold_pattern(term)) {
            Ok(re) => TermMatcher::Pattern(re),
            Err(e) => {
                warn!(term = term, error = %e, "Term is not a valid pattern, matching literally");
                TermMatcher::Literal(term.to_lowercase())
            }
        }
    }

    fn is_match(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        match self {
            TermMatcher::Pattern(re) => re.is_match(&text),
            TermMatcher::Literal(term) => text.contains(term.as_str()),
        }
    }
}

/// Lowercase a pattern without touching escapes: `\W` and `\w` differ.
fn fold_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut escaped = false;
    for c in pattern.chars() {
        if escaped {
            out.push(c);
            escaped = false;
        } else {
            escaped = c == '\\';
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Split lowercased text into words: runs of letters, digits and `_`.
///
/// Not a regex on purpose: regex-lite's `\w` is ASCII-only and would
/// split Korean text into nothing.
fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// How many times the words of `term` occur in `review`.
///
/// The term is split on whitespace; the score is the sum of each piece's
/// occurrence count among the review's words. Matching is case-insensitive
/// and whole-word.
pub fn term_frequency(review: &str, term: &str) -> usize {
    let review_words = words(review);
    term.to_lowercase()
        .split_whitespace()
        .map(|piece| review_words.iter().filter(|w| w.as_str() == piece).count())
        .sum()
}

/// Run a keyword query against the catalog.
///
/// `rng` drives the random top-up; pass a seeded generator for reproducible
/// output.
pub fn filter_places<R: Rng + ?Sized>(
    catalog: &Catalog,
    query: &FilterQuery,
    rng: &mut R,
) -> Vec<FilterHit> {
    // Places without a review are never shown by this mode
    let reviewed: Vec<&Place> = catalog
        .iter()
        .filter(|p| !p.review.trim().is_empty())
        .collect();

    let mut candidates: Vec<&Place> = reviewed.clone();

    if let Some(region) = active(&query.search_term) {
        let region = region.to_lowercase();
        candidates.retain(|p| p.search_term.to_lowercase().contains(&region));
    }

    if let Some(category) = active(&query.category_term) {
        let matcher = TermMatcher::new(category);
        candidates.retain(|p| matcher.is_match(&p.category));
    }

    if let Some(review_term) = active(&query.review_term) {
        let matcher = TermMatcher::new(review_term);
        candidates.retain(|p| matcher.is_match(&p.review));
        // Stable: equal frequencies keep catalog order
        candidates.sort_by_cached_key(|p| std::cmp::Reverse(term_frequency(&p.review, review_term)));
    }

    let mut seen_reviews: HashSet<&str> = HashSet::new();
    let mut results: Vec<&Place> = candidates
        .into_iter()
        .filter(|&p| seen_reviews.insert(p.review.as_str()))
        .take(query.top_n)
        .collect();

    if results.len() < query.top_n {
        let shown: HashSet<&str> = results.iter().map(|p| p.review.as_str()).collect();
        let pool: Vec<&Place> = reviewed
            .iter()
            .copied()
            .filter(|p| !shown.contains(p.review.as_str()))
            .collect();

        let wanted = (query.top_n - results.len()).min(pool.len());
        if wanted > 0 {
            debug!(
                matched = results.len(),
                topping_up = wanted,
                "Too few matches, adding random places"
            );
            let mut seen: HashSet<&str> = shown;
            for i in rand::seq::index::sample(rng, pool.len(), wanted) {
                let place = pool[i];
                if seen.insert(place.review.as_str()) {
                    results.push(place);
                }
            }
        }
    }

    results.into_iter().map(FilterHit::from).collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Place::new("성수카페거리", "Onion", "카페|베이커리", "빵 맛 좋아요 빵 최고"),
            Place::new("성수카페거리", "Daelim", "카페", "커피 맛 괜찮아요"),
            Place::new("홍대", "Mapo", "한식|고기", "고기 맛 좋아요"),
            Place::new("홍대", "Blank", "한식", "   "),
            Place::new("이태원", "Pasta", "양식", "파스타 맛 좋아요"),
        ])
    }

    fn query(search: &str, category: &str, review: &str, top_n: usize) -> FilterQuery {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        FilterQuery {
            search_term: opt(search),
            category_term: opt(category),
            review_term: opt(review),
            top_n,
        }
    }

    #[test]
    fn test_term_frequency_whole_words() {
        assert_eq!(term_frequency("Good food, good price!", "good"), 2);
        assert_eq!(term_frequency("goodness", "good"), 0);
        assert_eq!(term_frequency("빵 맛 좋아요 빵", "빵 맛"), 3);
    }

    #[test]
    fn test_region_filter_is_case_insensitive_literal() {
        let catalog = Catalog::new(vec![
            Place::new("Seongsu", "A", "카페", "one"),
            Place::new("Hongdae", "B", "카페", "two"),
        ]);
        let mut rng = StdRng::seed_from_u64(7);
        let hits = filter_places(&catalog, &query("seongsu", "", "", 1), &mut rng);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "A");
    }

    #[test]
    fn test_review_term_ranks_by_frequency() {
        let mut rng = StdRng::seed_from_u64(7);
        let hits = filter_places(&catalog(), &query("", "", "빵", 1), &mut rng);
        assert_eq!(hits[0].title, "Onion");
    }

    #[test]
    fn test_category_term_is_a_pattern() {
        let mut rng = StdRng::seed_from_u64(7);
        let hits = filter_places(&catalog(), &query("", "고기|양식", "", 2), &mut rng);
        let titles: Vec<&str> = hits.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["Mapo", "Pasta"]);
    }

    #[test]
    fn test_invalid_pattern_matches_literally() {
        let catalog = Catalog::new(vec![Place::new("홍대", "A", "카페(", "review")]);
        let mut rng = StdRng::seed_from_u64(7);
        let hits = filter_places(&catalog, &query("", "카페(", "", 1), &mut rng);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_blank_reviews_never_returned() {
        let mut rng = StdRng::seed_from_u64(1);
        let hits = filter_places(&catalog(), &query("", "한식", "", 5), &mut rng);
        assert!(hits.iter().all(|h| h.title != "Blank"));
    }

    #[test]
    fn test_top_up_fills_without_duplicates() {
        let mut rng = StdRng::seed_from_u64(42);
        let hits = filter_places(&catalog(), &query("이태원", "", "", 3), &mut rng);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].title, "Pasta");
        let reviews: HashSet<&str> = hits.iter().map(|h| h.review.as_str()).collect();
        assert_eq!(reviews.len(), 3);
    }

    #[test]
    fn test_long_review_truncated() {
        let long = "맛".repeat(REVIEW_PREVIEW_CHARS + 10);
        let catalog = Catalog::new(vec![Place::new("홍대", "A", "한식", &long)]);
        let mut rng = StdRng::seed_from_u64(7);
        let hits = filter_places(&catalog, &query("홍대", "", "", 1), &mut rng);
        assert_eq!(hits[0].review.chars().count(), REVIEW_PREVIEW_CHARS + 3);
        assert!(hits[0].review.ends_with("..."));
    }

    #[test]
    fn test_fold_pattern_keeps_escapes() {
        assert_eq!(fold_pattern("CAFÉ|Bar"), "café|bar");
        assert_eq!(fold_pattern(r"\W\D\\X"), r"\W\D\\x");
    }

    #[test]
    fn test_non_ascii_term_case_insensitive() {
        let catalog = Catalog::new(vec![
            Place::new("홍대", "A", "Café", "review a"),
            Place::new("홍대", "B", "bar", "review b"),
        ]);
        let mut rng = StdRng::seed_from_u64(7);
        let hits = filter_places(&catalog, &query("", "CAFÉ", "", 1), &mut rng);
        assert_eq!(hits[0].title, "A");
    }

    #[test]
    fn test_has_terms() {
        assert!(!FilterQuery::default().has_terms());
        assert!(!query("", "", "", 5).has_terms());
        assert!(query("", "", "맛", 5).has_terms());
    }
}
