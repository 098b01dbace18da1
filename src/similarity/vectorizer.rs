// Bag-of-words count vectors.
//
// Each document becomes a sparse vector of raw token counts over a
// vocabulary built from the whole corpus. Two tokenizers are needed: reviews
// split on whitespace (punctuation stays attached to its word, so "good," and
// "good" are different terms), and categories split on the `|` delimiter so
// each tag is one term. Both lowercase first.

use std::collections::HashMap;

use crate::catalog::CATEGORY_DELIMITER;

/// How a document is split into terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tokenizer {
    /// Lowercase, then split on runs of whitespace.
    Whitespace,
    /// Lowercase, then split on a single delimiter character. Empty pieces
    /// (from `a||b` or a trailing delimiter) are dropped.
    Delimited(char),
}

impl Tokenizer {
    /// Tokenizer for pipe-delimited category tags.
    pub fn category() -> Self {
        Tokenizer::Delimited(CATEGORY_DELIMITER)
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        match self {
            Tokenizer::Whitespace => lower.split_whitespace().map(str::to_string).collect(),
            Tokenizer::Delimited(delim) => lower
                .split(*delim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Sparse term-count vector, sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    entries: Vec<(usize, f64)>,
    norm: f64,
}

impl TermVector {
    fn from_counts(counts: HashMap<usize, u32>) -> Self {
        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(term, count)| (term, f64::from(count)))
            .collect();
        entries.sort_by_key(|(term, _)| *term);
        let norm = entries.iter().map(|(_, c)| c * c).sum::<f64>().sqrt();
        Self { entries, norm }
    }

    /// True when the document produced no terms at all.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count of a term id in this document (0 if absent).
    #[cfg(test)]
    fn count(&self, term: usize) -> f64 {
        self.entries
            .binary_search_by_key(&term, |(t, _)| *t)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    /// Dot product via a merge walk over both sorted entry lists.
    pub fn dot(&self, other: &TermVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ta, ca) = self.entries[i];
            let (tb, cb) = other.entries[j];
            match ta.cmp(&tb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += ca * cb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Cosine similarity between two count vectors.
///
/// Returns 0.0 when either vector has zero length, including a zero vector
/// compared with itself. Counts are non-negative, so the result is always
/// within [0, 1]; the clamp only absorbs rounding drift above 1.0.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f64 {
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    let denom = a.norm * b.norm;
    if denom < f64::EPSILON {
        0.0
    } else {
        (a.dot(b) / denom).clamp(0.0, 1.0)
    }
}

/// Fits a vocabulary over a corpus and turns each document into counts.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    tokenizer: Tokenizer,
}

/// The result of fitting: the vocabulary and one vector per document.
#[derive(Debug, Clone)]
pub struct FittedCounts {
    pub vocabulary: HashMap<String, usize>,
    pub vectors: Vec<TermVector>,
}

impl CountVectorizer {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Build the vocabulary from `docs` and return each document's counts.
    pub fn fit_transform<'a, I>(&self, docs: I) -> FittedCounts
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut vectors = Vec::new();

        for doc in docs {
            let mut counts: HashMap<usize, u32> = HashMap::new();
            for token in self.tokenizer.tokenize(doc) {
                let next_id = vocabulary.len();
                let id = *vocabulary.entry(token).or_insert(next_id);
                *counts.entry(id).or_insert(0) += 1;
            }
            vectors.push(TermVector::from_counts(counts));
        }

        FittedCounts {
            vocabulary,
            vectors,
        }
    }
}
