// Domain errors for the recommendation core.
//
// Application glue (CLI, config, database) uses anyhow. The core returns
// these typed errors so callers can tell an empty catalog apart from an
// I/O problem without string matching.

use std::path::PathBuf;

/// Errors raised while loading a place catalog.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV catalog: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog is missing required column `{0}`")]
    MissingColumn(String),

    #[error("Unsupported catalog format for {0} (expected .csv or .json)")]
    UnsupportedFormat(PathBuf),
}

/// Errors raised by the similarity engine and the recommender.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RecommendError {
    #[error("Catalog is empty: nothing to compare or recommend")]
    EmptyCatalog,

    #[error("Invalid {name} weight: {value} (must be a finite number)")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("Similarity index covers {index} places but the catalog has {catalog}")]
    DimensionMismatch { index: usize, catalog: usize },
}
