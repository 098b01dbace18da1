use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::recommend::{RecommendOptions, RecommendWeights};

/// Default location of the place catalog export.
pub const DEFAULT_CATALOG_PATH: &str = "./data/places.csv";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy; CLI flags override the
/// recommendation knobs per invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Place catalog file (.csv or .json)
    pub catalog_path: PathBuf,
    /// SQLite link store
    pub db_path: String,
    pub review_weight: f64,
    pub category_weight: f64,
    /// Number of recommendations to return
    pub limit: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every value has a default; a variable that is set but unparseable is
    /// an error rather than silently ignored.
    pub fn load() -> Result<Self> {
        let defaults = RecommendOptions::default();

        Ok(Self {
            catalog_path: env::var("HOWS_SEOUL_CATALOG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CATALOG_PATH)),
            db_path: env::var("HOWS_SEOUL_DB_PATH")
                .unwrap_or_else(|_| "./hows_seoul.db".to_string()),
            review_weight: parse_var("HOWS_SEOUL_REVIEW_WEIGHT", defaults.weights.review_weight)?,
            category_weight: parse_var(
                "HOWS_SEOUL_CATEGORY_WEIGHT",
                defaults.weights.category_weight,
            )?,
            limit: parse_var("HOWS_SEOUL_LIMIT", defaults.limit)?,
        })
    }

    /// Recommendation options from the configured defaults.
    pub fn recommend_options(&self) -> RecommendOptions {
        RecommendOptions {
            weights: RecommendWeights {
                review_weight: self.review_weight,
                category_weight: self.category_weight,
            },
            limit: self.limit,
        }
    }

    /// Check that the catalog file exists.
    /// Call this before any command that needs the place table.
    pub fn require_catalog(&self) -> Result<()> {
        if !self.catalog_path.exists() {
            anyhow::bail!(
                "Place catalog not found at {}.\n\
                 Set HOWS_SEOUL_CATALOG in your .env file or pass --catalog.",
                self.catalog_path.display()
            );
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} is set to '{raw}', which is not a valid value")),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_default_when_unset() {
        let value: f64 = parse_var("HOWS_SEOUL_TEST_UNSET_VAR", 2.5).unwrap();
        assert_eq!(value, 2.5);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("HOWS_SEOUL_TEST_BAD_LIMIT", "five");
        let result: Result<usize> = parse_var("HOWS_SEOUL_TEST_BAD_LIMIT", 5);
        env::remove_var("HOWS_SEOUL_TEST_BAD_LIMIT");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("HOWS_SEOUL_TEST_BAD_LIMIT"));
    }

    #[test]
    fn test_parse_var_reads_value() {
        env::set_var("HOWS_SEOUL_TEST_WEIGHT", " 0.5 ");
        let value: f64 = parse_var("HOWS_SEOUL_TEST_WEIGHT", 1.0).unwrap();
        env::remove_var("HOWS_SEOUL_TEST_WEIGHT");
        assert_eq!(value, 0.5);
    }
}
