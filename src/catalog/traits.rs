// Catalog source trait: where a catalog comes from.
//
// The recommender never reads files itself. Anything that can produce a
// Catalog (a CSV export, a JSON dump, a fixture in tests) implements this
// trait, and CachedCatalog can memoize any of them.

use std::time::SystemTime;

use super::Catalog;
use crate::error::CatalogError;

/// Identity of a source's current contents, used to decide when a cached
/// catalog is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceStamp {
    pub modified: Option<SystemTime>,
    pub len: u64,
}

/// Trait for anything that can load a place catalog.
pub trait CatalogSource {
    /// Read the full catalog.
    fn load(&self) -> Result<Catalog, CatalogError>;

    /// Cheap check of the source's current version, without reading rows.
    fn stamp(&self) -> Result<SourceStamp, CatalogError>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}
