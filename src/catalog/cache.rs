// Memoizing wrapper around a CatalogSource.
//
// A long-lived caller (a dashboard process, a REPL) can hold one of these and
// call `get()` on every request; the source is only re-read when its stamp
// (modification time + length) changes. The cache is owned state passed in by
// the caller, never a global.

use tracing::debug;

use super::traits::{CatalogSource, SourceStamp};
use super::Catalog;
use crate::error::CatalogError;

pub struct CachedCatalog<S: CatalogSource> {
    source: S,
    cached: Option<(SourceStamp, Catalog)>,
}

impl<S: CatalogSource> CachedCatalog<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: None,
        }
    }

    /// Return the catalog, reloading it if the source changed since the last call.
    pub fn get(&mut self) -> Result<Catalog, CatalogError> {
        let stamp = self.source.stamp()?;

        if let Some((cached_stamp, catalog)) = &self.cached {
            if *cached_stamp == stamp {
                debug!(source = %self.source.describe(), "Catalog cache hit");
                return Ok(catalog.clone());
            }
        }

        debug!(source = %self.source.describe(), "Catalog cache miss, reloading");
        let catalog = self.source.load()?;
        self.cached = Some((stamp, catalog.clone()));
        Ok(catalog)
    }

    /// Drop the cached catalog so the next `get()` reloads unconditionally.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::catalog::Place;

    struct CountingSource {
        loads: Cell<u32>,
        version: Cell<u64>,
    }

    impl CatalogSource for CountingSource {
        fn load(&self) -> Result<Catalog, CatalogError> {
            self.loads.set(self.loads.get() + 1);
            Ok(Catalog::new(vec![Place::new("홍대", "A", "한식", "good")]))
        }

        fn stamp(&self) -> Result<SourceStamp, CatalogError> {
            Ok(SourceStamp {
                modified: None,
                len: self.version.get(),
            })
        }

        fn describe(&self) -> String {
            "counting".to_string()
        }
    }

    fn source() -> CountingSource {
        CountingSource {
            loads: Cell::new(0),
            version: Cell::new(1),
        }
    }

    #[test]
    fn test_unchanged_source_loads_once() {
        let mut cache = CachedCatalog::new(source());
        cache.get().unwrap();
        cache.get().unwrap();
        assert_eq!(cache.source().loads.get(), 1);
    }

    #[test]
    fn test_changed_stamp_reloads() {
        let mut cache = CachedCatalog::new(source());
        cache.get().unwrap();
        cache.source().version.set(2);
        cache.get().unwrap();
        assert_eq!(cache.source().loads.get(), 2);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let mut cache = CachedCatalog::new(source());
        cache.get().unwrap();
        cache.invalidate();
        cache.get().unwrap();
        assert_eq!(cache.source().loads.get(), 2);
    }
}
