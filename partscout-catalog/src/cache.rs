//! In-memory catalog cache.
//!
//! The catalog is immutable for the lifetime of a matching session, so
//! repeated lookups against the same file can share one loaded snapshot.
//! This is an optimization only; callers that load directly via
//! [`crate::load_catalog`] get identical results.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::CatalogError;
use crate::load::load_catalog;
use crate::matcher::Catalog;

/// Memoizes catalog loads per path for one session.
#[derive(Debug, Default)]
pub struct CatalogCache {
    loaded: HashMap<PathBuf, Arc<Catalog>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached catalog for `path`, loading it on first use.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Catalog>, CatalogError> {
        if let Some(catalog) = self.loaded.get(path) {
            return Ok(Arc::clone(catalog));
        }
        let catalog = Arc::new(load_catalog(path)?);
        self.loaded.insert(path.to_path_buf(), Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Number of distinct catalogs held.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_second_load_shares_snapshot() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Name,SKU,Stock,Description").unwrap();
        writeln!(file, "Impeller,PUMP-1,4,Rubber impeller").unwrap();

        let mut cache = CatalogCache::new();
        let first = cache.get_or_load(file.path()).unwrap();
        let second = cache.get_or_load(file.path()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_file_is_an_error_not_a_cache_entry() {
        let mut cache = CatalogCache::new();
        let err = cache.get_or_load(Path::new("/nonexistent/catalog.csv"));
        assert!(err.is_err());
        assert!(cache.is_empty());
    }
}
