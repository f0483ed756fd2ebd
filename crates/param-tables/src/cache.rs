use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::{ParamTable, TableError, load_table};

/// Per-path cache of loaded parameter tables.
///
/// Each distinct path is read and parsed at most once; the resulting table is
/// shared read-only through an [`Arc`] for the lifetime of the cache. A failed
/// load is not cached, so a later call retries it.
#[derive(Debug, Default)]
pub struct TableCache {
    tables: Mutex<HashMap<PathBuf, Arc<ParamTable>>>,
}

impl TableCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the table for `path`, loading it on first access.
    pub fn load(&self, path: &Path) -> Result<Arc<ParamTable>, TableError> {
        // The lock is held across the load so concurrent callers for the same
        // path never parse it twice.
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = tables.get(path) {
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load_table(path)?);
        tracing::debug!(
            path = %path.display(),
            params = table.len(),
            lists = table.item_lists.len(),
            "loaded parameter table"
        );
        tables.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }

    /// Load every path in order, preserving that order in the result.
    pub fn load_all<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<Arc<ParamTable>>, TableError> {
        paths.iter().map(|p| self.load(p.as_ref())).collect()
    }

    /// Number of distinct tables currently cached.
    pub fn len(&self) -> usize {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_table(dir: &Path, name: &str, json: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, json).expect("write table");
        path
    }

    #[test]
    fn same_path_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_table(dir.path(), "a.json", r#"{ "params": [ { "name": "A" } ] }"#);
        let cache = TableCache::new();

        let first = cache.load(&path).unwrap();
        // Changing the file after the first load must not affect the cached table.
        std::fs::write(&path, r#"{ "params": [] }"#).unwrap();
        let second = cache.load(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn load_all_keeps_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_table(dir.path(), "a.json", r#"{ "params": [ { "name": "A" } ] }"#);
        let b = write_table(dir.path(), "b.json", r#"{ "params": [ { "name": "B" } ] }"#);
        let cache = TableCache::new();

        let tables = cache.load_all(&[&b, &a]).unwrap();
        assert!(tables[0].param("B").is_some());
        assert!(tables[1].param("A").is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn missing_file_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let cache = TableCache::new();

        let err = cache.load(&path).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
        assert!(cache.is_empty());

        std::fs::write(&path, "{}").unwrap();
        assert!(cache.load(&path).is_ok());
    }
}
