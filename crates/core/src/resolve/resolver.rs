use std::path::Path;
use std::sync::Arc;

use preset_diff_tables::{ParamTable, TableCache, TableError};

use super::scale::{Lookup, resolve_in_table};
use crate::config::ResolveConfig;
use crate::error::DomainError;

/// Resolves parameter displays across an ordered list of tables.
///
/// Tables are consulted in priority order and the first one defining the key
/// wins; definitions are never merged across tables.
#[derive(Debug, Clone)]
pub struct DisplayResolver {
    tables: Vec<Arc<ParamTable>>,
    config: ResolveConfig,
}

impl DisplayResolver {
    /// Build a resolver over already loaded tables, highest priority first.
    pub fn new(tables: Vec<Arc<ParamTable>>, config: ResolveConfig) -> Self {
        Self { tables, config }
    }

    /// Build a resolver over table files, loading each through `cache`.
    pub fn from_paths<P: AsRef<Path>>(
        cache: &TableCache,
        paths: &[P],
        config: ResolveConfig,
    ) -> Result<Self, TableError> {
        Ok(Self::new(cache.load_all(paths)?, config))
    }

    /// The tables in priority order.
    pub fn tables(&self) -> &[Arc<ParamTable>] {
        &self.tables
    }

    /// Resolve `key` for a normalized value.
    ///
    /// A [`DomainError`] from the first matching table is returned as-is; it
    /// does not fall through to later tables.
    pub fn resolve(&self, key: &str, normalized: f64) -> Result<Lookup, DomainError> {
        for table in &self.tables {
            match resolve_in_table(table, key, normalized, &self.config.version)? {
                Lookup::NoMatch => continue,
                found => return Ok(found),
            }
        }
        Ok(Lookup::NoMatch)
    }
}
