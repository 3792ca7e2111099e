use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::loader::{Encoding, LoadError, Loader, SalesTable};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    encodings: Vec<Encoding>,
}

/// A process wide cache of loaded sales exports
///
/// Entries are keyed by the path and the candidate encodings, and are never
/// invalidated: the source files are treated as static for as long as the
/// process runs. Failed loads are not cached.
#[derive(Debug, Default)]
pub struct TableCache {
    tables: HashMap<CacheKey, Arc<SalesTable>>,
}

impl TableCache {
    /// Creates a new, empty cache
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// Returns the cached table for `path`, loading it on first access
    pub fn get_or_load(&mut self, loader: &Loader, path: impl AsRef<Path>) -> Result<Arc<SalesTable>, LoadError> {
        let key = CacheKey {
            path: path.as_ref().to_path_buf(),
            encodings: loader.encodings().to_vec(),
        };

        match self.tables.entry(key) {
            Entry::Occupied(o) => {
                log::debug!("using cached sales table for {}", o.key().path.display());
                Ok(Arc::clone(o.get()))
            }
            Entry::Vacant(v) => {
                let table = Arc::new(loader.load(&v.key().path)?);
                Ok(Arc::clone(v.insert(table)))
            }
        }
    }

    /// The number of cached tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
