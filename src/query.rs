//! Query Engine
//!
//! Stateless read path over the dictionary store.
//!
//! Every query is a full linear scan of the file; no index or cache is kept
//! between requests. Reads bypass the write queue entirely, so a query racing
//! a mutation may observe either the pre- or post-mutation state. That
//! relaxation is intentional.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::store::FileStore;

/// Answers point lookups and full listings
pub struct QueryEngine {
    /// Read-only handle to the dictionary file
    store: FileStore,
}

impl QueryEngine {
    /// Create a query engine over the given store
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }

    /// Look up the definition for a word
    ///
    /// Linear scan; the first matching key wins. `Ok(None)` when absent.
    pub fn lookup(&self, word: &str) -> Result<Option<String>> {
        let entries = self.store.read_all()?;

        Ok(entries
            .into_iter()
            .find(|e| e.word == word)
            .map(|e| e.definition))
    }

    /// List every entry as a word → definition mapping
    ///
    /// Later duplicate keys overwrite earlier ones (last occurrence wins).
    /// The BTreeMap keeps the listing key-sorted.
    pub fn list_all(&self) -> Result<BTreeMap<String, String>> {
        let entries = self.store.read_all()?;

        let mut map = BTreeMap::new();
        for entry in entries {
            map.insert(entry.word, entry.definition);
        }

        Ok(map)
    }
}
