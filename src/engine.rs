//! Engine Module
//!
//! The dictionary service object that coordinates all components.
//!
//! ## Responsibilities
//! - Route typed commands to the read and write paths
//! - Validate client input before it reaches the store
//! - Own the query engine and the write queue (no ambient singleton)

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{LexiError, Result};
use crate::protocol::Command;
use crate::query::QueryEngine;
use crate::store::FileStore;
use crate::writer::{Mutation, WriteQueue};

/// The dictionary service
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader
///
/// - **Writes** (add/remove): Serialized through the write queue
///   - One ordered queue, one worker thread, FIFO application order
///   - Submitters block until their mutation is applied (apply-then-ack)
///
/// - **Reads** (get/list): Bypass the queue entirely
///   - Every query scans the file directly, no cache, no coordination
///   - A read racing a write may observe pre- or post-mutation state;
///     accepted relaxation, documented at the crate level
pub struct Dictionary {
    /// Service configuration
    config: Config,

    /// Stateless read path
    query: QueryEngine,

    /// Single-writer mutation pipeline
    writer: WriteQueue,
}

impl Dictionary {
    /// Open a dictionary service with the given config
    ///
    /// Creates the store file's parent directory if needed and starts the
    /// writer thread. The store file itself is created lazily by the first
    /// mutation.
    pub fn open(config: Config) -> Result<Self> {
        if let Some(parent) = config.store_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let store = FileStore::new(&config.store_path);
        let query = QueryEngine::new(store.clone());
        let writer = WriteQueue::new(store)?;

        Ok(Self {
            config,
            query,
            writer,
        })
    }

    /// Open with a store file path (convenience method)
    ///
    /// Uses default config with the specified store path
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().store_path(path).build();
        Self::open(config)
    }

    /// Execute a command
    ///
    /// Routes commands to the appropriate handlers. `Get` of an absent word
    /// fails with `WordNotFound` so the gateway can answer NOT_FOUND.
    pub fn execute(&self, command: Command) -> Result<Option<Vec<u8>>> {
        match command {
            Command::Get { word } => match self.get(&word)? {
                Some(definition) => Ok(Some(definition.into_bytes())),
                None => Err(LexiError::WordNotFound),
            },
            Command::Add { word, definition } => {
                self.add(&word, &definition)?;
                Ok(None)
            }
            Command::Remove { word } => {
                self.remove(&word)?;
                Ok(None)
            }
            Command::List => {
                let listing = self.list()?;
                let json = serde_json::to_vec(&listing)
                    .map_err(|e| LexiError::Serialization(e.to_string()))?;
                Ok(Some(json))
            }
            Command::Ping => Ok(Some(b"PONG".to_vec())),
        }
    }

    /// Add or update a word (last write wins)
    ///
    /// Blocks until the mutation has been applied and reports its real
    /// outcome.
    pub fn add(&self, word: &str, definition: &str) -> Result<()> {
        if word.is_empty() {
            return Err(LexiError::MissingField("word"));
        }
        if definition.is_empty() {
            return Err(LexiError::MissingField("definition"));
        }

        self.writer.submit(Mutation::Upsert {
            word: word.to_string(),
            definition: definition.to_string(),
        })
    }

    /// Remove a word (no-op if absent)
    pub fn remove(&self, word: &str) -> Result<()> {
        if word.is_empty() {
            return Err(LexiError::MissingField("word"));
        }

        self.writer.submit(Mutation::Remove {
            word: word.to_string(),
        })
    }

    /// Get the definition for a word, `None` if absent
    pub fn get(&self, word: &str) -> Result<Option<String>> {
        if word.is_empty() {
            return Err(LexiError::MissingField("word"));
        }

        self.query.lookup(word)
    }

    /// List every entry, key-sorted, last occurrence wins
    pub fn list(&self) -> Result<BTreeMap<String, String>> {
        self.query.list_all()
    }

    /// Close the service gracefully
    ///
    /// Drains every pending mutation, then stops the writer thread.
    pub fn close(self) -> Result<()> {
        self.writer.close()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the store file path
    pub fn store_path(&self) -> &Path {
        &self.config.store_path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
