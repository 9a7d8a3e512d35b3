//! Flat-file store access
//!
//! Reads and rewrites the dictionary file. The store performs no locking of
//! its own: mutation methods are only ever called by the write queue's single
//! worker thread, while readers scan the file directly and may observe either
//! the pre- or post-mutation state of a racing write.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::{LexiError, Result};

use super::Entry;

/// Handle to the dictionary file
///
/// Cheap to clone; clones share the same underlying path. The write queue
/// owns one clone for mutations, the query engine another for reads.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Path of the dictionary file
    path: PathBuf,
}

impl FileStore {
    /// Create a store handle for the given file path
    ///
    /// The file itself is not touched; it is created by the first mutation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read every well-formed entry, in file order
    ///
    /// Malformed lines (zero or two-plus colons) are skipped silently.
    /// A missing or unreadable file surfaces as `StoreUnavailable`.
    pub fn read_all(&self) -> Result<Vec<Entry>> {
        let lines = self.read_lines()?;

        let mut entries = Vec::with_capacity(lines.len());
        let mut skipped = 0usize;
        for line in &lines {
            match Entry::parse_line(line) {
                Some(entry) => entries.push(entry),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!(
                "skipped {} malformed line(s) in {}",
                skipped,
                self.path.display()
            );
        }

        Ok(entries)
    }

    /// Insert or update the entry for `word`
    ///
    /// If a line with the key exists, the first such line is replaced with
    /// the new definition and any later duplicate lines for the same key are
    /// dropped, restoring the one-line-per-word invariant. Otherwise a new
    /// line is appended, creating the file if it does not exist yet.
    pub fn append_or_upsert(&self, word: &str, definition: &str) -> Result<()> {
        let lines = match self.read_lines() {
            Ok(lines) => lines,
            // First mutation against a fresh deployment: no file yet.
            Err(LexiError::StoreUnavailable(_)) if !self.path.exists() => Vec::new(),
            Err(e) => return Err(e),
        };

        let entry = Entry::new(word, definition);
        let exists = lines
            .iter()
            .any(|line| Entry::parse_line(line).is_some_and(|e| e.word == word));

        if !exists {
            return self.append_line(&entry.to_line());
        }

        let mut replaced = false;
        let mut rewritten = Vec::with_capacity(lines.len());
        for line in lines {
            match Entry::parse_line(&line) {
                Some(e) if e.word == word => {
                    if !replaced {
                        rewritten.push(entry.to_line());
                        replaced = true;
                    }
                    // Later duplicates for the same key are dropped.
                }
                _ => rewritten.push(line),
            }
        }

        self.rewrite(&rewritten)
    }

    /// Remove every entry whose key matches `word`
    ///
    /// Malformed lines are retained verbatim. If the key is absent the store
    /// is rewritten unchanged; if the file does not exist there is nothing to
    /// remove. Idempotent either way.
    pub fn remove_by_key(&self, word: &str) -> Result<()> {
        let lines = match self.read_lines() {
            Ok(lines) => lines,
            Err(LexiError::StoreUnavailable(_)) if !self.path.exists() => return Ok(()),
            Err(e) => return Err(e),
        };

        let retained: Vec<String> = lines
            .into_iter()
            .filter(|line| match Entry::parse_line(line) {
                Some(e) => e.word != word,
                None => true,
            })
            .collect();

        self.rewrite(&retained)
    }

    /// Get the store file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Read the raw lines of the store file
    fn read_lines(&self) -> Result<Vec<String>> {
        let file = File::open(&self.path).map_err(|e| {
            LexiError::StoreUnavailable(format!("{}: {}", self.path.display(), e))
        })?;

        let reader = BufReader::new(file);
        reader
            .lines()
            .collect::<std::io::Result<Vec<String>>>()
            .map_err(|e| LexiError::StoreUnavailable(format!("{}: {}", self.path.display(), e)))
    }

    /// Append a single line, creating the file if needed
    fn append_line(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                LexiError::StoreWriteFailed(format!("{}: {}", self.path.display(), e))
            })?;

        writeln!(file, "{}", line)
            .map_err(|e| LexiError::StoreWriteFailed(format!("{}: {}", self.path.display(), e)))
    }

    /// Replace the store content atomically
    ///
    /// Writes the lines to a sibling temp file, syncs it, then renames it
    /// over the store. A failure at any step leaves the previous content
    /// intact (the temp file is cleaned up on a best-effort basis).
    fn rewrite(&self, lines: &[String]) -> Result<()> {
        let tmp = self.tmp_path();

        let result = (|| -> std::io::Result<()> {
            let mut file = File::create(&tmp)?;
            for line in lines {
                writeln!(file, "{}", line)?;
            }
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        })();

        result.map_err(|e| {
            let _ = fs::remove_file(&tmp);
            LexiError::StoreWriteFailed(format!("{}: {}", self.path.display(), e))
        })
    }

    /// Sibling temp path used for rewrites
    fn tmp_path(&self) -> PathBuf {
        let mut os = self.path.as_os_str().to_os_string();
        os.push(".tmp");
        PathBuf::from(os)
    }
}
