//! Store Module
//!
//! The persistent dictionary store: a flat text file with one
//! `word:definition` entry per line.
//!
//! ## Responsibilities
//! - Translate between entries and their line-oriented text encoding
//! - Tolerant parsing: malformed lines are skipped, never an error
//! - Safe rewrites: temp-file-then-rename so a failed write leaves the
//!   previous content intact
//!
//! ## Format
//! One entry per line, `word:definition`, UTF-8. The colon is the reserved
//! delimiter; fields are not escaped, so a `:` inside a field produces a
//! line readers skip (documented limitation).

mod file;

pub use file::FileStore;

use serde::{Deserialize, Serialize};

/// A single word/definition pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The word (unique key)
    pub word: String,

    /// The definition
    pub definition: String,
}

impl Entry {
    /// Create a new entry
    pub fn new(word: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            definition: definition.into(),
        }
    }

    /// Parse a store line into an entry
    ///
    /// A line is well-formed only when it contains exactly one `:`,
    /// separating the word from the definition. Anything else (zero colons,
    /// two or more colons) is malformed and yields `None`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut parts = line.split(':');
        let word = parts.next()?;
        let definition = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        Some(Self::new(word, definition))
    }

    /// Encode the entry as a store line (without trailing newline)
    pub fn to_line(&self) -> String {
        format!("{}:{}", self.word, self.definition)
    }
}
