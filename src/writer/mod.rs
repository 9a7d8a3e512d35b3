//! Writer Module
//!
//! Serializes all dictionary mutations through a single worker thread.
//!
//! ## Architecture
//! - One ordered queue of tagged mutations (upsert | remove)
//! - One long-lived worker thread draining the queue FIFO
//! - Apply-then-acknowledge: submitters block until their mutation has been
//!   applied and receive its real outcome
//!
//! Cross-type ordering is deterministic because upserts and removes share a
//! single queue. Readers never go through the queue; they scan the store
//! directly and may race an in-flight write.

mod queue;
mod worker;

pub use queue::WriteQueue;

use crossbeam::channel::Sender;

use crate::error::Result;

/// A mutation to apply to the dictionary store
#[derive(Debug, Clone)]
pub enum Mutation {
    /// Insert or update a word's definition (last write wins)
    Upsert { word: String, definition: String },

    /// Remove a word (no-op if absent)
    Remove { word: String },
}

/// A queued mutation plus the channel its outcome is acknowledged on
pub(crate) struct Job {
    pub(crate) mutation: Mutation,
    pub(crate) ack: Sender<Result<()>>,
}
