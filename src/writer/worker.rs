//! Writer worker loop
//!
//! The single thread that owns the store's write path.

use crossbeam::channel::Receiver;

use crate::store::FileStore;

use super::{Job, Mutation};

/// Drain jobs until the channel closes
///
/// Parked in `recv` while the queue is idle. Each job is applied to the
/// store and its outcome sent back on the job's ack channel; a failed
/// mutation does not stop the worker from processing later jobs. When every
/// sender is gone the remaining jobs are drained and the loop exits.
pub(super) fn drain(store: FileStore, jobs: Receiver<Job>) {
    tracing::debug!("writer started for {}", store.path().display());

    while let Ok(job) = jobs.recv() {
        let result = apply(&store, &job.mutation);

        if let Err(e) = &result {
            tracing::warn!("mutation failed: {}", e);
        }

        // The submitter may have given up waiting; the mutation itself is
        // already settled either way.
        let _ = job.ack.send(result);
    }

    tracing::debug!("writer stopped for {}", store.path().display());
}

/// Apply a single mutation to the store
fn apply(store: &FileStore, mutation: &Mutation) -> crate::error::Result<()> {
    match mutation {
        Mutation::Upsert { word, definition } => {
            tracing::trace!("upsert {:?}", word);
            store.append_or_upsert(word, definition)
        }
        Mutation::Remove { word } => {
            tracing::trace!("remove {:?}", word);
            store.remove_by_key(word)
        }
    }
}
