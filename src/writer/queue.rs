//! Write queue handle
//!
//! The submitter-facing side of the mutation pipeline.

use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Sender};
use parking_lot::Mutex;

use crate::error::{LexiError, Result};
use crate::store::FileStore;

use super::{worker, Job, Mutation};

/// Serializes mutations against the dictionary store
///
/// Any number of threads may call [`submit`](WriteQueue::submit)
/// concurrently; mutations are applied strictly one at a time, in submission
/// order. The store is mutated exclusively by the queue's worker thread.
pub struct WriteQueue {
    /// Job sender; `None` once the queue has been closed
    tx: Mutex<Option<Sender<Job>>>,

    /// Worker thread handle, taken on close
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl WriteQueue {
    /// Start the write queue for the given store
    ///
    /// Spawns the dedicated worker thread that owns the store's write path.
    pub fn new(store: FileStore) -> Result<Self> {
        let (tx, rx) = channel::unbounded::<Job>();

        let handle = thread::Builder::new()
            .name("lexikv-writer".to_string())
            .spawn(move || worker::drain(store, rx))?;

        Ok(Self {
            tx: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(handle)),
        })
    }

    /// Submit a mutation and block until it has been applied
    ///
    /// Returns the actual outcome of the store write: an I/O failure
    /// applying the mutation surfaces here as `StoreUnavailable` or
    /// `StoreWriteFailed`, never silently dropped. Fails with `Shutdown` if
    /// the queue has been closed.
    pub fn submit(&self, mutation: Mutation) -> Result<()> {
        let (ack_tx, ack_rx) = channel::bounded(1);

        {
            let tx = self.tx.lock();
            let tx = tx.as_ref().ok_or(LexiError::Shutdown)?;
            tx.send(Job {
                mutation,
                ack: ack_tx,
            })
            .map_err(|_| LexiError::Shutdown)?;
        }

        // Worker gone without acknowledging means the queue is dead.
        ack_rx.recv().map_err(|_| LexiError::Shutdown)?
    }

    /// Close the queue: drain pending mutations, then stop the worker
    ///
    /// Every mutation already submitted is still applied and acknowledged
    /// before the worker exits. Subsequent `submit` calls fail with
    /// `Shutdown`. Idempotent.
    pub fn close(&self) -> Result<()> {
        // Dropping the sender closes the channel; the worker drains what is
        // left and exits.
        drop(self.tx.lock().take());

        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            handle.join().map_err(|_| LexiError::Shutdown)?;
        }

        Ok(())
    }
}
