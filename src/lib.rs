//! # LexiKV
//!
//! A minimal dictionary server with:
//! - Flat-file persistence (one `word:definition` entry per line)
//! - Single-writer mutation queue (concurrent adds/removes applied one at a
//!   time, in submission order, with apply-then-acknowledge)
//! - Stateless full-scan read path
//! - TCP-based client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                  (Multiple Clients)                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Dictionary                                │
//! │              (Command Routing + Validation)                  │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │ reads                        │ writes
//!            ▼                              ▼
//!     ┌─────────────┐               ┌─────────────┐
//!     │ QueryEngine │               │ WriteQueue  │
//!     │ (full scan) │               │ (1 worker)  │
//!     └──────┬──────┘               └──────┬──────┘
//!            │                             │
//!            └──────────────┬──────────────┘
//!                           ▼
//!                    ┌─────────────┐
//!                    │  FileStore  │
//!                    │ (flat file) │
//!                    └─────────────┘
//! ```
//!
//! ## Consistency Model
//!
//! The dictionary file is the sole source of truth and is mutated only by
//! the write queue's worker thread (single-writer discipline). Reads bypass
//! the queue and scan the file without coordination, so a read racing a
//! write may observe either the pre- or post-mutation state. This is an
//! accepted eventual-consistency tradeoff, not a bug.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod engine;
pub mod network;
pub mod protocol;
pub mod query;
pub mod store;
pub mod writer;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use engine::Dictionary;
pub use error::{LexiError, Result};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of LexiKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
