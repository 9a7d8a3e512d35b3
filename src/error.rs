//! Error types for LexiKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using LexiError
pub type Result<T> = std::result::Result<T, LexiError>;

/// Unified error type for LexiKV operations
#[derive(Debug, Error)]
pub enum LexiError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Client Input Errors
    // -------------------------------------------------------------------------
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// Expected outcome of a lookup miss, not a fault.
    #[error("word not found")]
    WordNotFound,

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("dictionary store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("dictionary store write failed: {0}")]
    StoreWriteFailed(String),

    // -------------------------------------------------------------------------
    // Serializer Errors
    // -------------------------------------------------------------------------
    #[error("write queue shut down")]
    Shutdown,

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
