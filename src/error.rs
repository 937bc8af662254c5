//! Error types for statskv
//!
//! Provides a unified error type for all store operations. "Key not found"
//! is deliberately absent: lookups report absence through `Option`/empty
//! results instead.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for statskv operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Engine Errors (message is the engine's own diagnostic)
    // -------------------------------------------------------------------------
    #[error("Unable to open/create database: {0}")]
    Open(String),

    #[error("Read failed: {0}")]
    Read(String),

    #[error("Write failed: {0}")]
    Write(String),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Store handle is closed")]
    Closed,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// True for failures of a mutating operation, including writes
    /// attempted against a closed handle.
    pub fn is_write_failure(&self) -> bool {
        matches!(self, StoreError::Write(_) | StoreError::Closed)
    }
}
