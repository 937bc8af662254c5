//! Configuration for statskv
//!
//! Centralized configuration with sensible defaults.

use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// Main configuration for a store instance
#[derive(Debug, Clone)]
pub struct StoreConfig {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the database file. Created on open if it does not exist,
    /// never truncated if it does.
    pub path: PathBuf,

    /// Create missing parent directories of `path` before opening
    pub create_dirs: bool,

    // -------------------------------------------------------------------------
    // Engine Configuration
    // -------------------------------------------------------------------------
    /// Page cache size handed to the engine (in bytes)
    pub cache_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./statskv_data/state.redb"),
            create_dirs: true,
            cache_size: 16 * 1024 * 1024, // 16 MB
        }
    }
}

impl StoreConfig {
    /// Create a new config builder
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Default config pointing at `path`
    pub fn for_path(path: impl AsRef<Path>) -> Self {
        Self::builder().path(path.as_ref()).build()
    }

    /// Reject configurations the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(StoreError::Config("database path is empty".to_string()));
        }
        if self.cache_size == 0 {
            return Err(StoreError::Config("cache_size must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the database file path
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Create missing parent directories on open
    pub fn create_dirs(mut self, enabled: bool) -> Self {
        self.config.create_dirs = enabled;
        self
    }

    /// Set the engine cache size (in bytes)
    pub fn cache_size(mut self, bytes: usize) -> Self {
        self.config.cache_size = bytes;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}
