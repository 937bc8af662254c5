//! Handle Module
//!
//! Owns one open engine instance bound to a filesystem path.
//!
//! ## State machine
//! ```text
//! Unopened ──open()──▶ Open ──close()──▶ Closed
//!                                          │  ▲
//!                                          └──┘ close() again: no-op
//! ```
//!
//! ## Concurrency
//! - `db`: `RwLock<Option<Database>>`
//!   - reads, writes and cursors hold the shared guard for their duration
//!   - `close` takes the exclusive guard, so it waits for in-flight calls
//! - Writes are serialized by the engine (one write transaction at a time)

use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use parking_lot::RwLock;
use redb::{Database, TableDefinition};

use crate::batch::{Batch, BatchOp};
use crate::config::StoreConfig;
use crate::cursor::Cursor;
use crate::error::{Result, StoreError};

/// Single table holding the whole key space, raw bytes on both sides
const TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("statskv");

/// An opened engine instance
pub struct Handle {
    /// Database file path (immutable after open)
    path: PathBuf,

    /// `None` once closed
    db: RwLock<Option<Database>>,
}

impl Handle {
    /// Open or create the database described by `config`
    ///
    /// On open:
    /// 1. Validate config
    /// 2. Create parent directories if requested
    /// 3. Open/create the database file (never truncates)
    /// 4. Make sure the key space table exists
    pub fn open(config: &StoreConfig) -> Result<Self> {
        config.validate()?;

        // Step 1: Parent directories
        if config.create_dirs {
            if let Some(parent) = config.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|e| open_error(&config.path, e))?;
                }
            }
        }

        // Step 2: Open or create the database file
        let mut builder = Database::builder();
        builder.set_cache_size(config.cache_size);
        let db = builder
            .create(&config.path)
            .map_err(|e| open_error(&config.path, e))?;

        // Step 3: Ensure the table exists so readers never see TableDoesNotExist
        let txn = db.begin_write().map_err(|e| open_error(&config.path, e))?;
        {
            let _table = txn.open_table(TABLE).map_err(|e| open_error(&config.path, e))?;
        }
        txn.commit().map_err(|e| open_error(&config.path, e))?;

        tracing::info!("Opened store at {}", config.path.display());

        Ok(Self {
            path: config.path.clone(),
            db: RwLock::new(Some(db)),
        })
    }

    /// Database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.db.read().is_some()
    }

    /// Release the engine
    ///
    /// Idempotent: closing an already closed handle does nothing.
    pub fn close(&self) {
        let mut guard = self.db.write();
        match guard.take() {
            Some(db) => {
                drop(db);
                tracing::info!("Closed store at {}", self.path.display());
            }
            None => {
                tracing::debug!("Store at {} already closed", self.path.display());
            }
        }
    }

    // =========================================================================
    // Point Operations
    // =========================================================================

    /// Exact-match lookup
    ///
    /// Returns `Err(Closed)` on a closed handle.
    pub fn get(&self, key: &[u8]) -> Result<Option<Bytes>> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(StoreError::Closed)?;

        let txn = db.begin_read().map_err(|e| read_error("get", e))?;
        let table = txn.open_table(TABLE).map_err(|e| read_error("get", e))?;
        let value = table
            .get(key)
            .map_err(|e| read_error("get", e))?
            .map(|v| Bytes::copy_from_slice(v.value()));

        Ok(value)
    }

    /// Write a single key-value pair, overwriting any existing value
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut batch = Batch::with_capacity(1);
        batch.put(key, value);
        self.write(batch)
    }

    /// Remove a single key; absent keys are not an error
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        let mut batch = Batch::with_capacity(1);
        batch.delete(key);
        self.write(batch)
    }

    // =========================================================================
    // Batch Commit
    // =========================================================================

    /// Apply every operation in `batch` as one atomic write
    ///
    /// Either all operations land or, on any failure, the write transaction
    /// is dropped uncommitted and the store is unchanged. An empty batch is
    /// accepted without touching the engine.
    pub fn write(&self, batch: Batch) -> Result<()> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(StoreError::Closed)?;

        if batch.is_empty() {
            return Ok(());
        }

        let count = batch.len();
        let txn = db.begin_write().map_err(|e| write_error("write", e))?;
        {
            let mut table = txn.open_table(TABLE).map_err(|e| write_error("write", e))?;
            for op in batch.ops() {
                match op {
                    BatchOp::Put { key, value } => {
                        table
                            .insert(&key[..], &value[..])
                            .map_err(|e| write_error("put", e))?;
                    }
                    BatchOp::Delete { key } => {
                        table
                            .remove(&key[..])
                            .map_err(|e| write_error("delete", e))?;
                    }
                }
            }
        }
        txn.commit().map_err(|e| write_error("commit", e))?;

        tracing::trace!("Committed {} operation(s) to {}", count, self.path.display());
        Ok(())
    }

    // =========================================================================
    // Cursors
    // =========================================================================

    /// Create a cursor over a snapshot of the current key space
    ///
    /// The cursor is unpositioned; call `seek` or `seek_to_last` first.
    pub fn cursor(&self) -> Result<Cursor<'_>> {
        let guard = self.db.read();
        let txn = match guard.as_ref() {
            Some(db) => db.begin_read().map_err(|e| read_error("cursor", e))?,
            None => return Err(StoreError::Closed),
        };
        let table = txn.open_table(TABLE).map_err(|e| read_error("cursor", e))?;

        Ok(Cursor::new(guard, txn, table))
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .finish()
    }
}

// =============================================================================
// Error Mapping (engine diagnostics are logged, then returned)
// =============================================================================

fn open_error(path: &Path, e: impl std::fmt::Display) -> StoreError {
    tracing::error!("Unable to open/create database at {}: {}", path.display(), e);
    StoreError::Open(e.to_string())
}

pub(crate) fn read_error(op: &str, e: impl std::fmt::Display) -> StoreError {
    tracing::error!("Unable to {}: {}", op, e);
    StoreError::Read(e.to_string())
}

pub(crate) fn write_error(op: &str, e: impl std::fmt::Display) -> StoreError {
    tracing::error!("Unable to {}: {}", op, e);
    StoreError::Write(e.to_string())
}
