//! Store Module
//!
//! The public façade. Composes the handle, cursors and batches into the
//! text-keyed operations the rest of the application uses.
//!
//! ## Failure policy
//! - Reads on a closed store return empty results, never an error
//! - Writes on a closed store return `StoreError::Closed`
//! - Engine failures come back as `Read`/`Write` errors after being logged
//! - Nothing here panics
//!
//! ## Text boundary
//! Keys and values are raw bytes in the engine. Decoding to UTF-8 happens
//! only here; entries that fail to decode are skipped (scans) or reported
//! as absent (point lookups), with a warning.

use std::path::Path;

use crate::batch::Batch;
use crate::config::StoreConfig;
use crate::cursor::Cursor;
use crate::error::{Result, StoreError};
use crate::handle::Handle;

/// Ordered text key-value store bound to one database file
///
/// Operations are synchronous and run on the caller's thread. The store is
/// `Send + Sync`; share it behind an `Arc` when several threads need it.
#[derive(Debug)]
pub struct Store {
    config: StoreConfig,
    handle: Handle,
}

impl Store {
    /// Open or create a store at `path` with default settings
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(StoreConfig::for_path(path))
    }

    /// Open or create a store with an explicit config
    ///
    /// Fails with `StoreError::Open` when the path is unusable; callers
    /// should treat that as "feature unavailable" rather than retrying.
    pub fn open_with_config(config: StoreConfig) -> Result<Self> {
        let handle = Handle::open(&config)?;
        Ok(Self { config, handle })
    }

    // =========================================================================
    // Prefix Scans
    // =========================================================================

    /// Every key starting with `prefix`, in ascending byte order
    pub fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        self.scan_prefix("keys", prefix, |key, _| match std::str::from_utf8(key) {
            Ok(key) => keys.push(key.to_owned()),
            Err(_) => tracing::warn!("keys: skipping non UTF-8 key under {:?}", prefix),
        })?;

        tracing::debug!("keys({:?}) -> {} key(s)", prefix, keys.len());
        Ok(keys)
    }

    /// Values of every key starting with `prefix`, in ascending key order
    ///
    /// Callers rely on encounter order being key order, e.g. for history
    /// entries whose keys end in a sortable timestamp.
    pub fn find_many(&self, prefix: &str) -> Result<Vec<String>> {
        let mut values = Vec::new();
        self.scan_prefix("find_many", prefix, |key, value| {
            if let Some(value) = decode_value(key, value) {
                values.push(value);
            }
        })?;

        tracing::debug!("find_many({:?}) -> {} value(s)", prefix, values.len());
        Ok(values)
    }

    /// Value of the last key starting with `prefix`
    ///
    /// Walks backward from the last key of the entire key space until a
    /// matching key shows up. Keys sorting after the prefix range are
    /// stepped over one by one; a mismatch never ends the walk.
    pub fn find_last(&self, prefix: &str) -> Result<Option<String>> {
        let Some(mut cursor) = self.cursor("find_last")? else {
            return Ok(None);
        };
        let prefix_bytes = prefix.as_bytes();

        cursor.seek_to_last()?;
        while let Some((key, value)) = cursor.entry() {
            if key.starts_with(prefix_bytes) {
                tracing::debug!("find_last({:?}) hit {:?}", prefix, String::from_utf8_lossy(key));
                return Ok(decode_value(&key[..], &value[..]));
            }
            cursor.prev()?;
        }

        tracing::debug!("find_last({:?}) -> none", prefix);
        Ok(None)
    }

    // =========================================================================
    // Point Operations
    // =========================================================================

    /// Write `value` at `key`, overwriting any previous value
    pub fn insert(&self, key: &str, value: &str) -> Result<()> {
        let result = self.handle.put(key.as_bytes(), value.as_bytes());
        self.log_write("insert", result)
    }

    /// Exact-match lookup
    ///
    /// The value is trimmed of surrounding spaces and tabs: older entries
    /// were written with incidental padding.
    pub fn find_one(&self, key: &str) -> Result<Option<String>> {
        let value = match self.handle.get(key.as_bytes()) {
            Ok(value) => value,
            Err(StoreError::Closed) => {
                tracing::warn!("find_one({:?}) on closed store", key);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        Ok(value
            .and_then(|value| decode_value(key.as_bytes(), &value))
            .map(|value| trim_padding(&value).to_owned()))
    }

    /// Remove `key`; removing an absent key succeeds
    pub fn delete_one(&self, key: &str) -> Result<()> {
        let result = self.handle.delete(key.as_bytes());
        self.log_write("delete_one", result)
    }

    // =========================================================================
    // Batch Operations
    // =========================================================================

    /// Remove every key in `keys` in one atomic write
    ///
    /// Duplicates and absent keys are harmless. On failure nothing is
    /// removed. An empty list succeeds without writing.
    pub fn delete_many<I, K>(&self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut batch = Batch::new();
        for key in keys {
            batch.delete(key.as_ref().as_bytes());
        }

        let count = batch.len();
        self.log_write("delete_many", self.handle.write(batch))?;
        tracing::debug!("delete_many removed up to {} key(s)", count);
        Ok(())
    }

    /// Write every `(key, value)` pair in one atomic write
    ///
    /// Pairs apply in order, so a repeated key keeps its last value.
    pub fn insert_many<I, K, V>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut batch = Batch::new();
        for (key, value) in entries {
            batch.put(key.as_ref().as_bytes(), value.as_ref().as_bytes());
        }

        let count = batch.len();
        self.log_write("insert_many", self.handle.write(batch))?;
        tracing::debug!("insert_many wrote {} entr(ies)", count);
        Ok(())
    }

    /// Remove every key starting with `prefix` in one atomic write
    ///
    /// Returns how many keys were removed.
    pub fn delete_prefix(&self, prefix: &str) -> Result<usize> {
        let mut batch = Batch::new();
        self.scan_prefix("delete_prefix", prefix, |key, _| {
            batch.delete(key);
        })?;

        let count = batch.len();
        self.log_write("delete_prefix", self.handle.write(batch))?;
        tracing::debug!("delete_prefix({:?}) removed {} key(s)", prefix, count);
        Ok(count)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Release the underlying engine
    ///
    /// Idempotent; also runs when the store is dropped.
    pub fn close(&self) {
        self.handle.close();
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// Database file path
    pub fn path(&self) -> &Path {
        self.handle.path()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Cursor for `op`, or `None` when the store is closed
    fn cursor(&self, op: &str) -> Result<Option<Cursor<'_>>> {
        match self.handle.cursor() {
            Ok(cursor) => Ok(Some(cursor)),
            Err(StoreError::Closed) => {
                tracing::warn!("{} on closed store {}", op, self.path().display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Visit every entry whose key starts with `prefix`, in ascending order
    fn scan_prefix<F>(&self, op: &str, prefix: &str, mut visit: F) -> Result<()>
    where
        F: FnMut(&[u8], &[u8]),
    {
        let Some(mut cursor) = self.cursor(op)? else {
            return Ok(());
        };
        let prefix = prefix.as_bytes();

        cursor.seek(prefix)?;
        while let Some((key, value)) = cursor.entry() {
            // Keys are ascending, so the first miss is past the prefix range
            if !key.starts_with(prefix) {
                break;
            }
            visit(&key[..], &value[..]);
            cursor.next()?;
        }
        Ok(())
    }

    fn log_write(&self, op: &str, result: Result<()>) -> Result<()> {
        if let Err(StoreError::Closed) = &result {
            tracing::warn!("{} on closed store {}", op, self.path().display());
        }
        result
    }
}

/// UTF-8 view of a stored value, `None` (with a warning) if it is not text
fn decode_value(key: &[u8], value: &[u8]) -> Option<String> {
    match std::str::from_utf8(value) {
        Ok(value) => Some(value.to_owned()),
        Err(e) => {
            tracing::warn!(
                "Value at {:?} is not valid UTF-8: {}",
                String::from_utf8_lossy(key),
                e
            );
            None
        }
    }
}

/// Strip leading/trailing spaces and tabs (any Unicode space separator),
/// keeping line breaks
fn trim_padding(value: &str) -> &str {
    value.trim_matches(is_padding)
}

fn is_padding(c: char) -> bool {
    c.is_whitespace()
        && !matches!(
            c,
            '\n' | '\u{0B}' | '\u{0C}' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}'
        )
}
