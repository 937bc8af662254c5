//! Batch Module
//!
//! Accumulates mutations that are applied to the handle as one atomic
//! write. A batch has no effect on reads until it is committed through
//! [`Handle::write`](crate::handle::Handle::write); the commit either lands
//! every queued operation or none of them.

use bytes::Bytes;

/// Operations that can be queued in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Put a key-value pair
    Put { key: Bytes, value: Bytes },

    /// Delete a key (absent keys are ignored on commit)
    Delete { key: Bytes },
}

/// Ordered list of pending mutations
///
/// Operations are applied in the order they were queued, so a later put or
/// delete of the same key wins.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    ops: Vec<BatchOp>,
}

impl Batch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty batch with room for `capacity` operations
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ops: Vec::with_capacity(capacity),
        }
    }

    /// Queue a put
    pub fn put(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> &mut Self {
        self.ops.push(BatchOp::Put {
            key: Bytes::copy_from_slice(key.as_ref()),
            value: Bytes::copy_from_slice(value.as_ref()),
        });
        self
    }

    /// Queue a delete
    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> &mut Self {
        self.ops.push(BatchOp::Delete {
            key: Bytes::copy_from_slice(key.as_ref()),
        });
        self
    }

    /// Number of queued operations (duplicates included)
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Queued operations in commit order
    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }
}
