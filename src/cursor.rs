//! Cursor Module
//!
//! Ordered traversal over the key space of an open handle.
//!
//! ## Lifetime
//! A cursor holds a shared guard on the handle plus its own read
//! transaction, so it can never outlive the handle that created it and a
//! concurrent `close` waits until it is released. Everything it pins is
//! released by `Drop` on every exit path, early `break` and `?` included.
//!
//! ## Positioning
//! - `seek(target)` moves to the first key `>= target`, then `next()` walks
//!   forward in ascending byte order.
//! - `seek_to_last()` moves to the last key of the whole key space, then
//!   `prev()` walks backward.
//!
//! The cursor keeps one live engine range open over the snapshot taken
//! when it was created. Steps in the same direction advance that range;
//! reversing direction re-seeks from the current key.

use std::ops::Bound;

use bytes::Bytes;
use parking_lot::RwLockReadGuard;
use redb::{AccessGuard, Database, Range, ReadOnlyTable, ReadTransaction};

use crate::error::Result;
use crate::handle::read_error;

/// One raw entry as handed out by the engine
type RawEntry<'a> = (AccessGuard<'a, &'static [u8]>, AccessGuard<'a, &'static [u8]>);

type RawRange = Range<'static, &'static [u8], &'static [u8]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Forward/backward iterator over one snapshot of the key space
///
/// Field order matters: the live range is dropped before the table, the
/// table before the transaction it was opened from, and all of them before
/// the handle guard.
pub struct Cursor<'h> {
    range: Option<RawRange>,
    direction: Direction,
    table: ReadOnlyTable<&'static [u8], &'static [u8]>,
    _txn: ReadTransaction,
    _guard: RwLockReadGuard<'h, Option<Database>>,

    /// Current position; `None` once the cursor is exhausted
    current: Option<(Bytes, Bytes)>,
}

impl<'h> Cursor<'h> {
    pub(crate) fn new(
        guard: RwLockReadGuard<'h, Option<Database>>,
        txn: ReadTransaction,
        table: ReadOnlyTable<&'static [u8], &'static [u8]>,
    ) -> Self {
        Self {
            range: None,
            direction: Direction::Forward,
            table,
            _txn: txn,
            _guard: guard,
            current: None,
        }
    }

    /// Position at the first key `>= target`
    ///
    /// Returns whether the cursor is valid afterwards.
    pub fn seek(&mut self, target: &[u8]) -> Result<bool> {
        let range = self
            .table
            .range::<&[u8]>(target..)
            .map_err(|e| read_error("cursor seek", e))?;
        self.step_new(range, Direction::Forward)
    }

    /// Position at the last key of the whole key space
    pub fn seek_to_last(&mut self) -> Result<bool> {
        let range = self
            .table
            .range::<&[u8]>(..)
            .map_err(|e| read_error("cursor seek_to_last", e))?;
        self.step_new(range, Direction::Backward)
    }

    /// Position at the first key of the whole key space
    pub fn seek_to_first(&mut self) -> Result<bool> {
        let range = self
            .table
            .range::<&[u8]>(..)
            .map_err(|e| read_error("cursor seek_to_first", e))?;
        self.step_new(range, Direction::Forward)
    }

    /// Step to the next key in ascending order
    ///
    /// A no-op on an exhausted cursor.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<bool> {
        let Some((key, _)) = self.current.take() else {
            return Ok(false);
        };
        if self.direction == Direction::Forward {
            if let Some(range) = self.range.as_mut() {
                self.current = owned_entry(range.next())?;
                return Ok(self.is_valid());
            }
        }
        let range = self
            .table
            .range::<&[u8]>((Bound::Excluded(&key[..]), Bound::Unbounded))
            .map_err(|e| read_error("cursor next", e))?;
        self.step_new(range, Direction::Forward)
    }

    /// Step to the previous key in ascending order
    ///
    /// A no-op on an exhausted cursor.
    pub fn prev(&mut self) -> Result<bool> {
        let Some((key, _)) = self.current.take() else {
            return Ok(false);
        };
        if self.direction == Direction::Backward {
            if let Some(range) = self.range.as_mut() {
                self.current = owned_entry(range.next_back())?;
                return Ok(self.is_valid());
            }
        }
        let range = self
            .table
            .range::<&[u8]>(..&key[..])
            .map_err(|e| read_error("cursor prev", e))?;
        self.step_new(range, Direction::Backward)
    }

    /// Replace the live range and take its first step in `direction`
    fn step_new(&mut self, mut range: RawRange, direction: Direction) -> Result<bool> {
        let item = match direction {
            Direction::Forward => range.next(),
            Direction::Backward => range.next_back(),
        };
        self.range = None;
        self.current = None;
        self.direction = direction;

        self.current = owned_entry(item)?;
        if self.current.is_some() {
            self.range = Some(range);
        }
        Ok(self.is_valid())
    }

    /// Whether the cursor points at an entry
    pub fn is_valid(&self) -> bool {
        self.current.is_some()
    }

    /// Key at the current position
    pub fn key(&self) -> Option<&Bytes> {
        self.current.as_ref().map(|(key, _)| key)
    }

    /// Value at the current position
    pub fn value(&self) -> Option<&Bytes> {
        self.current.as_ref().map(|(_, value)| value)
    }

    /// Key and value at the current position
    pub fn entry(&self) -> Option<(&Bytes, &Bytes)> {
        self.current.as_ref().map(|(key, value)| (key, value))
    }
}

fn owned_entry(
    item: Option<std::result::Result<RawEntry<'_>, redb::StorageError>>,
) -> Result<Option<(Bytes, Bytes)>> {
    match item {
        None => Ok(None),
        Some(Ok((key, value))) => Ok(Some((
            Bytes::copy_from_slice(key.value()),
            Bytes::copy_from_slice(value.value()),
        ))),
        Some(Err(e)) => Err(read_error("cursor step", e)),
    }
}
