//! # statskv
//!
//! Ordered key-value state store for a desktop monitoring application:
//! reader history, widget snapshots and settings, keyed by hierarchical
//! strings such as `"CPU@load"`.
//!
//! - Point insert / lookup / delete
//! - Prefix enumeration of keys or values, in ascending byte order
//! - Reverse lookup of the last value under a prefix
//! - Atomic batch delete (and batch insert)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Store (façade)                        │
//! │   keys · find_many · find_last · insert · find_one · ...     │
//! └──────────┬───────────────────┬────────────────────┬─────────┘
//!            │                   │                    │
//!            ▼                   ▼                    ▼
//!     ┌─────────────┐     ┌─────────────┐      ┌─────────────┐
//!     │   Cursor    │     │    Point    │      │    Batch    │
//!     │ (per scan)  │     │     ops     │      │  (atomic)   │
//!     └──────┬──────┘     └──────┬──────┘      └──────┬──────┘
//!            └───────────────────┼────────────────────┘
//!                                ▼
//!                         ┌─────────────┐
//!                         │   Handle    │
//!                         │ (RwLock)    │
//!                         └──────┬──────┘
//!                                ▼
//!                         ┌─────────────┐
//!                         │    redb     │
//!                         │ (one file)  │
//!                         └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use statskv::Store;
//!
//! # fn main() -> statskv::Result<()> {
//! let store = Store::open("/tmp/stats/state.redb")?;
//! store.insert("CPU@load@0001", "12.5")?;
//! store.insert("CPU@load@0002", "14.0")?;
//!
//! assert_eq!(store.find_many("CPU@load@")?, vec!["12.5", "14.0"]);
//! assert_eq!(store.find_last("CPU@load@")?.as_deref(), Some("14.0"));
//!
//! store.delete_many(store.keys("CPU@")?)?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod batch;
pub mod cursor;
pub mod handle;
pub mod namespace;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use batch::{Batch, BatchOp};
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use namespace::Namespace;
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of statskv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
