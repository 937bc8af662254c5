//! Key namespacing helpers
//!
//! Keys are plain strings organised by convention:
//!
//! ```text
//! <domain>@<name>                 settings, snapshots   e.g. "CPU@load"
//! <domain>@<name>@<timestamp>     series / history      e.g. "CPU@load@00000000001700000000"
//! ```
//!
//! The store knows nothing about this layout; prefix scans are pure byte
//! prefix tests. Timestamps are zero-padded to a fixed width so ascending
//! byte order is also chronological order.

/// Separator between key segments
pub const SEPARATOR: char = '@';

/// Width of the zero-padded timestamp suffix (fits any `u64`)
pub const TIMESTAMP_WIDTH: usize = 20;

/// Key builder for one domain (usually a module name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    domain: String,
}

impl Namespace {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// `"<domain>@"`, matching every key in this namespace
    pub fn prefix(&self) -> String {
        format!("{}{}", self.domain, SEPARATOR)
    }

    /// `"<domain>@<name>"`
    pub fn key(&self, name: &str) -> String {
        format!("{}{}{}", self.domain, SEPARATOR, name)
    }

    /// `"<domain>@<name>@"`, matching every entry of one series
    pub fn series_prefix(&self, name: &str) -> String {
        format!("{}{}", self.key(name), SEPARATOR)
    }

    /// `"<domain>@<name>@<timestamp>"` with the timestamp zero-padded
    pub fn series_key(&self, name: &str, timestamp: u64) -> String {
        format!(
            "{}{:0width$}",
            self.series_prefix(name),
            timestamp,
            width = TIMESTAMP_WIDTH
        )
    }

    /// Timestamp suffix of a key produced by [`Namespace::series_key`]
    ///
    /// Returns `None` for keys from another series or without a numeric
    /// suffix.
    pub fn parse_series_timestamp(&self, name: &str, key: &str) -> Option<u64> {
        key.strip_prefix(&self.series_prefix(name))?.parse().ok()
    }
}
