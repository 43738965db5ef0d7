//! Persistence for PR records, the run log, and backoff state.
//!
//! The poller talks to storage through the `StateStore` trait; `SqliteStore`
//! is the on-disk implementation.

mod sqlite;
mod traits;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{PrAttentionError, Result};

pub use sqlite::SqliteStore;
pub use traits::StateStore;

/// Format a timestamp for storage. Round-trips through `from_rfc3339`.
pub fn to_rfc3339(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse a stored timestamp.
pub fn from_rfc3339(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| PrAttentionError::Storage(format!("invalid timestamp: {}", value)))
}
