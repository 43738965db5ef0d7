//! Run log entry type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One poll execution as recorded in the run log.
///
/// Written for observability only; polling never reads it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLogEntry {
    pub id: i64,
    pub run_at: DateTime<Utc>,
    pub prs_found: u32,
    pub notifications_sent: u32,
    pub error_message: Option<String>,
    pub duration_ms: Option<i64>,
}

impl RunLogEntry {
    pub fn is_error(&self) -> bool {
        self.error_message.as_deref().is_some_and(|m| !m.is_empty())
    }
}
