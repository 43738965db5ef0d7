//! Pull request record and status types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PrAttentionError;

/// Why a PR is in the attention queue, recomputed on every poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrStatus {
    /// A review was requested from the user
    ReviewRequested,
    /// The user is an assignee
    Assigned,
    /// Both of the above
    Both,
}

impl PrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrStatus::ReviewRequested => "review_requested",
            PrStatus::Assigned => "assigned",
            PrStatus::Both => "both",
        }
    }
}

impl fmt::Display for PrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrStatus {
    type Err = PrAttentionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "review_requested" => Ok(PrStatus::ReviewRequested),
            "assigned" => Ok(PrStatus::Assigned),
            "both" => Ok(PrStatus::Both),
            other => Err(PrAttentionError::Storage(format!("unknown PR status: {}", other))),
        }
    }
}

/// A pull request observed by at least one poll.
///
/// Records are never deleted by polling; a PR that drops out of the filtered
/// result set is only marked inactive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrRecord {
    //=== Identity ===
    /// Host-assigned node ID, stable across polls
    pub pr_id: String,

    //=== Display ===
    pub url: String,
    pub title: String,
    /// Repository full name ("org/repo")
    pub repo: String,
    pub number: u64,

    //=== Timestamps ===
    /// Set once when the PR is first observed
    pub first_seen: DateTime<Utc>,
    /// Advanced on every poll where the PR appears
    pub last_seen: DateTime<Utc>,
    /// Host's most recent modification time
    pub last_updated_at: DateTime<Utc>,
    /// `last_updated_at` at the moment of the last notification (None = never notified)
    pub last_notified_updated_at: Option<DateTime<Utc>>,

    //=== State ===
    pub current_status: PrStatus,
    pub is_active: bool,
}

impl PrRecord {
    /// Short human reference, e.g. `org/repo#42`
    pub fn short_ref(&self) -> String {
        format!("{}#{}", self.repo, self.number)
    }
}
