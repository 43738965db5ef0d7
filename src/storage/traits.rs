//! State store trait.

use crate::backoff::BackoffState;
use crate::domain::{PrRecord, RunLogEntry};
use crate::error::Result;

/// Durable record of PRs, run history, and backoff state.
///
/// Implementations persist what they are told and make no decisions of their own.
pub trait StateStore {
    /// Get a PR by ID.
    fn get_pr(&self, pr_id: &str) -> Result<Option<PrRecord>>;

    /// Insert or update a PR. `first_seen` of an existing row is never overwritten.
    fn upsert_pr(&self, pr: &PrRecord) -> Result<()>;

    /// All PRs currently in the attention queue, ordered by repo and number.
    fn active_prs(&self) -> Result<Vec<PrRecord>>;

    /// Mark a PR as no longer in the attention queue.
    fn mark_inactive(&self, pr_id: &str) -> Result<()>;

    /// Upsert `prs` and mark `deactivated` inactive as one unit.
    /// On error nothing is written.
    fn save_reconciliation(&self, prs: &[PrRecord], deactivated: &[String]) -> Result<()>;

    /// Set `last_notified_updated_at := last_updated_at`. Returns false if no such PR.
    fn silence_pr(&self, pr_id: &str) -> Result<bool>;

    /// Append a run log entry.
    fn log_run(
        &self,
        prs_found: u32,
        notifications_sent: u32,
        error_message: Option<&str>,
        duration_ms: i64,
    ) -> Result<()>;

    /// Most recent run log entry.
    fn last_run(&self) -> Result<Option<RunLogEntry>>;

    /// Load backoff state; a missing row is the zero state.
    fn backoff_state(&self) -> Result<BackoffState>;

    /// Persist backoff state.
    fn save_backoff_state(&self, state: &BackoffState) -> Result<()>;

    /// Drop and recreate all persisted state.
    fn reset(&self) -> Result<()>;
}
