//! Domain types for pr-attention
//!
//! - PrRecord: one persisted pull request and its notification bookkeeping
//! - PrStatus: why the PR is in the attention queue
//! - RunLogEntry: append-only record of one poll execution

pub mod pr_record;
pub mod run_log;

pub use pr_record::{PrRecord, PrStatus};
pub use run_log::RunLogEntry;
