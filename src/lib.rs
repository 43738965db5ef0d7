//! pr-attention - polls a code-review host for pull requests that need you
//!
//! Each run searches for PRs where your review was requested or you are
//! assigned, records them, and raises one desktop notification for the ones
//! that are new or changed since you were last told about them.

pub mod backoff;
pub mod config;
pub mod domain;
pub mod error;
pub mod github;
pub mod notify;
pub mod poller;
pub mod queue;
pub mod storage;

pub use error::{PrAttentionError, Result};
