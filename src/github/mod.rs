//! GitHub search integration.
//!
//! Searches are delegated to the `gh` CLI. Results from the review-requested
//! and assigned searches are merged into one status-annotated set.

pub mod client;
pub mod merge;
pub mod types;

pub use client::{CommandRunner, GhClient, PrSearch, SystemRunner};
pub use merge::{FilterPolicy, merge_results};
pub use types::{Author, Label, MergedPr, Repository, SearchFilter, SearchResult};
