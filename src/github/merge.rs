//! Merging and filtering of search results.

use log::warn;
use std::collections::{BTreeMap, HashSet};

use super::types::{MergedPr, SearchResult};
use crate::domain::PrStatus;

/// Which search hits are dropped before merging.
///
/// Label and author matching is exact and case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct FilterPolicy {
    pub exclude_drafts: bool,
    pub ignored_labels: HashSet<String>,
    pub ignored_authors: HashSet<String>,
}

impl FilterPolicy {
    pub fn new<L, A>(exclude_drafts: bool, ignored_labels: L, ignored_authors: A) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            exclude_drafts,
            ignored_labels: ignored_labels.into_iter().map(Into::into).collect(),
            ignored_authors: ignored_authors.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether a search hit passes the draft, author, and label filters.
    pub fn includes(&self, pr: &SearchResult) -> bool {
        if self.exclude_drafts && pr.is_draft {
            return false;
        }
        if self.ignored_authors.contains(&pr.author.login) {
            return false;
        }
        !pr.labels.iter().any(|label| self.ignored_labels.contains(&label.name))
    }
}

/// Merge review-requested and assigned hits into one map keyed by PR ID.
///
/// Review-requested hits are folded in first. An assigned hit for a PR that is
/// already present upgrades its status to `Both`. The map is ordered by ID so
/// callers iterate deterministically. Hits without an ID are dropped.
pub fn merge_results(
    review: &[SearchResult],
    assigned: &[SearchResult],
    policy: &FilterPolicy,
) -> BTreeMap<String, MergedPr> {
    let mut merged = BTreeMap::new();

    for pr in review.iter().filter(|pr| has_id(pr) && policy.includes(pr)) {
        merged.insert(
            pr.id.clone(),
            MergedPr {
                result: pr.clone(),
                status: PrStatus::ReviewRequested,
            },
        );
    }

    for pr in assigned.iter().filter(|pr| has_id(pr) && policy.includes(pr)) {
        merged
            .entry(pr.id.clone())
            .and_modify(|existing: &mut MergedPr| existing.status = PrStatus::Both)
            .or_insert_with(|| MergedPr {
                result: pr.clone(),
                status: PrStatus::Assigned,
            });
    }

    merged
}

fn has_id(pr: &SearchResult) -> bool {
    if pr.id.is_empty() {
        warn!("Dropping search hit without an id: {:?}", pr.url);
        return false;
    }
    true
}
