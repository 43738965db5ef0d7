//! Attention queue administration
//!
//! Operations the CLI performs on the queue outside of polling, and the
//! helpers used to render it.

mod reference;

pub use reference::PrReference;

use chrono::{DateTime, Utc};
use log::info;

use crate::domain::PrRecord;
use crate::error::{PrAttentionError, Result};
use crate::storage::StateStore;

/// Titles longer than this are cut in the status table.
pub const TITLE_WIDTH: usize = 40;

/// Look up the PR a reference points at.
///
/// Repo/number references only match active PRs; an ID may match an inactive one.
pub fn find(store: &dyn StateStore, reference: &PrReference) -> Result<Option<PrRecord>> {
    match reference {
        PrReference::Id(id) => store.get_pr(id),
        PrReference::RepoNumber { repo, number } => Ok(store
            .active_prs()?
            .into_iter()
            .find(|pr| &pr.repo == repo && pr.number == *number)),
    }
}

/// Silence an active PR until the host timestamp advances.
///
/// Returns the record as it was before silencing.
pub fn acknowledge(store: &dyn StateStore, reference: &PrReference) -> Result<PrRecord> {
    let pr = find(store, reference)?.ok_or_else(|| PrAttentionError::NotFound(reference.to_string()))?;

    if !pr.is_active {
        return Err(PrAttentionError::NotActive(reference.to_string()));
    }

    if !store.silence_pr(&pr.pr_id)? {
        return Err(PrAttentionError::NotFound(reference.to_string()));
    }

    info!("Silenced {} ({})", pr.short_ref(), pr.pr_id);
    Ok(pr)
}

/// Drop and recreate all persisted state.
pub fn reset(store: &dyn StateStore) -> Result<()> {
    store.reset()?;
    info!("State reset");
    Ok(())
}

/// Cut `title` to `max` characters, ending in `...` when shortened.
pub fn truncate_title(title: &str, max: usize) -> String {
    if title.chars().count() <= max {
        return title.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = title.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Coarse age like `3d`, `5h`, or `12m`.
pub fn format_age(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now - since;
    if age.num_hours() >= 24 {
        format!("{}d", age.num_days())
    } else if age.num_hours() >= 1 {
        format!("{}h", age.num_hours())
    } else {
        format!("{}m", age.num_minutes().max(0))
    }
}
