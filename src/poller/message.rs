//! Aggregated notification text

use super::decision::{NotificationReason, PrChange};

/// Title of every poll notification.
pub const NOTIFICATION_TITLE: &str = "PRs Need Attention";

/// Titles are listed only when at most this many PRs changed.
pub const MAX_LISTED_TITLES: usize = 3;

/// Body like `"1 new, 2 updated"` (zero counts omitted), followed by one
/// `• title` line per change when there are few enough of them.
pub fn build_notification_body(changes: &[PrChange]) -> String {
    let new_count = changes.iter().filter(|c| c.reason == NotificationReason::New).count();
    let updated_count = changes.len() - new_count;

    let mut parts = Vec::new();
    if new_count > 0 {
        parts.push(format!("{} new", new_count));
    }
    if updated_count > 0 {
        parts.push(format!("{} updated", updated_count));
    }

    let mut body = parts.join(", ");
    if changes.len() <= MAX_LISTED_TITLES {
        for change in changes {
            body.push_str("\n• ");
            body.push_str(&change.pr.title);
        }
    }
    body
}
