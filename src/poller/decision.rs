//! Notification decision
//!
//! A PR is worth a notification when it has never been notified, or when the
//! host's modification time moved past the last notified one.

use chrono::{DateTime, Utc};
use log::warn;

use crate::domain::PrRecord;

/// Why a PR triggered a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationReason {
    /// First time the PR is notified
    New,
    /// Host timestamp advanced since the last notification
    Updated,
}

impl NotificationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationReason::New => "new",
            NotificationReason::Updated => "updated",
        }
    }
}

/// A PR that triggered a notification during a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrChange {
    pub pr: PrRecord,
    pub reason: NotificationReason,
}

/// Decide whether a PR should be notified given its stored record and the
/// host's current modification time. Equal timestamps never notify.
pub fn should_notify(existing: Option<&PrRecord>, updated_at: DateTime<Utc>) -> Option<NotificationReason> {
    let Some(existing) = existing else {
        return Some(NotificationReason::New);
    };
    match existing.last_notified_updated_at {
        None => Some(NotificationReason::New),
        Some(notified) if updated_at > notified => Some(NotificationReason::Updated),
        Some(_) => None,
    }
}

/// Parse the host's `updatedAt` value.
///
/// An unparseable value falls back to the stored `last_updated_at`, or to the
/// Unix epoch for a PR not seen before.
pub fn resolve_updated_at(raw: &str, existing: Option<&PrRecord>) -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.with_timezone(&Utc),
        Err(e) => {
            warn!("Unparseable updatedAt {:?}: {}", raw, e);
            existing.map(|pr| pr.last_updated_at).unwrap_or_default()
        }
    }
}
