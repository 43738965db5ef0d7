//! Poll orchestration
//!
//! One poll runs these phases in order:
//! - Backoff check: skip without touching anything if the last failure is too recent
//! - Fetch: review-requested search, then assigned search
//! - Merge and filter
//! - Reconcile: decide notifications, then upsert every hit and retire PRs no
//!   longer seen in a single store write
//! - Notify: one aggregated desktop notification, best-effort
//! - Finalize: update backoff and append a run log entry

pub mod decision;
pub mod message;

pub use decision::{NotificationReason, PrChange, resolve_updated_at, should_notify};
pub use message::{NOTIFICATION_TITLE, build_notification_body};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::backoff::BackoffState;
use crate::config::Config;
use crate::domain::PrRecord;
use crate::error::Result;
use crate::github::{MergedPr, PrSearch, SearchFilter, merge_results};
use crate::notify::Notifier;
use crate::storage::StateStore;

/// Per-run options from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOptions {
    /// Include drafts even if the config excludes them
    pub include_drafts: bool,
}

/// What a successful cycle found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// PRs in the merged, filtered result set
    pub total_prs: usize,
    /// PRs that triggered a notification
    pub notifications_sent: usize,
    pub changes: Vec<PrChange>,
}

/// Result of a poll that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Backoff window still open; nothing was fetched or written
    Skipped { remaining: Duration },
    Completed(PollSummary),
}

/// Runs poll cycles against injected search, storage, and notification capabilities.
pub struct Poller<'a> {
    config: &'a Config,
    store: &'a dyn StateStore,
    search: &'a dyn PrSearch,
    notifier: &'a dyn Notifier,
}

impl<'a> Poller<'a> {
    pub fn new(
        config: &'a Config,
        store: &'a dyn StateStore,
        search: &'a dyn PrSearch,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            config,
            store,
            search,
            notifier,
        }
    }

    /// Run one poll at the current time.
    pub fn poll(&self, options: PollOptions) -> Result<PollOutcome> {
        self.poll_at(Utc::now(), options)
    }

    /// Run one poll with `now` as the observation time.
    ///
    /// On failure the error is returned after the failure has been recorded in
    /// the backoff state and run log.
    pub fn poll_at(&self, now: DateTime<Utc>, options: PollOptions) -> Result<PollOutcome> {
        let mut backoff = self.store.backoff_state()?;
        if let Some(remaining) = backoff.remaining(now) {
            info!(
                "Skipping poll: {} consecutive failures, retry in {}s",
                backoff.consecutive_failures,
                remaining.as_secs()
            );
            return Ok(PollOutcome::Skipped { remaining });
        }

        let started = Instant::now();
        let result = self.run_cycle(now, options);
        let duration_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);

        match result {
            Ok(summary) => {
                backoff.record_success();
                self.finalize(
                    &backoff,
                    count(summary.total_prs),
                    count(summary.notifications_sent),
                    None,
                    duration_ms,
                );
                info!(
                    "Poll complete: {} PRs, {} notifications in {}ms",
                    summary.total_prs, summary.notifications_sent, duration_ms
                );
                Ok(PollOutcome::Completed(summary))
            }
            Err(e) => {
                backoff.record_failure_at(now);
                warn!(
                    "Poll failed ({} consecutive failures): {}",
                    backoff.consecutive_failures, e
                );
                self.finalize(&backoff, 0, 0, Some(&e.to_string()), duration_ms);
                Err(e)
            }
        }
    }

    fn run_cycle(&self, now: DateTime<Utc>, options: PollOptions) -> Result<PollSummary> {
        let orgs = &self.config.orgs;
        let review = self.search.search(SearchFilter::ReviewRequested, orgs)?;
        let assigned = self.search.search(SearchFilter::Assigned, orgs)?;
        debug!("Search returned {} review-requested, {} assigned", review.len(), assigned.len());

        let policy = self.config.filter_policy(options.include_drafts);
        let merged = merge_results(&review, &assigned, &policy);

        let previously_active = self.store.active_prs()?;

        let mut records = Vec::with_capacity(merged.len());
        let mut changes = Vec::new();
        for merged_pr in merged.values() {
            let existing = self.store.get_pr(&merged_pr.result.id)?;
            let (record, reason) = reconcile(merged_pr, existing.as_ref(), now);
            if let Some(reason) = reason {
                debug!("{} needs attention ({})", record.short_ref(), reason.as_str());
                changes.push(PrChange {
                    pr: record.clone(),
                    reason,
                });
            }
            records.push(record);
        }

        let departed: Vec<String> = previously_active
            .iter()
            .filter(|pr| !merged.contains_key(&pr.pr_id))
            .map(|pr| {
                debug!("{} left the attention queue", pr.short_ref());
                pr.pr_id.clone()
            })
            .collect();

        // Nothing is persisted unless every row is
        self.store.save_reconciliation(&records, &departed)?;

        if !changes.is_empty() {
            self.notify(&changes);
        }

        Ok(PollSummary {
            total_prs: merged.len(),
            notifications_sent: changes.len(),
            changes,
        })
    }

    fn notify(&self, changes: &[PrChange]) {
        let body = build_notification_body(changes);
        if let Err(e) = self.notifier.send(NOTIFICATION_TITLE, &body) {
            warn!("Failed to send notification: {}", e);
        }
        if self.config.sound_enabled {
            self.notifier.play_sound();
        }
    }

    // Bookkeeping failures must not mask the poll result.
    fn finalize(
        &self,
        backoff: &BackoffState,
        prs_found: u32,
        notifications_sent: u32,
        error_message: Option<&str>,
        duration_ms: i64,
    ) {
        if let Err(e) = self.store.save_backoff_state(backoff) {
            warn!("Failed to save backoff state: {}", e);
        }
        if let Err(e) = self
            .store
            .log_run(prs_found, notifications_sent, error_message, duration_ms)
        {
            warn!("Failed to log run: {}", e);
        }
    }
}

/// Build the record to persist for a merged hit, plus the notification decision.
fn reconcile(
    merged: &MergedPr,
    existing: Option<&PrRecord>,
    now: DateTime<Utc>,
) -> (PrRecord, Option<NotificationReason>) {
    let hit = &merged.result;
    let updated_at = resolve_updated_at(&hit.updated_at, existing);
    let reason = should_notify(existing, updated_at);

    let last_notified_updated_at = match reason {
        Some(_) => Some(updated_at),
        None => existing.and_then(|pr| pr.last_notified_updated_at),
    };
    let repo = if hit.repository.name_with_owner.is_empty() {
        hit.repository.name.clone()
    } else {
        hit.repository.name_with_owner.clone()
    };

    let record = PrRecord {
        pr_id: hit.id.clone(),
        url: hit.url.clone(),
        title: hit.title.clone(),
        repo,
        number: hit.number,
        first_seen: existing.map(|pr| pr.first_seen).unwrap_or(now),
        last_seen: now,
        last_updated_at: updated_at,
        last_notified_updated_at,
        current_status: merged.status,
        is_active: true,
    };
    (record, reason)
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PrStatus, RunLogEntry};
    use crate::error::PrAttentionError;
    use crate::github::{Repository, SearchResult};
    use crate::storage::SqliteStore;
    use chrono::TimeZone;
    use std::cell::{Cell, RefCell};

    struct FakeSearch {
        review: Vec<SearchResult>,
        assigned: Vec<SearchResult>,
        fail: bool,
        calls: RefCell<Vec<SearchFilter>>,
    }

    impl FakeSearch {
        fn new(review: Vec<SearchResult>, assigned: Vec<SearchResult>) -> Self {
            Self {
                review,
                assigned,
                fail: false,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(Vec::new(), Vec::new())
            }
        }
    }

    impl PrSearch for FakeSearch {
        fn search(&self, filter: SearchFilter, _orgs: &[String]) -> Result<Vec<SearchResult>> {
            self.calls.borrow_mut().push(filter);
            if self.fail {
                return Err(PrAttentionError::Search("gh: authentication required".to_string()));
            }
            Ok(match filter {
                SearchFilter::ReviewRequested => self.review.clone(),
                SearchFilter::Assigned => self.assigned.clone(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: RefCell<Vec<(String, String)>>,
        sounds: Cell<usize>,
        fail: bool,
    }

    impl Notifier for RecordingNotifier {
        fn send(&self, title: &str, body: &str) -> Result<()> {
            self.sent.borrow_mut().push((title.to_string(), body.to_string()));
            if self.fail {
                return Err(PrAttentionError::Io(std::io::Error::other("no display")));
            }
            Ok(())
        }

        fn play_sound(&self) {
            self.sounds.set(self.sounds.get() + 1);
        }
    }

    /// SQLite-backed store whose individual operations can be switched to fail.
    struct FlakyStore {
        inner: SqliteStore,
        fail_get: Cell<bool>,
        fail_save_reconciliation: Cell<bool>,
        fail_save_backoff: Cell<bool>,
        fail_log_run: Cell<bool>,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: SqliteStore::open_in_memory().unwrap(),
                fail_get: Cell::new(false),
                fail_save_reconciliation: Cell::new(false),
                fail_save_backoff: Cell::new(false),
                fail_log_run: Cell::new(false),
            }
        }

        fn db(&self) -> &SqliteStore {
            &self.inner
        }

        fn check(flag: &Cell<bool>, what: &str) -> Result<()> {
            if flag.get() {
                return Err(PrAttentionError::Storage(format!("{}: disk I/O error", what)));
            }
            Ok(())
        }
    }

    impl StateStore for FlakyStore {
        fn get_pr(&self, pr_id: &str) -> Result<Option<PrRecord>> {
            Self::check(&self.fail_get, "get_pr")?;
            self.db().get_pr(pr_id)
        }

        fn upsert_pr(&self, pr: &PrRecord) -> Result<()> {
            self.db().upsert_pr(pr)
        }

        fn active_prs(&self) -> Result<Vec<PrRecord>> {
            self.db().active_prs()
        }

        fn mark_inactive(&self, pr_id: &str) -> Result<()> {
            self.db().mark_inactive(pr_id)
        }

        fn save_reconciliation(&self, prs: &[PrRecord], deactivated: &[String]) -> Result<()> {
            Self::check(&self.fail_save_reconciliation, "save_reconciliation")?;
            self.db().save_reconciliation(prs, deactivated)
        }

        fn silence_pr(&self, pr_id: &str) -> Result<bool> {
            self.db().silence_pr(pr_id)
        }

        fn log_run(
            &self,
            prs_found: u32,
            notifications_sent: u32,
            error_message: Option<&str>,
            duration_ms: i64,
        ) -> Result<()> {
            Self::check(&self.fail_log_run, "log_run")?;
            self.db()
                .log_run(prs_found, notifications_sent, error_message, duration_ms)
        }

        fn last_run(&self) -> Result<Option<RunLogEntry>> {
            self.db().last_run()
        }

        fn backoff_state(&self) -> Result<BackoffState> {
            self.db().backoff_state()
        }

        fn save_backoff_state(&self, state: &BackoffState) -> Result<()> {
            Self::check(&self.fail_save_backoff, "save_backoff_state")?;
            self.db().save_backoff_state(state)
        }

        fn reset(&self) -> Result<()> {
            self.db().reset()
        }
    }

    fn hit(id: &str, updated_at: &str) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            url: format!("https://github.com/org/repo/pull/{}", id.len()),
            title: format!("Title {}", id),
            number: id.len() as u64,
            repository: Repository {
                name: "repo".to_string(),
                name_with_owner: "org/repo".to_string(),
            },
            updated_at: updated_at.to_string(),
            ..Default::default()
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
    }

    fn quiet_config() -> Config {
        Config {
            sound_enabled: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_poll_notifies_new() {
        let store = SqliteStore::open_in_memory().unwrap();
        let search = FakeSearch::new(vec![hit("A", "2025-06-01T09:00:00Z")], vec![]);
        let notifier = RecordingNotifier::default();
        let config = Config::default();
        let poller = Poller::new(&config, &store, &search, &notifier);

        let outcome = poller.poll_at(at(10), PollOptions::default()).unwrap();
        let PollOutcome::Completed(summary) = outcome else {
            panic!("expected completed poll");
        };
        assert_eq!(summary.total_prs, 1);
        assert_eq!(summary.notifications_sent, 1);
        assert_eq!(summary.changes[0].reason, NotificationReason::New);

        let sent = notifier.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, NOTIFICATION_TITLE);
        assert_eq!(sent[0].1, "1 new\n• Title A");
        assert_eq!(notifier.sounds.get(), 1);

        let stored = store.get_pr("A").unwrap().unwrap();
        assert_eq!(stored.first_seen, at(10));
        assert_eq!(stored.last_notified_updated_at, Some(at(9)));
        assert_eq!(stored.repo, "org/repo");
    }

    #[test]
    fn test_searches_run_in_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let search = FakeSearch::new(vec![], vec![]);
        let notifier = RecordingNotifier::default();
        let config = quiet_config();
        Poller::new(&config, &store, &search, &notifier)
            .poll_at(at(10), PollOptions::default())
            .unwrap();

        assert_eq!(
            *search.calls.borrow(),
            vec![SearchFilter::ReviewRequested, SearchFilter::Assigned]
        );
        assert!(notifier.sent.borrow().is_empty());
    }

    #[test]
    fn test_second_identical_poll_is_silent() {
        let store = SqliteStore::open_in_memory().unwrap();
        let search = FakeSearch::new(vec![hit("A", "2025-06-01T09:00:00Z")], vec![]);
        let notifier = RecordingNotifier::default();
        let config = quiet_config();
        let poller = Poller::new(&config, &store, &search, &notifier);

        poller.poll_at(at(10), PollOptions::default()).unwrap();
        let outcome = poller.poll_at(at(11), PollOptions::default()).unwrap();

        let PollOutcome::Completed(summary) = outcome else {
            panic!("expected completed poll");
        };
        assert_eq!(summary.notifications_sent, 0);
        assert_eq!(notifier.sent.borrow().len(), 1);

        let stored = store.get_pr("A").unwrap().unwrap();
        assert_eq!(stored.first_seen, at(10));
        assert_eq!(stored.last_seen, at(11));
    }

    #[test]
    fn test_both_lists_yield_both_status() {
        let store = SqliteStore::open_in_memory().unwrap();
        let a = hit("A", "2025-06-01T09:00:00Z");
        let search = FakeSearch::new(vec![a.clone()], vec![a]);
        let notifier = RecordingNotifier::default();
        let config = quiet_config();
        Poller::new(&config, &store, &search, &notifier)
            .poll_at(at(10), PollOptions::default())
            .unwrap();

        let stored = store.get_pr("A").unwrap().unwrap();
        assert_eq!(stored.current_status, PrStatus::Both);
    }

    #[test]
    fn test_search_failure_records_backoff_and_run() {
        let store = SqliteStore::open_in_memory().unwrap();
        let search = FakeSearch::failing();
        let notifier = RecordingNotifier::default();
        let config = quiet_config();
        let poller = Poller::new(&config, &store, &search, &notifier);

        let err = poller.poll_at(at(10), PollOptions::default()).unwrap_err();
        assert!(matches!(err, PrAttentionError::Search(_)));

        let backoff = store.backoff_state().unwrap();
        assert_eq!(backoff.consecutive_failures, 1);
        assert_eq!(backoff.last_failure_time, Some(at(10)));

        let run = store.last_run().unwrap().unwrap();
        assert!(run.is_error());
        assert_eq!(run.prs_found, 0);
        assert!(run.error_message.unwrap().contains("authentication required"));
    }

    #[test]
    fn test_skip_inside_backoff_window() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut backoff = BackoffState::new();
        backoff.record_failure_at(at(10));
        store.save_backoff_state(&backoff).unwrap();

        let search = FakeSearch::new(vec![hit("A", "2025-06-01T09:00:00Z")], vec![]);
        let notifier = RecordingNotifier::default();
        let config = quiet_config();
        let poller = Poller::new(&config, &store, &search, &notifier);

        let ten_seconds_later = at(10) + chrono::Duration::seconds(10);
        let outcome = poller.poll_at(ten_seconds_later, PollOptions::default()).unwrap();

        assert!(matches!(outcome, PollOutcome::Skipped { .. }));
        assert!(search.calls.borrow().is_empty());
        assert!(store.last_run().unwrap().is_none());
        assert_eq!(store.backoff_state().unwrap(), backoff);
    }

    #[test]
    fn test_success_after_window_resets_backoff() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut backoff = BackoffState::new();
        backoff.record_failure_at(at(9));
        backoff.record_failure_at(at(9));
        store.save_backoff_state(&backoff).unwrap();

        let search = FakeSearch::new(vec![], vec![]);
        let notifier = RecordingNotifier::default();
        let config = quiet_config();
        let outcome = Poller::new(&config, &store, &search, &notifier)
            .poll_at(at(10), PollOptions::default())
            .unwrap();

        assert!(matches!(outcome, PollOutcome::Completed(_)));
        assert_eq!(store.backoff_state().unwrap(), BackoffState::default());
        assert!(!store.last_run().unwrap().unwrap().is_error());
    }

    #[test]
    fn test_notification_failure_does_not_fail_poll() {
        let store = SqliteStore::open_in_memory().unwrap();
        let search = FakeSearch::new(vec![hit("A", "2025-06-01T09:00:00Z")], vec![]);
        let notifier = RecordingNotifier {
            fail: true,
            ..Default::default()
        };
        let config = Config::default();
        let outcome = Poller::new(&config, &store, &search, &notifier)
            .poll_at(at(10), PollOptions::default())
            .unwrap();

        let PollOutcome::Completed(summary) = outcome else {
            panic!("expected completed poll");
        };
        assert_eq!(summary.notifications_sent, 1);
        assert_eq!(notifier.sounds.get(), 1);
        assert_eq!(store.backoff_state().unwrap().consecutive_failures, 0);
    }

    #[test]
    fn test_sound_disabled() {
        let store = SqliteStore::open_in_memory().unwrap();
        let search = FakeSearch::new(vec![hit("A", "2025-06-01T09:00:00Z")], vec![]);
        let notifier = RecordingNotifier::default();
        let config = quiet_config();
        Poller::new(&config, &store, &search, &notifier)
            .poll_at(at(10), PollOptions::default())
            .unwrap();

        assert_eq!(notifier.sent.borrow().len(), 1);
        assert_eq!(notifier.sounds.get(), 0);
    }

    #[test]
    fn test_include_drafts_option() {
        let mut draft = hit("D", "2025-06-01T09:00:00Z");
        draft.is_draft = true;
        let config = quiet_config();
        let notifier = RecordingNotifier::default();

        let store = SqliteStore::open_in_memory().unwrap();
        let search = FakeSearch::new(vec![draft.clone()], vec![]);
        let poller = Poller::new(&config, &store, &search, &notifier);
        let PollOutcome::Completed(excluded) = poller.poll_at(at(10), PollOptions::default()).unwrap() else {
            panic!("expected completed poll");
        };
        assert_eq!(excluded.total_prs, 0);

        let options = PollOptions { include_drafts: true };
        let PollOutcome::Completed(included) = poller.poll_at(at(11), options).unwrap() else {
            panic!("expected completed poll");
        };
        assert_eq!(included.total_prs, 1);
    }

    #[test]
    fn test_backoff_save_failure_does_not_fail_poll() {
        let store = FlakyStore::new();
        store.fail_save_backoff.set(true);
        let search = FakeSearch::new(vec![hit("A", "2025-06-01T09:00:00Z")], vec![]);
        let notifier = RecordingNotifier::default();
        let config = quiet_config();

        let outcome = Poller::new(&config, &store, &search, &notifier)
            .poll_at(at(10), PollOptions::default())
            .unwrap();

        assert!(matches!(outcome, PollOutcome::Completed(_)));
        let run = store.last_run().unwrap().unwrap();
        assert!(!run.is_error());
        assert_eq!(run.prs_found, 1);
        assert_eq!(run.notifications_sent, 1);
    }

    #[test]
    fn test_run_log_failure_does_not_fail_poll() {
        let store = FlakyStore::new();
        let mut backoff = BackoffState::new();
        backoff.record_failure_at(at(8));
        store.save_backoff_state(&backoff).unwrap();
        store.fail_log_run.set(true);

        let search = FakeSearch::new(vec![], vec![]);
        let notifier = RecordingNotifier::default();
        let config = quiet_config();
        let outcome = Poller::new(&config, &store, &search, &notifier)
            .poll_at(at(10), PollOptions::default())
            .unwrap();

        assert!(matches!(outcome, PollOutcome::Completed(_)));
        assert!(store.last_run().unwrap().is_none());
        assert_eq!(store.backoff_state().unwrap(), BackoffState::default());
    }

    #[test]
    fn test_store_read_failure_fails_poll() {
        let store = FlakyStore::new();
        store.fail_get.set(true);
        let search = FakeSearch::new(vec![hit("A", "2025-06-01T09:00:00Z")], vec![]);
        let notifier = RecordingNotifier::default();
        let config = quiet_config();

        let err = Poller::new(&config, &store, &search, &notifier)
            .poll_at(at(10), PollOptions::default())
            .unwrap_err();
        assert!(matches!(err, PrAttentionError::Storage(_)));
        assert!(notifier.sent.borrow().is_empty());

        let backoff = store.backoff_state().unwrap();
        assert_eq!(backoff.consecutive_failures, 1);
        assert_eq!(backoff.last_failure_time, Some(at(10)));

        let run = store.last_run().unwrap().unwrap();
        assert!(run.error_message.unwrap().contains("get_pr: disk I/O error"));
        assert!(store.get_pr("A").unwrap().is_none());
    }

    #[test]
    fn test_failed_write_keeps_prs_pending() {
        let store = FlakyStore::new();
        let search = FakeSearch::new(
            vec![hit("A", "2025-06-01T09:00:00Z")],
            vec![hit("BB", "2025-06-01T09:00:00Z")],
        );
        let notifier = RecordingNotifier::default();
        let config = quiet_config();
        let poller = Poller::new(&config, &store, &search, &notifier);

        store.fail_save_reconciliation.set(true);
        let err = poller.poll_at(at(10), PollOptions::default()).unwrap_err();
        assert!(matches!(err, PrAttentionError::Storage(_)));
        assert!(notifier.sent.borrow().is_empty());
        assert!(store.get_pr("A").unwrap().is_none());
        assert!(store.get_pr("BB").unwrap().is_none());

        let run = store.last_run().unwrap().unwrap();
        assert!(run.error_message.unwrap().contains("save_reconciliation"));
        assert_eq!(store.backoff_state().unwrap().consecutive_failures, 1);

        // once the store recovers, both PRs are still announced
        store.fail_save_reconciliation.set(false);
        let PollOutcome::Completed(summary) = poller.poll_at(at(11), PollOptions::default()).unwrap() else {
            panic!("expected completed poll");
        };
        assert_eq!(summary.notifications_sent, 2);
        assert!(
            summary
                .changes
                .iter()
                .all(|change| change.reason == NotificationReason::New)
        );
        assert_eq!(notifier.sent.borrow().len(), 1);
        assert_eq!(store.backoff_state().unwrap().consecutive_failures, 0);
    }

    #[test]
    fn test_reconcile_preserves_notified_timestamp_when_silent() {
        let merged = MergedPr {
            result: hit("A", "2025-06-01T09:00:00Z"),
            status: PrStatus::Assigned,
        };
        let existing = PrRecord {
            pr_id: "A".to_string(),
            url: String::new(),
            title: "Old title".to_string(),
            repo: "org/repo".to_string(),
            number: 1,
            first_seen: at(1),
            last_seen: at(2),
            last_updated_at: at(9),
            last_notified_updated_at: Some(at(9)),
            current_status: PrStatus::ReviewRequested,
            is_active: false,
        };

        let (record, reason) = reconcile(&merged, Some(&existing), at(10));
        assert!(reason.is_none());
        assert_eq!(record.first_seen, at(1));
        assert_eq!(record.last_seen, at(10));
        assert_eq!(record.last_notified_updated_at, Some(at(9)));
        assert_eq!(record.title, "Title A");
        assert_eq!(record.current_status, PrStatus::Assigned);
        assert!(record.is_active);
    }
}
