//! SQLite-backed state store.

use chrono::Utc;
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::traits::StateStore;
use super::{from_rfc3339, to_rfc3339};
use crate::backoff::BackoffState;
use crate::domain::{PrRecord, RunLogEntry};
use crate::error::Result;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS prs (
    pr_id TEXT PRIMARY KEY,
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    repo TEXT NOT NULL,
    number INTEGER NOT NULL,
    first_seen TEXT NOT NULL,
    last_seen TEXT NOT NULL,
    last_updated_at TEXT NOT NULL,
    last_notified_updated_at TEXT,
    current_status TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_prs_active ON prs(is_active);

CREATE TABLE IF NOT EXISTS run_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_at TEXT NOT NULL,
    prs_found INTEGER NOT NULL,
    notifications_sent INTEGER NOT NULL,
    error_message TEXT,
    duration_ms INTEGER
);

CREATE TABLE IF NOT EXISTS backoff_state (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    consecutive_failures INTEGER NOT NULL DEFAULT 0,
    last_failure_time TEXT
);
"#;

const DROP_SCHEMA: &str = r#"
DROP TABLE IF EXISTS prs;
DROP TABLE IF EXISTS run_log;
DROP TABLE IF EXISTS backoff_state;
"#;

const PR_COLUMNS: &str = "pr_id, url, title, repo, number, first_seen, last_seen, \
     last_updated_at, last_notified_updated_at, current_status, is_active";

/// Raw `prs` row before timestamp and status parsing.
struct PrRow {
    pr_id: String,
    url: String,
    title: String,
    repo: String,
    number: i64,
    first_seen: String,
    last_seen: String,
    last_updated_at: String,
    last_notified_updated_at: Option<String>,
    current_status: String,
    is_active: bool,
}

impl PrRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            pr_id: row.get(0)?,
            url: row.get(1)?,
            title: row.get(2)?,
            repo: row.get(3)?,
            number: row.get(4)?,
            first_seen: row.get(5)?,
            last_seen: row.get(6)?,
            last_updated_at: row.get(7)?,
            last_notified_updated_at: row.get(8)?,
            current_status: row.get(9)?,
            is_active: row.get(10)?,
        })
    }

    fn into_record(self) -> Result<PrRecord> {
        Ok(PrRecord {
            pr_id: self.pr_id,
            url: self.url,
            title: self.title,
            repo: self.repo,
            number: self.number.max(0) as u64,
            first_seen: from_rfc3339(&self.first_seen)?,
            last_seen: from_rfc3339(&self.last_seen)?,
            last_updated_at: from_rfc3339(&self.last_updated_at)?,
            last_notified_updated_at: self
                .last_notified_updated_at
                .as_deref()
                .map(from_rfc3339)
                .transpose()?,
            current_status: self.current_status.parse()?,
            is_active: self.is_active,
        })
    }
}

/// State store in a single SQLite database file.
pub struct SqliteStore {
    db: Connection,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").field("path", &self.path).finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open or create the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let db = Connection::open(path)?;
        db.busy_timeout(Duration::from_secs(5))?;
        Self::init_schema(&db)?;

        debug!("Opened state store at {}", path.display());
        Ok(Self {
            db,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory()?;
        Self::init_schema(&db)?;
        Ok(Self { db, path: None })
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn init_schema(db: &Connection) -> Result<()> {
        db.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Insert or update one PR row. `first_seen` is never overwritten.
    fn upsert_into(db: &Connection, pr: &PrRecord) -> Result<()> {
        db.execute(
            r#"
            INSERT INTO prs (pr_id, url, title, repo, number, first_seen, last_seen,
                             last_updated_at, last_notified_updated_at, current_status, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(pr_id) DO UPDATE SET
                url = excluded.url,
                title = excluded.title,
                repo = excluded.repo,
                number = excluded.number,
                last_seen = excluded.last_seen,
                last_updated_at = excluded.last_updated_at,
                last_notified_updated_at = excluded.last_notified_updated_at,
                current_status = excluded.current_status,
                is_active = excluded.is_active
            "#,
            params![
                pr.pr_id,
                pr.url,
                pr.title,
                pr.repo,
                pr.number as i64,
                to_rfc3339(&pr.first_seen),
                to_rfc3339(&pr.last_seen),
                to_rfc3339(&pr.last_updated_at),
                pr.last_notified_updated_at.as_ref().map(to_rfc3339),
                pr.current_status.as_str(),
                pr.is_active,
            ],
        )?;
        Ok(())
    }

    fn deactivate_in(db: &Connection, pr_id: &str) -> Result<()> {
        db.execute("UPDATE prs SET is_active = 0 WHERE pr_id = ?1", [pr_id])?;
        Ok(())
    }
}

impl StateStore for SqliteStore {
    fn get_pr(&self, pr_id: &str) -> Result<Option<PrRecord>> {
        let sql = format!("SELECT {} FROM prs WHERE pr_id = ?1", PR_COLUMNS);
        let row = self.db.query_row(&sql, [pr_id], PrRow::from_row).optional()?;
        row.map(PrRow::into_record).transpose()
    }

    fn upsert_pr(&self, pr: &PrRecord) -> Result<()> {
        Self::upsert_into(&self.db, pr)
    }

    fn active_prs(&self) -> Result<Vec<PrRecord>> {
        let sql = format!(
            "SELECT {} FROM prs WHERE is_active = 1 ORDER BY repo, number",
            PR_COLUMNS
        );
        let mut stmt = self.db.prepare(&sql)?;
        let rows = stmt.query_map([], PrRow::from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }

    fn mark_inactive(&self, pr_id: &str) -> Result<()> {
        Self::deactivate_in(&self.db, pr_id)
    }

    fn save_reconciliation(&self, prs: &[PrRecord], deactivated: &[String]) -> Result<()> {
        // Dropping the transaction without commit rolls it back
        let tx = self.db.unchecked_transaction()?;
        for pr in prs {
            Self::upsert_into(&tx, pr)?;
        }
        for pr_id in deactivated {
            Self::deactivate_in(&tx, pr_id)?;
        }
        tx.commit()?;

        debug!("Saved {} PRs, deactivated {}", prs.len(), deactivated.len());
        Ok(())
    }

    fn silence_pr(&self, pr_id: &str) -> Result<bool> {
        let changed = self.db.execute(
            "UPDATE prs SET last_notified_updated_at = last_updated_at WHERE pr_id = ?1",
            [pr_id],
        )?;
        Ok(changed > 0)
    }

    fn log_run(
        &self,
        prs_found: u32,
        notifications_sent: u32,
        error_message: Option<&str>,
        duration_ms: i64,
    ) -> Result<()> {
        let error_message = error_message.filter(|m| !m.is_empty());
        self.db.execute(
            r#"
            INSERT INTO run_log (run_at, prs_found, notifications_sent, error_message, duration_ms)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                to_rfc3339(&Utc::now()),
                prs_found,
                notifications_sent,
                error_message,
                duration_ms
            ],
        )?;
        Ok(())
    }

    fn last_run(&self) -> Result<Option<RunLogEntry>> {
        let row = self
            .db
            .query_row(
                r#"
                SELECT id, run_at, prs_found, notifications_sent, error_message, duration_ms
                FROM run_log ORDER BY id DESC LIMIT 1
                "#,
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, u32>(2)?,
                        row.get::<_, u32>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, Option<i64>>(5)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(id, run_at, prs_found, notifications_sent, error_message, duration_ms)| {
            Ok(RunLogEntry {
                id,
                run_at: from_rfc3339(&run_at)?,
                prs_found,
                notifications_sent,
                error_message,
                duration_ms,
            })
        })
        .transpose()
    }

    fn backoff_state(&self) -> Result<BackoffState> {
        let row = self
            .db
            .query_row(
                "SELECT consecutive_failures, last_failure_time FROM backoff_state WHERE id = 1",
                [],
                |row| Ok((row.get::<_, u32>(0)?, row.get::<_, Option<String>>(1)?)),
            )
            .optional()?;

        match row {
            None => Ok(BackoffState::default()),
            Some((consecutive_failures, last_failure_time)) => Ok(BackoffState {
                consecutive_failures,
                last_failure_time: last_failure_time.as_deref().map(from_rfc3339).transpose()?,
            }),
        }
    }

    fn save_backoff_state(&self, state: &BackoffState) -> Result<()> {
        self.db.execute(
            r#"
            INSERT INTO backoff_state (id, consecutive_failures, last_failure_time)
            VALUES (1, ?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
                consecutive_failures = excluded.consecutive_failures,
                last_failure_time = excluded.last_failure_time
            "#,
            params![
                state.consecutive_failures,
                state.last_failure_time.as_ref().map(to_rfc3339)
            ],
        )?;
        Ok(())
    }

    fn reset(&self) -> Result<()> {
        self.db.execute_batch(DROP_SCHEMA)?;
        Self::init_schema(&self.db)?;
        info!("State store reset");
        Ok(())
    }
}
