//! Business logic layer over the repositories.
//!
//! [`TemplateService`] covers template CRUD, sequence prefill, and the
//! bucketed display grouping. [`LogService`] is the recurrence engine: it
//! resolves a calendar date to its daily log, materializing the snapshot on
//! first visit, and owns the per-entry done toggle plus manual entry CRUD.

use chrono::{DateTime, NaiveDate, Utc};
use daylog_core::forms::{EntryDraft, TemplateDraft};
use daylog_core::repeat::{Bucket, Weekday};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::errors::{Result, StoreError};
use crate::repository::{DailyLogRepo, EntryRepo, TemplateRepo};
use crate::types::{DailyLog, LogEntry, Template, TemplateGroup};

/// Gap between prefilled sequence values, leaving room to reorder by hand.
const SEQUENCE_STEP: i64 = 10;

/// Template operations.
pub struct TemplateService;

impl TemplateService {
    /// Create a template from a validated draft.
    pub fn create(conn: &Connection, draft: &TemplateDraft) -> Result<Template> {
        let template = TemplateRepo::create(conn, draft)?;
        debug!(id = %template.id, "template created");
        Ok(template)
    }

    /// Get a template by ID.
    pub fn get(conn: &Connection, id: &str) -> Result<Template> {
        TemplateRepo::get(conn, id)?.ok_or_else(|| StoreError::TemplateNotFound(id.to_owned()))
    }

    /// Replace a template's fields.
    ///
    /// Daily logs materialized before the edit keep their snapshots.
    pub fn update(conn: &Connection, id: &str, draft: &TemplateDraft) -> Result<Template> {
        TemplateRepo::update(conn, id, draft)?
            .ok_or_else(|| StoreError::TemplateNotFound(id.to_owned()))
    }

    /// Delete a template. Returns `true` if it existed.
    pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
        TemplateRepo::delete(conn, id)
    }

    /// All templates in manual sort order.
    pub fn list(conn: &Connection) -> Result<Vec<Template>> {
        TemplateRepo::list(conn)
    }

    /// Prefill value for a new template's sequence field: one step past the
    /// highest in use, or 0 for the first template.
    pub fn next_sequence(conn: &Connection) -> Result<i64> {
        Ok(TemplateRepo::max_sequence(conn)?.map_or(0, |max| max + SEQUENCE_STEP))
    }

    /// Templates partitioned into display groups, in fixed bucket order:
    /// Every Day first, then Monday through Sunday.
    ///
    /// A template repeating on several specific days appears in each of its
    /// day groups. A full-week template appears in Every Day only. Empty
    /// groups are omitted.
    pub fn grouped(conn: &Connection) -> Result<Vec<TemplateGroup>> {
        let templates = TemplateRepo::list(conn)?;
        let groups = Bucket::all()
            .into_iter()
            .filter_map(|bucket| {
                let members: Vec<Template> = templates
                    .iter()
                    .filter(|t| t.repeat.buckets().contains(&bucket))
                    .cloned()
                    .collect();
                if members.is_empty() {
                    None
                } else {
                    Some(TemplateGroup {
                        bucket,
                        templates: members,
                    })
                }
            })
            .collect();
        Ok(groups)
    }
}

/// The recurrence engine and log-entry operations.
pub struct LogService;

impl LogService {
    /// Resolve an instant to its daily log, creating the log on first visit.
    ///
    /// The time-of-day is discarded: any two instants on the same UTC
    /// calendar date resolve to the identical log.
    pub fn get_or_create_daily_log(conn: &Connection, at: DateTime<Utc>) -> Result<DailyLog> {
        Self::get_or_create_for_date(conn, at.date_naive())
    }

    /// Date-typed entry point of the recurrence engine.
    ///
    /// Idempotent per calendar day: an existing log is returned unchanged,
    /// with no re-sync of its entries even if templates changed since. On
    /// first visit the log and its entries are created as one transaction,
    /// so a log without its entries is never observable. Losing a creation
    /// race against a concurrent first visit is resolved by re-reading the
    /// row the winner inserted.
    pub fn get_or_create_for_date(conn: &Connection, date: NaiveDate) -> Result<DailyLog> {
        if let Some(log) = DailyLogRepo::get_by_date(conn, date)? {
            return Ok(log);
        }

        match Self::materialize(conn, date) {
            Ok(log) => Ok(log),
            Err(StoreError::Sqlite(err)) if is_unique_violation(&err) => {
                debug!(date = %date, "daily log creation raced, re-reading winner");
                DailyLogRepo::get_by_date(conn, date)?
                    .ok_or_else(|| StoreError::LogNotFound(date.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    /// Get a daily log by ID.
    pub fn get(conn: &Connection, id: &str) -> Result<DailyLog> {
        DailyLogRepo::get(conn, id)?.ok_or_else(|| StoreError::LogNotFound(id.to_owned()))
    }

    /// Flip an entry's done flag and return the updated entry.
    ///
    /// Self-inverse; no effect on sibling entries or on the originating
    /// template.
    pub fn toggle_entry_done(conn: &Connection, entry_id: &str) -> Result<LogEntry> {
        let entry = EntryRepo::get(conn, entry_id)?
            .ok_or_else(|| StoreError::EntryNotFound(entry_id.to_owned()))?;

        if !EntryRepo::set_done(conn, entry_id, !entry.is_done)? {
            return Err(StoreError::EntryNotFound(entry_id.to_owned()));
        }
        EntryRepo::get(conn, entry_id)?
            .ok_or_else(|| StoreError::EntryNotFound(entry_id.to_owned()))
    }

    /// Add a manual entry to an existing daily log.
    pub fn add_entry(
        conn: &Connection,
        daily_log_id: &str,
        draft: &EntryDraft,
    ) -> Result<LogEntry> {
        if DailyLogRepo::get(conn, daily_log_id)?.is_none() {
            return Err(StoreError::LogNotFound(daily_log_id.to_owned()));
        }
        EntryRepo::insert(conn, daily_log_id, draft)
    }

    /// Replace an entry's editable fields. The edit reopens the entry.
    pub fn update_entry(conn: &Connection, entry_id: &str, draft: &EntryDraft) -> Result<LogEntry> {
        EntryRepo::update(conn, entry_id, draft)?
            .ok_or_else(|| StoreError::EntryNotFound(entry_id.to_owned()))
    }

    /// Delete an entry. Returns `true` if it existed.
    pub fn delete_entry(conn: &Connection, entry_id: &str) -> Result<bool> {
        EntryRepo::delete(conn, entry_id)
    }

    /// Prefill value for a new entry's sequence field within a log.
    pub fn next_entry_sequence(conn: &Connection, daily_log_id: &str) -> Result<i64> {
        if DailyLogRepo::get(conn, daily_log_id)?.is_none() {
            return Err(StoreError::LogNotFound(daily_log_id.to_owned()));
        }
        Ok(EntryRepo::max_sequence_for_log(conn, daily_log_id)?
            .map_or(0, |max| max + SEQUENCE_STEP))
    }

    /// Snapshot the templates due on `date` into a new daily log.
    ///
    /// Runs as a single transaction; the log row and its entry batch commit
    /// together or not at all.
    fn materialize(conn: &Connection, date: NaiveDate) -> Result<DailyLog> {
        let tx = conn.unchecked_transaction()?;

        // The log row goes in first. Its INSERT takes the write lock and is
        // where a concurrent first visit loses with a UNIQUE violation; a
        // read before it would leave this transaction on a stale snapshot.
        let log = DailyLogRepo::insert(&tx, date)?;

        let weekday = Weekday::from_date(date);
        let due: Vec<Template> = TemplateRepo::list(&tx)?
            .into_iter()
            .filter(|t| t.repeat.contains(weekday))
            .collect();
        for template in &due {
            let _ = EntryRepo::insert(
                &tx,
                &log.id,
                &EntryDraft {
                    title: template.title.clone(),
                    description: template.description.clone(),
                    sequence: template.sequence,
                },
            )?;
        }
        tx.commit()?;

        info!(date = %date, entries = due.len(), "materialized daily log");
        Self::get(conn, &log.id)
    }
}

/// Whether a `SQLite` error is a UNIQUE constraint violation.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
