//! SQL data access layer for templates, daily logs, and log entries.
//!
//! All methods take a `&Connection` parameter and are stateless: pure
//! functions that translate between Rust types and SQL. Uses
//! `uuid::Uuid::now_v7()` for time-ordered ID generation with
//! entity-specific prefixes.

use chrono::NaiveDate;
use daylog_core::forms::{EntryDraft, TemplateDraft};
use daylog_core::repeat::RepeatSet;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::errors::{Result, StoreError};
use crate::types::{DailyLog, LogEntry, Template};

/// Generate a prefixed UUID v7 ID.
fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::now_v7())
}

/// Current UTC timestamp as an ISO 8601 string.
fn now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Template repository for SQL CRUD operations.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Create a new template from a validated draft.
    pub fn create(conn: &Connection, draft: &TemplateDraft) -> Result<Template> {
        let id = generate_id("tpl");
        let now = now_iso();
        let _ = conn.execute(
            "INSERT INTO templates (id, title, description, repeat, sequence, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                id,
                draft.title,
                draft.description,
                draft.repeat.encode(),
                draft.sequence,
                now,
            ],
        )?;

        Self::get(conn, &id)?.ok_or_else(|| StoreError::TemplateNotFound(id))
    }

    /// Get a template by ID.
    pub fn get(conn: &Connection, id: &str) -> Result<Option<Template>> {
        let template = conn
            .query_row(
                "SELECT id, title, description, repeat, sequence, created_at, updated_at
                 FROM templates WHERE id = ?1",
                params![id],
                template_from_row,
            )
            .optional()?;
        Ok(template)
    }

    /// Replace a template's fields. Returns the updated template, or `None`
    /// if not found.
    ///
    /// Full replacement: the edit form always posts every field.
    pub fn update(conn: &Connection, id: &str, draft: &TemplateDraft) -> Result<Option<Template>> {
        let changed = conn.execute(
            "UPDATE templates
             SET title = ?1, description = ?2, repeat = ?3, sequence = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                draft.title,
                draft.description,
                draft.repeat.encode(),
                draft.sequence,
                now_iso(),
                id,
            ],
        )?;

        if changed == 0 {
            return Ok(None);
        }
        Self::get(conn, id)
    }

    /// Delete a template. Returns `true` if a row was deleted.
    ///
    /// Existing daily-log entries are snapshots and are never touched.
    pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
        let changed = conn.execute("DELETE FROM templates WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// List all templates in manual sort order.
    pub fn list(conn: &Connection) -> Result<Vec<Template>> {
        let mut stmt = conn.prepare(
            "SELECT id, title, description, repeat, sequence, created_at, updated_at
             FROM templates ORDER BY sequence, created_at",
        )?;
        let templates = stmt
            .query_map([], template_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(templates)
    }

    /// Highest sequence value in use, or `None` if there are no templates.
    pub fn max_sequence(conn: &Connection) -> Result<Option<i64>> {
        let max: Option<i64> =
            conn.query_row("SELECT MAX(sequence) FROM templates", [], |row| row.get(0))?;
        Ok(max)
    }
}

/// Daily log repository.
pub struct DailyLogRepo;

impl DailyLogRepo {
    /// Insert a new, empty daily log row for `date`.
    ///
    /// Fails with a UNIQUE constraint violation if a log already exists for
    /// that date; the recurrence engine relies on that to resolve races.
    pub fn insert(conn: &Connection, date: NaiveDate) -> Result<DailyLog> {
        let id = generate_id("log");
        let now = now_iso();
        let _ = conn.execute(
            "INSERT INTO daily_logs (id, log_date, created_at) VALUES (?1, ?2, ?3)",
            params![id, date, now],
        )?;
        Ok(DailyLog {
            id,
            log_date: date,
            entries: Vec::new(),
            created_at: now,
        })
    }

    /// Get a daily log by ID, with its entries.
    pub fn get(conn: &Connection, id: &str) -> Result<Option<DailyLog>> {
        let header = conn
            .query_row(
                "SELECT id, log_date, created_at FROM daily_logs WHERE id = ?1",
                params![id],
                log_header_from_row,
            )
            .optional()?;
        match header {
            Some(log) => Ok(Some(Self::with_entries(conn, log)?)),
            None => Ok(None),
        }
    }

    /// Get the daily log for a calendar date, with its entries.
    pub fn get_by_date(conn: &Connection, date: NaiveDate) -> Result<Option<DailyLog>> {
        let header = conn
            .query_row(
                "SELECT id, log_date, created_at FROM daily_logs WHERE log_date = ?1",
                params![date],
                log_header_from_row,
            )
            .optional()?;
        match header {
            Some(log) => Ok(Some(Self::with_entries(conn, log)?)),
            None => Ok(None),
        }
    }

    /// Delete a daily log. Entries go with it (FK cascade).
    pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
        let changed = conn.execute("DELETE FROM daily_logs WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn with_entries(conn: &Connection, mut log: DailyLog) -> Result<DailyLog> {
        log.entries = EntryRepo::list_for_log(conn, &log.id)?;
        Ok(log)
    }
}

/// Log entry repository.
pub struct EntryRepo;

impl EntryRepo {
    /// Insert a new entry into a daily log. Entries always start not-done.
    pub fn insert(conn: &Connection, daily_log_id: &str, draft: &EntryDraft) -> Result<LogEntry> {
        let id = generate_id("ent");
        let now = now_iso();
        let _ = conn.execute(
            "INSERT INTO log_entries
             (id, daily_log_id, title, description, sequence, is_done, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)",
            params![id, daily_log_id, draft.title, draft.description, draft.sequence, now],
        )?;

        Self::get(conn, &id)?.ok_or_else(|| StoreError::EntryNotFound(id))
    }

    /// Get an entry by ID.
    pub fn get(conn: &Connection, id: &str) -> Result<Option<LogEntry>> {
        let entry = conn
            .query_row(
                "SELECT id, daily_log_id, title, description, sequence, is_done,
                        created_at, updated_at
                 FROM log_entries WHERE id = ?1",
                params![id],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Replace an entry's editable fields. Returns the updated entry, or
    /// `None` if not found.
    ///
    /// A manual edit reopens the entry: `is_done` goes back to false, and
    /// only [`EntryRepo::set_done`] sets it again.
    pub fn update(conn: &Connection, id: &str, draft: &EntryDraft) -> Result<Option<LogEntry>> {
        let changed = conn.execute(
            "UPDATE log_entries
             SET title = ?1, description = ?2, sequence = ?3, is_done = 0, updated_at = ?4
             WHERE id = ?5",
            params![draft.title, draft.description, draft.sequence, now_iso(), id],
        )?;

        if changed == 0 {
            return Ok(None);
        }
        Self::get(conn, id)
    }

    /// Set the completion flag. Returns `true` if a row was updated.
    pub fn set_done(conn: &Connection, id: &str, done: bool) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE log_entries SET is_done = ?1, updated_at = ?2 WHERE id = ?3",
            params![done, now_iso(), id],
        )?;
        Ok(changed > 0)
    }

    /// Delete an entry. Returns `true` if a row was deleted.
    pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
        let changed = conn.execute("DELETE FROM log_entries WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Entries of a daily log in manual sort order.
    pub fn list_for_log(conn: &Connection, daily_log_id: &str) -> Result<Vec<LogEntry>> {
        let mut stmt = conn.prepare(
            "SELECT id, daily_log_id, title, description, sequence, is_done,
                    created_at, updated_at
             FROM log_entries WHERE daily_log_id = ?1 ORDER BY sequence, created_at",
        )?;
        let entries = stmt
            .query_map(params![daily_log_id], entry_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Highest sequence value within a daily log, or `None` if it has no
    /// entries.
    pub fn max_sequence_for_log(conn: &Connection, daily_log_id: &str) -> Result<Option<i64>> {
        let max: Option<i64> = conn.query_row(
            "SELECT MAX(sequence) FROM log_entries WHERE daily_log_id = ?1",
            params![daily_log_id],
            |row| row.get(0),
        )?;
        Ok(max)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Row converters
// ─────────────────────────────────────────────────────────────────────────────

fn template_from_row(row: &Row<'_>) -> rusqlite::Result<Template> {
    let encoded: String = row.get("repeat")?;
    Ok(Template {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        // A stored encoding is always canonical; tolerate anything else.
        repeat: RepeatSet::decode(&encoded).unwrap_or_default(),
        sequence: row.get("sequence")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn log_header_from_row(row: &Row<'_>) -> rusqlite::Result<DailyLog> {
    Ok(DailyLog {
        id: row.get("id")?,
        log_date: row.get("log_date")?,
        entries: Vec::new(),
        created_at: row.get("created_at")?,
    })
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<LogEntry> {
    Ok(LogEntry {
        id: row.get("id")?,
        daily_log_id: row.get("daily_log_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        sequence: row.get("sequence")?,
        is_done: row.get("is_done")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
