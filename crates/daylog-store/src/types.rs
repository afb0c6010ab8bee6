//! Persisted record types.
//!
//! These are what the repositories read back from SQL and what the
//! presentation layer renders. Snapshot semantics live in the field set:
//! a [`LogEntry`] carries its own copy of `title`, `description`, and
//! `sequence`, so later template edits never show through.

use chrono::NaiveDate;
use daylog_core::repeat::{Bucket, RepeatSet};
use serde::Serialize;

/// A recurring task template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Template {
    /// Prefixed UUID (`tpl-…`).
    pub id: String,
    /// Task title.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Weekdays this template is due on.
    pub repeat: RepeatSet,
    /// Manual sort key. User-controlled, need not be contiguous.
    pub sequence: i64,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Last update timestamp (ISO 8601).
    pub updated_at: String,
}

/// The per-day snapshot of due tasks.
///
/// Exactly one exists per calendar date; membership of `entries` is fixed at
/// creation time except through explicit manual entry CRUD.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DailyLog {
    /// Prefixed UUID (`log-…`).
    pub id: String,
    /// The calendar day this log covers. Time-of-day never appears here.
    pub log_date: NaiveDate,
    /// Entries ordered by sequence.
    pub entries: Vec<LogEntry>,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
}

/// One completable item within a daily log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Prefixed UUID (`ent-…`).
    pub id: String,
    /// Owning daily log.
    pub daily_log_id: String,
    /// Title copied from the template at snapshot time.
    pub title: String,
    /// Description copied from the template at snapshot time.
    pub description: Option<String>,
    /// Sort key copied from the template at snapshot time.
    pub sequence: i64,
    /// Completion flag, independent per day and per entry.
    pub is_done: bool,
    /// Creation timestamp (ISO 8601).
    pub created_at: String,
    /// Last update timestamp (ISO 8601).
    pub updated_at: String,
}

/// A display group of templates sharing a bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TemplateGroup {
    /// The bucket all these templates belong to.
    pub bucket: Bucket,
    /// Templates in the group, ordered by sequence.
    pub templates: Vec<Template>,
}
