//! SQL DDL for the daylog tables.
//!
//! Creates `templates`, `daily_logs`, and `log_entries`. The UNIQUE
//! constraint on `daily_logs.log_date` is what serializes concurrent
//! first-visits to a new date: the second writer hits a constraint
//! violation and re-reads instead of creating a duplicate log.

use rusqlite::Connection;
use tracing::debug;

use crate::errors::{Result, StoreError};

/// Run all migrations.
///
/// Idempotent: safe to call on every startup (uses `IF NOT EXISTS`).
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA).map_err(|e| StoreError::Migration {
        message: format!("schema DDL failed: {e}"),
    })?;
    debug!("daylog schema ready");
    Ok(())
}

/// Combined DDL for all daylog tables.
const SCHEMA: &str = r"
-- Recurring task templates
CREATE TABLE IF NOT EXISTS templates (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    repeat TEXT NOT NULL DEFAULT '',
    sequence INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_templates_sequence
    ON templates(sequence);

-- One row per calendar day; log_date is 'YYYY-MM-DD'
CREATE TABLE IF NOT EXISTS daily_logs (
    id TEXT PRIMARY KEY,
    log_date TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Snapshot entries owned by their daily log
CREATE TABLE IF NOT EXISTS log_entries (
    id TEXT PRIMARY KEY,
    daily_log_id TEXT NOT NULL REFERENCES daily_logs(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT,
    sequence INTEGER NOT NULL DEFAULT 0,
    is_done INTEGER NOT NULL DEFAULT 0
        CHECK(is_done IN (0, 1)),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_log_entries_log_sequence
    ON log_entries(daily_log_id, sequence);
";

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
