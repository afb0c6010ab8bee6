//! # daylog-store
//!
//! SQLite persistence and daily-log materialization for daylog.
//!
//! - **Connection pool**: [`connection`] builds an `r2d2` pool with WAL and
//!   foreign keys enabled on every connection
//! - **Schema**: [`migrations::run_migrations`] creates the `templates`,
//!   `daily_logs`, and `log_entries` tables (idempotent)
//! - **Repositories**: [`repository`] holds the stateless SQL layer; every
//!   method takes a `&Connection`
//! - **Services**: [`service::TemplateService`] and [`service::LogService`]
//!   add the business rules, including the recurrence engine that snapshots
//!   due templates into a per-day log
//!
//! ## Crate Position
//!
//! Depends on `daylog-core` for the repeat codec and validated drafts. The
//! presentation/routing layer sits on top of the services.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod migrations;
pub mod repository;
pub mod service;
pub mod types;

pub use errors::{Result, StoreError};
