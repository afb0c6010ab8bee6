//! # daylog-core
//!
//! Domain logic for the daylog daily-todo tracker.
//!
//! This crate holds everything that does not touch storage:
//!
//! - **Repeat patterns**: [`repeat::Weekday`] tokens, [`repeat::RepeatSet`]
//!   with its canonical comma-joined encoding, display labels and grouping
//!   buckets
//! - **Form validation**: [`forms::TemplateForm`] / [`forms::EntryForm`]
//!   field checks producing tagged submission outcomes that echo the
//!   submitted values back on rejection
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by `daylog-store`.

#![deny(unsafe_code)]

pub mod forms;
pub mod repeat;
