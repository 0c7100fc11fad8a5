//! Taskboard - completion and delay analytics for delegated work.
//!
//! # Overview
//!
//! Taskboard scores employees on four kinds of work: delegations,
//! recurring checklist items, help tickets and support tickets. For a chosen
//! calendar period it counts, per employee and per category, how much work
//! was in play, how much got done and how much of that was late, then
//! blends those into one overall score (lower is better).
//!
//! Records come from a spreadsheet-shaped store behind
//! [`repository::RecordRepository`]; all analytics run on the in-memory
//! collections it returns.
//!
//! # Modules
//!
//! - [`model`]: Records, subjects, periods and dashboard result types
//! - [`dates`]: Local date parsing and working-day arithmetic
//! - [`period`]: Month/week selection resolved to a date range
//! - [`classify`]: Per-category pending/on-time/delayed classification
//! - [`aggregation`]: Overall score across categories
//! - [`dashboard`]: Per-employee dashboard and its configuration
//! - [`sheet`]: Row codec for the spreadsheet tables
//! - [`repository`]: Data-access seam, in-memory store and record updates
//! - [`telemetry`]: Tracing subscriber setup
//! - [`error`]: Error type

pub mod aggregation;
pub mod classify;
pub mod dashboard;
pub mod dates;
pub mod error;
pub mod model;
pub mod period;
pub mod repository;
pub mod sheet;
pub mod telemetry;

pub use dashboard::{DashboardConfig, build_dashboard, compute_dashboard};
pub use error::{Error, Result};
pub use model::{Category, DashboardQuery, DashboardResponse, PeriodRange, Record, Subject};
pub use repository::{InMemorySheets, RecordRepository};
