//! Per-user analytics engine
//!
//! Turns raw meal and weight records into daily rollups, moving averages,
//! deficit figures, and a heuristic metabolic-rate estimate. Every entry
//! point is a pure function of its arguments plus a snapshot read from the
//! database; nothing here holds state between calls.

pub mod calendar;
pub mod daily;
pub mod estimator;
pub mod moving_average;
pub mod summary;

use thiserror::Error;

use crate::db::DbError;

/// Analytics error types
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Invalid range: start date {start} is after end date {end}")]
    InvalidRange { start: String, end: String },

    #[error("Insufficient data: no days with meal data between {start} and {end}")]
    InsufficientData { start: String, end: String },

    #[error("Invalid date label: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    // Storage failures propagate unmodified; no retries, no partial results
    #[error(transparent)]
    Storage(#[from] DbError),
}

/// Result type for analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

pub use daily::DailyStat;
pub use estimator::{estimate_metabolic_rate, AnalysisWindow, Estimate};
pub use moving_average::moving_average;
pub use summary::{build_summary, Summary, TotalStats, DEFAULT_MOVING_AVG_WINDOW};
