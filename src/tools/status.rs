//! CalTrack status tool
//!
//! Provides runtime status information about the CalTrack service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Tracking instructions for AI assistants
pub const TRACKING_INSTRUCTIONS: &str = r#"
# CalTrack Usage Instructions

CalTrack tracks calories and body weight per user and answers analytical
queries over the stored history. Every tool takes a `user_id`; pass the same
identifier for the same person on every call.

## Logging meals

Use `add_meal` once per food intake event:
- `name` - what was eaten (required, non-empty)
- `calories` - total calories for the meal (required, >= 0)
- `protein` / `carbs` / `fat` - grams, optional; omit when unknown rather
  than guessing 0
- `logged_at` - UTC timestamp like "2025-01-09T12:30:00Z"; omit to use now

Several meals per day are expected; they are distinguished by time.

## Logging weight

Use `add_weight` with a calendar date (YYYY-MM-DD) and `weight_kg`.
There is at most one weight per date: logging a second value for the same
date replaces the first. Log weight daily for best moving-average quality.

## Settings

Each user has a metabolic rate (calories/day, default 2000) used as the
deficit baseline. Set it with `update_settings` once known - either from the
user or from `calculate_metabolic_rate`.

## Summaries

`get_summary(user_id, start_date, end_date)` returns one row per day that
has meals: calorie/macro totals, deficit (rate - calories; negative =
surplus), same-day weight, and a 3-day moving-average weight. Days without
meals are omitted. `weight_difference` in the totals is the change in the
moving average from the first to the last day that has one.

## Metabolic rate estimation

`calculate_metabolic_rate(user_id, start_date)` analyzes the 7 days from
start_date. It needs at least one day with meals in the window and works
best with full meal logging and daily weights (including the 3 days before
start_date, which feed the starting moving average). The estimate uses
7700 kcal per kg of body-mass change. Suggest updating the user's settings
with the result when it looks plausible.

## Notes

- Dates are ISO format: YYYY-MM-DD, treated as plain calendar dates
- Timestamps are UTC instants; no timezone conversion is applied
- The timezone setting is an advisory label only
"#;

/// Runtime status of the CalTrack service
#[derive(Debug, Clone, Serialize)]
pub struct CalTrackStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> CalTrackStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        CalTrackStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
