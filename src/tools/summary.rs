//! Summary and estimation MCP tools
//!
//! Thin wrappers over the analytics engine; all the interesting semantics
//! live in `crate::analytics`.

use crate::analytics::{build_summary, estimate_metabolic_rate, Estimate, Summary};
use crate::db::Database;

/// Build a daily summary with totals over [start_date, end_date]
pub fn get_summary(
    db: &Database,
    user_id: &str,
    start_date: &str,
    end_date: &str,
    weight_moving_avg_days: u32,
) -> Result<Summary, String> {
    if user_id.trim().is_empty() {
        return Err("user_id must not be empty".to_string());
    }
    if weight_moving_avg_days < 1 {
        return Err("weight_moving_avg_days must be >= 1".to_string());
    }

    build_summary(db, user_id, start_date, end_date, weight_moving_avg_days)
        .map_err(|e| e.to_string())
}

/// Estimate the metabolic rate from the 7-day window starting at start_date
pub fn calculate_metabolic_rate(
    db: &Database,
    user_id: &str,
    start_date: &str,
) -> Result<Estimate, String> {
    if user_id.trim().is_empty() {
        return Err("user_id must not be empty".to_string());
    }

    estimate_metabolic_rate(db, user_id, start_date).map_err(|e| e.to_string())
}
