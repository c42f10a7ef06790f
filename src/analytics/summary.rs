//! Range summary builder
//!
//! Orchestrates the daily aggregator and moving-average engine over a
//! caller-specified date range and derives the range-level totals.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::models::{Meal, UserSettings, Weight};

use super::calendar;
use super::daily::{build_daily_stats, DailyStat};
use super::moving_average::round_to_tenth;
use super::{AnalyticsError, AnalyticsResult};

/// Default moving-average window in days
pub const DEFAULT_MOVING_AVG_WINDOW: u32 = 3;

/// Range-level totals
#[derive(Debug, Clone, Serialize)]
pub struct TotalStats {
    /// Sum over returned rows only; meal-less days contribute nothing
    pub total_calories: f64,
    pub total_deficit: f64,
    /// Last moving average minus first, over rows that have one; None when
    /// no row has a moving average, 0.0 when exactly one does
    pub weight_difference: Option<f64>,
}

/// Result of a summary call
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub daily_stats: Vec<DailyStat>,
    pub total_stats: TotalStats,
}

/// Build a per-day summary over [start_date, end_date]
///
/// Weights are fetched starting `ma_window` days before the range so the
/// first row's moving average still sees a full backward window.
pub fn build_summary(
    db: &Database,
    user_id: &str,
    start_date: &str,
    end_date: &str,
    ma_window: u32,
) -> AnalyticsResult<Summary> {
    let start = calendar::parse_date_label(start_date)?;
    let end = calendar::parse_date_label(end_date)?;
    if start > end {
        return Err(AnalyticsError::InvalidRange {
            start: start_date.to_string(),
            end: end_date.to_string(),
        });
    }

    // One pooled connection for all reads of this aggregation pass
    let conn = db.get_conn()?;

    let settings = UserSettings::get_or_create(&conn, user_id)?;
    let totals = Meal::daily_totals(&conn, user_id, start_date, end_date)?;

    let lookback_start = calendar::add_days(start_date, -i64::from(ma_window))?;
    let weights = weight_map(&conn, user_id, &lookback_start, end_date)?;

    let daily_stats = build_daily_stats(&totals, &weights, settings.metabolic_rate, ma_window)?;

    let total_calories: f64 = daily_stats.iter().map(|s| s.total_calories).sum();
    let total_deficit: f64 = daily_stats.iter().map(|s| s.deficit).sum();

    let averages: Vec<f64> = daily_stats
        .iter()
        .filter_map(|s| s.weight_moving_avg)
        .collect();
    let weight_difference = match (averages.first(), averages.last()) {
        (Some(first), Some(last)) => Some(round_to_tenth(last - first)),
        _ => None,
    };

    Ok(Summary {
        daily_stats,
        total_stats: TotalStats {
            total_calories,
            total_deficit,
            weight_difference,
        },
    })
}

/// Fetch weights in [start_date, end_date] as a date->kg mapping
///
/// The upsert invariant guarantees at most one row per date, so this is a
/// proper function. Stored date labels that fail to parse surface as
/// InvalidDate rather than being skipped.
pub(super) fn weight_map(
    conn: &rusqlite::Connection,
    user_id: &str,
    start_date: &str,
    end_date: &str,
) -> AnalyticsResult<BTreeMap<NaiveDate, f64>> {
    let rows = Weight::list_range(conn, user_id, start_date, end_date)?;

    let mut map = BTreeMap::new();
    for row in rows {
        map.insert(calendar::parse_date_label(&row.date)?, row.weight_kg);
    }
    Ok(map)
}
