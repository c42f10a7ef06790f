//! Daily rollup rows
//!
//! Converts the storage layer's per-day meal totals plus a date->weight
//! mapping into DailyStat rows. Rows exist only for dates that have at least
//! one meal (sparse representation, not a zero-filled series); a date with
//! meals but no weight gets `weight: None`, never 0.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::DailyMealTotals;

use super::calendar;
use super::moving_average::moving_average;
use super::AnalyticsResult;

/// One computed row per calendar date in a queried range
///
/// Derived, never persisted: built fresh on every summary/estimate call and
/// discarded with the response.
#[derive(Debug, Clone, Serialize)]
pub struct DailyStat {
    pub date: String,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    /// metabolic rate minus calories; negative means surplus
    pub deficit: f64,
    /// Raw same-day weight, if one was logged
    pub weight: Option<f64>,
    /// Backward-looking moving average anchored at this row's date
    pub weight_moving_avg: Option<f64>,
}

/// Build DailyStat rows from grouped meal totals and a weight mapping
///
/// `totals` arrives already grouped, summed, and date-ascending from the
/// storage layer. The weight map may extend earlier than the first total so
/// the first row still gets a full moving-average window.
pub fn build_daily_stats(
    totals: &[DailyMealTotals],
    weights: &BTreeMap<NaiveDate, f64>,
    metabolic_rate: i64,
    ma_window: u32,
) -> AnalyticsResult<Vec<DailyStat>> {
    let mut stats = Vec::with_capacity(totals.len());

    for day in totals {
        let date = calendar::parse_date_label(&day.date)?;

        stats.push(DailyStat {
            date: day.date.clone(),
            total_calories: day.total_calories,
            total_protein: day.total_protein,
            total_carbs: day.total_carbs,
            total_fat: day.total_fat,
            deficit: metabolic_rate as f64 - day.total_calories,
            weight: weights.get(&date).copied(),
            weight_moving_avg: moving_average(weights, date, ma_window),
        });
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(label: &str) -> NaiveDate {
        NaiveDate::parse_from_str(label, "%Y-%m-%d").unwrap()
    }

    fn totals(date: &str, calories: f64) -> DailyMealTotals {
        DailyMealTotals {
            date: date.to_string(),
            total_calories: calories,
            total_protein: 0.0,
            total_carbs: 0.0,
            total_fat: 0.0,
        }
    }

    #[test]
    fn test_sparse_rows_in_ascending_order() {
        // Meals on two of four days: exactly two rows, meal-less dates omitted
        let days = vec![totals("2025-01-10", 1800.0), totals("2025-01-12", 2200.0)];
        let weights = BTreeMap::new();

        let stats = build_daily_stats(&days, &weights, 2000, 3).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].date, "2025-01-10");
        assert_eq!(stats[1].date, "2025-01-12");
    }

    #[test]
    fn test_deficit_sign() {
        let days = vec![totals("2025-01-10", 1800.0), totals("2025-01-11", 2350.0)];
        let weights = BTreeMap::new();

        let stats = build_daily_stats(&days, &weights, 2000, 3).unwrap();
        assert_eq!(stats[0].deficit, 200.0);
        assert_eq!(stats[1].deficit, -350.0); // surplus
    }

    #[test]
    fn test_missing_weight_is_none_not_zero() {
        let days = vec![totals("2025-01-10", 2000.0)];
        let weights = BTreeMap::new();

        let stats = build_daily_stats(&days, &weights, 2000, 3).unwrap();
        assert_eq!(stats[0].weight, None);
        assert_eq!(stats[0].weight_moving_avg, None);
    }

    #[test]
    fn test_same_day_weight_and_lookback_average() {
        let days = vec![totals("2025-01-10", 2000.0)];
        let mut weights = BTreeMap::new();
        weights.insert(date("2025-01-08"), 75.2);
        weights.insert(date("2025-01-09"), 75.0);
        weights.insert(date("2025-01-10"), 74.8);

        let stats = build_daily_stats(&days, &weights, 2000, 3).unwrap();
        assert_eq!(stats[0].weight, Some(74.8));
        // Average reaches back past the single-day range
        assert_eq!(stats[0].weight_moving_avg, Some(75.0));
    }
}
