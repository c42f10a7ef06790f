//! Metabolic rate estimator
//!
//! Compares a week of logged intake against the 3-day-average weight change
//! across that week and backs out an estimated daily burn rate. One specific
//! documented heuristic, not a statistical model.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Meal, UserSettings};

use super::calendar;
use super::moving_average::{moving_average, round_to_tenth};
use super::summary::weight_map;
use super::{AnalyticsError, AnalyticsResult};

/// Energy equivalent of one kilogram of body-mass change (kcal)
const KCAL_PER_KG: f64 = 7700.0;

/// Analysis window length in calendar days (inclusive)
const WINDOW_DAYS: i64 = 7;

/// Moving-average window used at both endpoints
const MA_WINDOW: u32 = 3;

/// The window the estimate was computed over
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisWindow {
    pub start_date: String,
    pub end_date: String,
    /// Averaged over days *with* data, not over 7
    pub average_daily_calories: i64,
    /// 3-day MA at end minus 3-day MA at start, kg; 0 when either endpoint
    /// has no average available
    pub weight_change: f64,
    pub days_with_data: i64,
}

/// Result of a metabolic-rate estimation
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub calculated_metabolic_rate: i64,
    pub analysis_window: AnalysisWindow,
    /// The rate currently stored in the user's settings, for comparison
    pub current_setting_rate: i64,
}

/// Estimate the metabolic rate from the 7-day window starting at `start_date`
///
/// weight loss over the window raises the estimate above observed intake
/// (the body burned more than it took in); weight gain lowers it. Hence the
/// factor is subtracted:
///
///   rate = average_daily_calories - round(weight_change * 7700 / 7)
pub fn estimate_metabolic_rate(
    db: &Database,
    user_id: &str,
    start_date: &str,
) -> AnalyticsResult<Estimate> {
    let start = calendar::parse_date_label(start_date)?;
    let end_date = calendar::add_days(start_date, WINDOW_DAYS - 1)?;
    let end = calendar::parse_date_label(&end_date)?;

    let conn = db.get_conn()?;

    let settings = UserSettings::get_or_create(&conn, user_id)?;
    let totals = Meal::daily_totals(&conn, user_id, start_date, &end_date)?;

    let days_with_data = totals.len() as i64;
    if days_with_data == 0 {
        return Err(AnalyticsError::InsufficientData {
            start: start_date.to_string(),
            end: end_date,
        });
    }

    // 3-day lookback so the start anchor has a full window too
    let lookback_start = calendar::add_days(start_date, -i64::from(MA_WINDOW))?;
    let weights = weight_map(&conn, user_id, &lookback_start, &end_date)?;

    let ma_start = moving_average(&weights, start, MA_WINDOW);
    let ma_end = moving_average(&weights, end, MA_WINDOW);

    // Missing endpoint means no usable trend; fall back to 0 rather than
    // propagating None (unlike the summary builder, deliberately)
    let weight_change = match (ma_start, ma_end) {
        (Some(first), Some(last)) => round_to_tenth(last - first),
        _ => 0.0,
    };

    let calorie_sum: f64 = totals.iter().map(|t| t.total_calories).sum();
    let average_daily_calories = (calorie_sum / days_with_data as f64).round() as i64;

    let weight_change_factor = (weight_change * KCAL_PER_KG / WINDOW_DAYS as f64).round() as i64;
    let calculated_metabolic_rate = average_daily_calories - weight_change_factor;

    Ok(Estimate {
        calculated_metabolic_rate,
        analysis_window: AnalysisWindow {
            start_date: start_date.to_string(),
            end_date,
            average_daily_calories,
            weight_change,
            days_with_data,
        },
        current_setting_rate: settings.metabolic_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use crate::models::{MealCreate, Weight};

    fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("test.db")).unwrap();
        db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();
        (db, dir)
    }

    fn log_meal(db: &Database, user_id: &str, name: &str, calories: f64, instant: &str) {
        let conn = db.get_conn().unwrap();
        Meal::create(
            &conn,
            &MealCreate {
                user_id: user_id.to_string(),
                name: name.to_string(),
                calories,
                protein: None,
                carbs: None,
                fat: None,
                logged_at: Some(instant.to_string()),
            },
        )
        .unwrap();
    }

    fn log_weight(db: &Database, user_id: &str, date: &str, kg: f64) {
        let conn = db.get_conn().unwrap();
        Weight::upsert(&conn, user_id, date, kg).unwrap();
    }

    /// Window 2025-03-10..2025-03-16 with a meal on every day
    fn seed_week_of_meals(db: &Database, user_id: &str, calories: f64) {
        for (i, day) in (10..=16).enumerate() {
            log_meal(
                db,
                user_id,
                &format!("Day{}", i + 1),
                calories,
                &format!("2025-03-{:02}T12:00:00Z", day),
            );
        }
    }

    #[test]
    fn test_steady_intake_with_weight_loss() {
        let (db, _dir) = test_db();
        seed_week_of_meals(&db, "u1", 2000.0);

        // Weights from two days before the window through day 6 of it,
        // descending 0.2 kg/day: 75.2 at 03-08 down to 73.8 at 03-15.
        // MA(start) = mean(75.2, 75.0, 74.8) = 75.0
        // MA(end)   = mean(74.0, 73.8)       = 73.9 (no weight on 03-16)
        for (i, day) in (8..=15).enumerate() {
            log_weight(&db, "u1", &format!("2025-03-{:02}", day), 75.2 - i as f64 * 0.2);
        }

        let estimate = estimate_metabolic_rate(&db, "u1", "2025-03-10").unwrap();

        assert_eq!(estimate.analysis_window.days_with_data, 7);
        assert_eq!(estimate.analysis_window.average_daily_calories, 2000);
        assert_eq!(estimate.analysis_window.weight_change, -1.1);
        // factor = round(-1.1 * 7700 / 7) = -1210, subtracted from intake
        assert_eq!(estimate.calculated_metabolic_rate, 3210);
        assert_eq!(estimate.current_setting_rate, 2000);
    }

    #[test]
    fn test_weight_gain_lowers_estimate() {
        let (db, _dir) = test_db();
        seed_week_of_meals(&db, "u1", 2500.0);

        // Ascending 0.1 kg/day from 03-08 through 03-16 (full coverage):
        // MA(start) = mean(74.0, 74.1, 74.2) = 74.1
        // MA(end)   = mean(74.6, 74.7, 74.8) = 74.7
        for (i, day) in (8..=16).enumerate() {
            log_weight(&db, "u1", &format!("2025-03-{:02}", day), 74.0 + i as f64 * 0.1);
        }

        let estimate = estimate_metabolic_rate(&db, "u1", "2025-03-10").unwrap();

        assert_eq!(estimate.analysis_window.weight_change, 0.6);
        // factor = round(0.6 * 7700 / 7) = 660
        assert_eq!(estimate.calculated_metabolic_rate, 2500 - 660);
    }

    #[test]
    fn test_empty_window_is_insufficient_data() {
        let (db, _dir) = test_db();
        // A meal exists, but outside the 7-day window
        log_meal(&db, "u1", "Late", 2000.0, "2025-03-20T12:00:00Z");

        let err = estimate_metabolic_rate(&db, "u1", "2025-03-10").unwrap_err();
        assert!(matches!(err, AnalyticsError::InsufficientData { .. }));
    }

    #[test]
    fn test_partial_coverage_averages_over_days_with_data() {
        let (db, _dir) = test_db();
        log_meal(&db, "u1", "Day1", 1800.0, "2025-03-10T12:00:00Z");
        log_meal(&db, "u1", "Day4", 2200.0, "2025-03-13T12:00:00Z");

        let estimate = estimate_metabolic_rate(&db, "u1", "2025-03-10").unwrap();

        assert_eq!(estimate.analysis_window.days_with_data, 2);
        // (1800 + 2200) / 2, not divided by 7
        assert_eq!(estimate.analysis_window.average_daily_calories, 2000);
    }

    #[test]
    fn test_missing_endpoint_average_treats_change_as_zero() {
        let (db, _dir) = test_db();
        seed_week_of_meals(&db, "u1", 2000.0);
        // Weight only near the start; nothing within 3 days of the end
        log_weight(&db, "u1", "2025-03-10", 75.0);

        let estimate = estimate_metabolic_rate(&db, "u1", "2025-03-10").unwrap();

        assert_eq!(estimate.analysis_window.weight_change, 0.0);
        assert_eq!(estimate.calculated_metabolic_rate, 2000);
    }

    #[test]
    fn test_window_is_seven_days_inclusive() {
        let (db, _dir) = test_db();
        // Meals on the last window day and the day after it
        log_meal(&db, "u1", "In", 2000.0, "2025-03-16T12:00:00Z");
        log_meal(&db, "u1", "Out", 9000.0, "2025-03-17T12:00:00Z");

        let estimate = estimate_metabolic_rate(&db, "u1", "2025-03-10").unwrap();

        assert_eq!(estimate.analysis_window.end_date, "2025-03-16");
        assert_eq!(estimate.analysis_window.days_with_data, 1);
        assert_eq!(estimate.analysis_window.average_daily_calories, 2000);
    }
}
