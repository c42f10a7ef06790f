//! Backward-looking moving average over a sparse date->weight mapping
//!
//! The mapping is assumed to be a proper function (at most one weight per
//! date, guaranteed by the storage upsert). Callers that want a full window
//! for the first day of a range must fetch weights starting earlier than the
//! range itself; the engine just averages whatever dates actually have a
//! value.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

/// N-day backward-looking average at `target`, rounded to one decimal
///
/// Includes only the dates in [target-(N-1), target] that have a weight, so
/// a gap shrinks the denominator instead of dragging the mean toward zero.
/// Returns None when none of the N dates have a value.
pub fn moving_average(
    weights: &BTreeMap<NaiveDate, f64>,
    target: NaiveDate,
    window: u32,
) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0u32;

    for i in 0..window {
        let day = target - Duration::days(i64::from(i));
        if let Some(&kg) = weights.get(&day) {
            sum += kg;
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }

    Some(round_to_tenth(sum / f64::from(count)))
}

/// Round to one decimal place, half away from zero
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(label: &str) -> NaiveDate {
        NaiveDate::parse_from_str(label, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_full_window() {
        let mut weights = BTreeMap::new();
        weights.insert(date("2025-01-08"), 75.2);
        weights.insert(date("2025-01-09"), 75.0);
        weights.insert(date("2025-01-10"), 74.8);

        assert_eq!(moving_average(&weights, date("2025-01-10"), 3), Some(75.0));
    }

    #[test]
    fn test_gap_shrinks_denominator() {
        // Only D and D-2 have weights; the mean is over those two values,
        // not zero-filled for the missing day
        let mut weights = BTreeMap::new();
        weights.insert(date("2025-01-08"), 75.0);
        weights.insert(date("2025-01-10"), 74.0);

        assert_eq!(moving_average(&weights, date("2025-01-10"), 3), Some(74.5));
    }

    #[test]
    fn test_no_data_is_none() {
        let weights = BTreeMap::new();
        assert_eq!(moving_average(&weights, date("2025-01-10"), 3), None);

        let mut far = BTreeMap::new();
        far.insert(date("2025-01-01"), 75.0);
        assert_eq!(moving_average(&far, date("2025-01-10"), 3), None);
    }

    #[test]
    fn test_window_of_one() {
        let mut weights = BTreeMap::new();
        weights.insert(date("2025-01-09"), 75.0);
        weights.insert(date("2025-01-10"), 74.0);

        assert_eq!(moving_average(&weights, date("2025-01-10"), 1), Some(74.0));
    }

    #[test]
    fn test_rounding_to_one_decimal() {
        let mut weights = BTreeMap::new();
        weights.insert(date("2025-01-09"), 2.0);
        weights.insert(date("2025-01-10"), 2.5);

        // mean 2.25 rounds half away from zero to 2.3
        assert_eq!(moving_average(&weights, date("2025-01-10"), 2), Some(2.3));
    }

    #[test]
    fn test_round_to_tenth_half_away_from_zero() {
        assert_eq!(round_to_tenth(2.25), 2.3);
        assert_eq!(round_to_tenth(-2.25), -2.3);
        assert_eq!(round_to_tenth(1.04), 1.0);
    }
}
