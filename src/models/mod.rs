//! Data models
//!
//! Rust structs representing database entities.

mod meal;
mod settings;
mod weight;

pub use meal::{DailyMealTotals, Meal, MealCreate};
pub use settings::{UserSettings, UserSettingsUpdate, DEFAULT_METABOLIC_RATE, DEFAULT_TIMEZONE};
pub use weight::Weight;
