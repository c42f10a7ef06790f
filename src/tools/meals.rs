//! Meal logging MCP tools
//!
//! Tools for adding, listing, and deleting meal records.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Meal, MealCreate};

/// Response for add_meal
#[derive(Debug, Serialize)]
pub struct AddMealResponse {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub calories: f64,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub logged_at: String,
}

/// Response for list_meals
#[derive(Debug, Serialize)]
pub struct ListMealsResponse {
    pub meals: Vec<Meal>,
    pub count: usize,
    pub start_date: String,
    pub end_date: String,
}

/// Add a meal record
pub fn add_meal(
    db: &Database,
    user_id: &str,
    name: &str,
    calories: f64,
    protein: Option<f64>,
    carbs: Option<f64>,
    fat: Option<f64>,
    logged_at: Option<String>,
) -> Result<AddMealResponse, String> {
    if user_id.trim().is_empty() {
        return Err("user_id must not be empty".to_string());
    }
    if name.trim().is_empty() {
        return Err("Meal name must not be empty".to_string());
    }
    if calories < 0.0 {
        return Err("Calories must be >= 0".to_string());
    }
    for (label, value) in [("protein", protein), ("carbs", carbs), ("fat", fat)] {
        if let Some(v) = value {
            if v < 0.0 {
                return Err(format!("{} must be >= 0", label));
            }
        }
    }
    if let Some(ref instant) = logged_at {
        crate::analytics::calendar::instant_date_label(instant)
            .map_err(|e| e.to_string())?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let data = MealCreate {
        user_id: user_id.to_string(),
        name: name.trim().to_string(),
        calories,
        protein,
        carbs,
        fat,
        logged_at,
    };

    let meal = Meal::create(&conn, &data)
        .map_err(|e| format!("Failed to add meal: {}", e))?;

    Ok(AddMealResponse {
        id: meal.id,
        user_id: meal.user_id,
        name: meal.name,
        calories: meal.calories,
        protein: meal.protein,
        carbs: meal.carbs,
        fat: meal.fat,
        logged_at: meal.logged_at,
    })
}

/// List meals whose logged date falls in [start_date, end_date]
pub fn list_meals(
    db: &Database,
    user_id: &str,
    start_date: &str,
    end_date: &str,
) -> Result<ListMealsResponse, String> {
    validate_range(start_date, end_date)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meals = Meal::list_range(&conn, user_id, start_date, end_date)
        .map_err(|e| format!("Failed to list meals: {}", e))?;

    Ok(ListMealsResponse {
        count: meals.len(),
        meals,
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
    })
}

/// Delete a meal by ID
pub fn delete_meal(db: &Database, user_id: &str, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Meal::delete(&conn, user_id, id)
        .map_err(|e| format!("Failed to delete meal: {}", e))
}

/// Shared date-range validation for listing tools
pub(super) fn validate_range(start_date: &str, end_date: &str) -> Result<(), String> {
    use crate::analytics::calendar::parse_date_label;

    let start = parse_date_label(start_date).map_err(|e| e.to_string())?;
    let end = parse_date_label(end_date).map_err(|e| e.to_string())?;
    if start > end {
        return Err(format!(
            "Invalid range: start date {} is after end date {}",
            start_date, end_date
        ));
    }
    Ok(())
}
