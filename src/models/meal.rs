//! Meal record model
//!
//! One logged food intake event. Meals carry a full UTC instant so several
//! meals on the same day stay distinct; the calendar date used for
//! aggregation is derived from the instant's own encoded date fields.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A logged meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub calories: f64,
    pub protein: Option<f64>, // grams, None = not recorded
    pub carbs: Option<f64>,   // grams
    pub fat: Option<f64>,     // grams
    pub logged_at: String,    // UTC instant: "2025-01-09T12:30:00Z"
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a meal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealCreate {
    pub user_id: String,
    pub name: String,
    pub calories: f64,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    /// Defaults to now (UTC) if not provided
    pub logged_at: Option<String>,
}

/// Per-day meal totals as grouped by the storage layer
///
/// Missing macros are coalesced to 0 for summation; the per-record
/// optionality survives on the `Meal` rows themselves.
#[derive(Debug, Clone, Serialize)]
pub struct DailyMealTotals {
    pub date: String, // ISO date: "2025-01-09"
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
}

impl Meal {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fat: row.get("fat")?,
            logged_at: row.get("logged_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new meal
    pub fn create(conn: &Connection, data: &MealCreate) -> DbResult<Self> {
        let logged_at = data.logged_at.clone().unwrap_or_else(|| {
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
        });

        conn.execute(
            r#"
            INSERT INTO meals (user_id, name, calories, protein, carbs, fat, logged_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.user_id,
                data.name,
                data.calories,
                data.protein,
                data.carbs,
                data.fat,
                logged_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, &data.user_id, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a meal by ID, scoped to a user
    pub fn get_by_id(conn: &Connection, user_id: &str, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE user_id = ?1 AND id = ?2")?;

        let result = stmt.query_row(params![user_id, id], Self::from_row);
        match result {
            Ok(meal) => Ok(Some(meal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List meals whose logged calendar date falls in [start_date, end_date],
    /// ascending by instant
    pub fn list_range(
        conn: &Connection,
        user_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM meals
            WHERE user_id = ?1
              AND date(logged_at) >= ?2
              AND date(logged_at) <= ?3
            ORDER BY logged_at ASC
            "#,
        )?;

        let meals = stmt
            .query_map(params![user_id, start_date, end_date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    /// Per-day calorie and macro totals over [start_date, end_date], ascending
    ///
    /// Only dates with at least one meal produce a row; the grouping happens
    /// here in SQL so the aggregation core never re-derives it from raw rows.
    pub fn daily_totals(
        conn: &Connection,
        user_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> DbResult<Vec<DailyMealTotals>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT
                date(logged_at) AS day,
                SUM(calories) AS total_calories,
                SUM(COALESCE(protein, 0)) AS total_protein,
                SUM(COALESCE(carbs, 0)) AS total_carbs,
                SUM(COALESCE(fat, 0)) AS total_fat
            FROM meals
            WHERE user_id = ?1
              AND date(logged_at) >= ?2
              AND date(logged_at) <= ?3
            GROUP BY date(logged_at)
            ORDER BY day ASC
            "#,
        )?;

        let totals = stmt
            .query_map(params![user_id, start_date, end_date], |row| {
                Ok(DailyMealTotals {
                    date: row.get("day")?,
                    total_calories: row.get("total_calories")?,
                    total_protein: row.get("total_protein")?,
                    total_carbs: row.get("total_carbs")?,
                    total_fat: row.get("total_fat")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(totals)
    }

    /// Delete a meal, scoped to a user
    pub fn delete(conn: &Connection, user_id: &str, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM meals WHERE user_id = ?1 AND id = ?2",
            params![user_id, id],
        )?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, Database};

    fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("test.db")).unwrap();
        db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();
        (db, dir)
    }

    fn meal(user_id: &str, name: &str, calories: f64, logged_at: &str) -> MealCreate {
        MealCreate {
            user_id: user_id.to_string(),
            name: name.to_string(),
            calories,
            protein: None,
            carbs: None,
            fat: None,
            logged_at: Some(logged_at.to_string()),
        }
    }

    #[test]
    fn test_multiple_meals_per_day_stay_distinct() {
        let (db, _dir) = test_db();
        let conn = db.get_conn().unwrap();

        Meal::create(&conn, &meal("u1", "breakfast", 400.0, "2025-01-09T07:30:00Z")).unwrap();
        Meal::create(&conn, &meal("u1", "lunch", 650.0, "2025-01-09T12:15:00Z")).unwrap();

        let rows = Meal::list_range(&conn, "u1", "2025-01-09", "2025-01-09").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "breakfast");
        assert_eq!(rows[1].name, "lunch");
    }

    #[test]
    fn test_daily_totals_groups_by_calendar_date() {
        let (db, _dir) = test_db();
        let conn = db.get_conn().unwrap();

        Meal::create(&conn, &meal("u1", "breakfast", 400.0, "2025-01-09T07:30:00Z")).unwrap();
        Meal::create(&conn, &meal("u1", "dinner", 800.0, "2025-01-09T19:00:00Z")).unwrap();
        // Gap on the 10th, then one meal on the 11th
        Meal::create(&conn, &meal("u1", "lunch", 550.0, "2025-01-11T12:00:00Z")).unwrap();

        let totals = Meal::daily_totals(&conn, "u1", "2025-01-09", "2025-01-11").unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].date, "2025-01-09");
        assert_eq!(totals[0].total_calories, 1200.0);
        assert_eq!(totals[1].date, "2025-01-11");
        assert_eq!(totals[1].total_calories, 550.0);
    }

    #[test]
    fn test_daily_totals_coalesces_missing_macros() {
        let (db, _dir) = test_db();
        let conn = db.get_conn().unwrap();

        let mut with_macros = meal("u1", "lunch", 600.0, "2025-01-09T12:00:00Z");
        with_macros.protein = Some(35.0);
        with_macros.fat = Some(20.0);
        Meal::create(&conn, &with_macros).unwrap();
        Meal::create(&conn, &meal("u1", "snack", 200.0, "2025-01-09T16:00:00Z")).unwrap();

        let totals = Meal::daily_totals(&conn, "u1", "2025-01-09", "2025-01-09").unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total_calories, 800.0);
        assert_eq!(totals[0].total_protein, 35.0);
        assert_eq!(totals[0].total_carbs, 0.0);
        assert_eq!(totals[0].total_fat, 20.0);
    }

    #[test]
    fn test_delete_is_scoped_per_user() {
        let (db, _dir) = test_db();
        let conn = db.get_conn().unwrap();

        let created =
            Meal::create(&conn, &meal("u1", "lunch", 600.0, "2025-01-09T12:00:00Z")).unwrap();

        // A different user cannot delete it
        assert!(!Meal::delete(&conn, "u2", created.id).unwrap());
        assert!(Meal::get_by_id(&conn, "u1", created.id).unwrap().is_some());

        assert!(Meal::delete(&conn, "u1", created.id).unwrap());
        assert!(Meal::get_by_id(&conn, "u1", created.id).unwrap().is_none());
    }
}
