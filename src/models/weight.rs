//! Weight record model
//!
//! One weight observation per (user, calendar date). Writes are upserts:
//! a second write for the same date replaces the first, it never creates a
//! duplicate. The aggregation layer relies on this so that a date->weight
//! mapping is a proper function.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A weight observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weight {
    pub id: i64,
    pub user_id: String,
    pub date: String, // ISO date: "2025-01-09"
    pub weight_kg: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl Weight {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            weight_kg: row.get("weight_kg")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert or replace the weight for (user, date)
    ///
    /// The upsert runs as a single statement against the UNIQUE(user_id, date)
    /// constraint, so concurrent identical writes serialize inside SQLite.
    /// Returns the stored row and whether an earlier value was replaced (the
    /// flag comes from a pre-check and is informational only).
    pub fn upsert(
        conn: &Connection,
        user_id: &str,
        date: &str,
        weight_kg: f64,
    ) -> DbResult<(Self, bool)> {
        let existed = Self::get_by_date(conn, user_id, date)?.is_some();

        conn.execute(
            r#"
            INSERT INTO weights (user_id, date, weight_kg)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id, date) DO UPDATE SET
                weight_kg = excluded.weight_kg,
                updated_at = datetime('now')
            "#,
            params![user_id, date, weight_kg],
        )?;

        let weight = Self::get_by_date(conn, user_id, date)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })?;

        Ok((weight, existed))
    }

    /// Get the weight for (user, date)
    pub fn get_by_date(conn: &Connection, user_id: &str, date: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM weights WHERE user_id = ?1 AND date = ?2")?;

        let result = stmt.query_row(params![user_id, date], Self::from_row);
        match result {
            Ok(weight) => Ok(Some(weight)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List weights in [start_date, end_date], ascending by date
    pub fn list_range(
        conn: &Connection,
        user_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM weights
            WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
            ORDER BY date ASC
            "#,
        )?;

        let weights = stmt
            .query_map(params![user_id, start_date, end_date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(weights)
    }

    /// Delete the weight for (user, date)
    pub fn delete(conn: &Connection, user_id: &str, date: &str) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM weights WHERE user_id = ?1 AND date = ?2",
            params![user_id, date],
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

    #[test]
    fn test_upsert_creates_then_replaces() {
        let (db, _dir) = test_db();
        let conn = db.get_conn().unwrap();

        let (first, replaced) = Weight::upsert(&conn, "u1", "2025-01-09", 75.0).unwrap();
        assert!(!replaced);
        assert_eq!(first.weight_kg, 75.0);

        let (second, replaced) = Weight::upsert(&conn, "u1", "2025-01-09", 74.6).unwrap();
        assert!(replaced);
        assert_eq!(second.weight_kg, 74.6);

        // Exactly one row remains for (user, date), later value wins
        let rows = Weight::list_range(&conn, "u1", "2025-01-09", "2025-01-09").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].weight_kg, 74.6);
    }

    #[test]
    fn test_upsert_is_scoped_per_user() {
        let (db, _dir) = test_db();
        let conn = db.get_conn().unwrap();

        Weight::upsert(&conn, "u1", "2025-01-09", 75.0).unwrap();
        Weight::upsert(&conn, "u2", "2025-01-09", 90.0).unwrap();

        let u1 = Weight::get_by_date(&conn, "u1", "2025-01-09").unwrap().unwrap();
        let u2 = Weight::get_by_date(&conn, "u2", "2025-01-09").unwrap().unwrap();
        assert_eq!(u1.weight_kg, 75.0);
        assert_eq!(u2.weight_kg, 90.0);
    }

    #[test]
    fn test_list_range_is_ascending() {
        let (db, _dir) = test_db();
        let conn = db.get_conn().unwrap();

        Weight::upsert(&conn, "u1", "2025-01-11", 74.8).unwrap();
        Weight::upsert(&conn, "u1", "2025-01-09", 75.2).unwrap();
        Weight::upsert(&conn, "u1", "2025-01-10", 75.0).unwrap();

        let rows = Weight::list_range(&conn, "u1", "2025-01-01", "2025-01-31").unwrap();
        let dates: Vec<&str> = rows.iter().map(|w| w.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-01-09", "2025-01-10", "2025-01-11"]);
    }
}
