//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Get current version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Run migrations
    if current_version < 1 {
        tracing::info!("Applying schema migration v1");
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- MEALS
        -- One logged food intake event per row.
        -- logged_at is a full UTC instant (multiple meals per day
        -- are distinguished by time).
        -- ============================================
        CREATE TABLE meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            calories REAL NOT NULL CHECK(calories >= 0),

            -- Optional macros, grams (NULL = not recorded, not zero)
            protein REAL CHECK(protein IS NULL OR protein >= 0),
            carbs REAL CHECK(carbs IS NULL OR carbs >= 0),
            fat REAL CHECK(fat IS NULL OR fat >= 0),

            logged_at TEXT NOT NULL,             -- UTC instant: "2025-01-09T12:30:00Z"

            -- Metadata
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meals_user_logged ON meals(user_id, logged_at);

        -- ============================================
        -- WEIGHTS
        -- One weight observation per (user, calendar date).
        -- Coarser than meals on purpose: date, not instant.
        -- ============================================
        CREATE TABLE weights (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            date TEXT NOT NULL,                  -- ISO date: "2025-01-09"
            weight_kg REAL NOT NULL CHECK(weight_kg >= 0),

            -- Metadata
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),

            -- At most one weight per user per calendar date; writes upsert
            UNIQUE(user_id, date)
        );

        CREATE INDEX idx_weights_user_date ON weights(user_id, date);

        -- ============================================
        -- USER SETTINGS
        -- One row per user, created lazily on first use.
        -- ============================================
        CREATE TABLE user_settings (
            user_id TEXT PRIMARY KEY,
            timezone TEXT NOT NULL DEFAULT 'UTC', -- advisory label only
            metabolic_rate INTEGER NOT NULL DEFAULT 2000 CHECK(metabolic_rate > 0),

            -- Metadata
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
