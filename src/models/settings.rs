//! User settings model
//!
//! One row per user, created lazily the first time a user is seen. The
//! timezone label is advisory text only; no timezone conversion happens
//! anywhere in CalTrack.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Default metabolic rate for a user we have never seen (calories/day)
pub const DEFAULT_METABOLIC_RATE: i64 = 2000;

/// Default timezone label
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Per-user settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: String,
    pub timezone: String,
    pub metabolic_rate: i64, // calories/day, deficit baseline
    pub created_at: String,
    pub updated_at: String,
}

/// Data for updating settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSettingsUpdate {
    pub timezone: Option<String>,
    pub metabolic_rate: Option<i64>,
}

impl UserSettings {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get("user_id")?,
            timezone: row.get("timezone")?,
            metabolic_rate: row.get("metabolic_rate")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get settings for a user, creating defaults on first use
    ///
    /// INSERT OR IGNORE against the primary key keeps lazy creation atomic
    /// under concurrent first reads for the same user.
    pub fn get_or_create(conn: &Connection, user_id: &str) -> DbResult<Self> {
        conn.execute(
            "INSERT OR IGNORE INTO user_settings (user_id) VALUES (?1)",
            params![user_id],
        )?;

        let mut stmt = conn.prepare("SELECT * FROM user_settings WHERE user_id = ?1")?;
        Ok(stmt.query_row(params![user_id], Self::from_row)?)
    }

    /// Update settings, lazily creating the row first if needed
    pub fn update(conn: &Connection, user_id: &str, data: &UserSettingsUpdate) -> DbResult<Self> {
        Self::get_or_create(conn, user_id)?;

        if let Some(ref timezone) = data.timezone {
            conn.execute(
                "UPDATE user_settings SET timezone = ?1, updated_at = datetime('now') WHERE user_id = ?2",
                params![timezone, user_id],
            )?;
        }

        if let Some(rate) = data.metabolic_rate {
            conn.execute(
                "UPDATE user_settings SET metabolic_rate = ?1, updated_at = datetime('now') WHERE user_id = ?2",
                params![rate, user_id],
            )?;
        }

        Self::get_or_create(conn, user_id)
    }
}
