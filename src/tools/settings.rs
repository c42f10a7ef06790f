//! User settings MCP tools
//!
//! Settings rows are created lazily with defaults the first time a user is
//! seen; these tools read and explicitly update them.

use serde::Serialize;

use crate::db::Database;
use crate::models::{UserSettings, UserSettingsUpdate};

/// Response for get_settings / update_settings
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub user_id: String,
    pub timezone: String,
    pub metabolic_rate: i64,
    pub updated_at: String,
}

impl From<UserSettings> for SettingsResponse {
    fn from(s: UserSettings) -> Self {
        Self {
            user_id: s.user_id,
            timezone: s.timezone,
            metabolic_rate: s.metabolic_rate,
            updated_at: s.updated_at,
        }
    }
}

/// Get settings for a user, creating defaults on first use
pub fn get_settings(db: &Database, user_id: &str) -> Result<SettingsResponse, String> {
    if user_id.trim().is_empty() {
        return Err("user_id must not be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let settings = UserSettings::get_or_create(&conn, user_id)
        .map_err(|e| format!("Failed to get settings: {}", e))?;

    Ok(settings.into())
}

/// Update a user's metabolic rate and/or timezone label
pub fn update_settings(
    db: &Database,
    user_id: &str,
    metabolic_rate: Option<i64>,
    timezone: Option<String>,
) -> Result<SettingsResponse, String> {
    if user_id.trim().is_empty() {
        return Err("user_id must not be empty".to_string());
    }
    if let Some(rate) = metabolic_rate {
        if rate <= 0 {
            return Err("Metabolic rate must be a positive number of calories/day".to_string());
        }
    }
    if let Some(ref tz) = timezone {
        if tz.trim().is_empty() {
            return Err("Timezone must not be empty".to_string());
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let settings = UserSettings::update(
        &conn,
        user_id,
        &UserSettingsUpdate {
            timezone,
            metabolic_rate,
        },
    )
    .map_err(|e| format!("Failed to update settings: {}", e))?;

    Ok(settings.into())
}
