//! Weight tracking MCP tools
//!
//! Tools for recording (upserting), listing, and deleting weight entries.

use serde::Serialize;

use crate::analytics::calendar::parse_date_label;
use crate::db::Database;
use crate::models::Weight;

use super::meals::validate_range;

/// Response for add_weight
#[derive(Debug, Serialize)]
pub struct AddWeightResponse {
    pub id: i64,
    pub user_id: String,
    pub date: String,
    pub weight_kg: f64,
    /// true when an earlier entry for the same date was overwritten
    pub replaced: bool,
}

/// Response for list_weights
#[derive(Debug, Serialize)]
pub struct ListWeightsResponse {
    pub weights: Vec<Weight>,
    pub count: usize,
    pub start_date: String,
    pub end_date: String,
}

/// Record a weight for a calendar date (upsert: a second write for the same
/// date overwrites the first)
pub fn add_weight(
    db: &Database,
    user_id: &str,
    date: &str,
    weight_kg: f64,
) -> Result<AddWeightResponse, String> {
    if user_id.trim().is_empty() {
        return Err("user_id must not be empty".to_string());
    }
    if weight_kg < 0.0 {
        return Err("Weight must be >= 0 kg".to_string());
    }
    parse_date_label(date).map_err(|e| e.to_string())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let (weight, replaced) = Weight::upsert(&conn, user_id, date, weight_kg)
        .map_err(|e| format!("Failed to record weight: {}", e))?;

    if replaced {
        tracing::info!(date, "replaced existing weight entry");
    }

    Ok(AddWeightResponse {
        id: weight.id,
        user_id: weight.user_id,
        date: weight.date,
        weight_kg: weight.weight_kg,
        replaced,
    })
}

/// List weights in [start_date, end_date], ascending
pub fn list_weights(
    db: &Database,
    user_id: &str,
    start_date: &str,
    end_date: &str,
) -> Result<ListWeightsResponse, String> {
    validate_range(start_date, end_date)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let weights = Weight::list_range(&conn, user_id, start_date, end_date)
        .map_err(|e| format!("Failed to list weights: {}", e))?;

    Ok(ListWeightsResponse {
        count: weights.len(),
        weights,
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
    })
}

/// Delete the weight entry for a date
pub fn delete_weight(db: &Database, user_id: &str, date: &str) -> Result<bool, String> {
    parse_date_label(date).map_err(|e| e.to_string())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Weight::delete(&conn, user_id, date)
        .map_err(|e| format!("Failed to delete weight: {}", e))
}
