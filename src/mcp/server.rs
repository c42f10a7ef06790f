//! CalTrack MCP Server Implementation
//!
//! Implements the MCP server with all CalTrack tools. Every tool takes a
//! resolved `user_id`; the service holds no per-user state of its own, so
//! concurrent calls for different users need no coordination here.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::tools::meals;
use crate::tools::settings;
use crate::tools::status::StatusTracker;
use crate::tools::summary;
use crate::tools::weights;

/// CalTrack MCP Service
#[derive(Clone)]
pub struct CalTrackService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<CalTrackService>,
}

impl CalTrackService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Meal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddMealParams {
    /// User identifier
    pub user_id: String,
    /// What was eaten (non-empty)
    pub name: String,
    /// Total calories for the meal (>= 0)
    pub calories: f64,
    /// Protein in grams (optional)
    pub protein: Option<f64>,
    /// Carbohydrates in grams (optional)
    pub carbs: Option<f64>,
    /// Fat in grams (optional)
    pub fat: Option<f64>,
    /// UTC timestamp like "2025-01-09T12:30:00Z" (defaults to now)
    pub logged_at: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMealsParams {
    /// User identifier
    pub user_id: String,
    /// Start date (inclusive), ISO format: YYYY-MM-DD
    pub start_date: String,
    /// End date (inclusive), ISO format: YYYY-MM-DD
    pub end_date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteMealParams {
    /// User identifier
    pub user_id: String,
    /// Meal ID to delete
    pub id: i64,
}

// ============================================================================
// Weight Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddWeightParams {
    /// User identifier
    pub user_id: String,
    /// Calendar date, ISO format: YYYY-MM-DD
    pub date: String,
    /// Weight in kilograms (>= 0)
    pub weight_kg: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListWeightsParams {
    /// User identifier
    pub user_id: String,
    /// Start date (inclusive), ISO format: YYYY-MM-DD
    pub start_date: String,
    /// End date (inclusive), ISO format: YYYY-MM-DD
    pub end_date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteWeightParams {
    /// User identifier
    pub user_id: String,
    /// Calendar date, ISO format: YYYY-MM-DD
    pub date: String,
}

// ============================================================================
// Settings Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetSettingsParams {
    /// User identifier
    pub user_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateSettingsParams {
    /// User identifier
    pub user_id: String,
    /// New metabolic rate in calories/day (positive)
    pub metabolic_rate: Option<i64>,
    /// New timezone label (advisory only, e.g. "Europe/Ljubljana")
    pub timezone: Option<String>,
}

// ============================================================================
// Summary / Estimation Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetSummaryParams {
    /// User identifier
    pub user_id: String,
    /// Start date (inclusive), ISO format: YYYY-MM-DD
    pub start_date: String,
    /// End date (inclusive), ISO format: YYYY-MM-DD
    pub end_date: String,
    /// Moving-average window in days (default 3)
    #[serde(default = "default_ma_window")]
    pub weight_moving_avg_days: u32,
}

fn default_ma_window() -> u32 { crate::analytics::DEFAULT_MOVING_AVG_WINDOW }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateMetabolicRateParams {
    /// User identifier
    pub user_id: String,
    /// First day of the 7-day analysis window, ISO format: YYYY-MM-DD
    pub start_date: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl CalTrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the CalTrack service including build info, database status, and process information")]
    async fn caltrack_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for tracking calories and weight. Call this when starting a new tracking session or when unsure how to use the tools.")]
    fn tracking_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::TRACKING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(TRACKING_INSTRUCTIONS)]))
    }

    // --- Meals ---

    #[tool(description = "Log a meal for a user: name, calories, optional macros in grams, optional UTC timestamp (defaults to now)")]
    fn add_meal(&self, Parameters(p): Parameters<AddMealParams>) -> Result<CallToolResult, McpError> {
        let result = meals::add_meal(
            &self.database, &p.user_id, &p.name, p.calories,
            p.protein, p.carbs, p.fat, p.logged_at,
        ).map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List a user's meals whose logged date falls within an inclusive date range, ascending by time")]
    fn list_meals(&self, Parameters(p): Parameters<ListMealsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_meals(&self.database, &p.user_id, &p.start_date, &p.end_date)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Delete one of a user's meals by ID")]
    fn delete_meal(&self, Parameters(p): Parameters<DeleteMealParams>) -> Result<CallToolResult, McpError> {
        let deleted = meals::delete_meal(&self.database, &p.user_id, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::json!({"success": deleted, "id": p.id}).to_string();
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Weights ---

    #[tool(description = "Record a user's weight for a calendar date. At most one weight per date: a second write for the same date replaces the first.")]
    fn add_weight(&self, Parameters(p): Parameters<AddWeightParams>) -> Result<CallToolResult, McpError> {
        let result = weights::add_weight(&self.database, &p.user_id, &p.date, p.weight_kg)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List a user's weight entries within an inclusive date range, ascending by date")]
    fn list_weights(&self, Parameters(p): Parameters<ListWeightsParams>) -> Result<CallToolResult, McpError> {
        let result = weights::list_weights(&self.database, &p.user_id, &p.start_date, &p.end_date)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Delete a user's weight entry for a calendar date")]
    fn delete_weight(&self, Parameters(p): Parameters<DeleteWeightParams>) -> Result<CallToolResult, McpError> {
        let deleted = weights::delete_weight(&self.database, &p.user_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::json!({"success": deleted, "date": p.date}).to_string();
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Settings ---

    #[tool(description = "Get a user's settings (metabolic rate, timezone). Creates defaults (2000 cal/day, UTC) on first use.")]
    fn get_settings(&self, Parameters(p): Parameters<GetSettingsParams>) -> Result<CallToolResult, McpError> {
        let result = settings::get_settings(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Update a user's metabolic rate (calories/day) and/or timezone label")]
    fn update_settings(&self, Parameters(p): Parameters<UpdateSettingsParams>) -> Result<CallToolResult, McpError> {
        let result = settings::update_settings(&self.database, &p.user_id, p.metabolic_rate, p.timezone)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Analytics ---

    #[tool(description = "Get a daily summary over an inclusive date range: per-day calorie/macro totals, deficit vs metabolic rate, same-day weight, and moving-average weight. Only days with meals appear.")]
    fn get_summary(&self, Parameters(p): Parameters<GetSummaryParams>) -> Result<CallToolResult, McpError> {
        let result = summary::get_summary(&self.database, &p.user_id, &p.start_date, &p.end_date, p.weight_moving_avg_days)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Estimate a user's daily metabolic rate from the 7-day window starting at start_date, comparing logged intake against the 3-day-average weight change. Requires at least one day with meal data in the window.")]
    fn calculate_metabolic_rate(&self, Parameters(p): Parameters<CalculateMetabolicRateParams>) -> Result<CallToolResult, McpError> {
        let result = summary::calculate_metabolic_rate(&self.database, &p.user_id, &p.start_date)
            .map_err(|e| McpError::invalid_params(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for CalTrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "caltrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("CalTrack".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "CalTrack - per-user calorie and weight tracking with analytics. \
                 Every tool takes a user_id; pass the same identifier for the same person. \
                 IMPORTANT: Call tracking_instructions when starting a tracking session. \
                 Meals: add_meal/list_meals/delete_meal (full UTC timestamps, several per day). \
                 Weight: add_weight/list_weights/delete_weight (one per calendar date, upsert). \
                 Settings: get_settings/update_settings (metabolic rate defaults to 2000 cal/day). \
                 Analytics: get_summary (daily totals, deficit, moving-average weight over a date range), \
                 calculate_metabolic_rate (7-day intake vs weight-trend estimate)."
                    .into(),
            ),
        }
    }
}
