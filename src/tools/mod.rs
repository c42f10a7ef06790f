//! CalTrack tools module
//!
//! MCP tool implementations for calorie and weight tracking.

pub mod meals;
pub mod settings;
pub mod status;
pub mod summary;
pub mod weights;
