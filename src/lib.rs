//! CalTrack Library
//!
//! Core functionality for personal calorie and weight tracking.

pub mod analytics;
pub mod build_info;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
