//! MCP server module
//!
//! Exposes the CalTrack tools over the Model Context Protocol.

mod server;

pub use server::CalTrackService;
