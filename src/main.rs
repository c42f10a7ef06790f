//! CalTrack
//!
//! An MCP server for personal calorie and weight tracking.

use std::path::PathBuf;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

mod analytics;
mod build_info;
mod db;
mod mcp;
mod models;
mod tools;

use mcp::CalTrackService;

/// Resolve the database path: CALTRACK_DATABASE_PATH wins, otherwise
/// data/caltrack.db next to the project root (walking up out of target/)
fn resolve_database_path() -> PathBuf {
    if let Ok(p) = std::env::var("CALTRACK_DATABASE_PATH") {
        return PathBuf::from(p);
    }

    let mut root = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if root.ends_with("release") || root.ends_with("debug") {
        if let Some(target) = root.parent() {
            if let Some(project) = target.parent() {
                root = project.to_path_buf();
            }
        }
    }

    root.join("data").join("caltrack.db")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log to stderr; stdout carries the MCP framing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("caltrack=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let db_path = resolve_database_path();
    tracing::info!(path = %db_path.display(), "opening database");

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = db::Database::new(&db_path)?;
    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        tracing::info!(version, "database schema ready");
        Ok(())
    })?;

    let service = CalTrackService::new(db_path, database);

    tracing::info!("serving MCP over stdio");
    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
