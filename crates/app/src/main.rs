//! Wellness Monitor - Main Entry Point
//!
//! Usage: `wellness-monitor [config.toml]`

use anyhow::Result;
use app::{init_logging, load_config, load_trace, run};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;
    init_logging(&config.logging)?;

    info!("=== Wellness Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Replaying {} session", config.mode);

    let frames = load_trace(&config)?;
    let report = run(&config, frames).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
