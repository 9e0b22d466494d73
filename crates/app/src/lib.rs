//! Wellness Monitor Application
//!
//! Wires the monitoring crates together for the command-line binary:
//! - Layered configuration (TOML file plus `WELLNESS__*` environment)
//! - Logging initialization
//! - Landmark trace replay through the session controller

pub mod replay;

use alerting::{speaker_from_config, AlertConfig, AlertNotifier};
use anyhow::{Context, Result};
use desk_monitor::DeskPreset;
use serde::{Deserialize, Serialize};
use session::{MonitorController, Mode, SessionConfig, SessionError};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use storage::{Repository, SessionSummary};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use camera_capture::CameraError;
use replay::TraceFrame;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Max level: trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode: Mode,
    /// Landmark trace to replay; stdin when unset
    pub trace: Option<PathBuf>,
    /// Sessions kept in the repository
    pub retention: Option<usize>,
    /// Base desk thresholds; keys under `session.desk` still override it
    pub desk_preset: Option<DeskPreset>,
    pub session: SessionConfig,
    pub alerts: AlertConfig,
    pub logging: LoggingConfig,
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix("WELLNESS")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from an optional TOML file, then the environment
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }
    builder
        .add_source(env_source())
        .build()
        .and_then(resolve)
        .with_context(|| match path {
            Some(path) => format!("loading configuration from {}", path.display()),
            None => "loading configuration from environment".to_string(),
        })
}

/// Parse configuration from TOML text
pub fn parse_config(toml: &str) -> Result<AppConfig> {
    config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()
        .and_then(resolve)
        .context("parsing configuration")
}

/// Deserialize layered sources, placing the desk preset underneath them
fn resolve(layered: config::Config) -> Result<AppConfig, config::ConfigError> {
    let config: AppConfig = layered.clone().try_deserialize()?;
    let Some(preset) = config.desk_preset else {
        return Ok(config);
    };

    let base = serde_json::json!({ "session": { "desk": preset.config() } });
    config::Config::builder()
        .add_source(config::Config::try_from(&base)?)
        .add_source(layered)
        .build()?
        .try_deserialize()
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = Level::from_str(&config.level)
        .map_err(|_| anyhow::anyhow!("unknown log level {:?}", config.level))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
    .context("installing tracing subscriber")
}

/// Outcome of a replayed session
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub mode: Mode,
    pub frames: usize,
    pub pass_through_frames: usize,
    pub alerts: usize,
    pub summary: SessionSummary,
}

/// Read the configured trace from its file or stdin
pub fn load_trace(config: &AppConfig) -> Result<Vec<TraceFrame>> {
    match &config.trace {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening trace {}", path.display()))?;
            replay::read_trace(BufReader::new(file))
        }
        None => replay::read_trace(io::stdin().lock()),
    }
}

/// Replay `frames` through a controller in the configured mode and persist
/// the resulting session
pub async fn run(config: &AppConfig, frames: Vec<TraceFrame>) -> Result<RunReport> {
    let speaker = speaker_from_config(&config.alerts);
    let (notifier, notifier_task) = AlertNotifier::spawn(&config.alerts, speaker);
    let repository = Arc::new(match config.retention {
        Some(max) => Repository::with_retention(max),
        None => Repository::new(),
    });

    let controller = MonitorController::new(config.session.clone(), notifier, repository.clone())
        .context("building monitor controller")?;

    let duration_secs = replay::trace_duration_secs(&frames);
    let camera = &config.session.camera;
    let (mut source, provider) = replay::into_sources(frames, camera.width, camera.height);
    controller.activate(config.mode, Box::new(provider), Instant::now())?;

    let mut report_frames = 0;
    let mut pass_through_frames = 0;
    let mut alerts = 0;
    loop {
        match controller.pump(&mut source) {
            Ok(Some(output)) => {
                report_frames += 1;
                alerts += output.alerts.len();
                if output.is_pass_through() {
                    pass_through_frames += 1;
                }
            }
            Ok(None) => continue,
            Err(SessionError::Camera(CameraError::Exhausted)) => break,
            Err(e) => return Err(e).context("replaying trace"),
        }
    }

    let summary = controller.end_session(duration_secs)?;
    info!(
        "Replayed {} frames ({} without detection), {} alerts",
        report_frames, pass_through_frames, alerts
    );
    controller.deactivate()?;
    drop(controller);

    if let Err(e) = notifier_task.await {
        warn!("Alert notifier ended abnormally: {}", e);
    }

    Ok(RunReport {
        mode: config.mode,
        frames: report_frames,
        pass_through_frames,
        alerts,
        summary,
    })
}
