//! Alerting System
//!
//! Fire-and-forget voice alerts: callers enqueue a message without blocking
//! and a single notifier task speaks them one at a time.

mod notifier;
mod speaker;

pub use notifier::{AlertConfig, AlertNotifier};
pub use speaker::{speaker_from_config, CommandSpeaker, LogSpeaker, Speaker};

use thiserror::Error;

/// Alerting errors. These never reach frame-processing callers.
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Voice engine unavailable: {0}")]
    Unavailable(String),
    #[error("Voice engine failed: {0}")]
    Speaker(String),
}
