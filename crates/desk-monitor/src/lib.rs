//! Weekday Desk Monitor
//!
//! Per-frame wellness analysis for someone working at a desk:
//! - Eye-aspect-ratio blink counting and blink rate
//! - Drowsiness detection from sustained eye closure
//! - Posture baseline calibration and classification
//! - Bad-posture timing and one-shot alerts

pub mod analysis;
pub mod blink;
pub mod config;
pub mod posture;
pub mod state;

pub use analysis::{DeskAlert, DeskAnalysis};
pub use blink::{BlinkReading, BlinkTracker};
pub use config::{BlinkConfig, DeskConfig, DeskPreset, PostureConfig};
pub use posture::{PostureBaseline, PostureMetrics, PostureReading, PostureTracker};
pub use state::{EyeState, PostureStatus};

use landmarks::{Detection, LandmarkError};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// Desk monitor error types
#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Landmarks unusable: {0}")]
    Landmarks(#[from] LandmarkError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Session totals the controller persists at end of session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionTotals {
    pub blink_count: u64,
    pub bad_posture_secs: f64,
}

/// Weekday monitoring module
pub struct DeskMonitor {
    blink: BlinkTracker,
    posture: PostureTracker,
}

impl DeskMonitor {
    /// Create a monitor; the posture calibration window starts at `started_at`
    pub fn new(config: DeskConfig, started_at: Instant) -> Result<Self, DeskError> {
        config.validate()?;
        Ok(Self {
            blink: BlinkTracker::new(config.blink),
            posture: PostureTracker::new(config.posture, started_at),
        })
    }

    /// Analyze one frame. `detection` must already be in pixel coordinates.
    ///
    /// A face or body set missing the indices a tracker needs is treated as
    /// absent for that tracker only.
    pub fn process(&mut self, detection: &Detection, now: Instant) -> DeskAnalysis {
        let blink = detection.face.as_ref().and_then(|face| {
            self.blink
                .update(face, now)
                .map_err(|e| debug!("Skipping blink update: {}", e))
                .ok()
        });

        let metrics = match (&detection.face, &detection.body) {
            (Some(face), Some(body)) => PostureMetrics::from_landmarks(face, body)
                .map_err(|e| debug!("Skipping posture update: {}", e))
                .ok(),
            _ => None,
        };
        let posture = self.posture.update(metrics.as_ref(), now);

        let mut alerts = Vec::new();
        if let Some(reading) = &blink {
            alerts.extend_from_slice(&reading.alerts);
        }
        alerts.extend_from_slice(&posture.alerts);

        DeskAnalysis {
            face_detected: detection.face.is_some(),
            body_detected: detection.body.is_some(),
            blink,
            posture,
            alerts,
        }
    }

    /// Zero session blink count and bad-posture time.
    /// Baseline and lifetime blink count survive.
    pub fn reset_session(&mut self) {
        self.blink.reset_session();
        self.posture.reset_session();
    }

    pub fn session_totals(&self) -> SessionTotals {
        SessionTotals {
            blink_count: self.blink.session_blink_count(),
            bad_posture_secs: self.posture.total_bad().as_secs_f64(),
        }
    }

    pub fn blink_tracker(&self) -> &BlinkTracker {
        &self.blink
    }

    pub fn posture_tracker(&self) -> &PostureTracker {
        &self.posture
    }
}
