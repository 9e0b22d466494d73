//! Desk monitor configuration

use crate::DeskError;
use serde::{Deserialize, Serialize};

/// Blink and drowsiness thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    /// Smoothed EAR below this counts as eyes closed
    pub ear_threshold: f32,

    /// Frames averaged into the smoothed EAR
    pub smoothing_window: usize,

    /// Closed frames required before reopening counts as a blink
    pub min_closed_frames: u32,

    /// Continuous eye closure before the drowsy state (milliseconds)
    pub drowsy_threshold_ms: u64,

    /// Trailing window for the blink rate (milliseconds)
    pub rate_window_ms: u64,

    /// Blinks per window below which the rate counts as low
    pub low_blink_rate: usize,

    /// Continuous low blink rate before alerting (milliseconds)
    pub low_blink_alert_ms: u64,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.23,
            smoothing_window: 5,
            min_closed_frames: 3,
            drowsy_threshold_ms: 10_000,
            rate_window_ms: 60_000,
            low_blink_rate: 15,
            low_blink_alert_ms: 120_000,
        }
    }
}

/// Posture calibration and classification thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    /// Calibration window from tracker creation (milliseconds)
    pub calibration_ms: u64,

    /// Eye distance below baseline times this factor means too close
    pub too_close_factor: f32,

    /// Head tilt strictly between these angles (degrees) is a tilt;
    /// readings near 0 or 180 are camera roll
    pub tilt_min_degrees: f32,
    pub tilt_max_degrees: f32,

    /// Shoulder midpoint drop over baseline for slouching (pixels)
    pub slouch_margin_px: f32,

    /// Shoulder height difference over baseline (pixels)
    pub shoulder_tilt_margin_px: f32,

    /// Nose-to-shoulder offset over baseline for forward head (pixels)
    pub forward_head_margin_px: f32,

    /// Continuous bad posture before alerting (milliseconds)
    pub bad_posture_alert_ms: u64,
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            calibration_ms: 3_000,
            too_close_factor: 0.65,
            tilt_min_degrees: 10.0,
            tilt_max_degrees: 170.0,
            slouch_margin_px: 20.0,
            shoulder_tilt_margin_px: 25.0,
            forward_head_margin_px: 20.0,
            bad_posture_alert_ms: 120_000,
        }
    }
}

/// Desk monitor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    pub blink: BlinkConfig,
    pub posture: PostureConfig,
}

/// Named threshold sets selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeskPreset {
    #[default]
    Standard,
    Strict,
    Lenient,
}

impl DeskPreset {
    pub fn config(&self) -> DeskConfig {
        match self {
            DeskPreset::Standard => DeskConfig::default(),
            DeskPreset::Strict => DeskConfig::strict(),
            DeskPreset::Lenient => DeskConfig::lenient(),
        }
    }
}

impl DeskConfig {
    /// Create strict config (earlier alerts, tighter margins)
    pub fn strict() -> Self {
        Self {
            blink: BlinkConfig {
                drowsy_threshold_ms: 5_000,
                low_blink_alert_ms: 60_000,
                ..Default::default()
            },
            posture: PostureConfig {
                too_close_factor: 0.75,
                slouch_margin_px: 12.0,
                shoulder_tilt_margin_px: 15.0,
                forward_head_margin_px: 12.0,
                bad_posture_alert_ms: 60_000,
                ..Default::default()
            },
        }
    }

    /// Create lenient config (later alerts, wider margins)
    pub fn lenient() -> Self {
        Self {
            blink: BlinkConfig {
                drowsy_threshold_ms: 15_000,
                low_blink_alert_ms: 300_000,
                ..Default::default()
            },
            posture: PostureConfig {
                too_close_factor: 0.55,
                slouch_margin_px: 30.0,
                shoulder_tilt_margin_px: 35.0,
                forward_head_margin_px: 30.0,
                bad_posture_alert_ms: 300_000,
                ..Default::default()
            },
        }
    }

    /// Reject configurations the trackers cannot run with
    pub fn validate(&self) -> Result<(), DeskError> {
        let ear_threshold = self.blink.ear_threshold;
        if ear_threshold.is_nan() || ear_threshold <= 0.0 {
            return Err(DeskError::Config("ear_threshold must be positive".into()));
        }
        if self.blink.smoothing_window == 0 {
            return Err(DeskError::Config("smoothing_window must be at least 1".into()));
        }
        if self.blink.rate_window_ms == 0 {
            return Err(DeskError::Config("rate_window_ms must be positive".into()));
        }
        let posture = &self.posture;
        let factor = posture.too_close_factor;
        if factor.is_nan() || factor <= 0.0 || factor >= 1.0 {
            return Err(DeskError::Config("too_close_factor must be within (0, 1)".into()));
        }
        if posture.tilt_min_degrees >= posture.tilt_max_degrees {
            return Err(DeskError::Config(format!(
                "tilt range [{}, {}] is empty",
                posture.tilt_min_degrees, posture.tilt_max_degrees
            )));
        }
        Ok(())
    }
}
