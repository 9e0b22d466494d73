//! Eye and posture state

use camera_capture::overlay::{colors, Rgb};
use camera_capture::Severity;
use serde::{Deserialize, Serialize};

/// Eye closure state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EyeState {
    /// Eyes open
    #[default]
    Awake,
    /// Eyes closed, drowsy timer running
    Closing,
    /// Eyes closed longer than the drowsy threshold
    Drowsy,
}

/// Posture judgement for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostureStatus {
    /// Face or body missing this frame
    Undetected,
    /// Collecting baseline samples
    Calibrating,
    /// Calibration window ended without samples; posture is never judged
    Uncalibrated,
    Good,
    TooClose,
    HeadTilted,
    Slouched,
    ShouldersTilted,
    ForwardHead,
}

impl PostureStatus {
    /// Whether this status counts toward bad-posture time
    pub fn is_bad(&self) -> bool {
        matches!(
            self,
            PostureStatus::TooClose
                | PostureStatus::HeadTilted
                | PostureStatus::Slouched
                | PostureStatus::ShouldersTilted
                | PostureStatus::ForwardHead
        )
    }

    /// Overlay label
    pub fn label(&self) -> &'static str {
        match self {
            PostureStatus::TooClose => "TOO CLOSE",
            PostureStatus::HeadTilted => "HEAD TILTED",
            PostureStatus::Slouched => "SLOUCHED",
            PostureStatus::ShouldersTilted => "SHOULDERS TILTED",
            PostureStatus::ForwardHead => "FORWARD HEAD",
            PostureStatus::Calibrating => "CALIBRATING...",
            PostureStatus::Undetected
            | PostureStatus::Uncalibrated
            | PostureStatus::Good => "GOOD POSTURE",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            PostureStatus::TooClose | PostureStatus::ForwardHead => colors::RED,
            PostureStatus::HeadTilted => colors::MAGENTA,
            PostureStatus::Slouched => colors::PURPLE,
            PostureStatus::ShouldersTilted => colors::BLUE,
            PostureStatus::Calibrating => colors::YELLOW,
            PostureStatus::Undetected
            | PostureStatus::Uncalibrated
            | PostureStatus::Good => colors::GREEN,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            PostureStatus::TooClose | PostureStatus::ForwardHead => Severity::High,
            PostureStatus::HeadTilted
            | PostureStatus::Slouched
            | PostureStatus::ShouldersTilted => Severity::Medium,
            PostureStatus::Calibrating => Severity::Info,
            PostureStatus::Undetected
            | PostureStatus::Uncalibrated
            | PostureStatus::Good => Severity::Low,
        }
    }
}
