//! Session configuration

use camera_capture::overlay::colors;
use camera_capture::{Annotation, CameraConfig, Severity};
use desk_monitor::DeskConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use yoga::YogaConfig;

/// Monitoring mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Blink, drowsiness and posture at the desk
    #[default]
    Weekday,
    /// Yoga pose recognition
    Weekend,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Weekday => "weekday",
            Mode::Weekend => "weekend",
        }
    }

    /// Mode banner drawn at the bottom-left of every frame
    pub fn banner(&self, frame_height: u32) -> Annotation {
        let y = frame_height as i32 - 20;
        match self {
            Mode::Weekday => Annotation::new("WEEKDAY MODE", (30, y), Severity::Info, colors::WHITE),
            Mode::Weekend => Annotation::new("WEEKEND MODE", (20, y), Severity::Info, colors::MAGENTA),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub camera: CameraConfig,
    pub desk: DeskConfig,
    pub yoga: YogaConfig,
    /// Encode each processed frame into `FrameOutput::image`
    pub encode_frames: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            desk: DeskConfig::default(),
            yoga: YogaConfig::default(),
            encode_frames: true,
        }
    }
}
