//! Yoga mode configuration

use crate::YogaError;
use serde::{Deserialize, Serialize};

/// Pose lock configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YogaConfig {
    /// Repeats of the same label (after the first sighting) needed to lock
    pub stability_frames: u32,

    /// Seconds a locked pose is held before the lock releases
    pub hold_seconds: u64,
}

impl Default for YogaConfig {
    fn default() -> Self {
        Self {
            stability_frames: 5,
            hold_seconds: 5,
        }
    }
}

impl YogaConfig {
    pub fn validate(&self) -> Result<(), YogaError> {
        if self.hold_seconds == 0 {
            return Err(YogaError::Config("hold_seconds must be at least 1".into()));
        }
        Ok(())
    }
}
