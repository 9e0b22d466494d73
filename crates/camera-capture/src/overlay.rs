//! Overlay annotations attached to a rendered frame

use serde::{Deserialize, Serialize};

/// Annotation severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// RGB color
pub type Rgb = [u8; 3];

/// A line of overlay text anchored at a pixel position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    /// Baseline-left anchor in pixels
    pub anchor: (i32, i32),
    pub severity: Severity,
    pub color: Rgb,
}

impl Annotation {
    pub fn new(text: impl Into<String>, anchor: (i32, i32), severity: Severity, color: Rgb) -> Self {
        Self {
            text: text.into(),
            anchor,
            severity,
            color,
        }
    }
}

/// Named colors used by the overlays
pub mod colors {
    use super::Rgb;

    pub const GREEN: Rgb = [0, 255, 0];
    pub const RED: Rgb = [255, 0, 0];
    pub const BLUE: Rgb = [0, 0, 255];
    pub const MAGENTA: Rgb = [255, 0, 255];
    pub const PURPLE: Rgb = [128, 0, 128];
    pub const CYAN: Rgb = [0, 255, 255];
    pub const YELLOW: Rgb = [255, 255, 0];
    pub const WHITE: Rgb = [255, 255, 255];
}
