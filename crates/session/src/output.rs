//! Per-frame render output

use crate::config::Mode;
use camera_capture::{Annotation, Severity};
use desk_monitor::DeskAnalysis;
use serde::Serialize;
use yoga::YogaAnalysis;

/// Mode-specific analysis behind a frame output
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameDetail {
    Weekday(DeskAnalysis),
    Weekend(YogaAnalysis),
    /// Detection failed; the frame was passed through untouched
    PassThrough,
}

/// What the controller produces for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameOutput {
    pub mode: Mode,
    pub sequence: u32,
    pub status: String,
    pub severity: Severity,
    /// Overlay text in drawing order
    pub annotations: Vec<Annotation>,
    /// Spoken alert messages raised on this frame
    pub alerts: Vec<String>,
    /// Mirrored frame, encoded
    #[serde(skip)]
    pub image: Option<Vec<u8>>,
    pub detail: FrameDetail,
}

impl FrameOutput {
    pub fn is_pass_through(&self) -> bool {
        matches!(self.detail, FrameDetail::PassThrough)
    }
}
