//! Yoga analysis results

use crate::angles::JointAngles;
use crate::classifier::PoseLabel;
use crate::lock::LockPhase;
use camera_capture::overlay::colors;
use camera_capture::{Annotation, Severity};
use serde::Serialize;

/// Yoga output for one frame with a body in view
#[derive(Debug, Clone, Serialize)]
pub struct PoseReading {
    /// This frame's classification
    pub label: PoseLabel,
    pub phase: LockPhase,
    /// Pose being held, while locked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_label: Option<PoseLabel>,
    /// Consecutive repeats of the candidate label
    pub counter: u32,
    pub angles: JointAngles,
}

/// Complete weekend analysis for one frame
#[derive(Debug, Clone, Serialize)]
pub struct YogaAnalysis {
    pub body_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pose: Option<PoseReading>,
}

impl YogaAnalysis {
    /// Headline status
    pub fn status_label(&self) -> String {
        match &self.pose {
            Some(PoseReading {
                phase: LockPhase::Holding { .. },
                locked_label: Some(locked),
                ..
            }) => locked.to_string(),
            Some(reading) => reading.label.to_string(),
            None => PoseLabel::Unknown.to_string(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self.pose.as_ref().map(|p| p.phase) {
            Some(LockPhase::Holding { .. }) | Some(LockPhase::Completed) => Severity::Low,
            _ => Severity::Info,
        }
    }

    /// Overlay annotations for a frame `frame_height` pixels tall
    pub fn annotations(&self, frame_height: u32) -> Vec<Annotation> {
        let mut out = Vec::new();

        if let Some(reading) = &self.pose {
            match (reading.phase, reading.locked_label) {
                (LockPhase::Observing | LockPhase::Locked, _) => {
                    out.push(Annotation::new(
                        reading.label.name(),
                        (20, 50),
                        Severity::Info,
                        colors::GREEN,
                    ));
                }
                (LockPhase::Holding { remaining_secs }, Some(locked)) => {
                    out.push(Annotation::new(
                        format!("HOLD {}s", remaining_secs),
                        (150, 250),
                        Severity::Low,
                        colors::RED,
                    ));
                    out.push(Annotation::new(locked.name(), (140, 200), Severity::Low, colors::GREEN));
                }
                _ => {}
            }
        }

        out.push(Annotation::new(
            "WEEKEND MODE",
            (20, frame_height as i32 - 20),
            Severity::Info,
            colors::MAGENTA,
        ));
        out
    }
}
