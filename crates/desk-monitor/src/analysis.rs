//! Desk analysis results and alerts

use crate::blink::BlinkReading;
use crate::posture::PostureReading;
use crate::state::PostureStatus;
use camera_capture::overlay::colors;
use camera_capture::{Annotation, Severity};
use serde::{Deserialize, Serialize};

/// Desk monitor alert types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeskAlert {
    /// Eyes closed past the drowsy threshold
    Drowsy,

    /// Blink rate stayed low for too long
    LowBlinkRate,

    /// Continuous bad posture past the alert threshold
    BadPosture,
}

impl DeskAlert {
    /// Spoken alert text
    pub fn message(&self) -> &'static str {
        match self {
            DeskAlert::Drowsy => "You look drowsy",
            DeskAlert::LowBlinkRate => "Remember to blink",
            DeskAlert::BadPosture => "Bad posture detected",
        }
    }
}

/// Complete weekday analysis for one frame
#[derive(Debug, Clone, Serialize)]
pub struct DeskAnalysis {
    pub face_detected: bool,
    pub body_detected: bool,

    /// Blink tracker output (face frames only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blink: Option<BlinkReading>,

    pub posture: PostureReading,

    /// Alerts raised on this frame
    pub alerts: Vec<DeskAlert>,
}

impl DeskAnalysis {
    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    pub fn is_drowsy(&self) -> bool {
        self.blink.as_ref().is_some_and(BlinkReading::is_drowsy)
    }

    /// Headline status. Bad posture outranks drowsiness.
    pub fn status_label(&self) -> &'static str {
        if self.posture.status.is_bad() {
            self.posture.status.label()
        } else if self.is_drowsy() {
            "DROWSY"
        } else {
            PostureStatus::Good.label()
        }
    }

    pub fn severity(&self) -> Severity {
        if self.posture.status.is_bad() {
            self.posture.status.severity()
        } else if self.is_drowsy() {
            Severity::Critical
        } else {
            Severity::Low
        }
    }

    /// Overlay annotations for a frame `frame_height` pixels tall
    pub fn annotations(&self, frame_height: u32) -> Vec<Annotation> {
        let mut out = Vec::new();

        if let Some(blink) = &self.blink {
            out.push(Annotation::new(
                format!("Blinks: {}", blink.blink_count),
                (30, 80),
                Severity::Info,
                colors::GREEN,
            ));
            out.push(Annotation::new(
                format!("Blink Rate: {}/min", blink.blink_rate),
                (30, 110),
                Severity::Info,
                colors::CYAN,
            ));
        }

        let status_color = if self.posture.status.is_bad() {
            self.posture.status.color()
        } else if self.is_drowsy() {
            colors::RED
        } else {
            colors::GREEN
        };
        out.push(Annotation::new(
            self.status_label(),
            (30, 150),
            self.severity(),
            status_color,
        ));

        if self.posture.status == PostureStatus::Calibrating {
            out.push(Annotation::new(
                PostureStatus::Calibrating.label(),
                (30, 200),
                Severity::Info,
                PostureStatus::Calibrating.color(),
            ));
        }

        if let Some(secs) = self.posture.elapsed_bad_secs {
            out.push(Annotation::new(
                format!("Bad posture: {}s", secs),
                (30, 300),
                self.posture.status.severity(),
                colors::RED,
            ));
        }

        out.push(Annotation::new(
            "WEEKDAY MODE",
            (30, frame_height as i32 - 20),
            Severity::Info,
            colors::WHITE,
        ));
        out
    }
}
