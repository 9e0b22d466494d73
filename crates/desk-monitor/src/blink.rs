//! Blink counting and drowsiness tracking

use crate::analysis::DeskAlert;
use crate::config::BlinkConfig;
use crate::state::EyeState;
use crate::DeskError;
use landmarks::geometry::eye_aspect_ratio;
use landmarks::{face, LandmarkSet};
use ring_buffer::{RollingBuffer, TimeWindow};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Blink tracker output for one face frame
#[derive(Debug, Clone, Serialize)]
pub struct BlinkReading {
    /// EAR averaged over the smoothing window
    pub smoothed_ear: f32,
    /// Blinks since the tracker was created
    pub blink_count: u64,
    /// Blinks since the last session reset
    pub session_blink_count: u64,
    /// Blinks within the trailing rate window
    pub blink_rate: usize,
    pub eye_state: EyeState,
    /// A blink completed on this frame
    pub blinked: bool,
    /// Alerts raised on this frame
    pub alerts: Vec<DeskAlert>,
}

impl BlinkReading {
    pub fn is_drowsy(&self) -> bool {
        self.eye_state == EyeState::Drowsy
    }
}

/// Eye-aspect-ratio blink and drowsiness tracker
pub struct BlinkTracker {
    config: BlinkConfig,
    ear_buffer: RollingBuffer<f32>,
    frames_closed: u32,
    blink_count: u64,
    session_blink_count: u64,
    blink_times: TimeWindow,
    drowsy_since: Option<Instant>,
    drowsy_alerted: bool,
    low_rate_since: Option<Instant>,
    low_rate_alerted: bool,
}

impl BlinkTracker {
    pub fn new(config: BlinkConfig) -> Self {
        Self {
            ear_buffer: RollingBuffer::new(config.smoothing_window),
            blink_times: TimeWindow::new(Duration::from_millis(config.rate_window_ms)),
            frames_closed: 0,
            blink_count: 0,
            session_blink_count: 0,
            drowsy_since: None,
            drowsy_alerted: false,
            low_rate_since: None,
            low_rate_alerted: false,
            config,
        }
    }

    /// Mean EAR of both eyes from face landmarks in pixel space
    pub fn face_ear(face: &LandmarkSet) -> Result<f32, DeskError> {
        let left = face.gather(&face::LEFT_EYE)?;
        let right = face.gather(&face::RIGHT_EYE)?;
        Ok((eye_aspect_ratio(&left) + eye_aspect_ratio(&right)) / 2.0)
    }

    /// Process one frame's face landmarks
    pub fn update(&mut self, face: &LandmarkSet, now: Instant) -> Result<BlinkReading, DeskError> {
        let ear = Self::face_ear(face)?;
        Ok(self.update_ear(ear, now))
    }

    /// Smooth a raw EAR sample and advance the state machine
    pub fn update_ear(&mut self, ear: f32, now: Instant) -> BlinkReading {
        self.ear_buffer.push(ear);
        let smoothed = self.ear_buffer.mean();
        self.observe(smoothed, now)
    }

    /// Advance the state machine with an already smoothed EAR
    pub fn observe(&mut self, smoothed_ear: f32, now: Instant) -> BlinkReading {
        let mut alerts = Vec::new();
        let mut blinked = false;

        if smoothed_ear < self.config.ear_threshold {
            self.frames_closed = self.frames_closed.saturating_add(1);
            self.drowsy_since.get_or_insert(now);
        } else {
            if self.frames_closed >= self.config.min_closed_frames {
                self.blink_count += 1;
                self.session_blink_count += 1;
                self.blink_times.record(now);
                blinked = true;
                debug!(
                    "Blink after {} closed frames (total {})",
                    self.frames_closed, self.blink_count
                );
            }
            self.frames_closed = 0;
            self.drowsy_since = None;
            self.drowsy_alerted = false;
        }

        let eye_state = self.eye_state(now);
        if eye_state == EyeState::Drowsy && !self.drowsy_alerted {
            info!("Drowsiness detected (EAR {:.3})", smoothed_ear);
            alerts.push(DeskAlert::Drowsy);
            self.drowsy_alerted = true;
        }

        let blink_rate = self.blink_times.count(now);
        if let Some(alert) = self.check_blink_rate(blink_rate, now) {
            alerts.push(alert);
        }

        BlinkReading {
            smoothed_ear,
            blink_count: self.blink_count,
            session_blink_count: self.session_blink_count,
            blink_rate,
            eye_state,
            blinked,
            alerts,
        }
    }

    fn eye_state(&self, now: Instant) -> EyeState {
        match self.drowsy_since {
            Some(since)
                if now.saturating_duration_since(since)
                    >= Duration::from_millis(self.config.drowsy_threshold_ms) =>
            {
                EyeState::Drowsy
            }
            Some(_) => EyeState::Closing,
            None => EyeState::Awake,
        }
    }

    fn check_blink_rate(&mut self, blink_rate: usize, now: Instant) -> Option<DeskAlert> {
        if blink_rate >= self.config.low_blink_rate {
            self.low_rate_since = None;
            self.low_rate_alerted = false;
            return None;
        }

        let since = *self.low_rate_since.get_or_insert(now);
        let low_for = now.saturating_duration_since(since);
        if low_for >= Duration::from_millis(self.config.low_blink_alert_ms) && !self.low_rate_alerted {
            info!("Low blink rate: {} blinks/min for {}s", blink_rate, low_for.as_secs());
            self.low_rate_alerted = true;
            return Some(DeskAlert::LowBlinkRate);
        }
        None
    }

    /// Zero the session blink count. Lifetime count and rate window are kept.
    pub fn reset_session(&mut self) {
        self.session_blink_count = 0;
    }

    pub fn blink_count(&self) -> u64 {
        self.blink_count
    }

    pub fn session_blink_count(&self) -> u64 {
        self.session_blink_count
    }

    pub fn frames_closed(&self) -> u32 {
        self.frames_closed
    }

    pub fn smoothing_len(&self) -> usize {
        self.ear_buffer.len()
    }
}
