//! Posture baseline calibration and classification
//!
//! The first frames after tracker creation establish a per-session
//! baseline; every later frame is judged against it in a fixed priority
//! order. Bad spells are timed and added to the session total when they end.

use crate::analysis::DeskAlert;
use crate::config::PostureConfig;
use crate::state::PostureStatus;
use crate::DeskError;
use landmarks::geometry::{distance, head_tilt_angle};
use landmarks::{face, BodyLandmark, LandmarkSet};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Posture measurements for one frame, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PostureMetrics {
    /// Nose height minus shoulder midpoint height
    pub shoulder_nose: f32,
    /// Absolute height difference between the shoulders
    pub shoulder_diff: f32,
    /// Distance between the outer eye corners
    pub eye_distance: f32,
    /// Mean shoulder height (larger is lower in the image)
    pub shoulder_mid: f32,
    /// Head tilt angle in degrees
    pub tilt: f32,
}

impl PostureMetrics {
    /// Measure from face and body landmarks already scaled to pixels
    pub fn from_landmarks(face_set: &LandmarkSet, body: &LandmarkSet) -> Result<Self, DeskError> {
        let nose_y = face_set.get(face::NOSE_TIP)?.y;
        let left_eye = face_set.get(face::LEFT_EYE_OUTER)?;
        let right_eye = face_set.get(face::RIGHT_EYE_OUTER)?;
        let left_shoulder = body.body(BodyLandmark::LeftShoulder)?.y;
        let right_shoulder = body.body(BodyLandmark::RightShoulder)?.y;

        let shoulder_mid = (left_shoulder + right_shoulder) / 2.0;
        Ok(Self {
            shoulder_nose: nose_y - shoulder_mid,
            shoulder_diff: (left_shoulder - right_shoulder).abs(),
            eye_distance: distance(left_eye, right_eye),
            shoulder_mid,
            tilt: head_tilt_angle(left_eye, right_eye),
        })
    }
}

/// Per-session reference measurements. Fixed once established.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PostureBaseline {
    pub shoulder_nose: f32,
    pub shoulder_diff: f32,
    pub eye_distance: f32,
    pub shoulder_mid: f32,
}

/// Running sums over the calibration window
#[derive(Debug, Clone, Default)]
struct BaselineAccumulator {
    shoulder_nose: f64,
    shoulder_diff: f64,
    eye_distance: f64,
    shoulder_mid: f64,
    samples: u32,
}

impl BaselineAccumulator {
    fn add(&mut self, m: &PostureMetrics) {
        self.shoulder_nose += m.shoulder_nose as f64;
        self.shoulder_diff += m.shoulder_diff as f64;
        self.eye_distance += m.eye_distance as f64;
        self.shoulder_mid += m.shoulder_mid as f64;
        self.samples += 1;
    }

    fn finish(&self) -> Option<PostureBaseline> {
        if self.samples == 0 {
            return None;
        }
        let n = self.samples as f64;
        Some(PostureBaseline {
            shoulder_nose: (self.shoulder_nose / n) as f32,
            shoulder_diff: (self.shoulder_diff / n) as f32,
            eye_distance: (self.eye_distance / n) as f32,
            shoulder_mid: (self.shoulder_mid / n) as f32,
        })
    }
}

#[derive(Debug, Clone)]
enum Calibration {
    Collecting(BaselineAccumulator),
    Ready(PostureBaseline),
    Failed,
}

/// Posture tracker output for one frame
#[derive(Debug, Clone, Serialize)]
pub struct PostureReading {
    pub status: PostureStatus,
    /// Whole seconds of the current bad spell, while bad
    pub elapsed_bad_secs: Option<u64>,
    /// Completed bad spells this session
    pub total_bad_secs: f64,
    /// Baseline samples collected so far (while calibrating)
    pub calibration_samples: u32,
    /// Alerts raised on this frame
    pub alerts: Vec<DeskAlert>,
}

/// Posture baseline and classifier
pub struct PostureTracker {
    config: PostureConfig,
    started_at: Instant,
    calibration: Calibration,
    bad_since: Option<Instant>,
    total_bad: Duration,
    alerted: bool,
}

impl PostureTracker {
    pub fn new(config: PostureConfig, started_at: Instant) -> Self {
        Self {
            config,
            started_at,
            calibration: Calibration::Collecting(BaselineAccumulator::default()),
            bad_since: None,
            total_bad: Duration::ZERO,
            alerted: false,
        }
    }

    /// Process one frame. `None` means face or body was missing; such frames
    /// leave calibration untouched and end any bad spell.
    pub fn update(&mut self, metrics: Option<&PostureMetrics>, now: Instant) -> PostureReading {
        let Some(metrics) = metrics else {
            self.end_spell(now);
            return self.reading(PostureStatus::Undetected, now, Vec::new());
        };

        let status = self.judge(metrics, now);
        let mut alerts = Vec::new();

        if status.is_bad() {
            let since = *self.bad_since.get_or_insert(now);
            let elapsed = now.saturating_duration_since(since);
            if elapsed >= Duration::from_millis(self.config.bad_posture_alert_ms) && !self.alerted {
                info!("Bad posture ({}) for {}s", status.label(), elapsed.as_secs());
                alerts.push(DeskAlert::BadPosture);
                self.alerted = true;
            }
        } else {
            self.end_spell(now);
        }

        self.reading(status, now, alerts)
    }

    fn end_spell(&mut self, now: Instant) {
        if let Some(since) = self.bad_since.take() {
            let spell = now.saturating_duration_since(since);
            self.total_bad += spell;
            debug!(
                "Bad posture spell ended after {:.1}s (session total {:.1}s)",
                spell.as_secs_f64(),
                self.total_bad.as_secs_f64()
            );
        }
        self.alerted = false;
    }

    fn judge(&mut self, metrics: &PostureMetrics, now: Instant) -> PostureStatus {
        match &mut self.calibration {
            Calibration::Ready(baseline) => classify(&self.config, baseline, metrics),
            Calibration::Failed => PostureStatus::Uncalibrated,
            Calibration::Collecting(acc) => {
                let window = Duration::from_millis(self.config.calibration_ms);
                if now.saturating_duration_since(self.started_at) < window {
                    acc.add(metrics);
                    return PostureStatus::Calibrating;
                }
                match acc.finish() {
                    Some(baseline) => {
                        info!(
                            "Baseline set - eye dist: {:.1}, shoulder-nose: {:.1} ({} samples)",
                            baseline.eye_distance, baseline.shoulder_nose, acc.samples
                        );
                        self.calibration = Calibration::Ready(baseline);
                    }
                    None => {
                        warn!("Calibration window ended without samples; posture checks disabled");
                        self.calibration = Calibration::Failed;
                    }
                }
                PostureStatus::Good
            }
        }
    }

    fn reading(&self, status: PostureStatus, now: Instant, alerts: Vec<DeskAlert>) -> PostureReading {
        let elapsed_bad_secs = if status.is_bad() {
            self.bad_since
                .map(|since| now.saturating_duration_since(since).as_secs())
        } else {
            None
        };
        let calibration_samples = match &self.calibration {
            Calibration::Collecting(acc) => acc.samples,
            _ => 0,
        };
        PostureReading {
            status,
            elapsed_bad_secs,
            total_bad_secs: self.total_bad.as_secs_f64(),
            calibration_samples,
            alerts,
        }
    }

    /// Zero the session total and drop any in-progress bad spell.
    /// The baseline is kept.
    pub fn reset_session(&mut self) {
        self.total_bad = Duration::ZERO;
        self.bad_since = None;
    }

    pub fn baseline(&self) -> Option<&PostureBaseline> {
        match &self.calibration {
            Calibration::Ready(baseline) => Some(baseline),
            _ => None,
        }
    }

    pub fn is_baseline_ready(&self) -> bool {
        self.baseline().is_some()
    }

    /// Whether calibration ended without a single sample
    pub fn calibration_failed(&self) -> bool {
        matches!(self.calibration, Calibration::Failed)
    }

    /// Completed bad-posture time this session
    pub fn total_bad(&self) -> Duration {
        self.total_bad
    }

    pub fn bad_since(&self) -> Option<Instant> {
        self.bad_since
    }
}

/// Judge metrics against the baseline. First matching rule wins.
pub fn classify(config: &PostureConfig, base: &PostureBaseline, m: &PostureMetrics) -> PostureStatus {
    if m.eye_distance < base.eye_distance * config.too_close_factor {
        PostureStatus::TooClose
    } else if m.tilt > config.tilt_min_degrees && m.tilt < config.tilt_max_degrees {
        PostureStatus::HeadTilted
    } else if m.shoulder_mid > base.shoulder_mid + config.slouch_margin_px {
        PostureStatus::Slouched
    } else if m.shoulder_diff > base.shoulder_diff + config.shoulder_tilt_margin_px {
        PostureStatus::ShouldersTilted
    } else if m.shoulder_nose > base.shoulder_nose + config.forward_head_margin_px {
        PostureStatus::ForwardHead
    } else {
        PostureStatus::Good
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landmarks::Point;

    fn upright() -> PostureMetrics {
        PostureMetrics {
            shoulder_nose: -150.0,
            shoulder_diff: 4.0,
            eye_distance: 80.0,
            shoulder_mid: 380.0,
            tilt: 1.0,
        }
    }

    fn calibrated(start: Instant) -> PostureTracker {
        let mut tracker = PostureTracker::new(PostureConfig::default(), start);
        for i in 0..30 {
            tracker.update(Some(&upright()), start + Duration::from_millis(100 * i));
        }
        tracker.update(Some(&upright()), start + Duration::from_secs(3));
        assert!(tracker.is_baseline_ready());
        tracker
    }

    #[test]
    fn test_calibration_averages_samples() {
        let t0 = Instant::now();
        let mut tracker = PostureTracker::new(PostureConfig::default(), t0);

        let mut low = upright();
        low.shoulder_mid = 370.0;
        let mut high = upright();
        high.shoulder_mid = 390.0;

        assert_eq!(tracker.update(Some(&low), t0).status, PostureStatus::Calibrating);
        assert_eq!(
            tracker.update(Some(&high), t0 + Duration::from_secs(1)).status,
            PostureStatus::Calibrating
        );
        let done = tracker.update(Some(&upright()), t0 + Duration::from_secs(3));
        assert_eq!(done.status, PostureStatus::Good);

        let baseline = tracker.baseline().unwrap();
        assert!((baseline.shoulder_mid - 380.0).abs() < 1e-4);
        assert!((baseline.eye_distance - 80.0).abs() < 1e-4);
    }

    #[test]
    fn test_baseline_never_changes_once_ready() {
        let t0 = Instant::now();
        let mut tracker = calibrated(t0);
        let before = *tracker.baseline().unwrap();

        let mut odd = upright();
        odd.eye_distance = 200.0;
        odd.shoulder_mid = 10.0;
        odd.shoulder_diff = 90.0;
        for i in 0..50 {
            tracker.update(Some(&odd), t0 + Duration::from_secs(4 + i));
        }

        assert_eq!(*tracker.baseline().unwrap(), before);
    }

    #[test]
    fn test_no_samples_disables_posture() {
        let t0 = Instant::now();
        let mut tracker = PostureTracker::new(PostureConfig::default(), t0);

        // Nothing visible during the window
        tracker.update(None, t0 + Duration::from_secs(1));
        let after = tracker.update(Some(&upright()), t0 + Duration::from_secs(4));
        assert_eq!(after.status, PostureStatus::Good);
        assert!(tracker.calibration_failed());

        let mut slouched = upright();
        slouched.shoulder_mid += 100.0;
        let later = tracker.update(Some(&slouched), t0 + Duration::from_secs(5));
        assert_eq!(later.status, PostureStatus::Uncalibrated);
        assert!(tracker.bad_since().is_none());
    }

    #[test]
    fn test_too_close_wins_over_forward_head() {
        let t0 = Instant::now();
        let mut tracker = calibrated(t0);

        let mut m = upright();
        m.eye_distance = 40.0;
        m.shoulder_nose = -100.0;
        let reading = tracker.update(Some(&m), t0 + Duration::from_secs(5));
        assert_eq!(reading.status, PostureStatus::TooClose);
    }

    #[test]
    fn test_rule_order() {
        let config = PostureConfig::default();
        let base = PostureBaseline {
            shoulder_nose: -150.0,
            shoulder_diff: 4.0,
            eye_distance: 80.0,
            shoulder_mid: 380.0,
        };

        let mut m = upright();
        m.tilt = 20.0;
        m.shoulder_mid = 420.0;
        assert_eq!(classify(&config, &base, &m), PostureStatus::HeadTilted);

        m.tilt = 175.0;
        assert_eq!(classify(&config, &base, &m), PostureStatus::Slouched);

        let mut m = upright();
        m.shoulder_diff = 40.0;
        m.shoulder_nose = -100.0;
        assert_eq!(classify(&config, &base, &m), PostureStatus::ShouldersTilted);

        m.shoulder_diff = 4.0;
        assert_eq!(classify(&config, &base, &m), PostureStatus::ForwardHead);

        assert_eq!(classify(&config, &base, &upright()), PostureStatus::Good);
    }

    #[test]
    fn test_tilt_range_is_configurable() {
        let config = PostureConfig {
            tilt_min_degrees: 25.0,
            ..Default::default()
        };
        let base = PostureBaseline {
            shoulder_nose: -150.0,
            shoulder_diff: 4.0,
            eye_distance: 80.0,
            shoulder_mid: 380.0,
        };
        let mut m = upright();
        m.tilt = 20.0;
        assert_eq!(classify(&config, &base, &m), PostureStatus::Good);
    }

    #[test]
    fn test_bad_spell_accumulates_on_recovery() {
        let t0 = Instant::now();
        let mut tracker = calibrated(t0);
        let mut slouched = upright();
        slouched.shoulder_mid += 50.0;

        let bad_start = t0 + Duration::from_secs(10);
        for i in 0..=9 {
            let reading = tracker.update(Some(&slouched), bad_start + Duration::from_secs(i));
            assert_eq!(reading.elapsed_bad_secs, Some(i));
            assert_eq!(reading.total_bad_secs, 0.0);
        }

        let good = tracker.update(Some(&upright()), bad_start + Duration::from_secs(10));
        assert_eq!(good.status, PostureStatus::Good);
        assert!((good.total_bad_secs - 10.0).abs() < 0.05);
        assert!(tracker.bad_since().is_none());
    }

    #[test]
    fn test_leaving_the_desk_ends_the_spell() {
        let t0 = Instant::now();
        let mut tracker = calibrated(t0);
        let mut slouched = upright();
        slouched.shoulder_mid += 50.0;

        tracker.update(Some(&slouched), t0 + Duration::from_secs(10));
        let gap = tracker.update(None, t0 + Duration::from_secs(11));
        assert_eq!(gap.status, PostureStatus::Undetected);
        assert_eq!(gap.elapsed_bad_secs, None);
        assert!(tracker.bad_since().is_none());
        assert_eq!(tracker.total_bad(), Duration::from_secs(1));

        for s in 12..3600 {
            tracker.update(None, t0 + Duration::from_secs(s));
        }
        tracker.update(Some(&upright()), t0 + Duration::from_secs(3600));
        assert_eq!(tracker.total_bad(), Duration::from_secs(1));

        // a new spell starts from zero and is not alerted straight away
        let back = tracker.update(Some(&slouched), t0 + Duration::from_secs(3601));
        assert_eq!(back.elapsed_bad_secs, Some(0));
        assert!(back.alerts.is_empty());
    }

    #[test]
    fn test_bad_posture_alert_once_per_spell() {
        let t0 = Instant::now();
        let mut tracker = calibrated(t0);
        let mut m = upright();
        m.shoulder_diff = 60.0;

        let start = t0 + Duration::from_secs(5);
        assert!(tracker.update(Some(&m), start).alerts.is_empty());
        let alert = tracker.update(Some(&m), start + Duration::from_secs(120));
        assert_eq!(alert.alerts, vec![DeskAlert::BadPosture]);
        assert!(tracker
            .update(Some(&m), start + Duration::from_secs(130))
            .alerts
            .is_empty());

        tracker.update(Some(&upright()), start + Duration::from_secs(131));
        tracker.update(Some(&m), start + Duration::from_secs(132));
        let rearmed = tracker.update(Some(&m), start + Duration::from_secs(252));
        assert_eq!(rearmed.alerts, vec![DeskAlert::BadPosture]);
    }

    #[test]
    fn test_reset_session_keeps_baseline() {
        let t0 = Instant::now();
        let mut tracker = calibrated(t0);
        let baseline = *tracker.baseline().unwrap();
        let mut m = upright();
        m.shoulder_mid += 50.0;

        tracker.update(Some(&m), t0 + Duration::from_secs(10));
        tracker.update(Some(&upright()), t0 + Duration::from_secs(20));
        tracker.update(Some(&m), t0 + Duration::from_secs(21));
        tracker.reset_session();

        assert_eq!(tracker.total_bad(), Duration::ZERO);
        assert!(tracker.bad_since().is_none());
        assert_eq!(*tracker.baseline().unwrap(), baseline);
    }

    #[test]
    fn test_metrics_from_landmarks() {
        let mut face_points = vec![Point::new(0.0, 0.0); face::MESH_POINTS];
        face_points[face::NOSE_TIP] = Point::new(320.0, 230.0);
        face_points[face::LEFT_EYE_OUTER] = Point::new(280.0, 200.0);
        face_points[face::RIGHT_EYE_OUTER] = Point::new(360.0, 200.0);
        let mut body_points = vec![Point::new(0.0, 0.0); BodyLandmark::COUNT];
        body_points[BodyLandmark::LeftShoulder.index()] = Point::new(220.0, 384.0);
        body_points[BodyLandmark::RightShoulder.index()] = Point::new(420.0, 376.0);

        let m = PostureMetrics::from_landmarks(
            &LandmarkSet::new(face_points),
            &LandmarkSet::new(body_points),
        )
        .unwrap();

        assert_eq!(m.shoulder_mid, 380.0);
        assert_eq!(m.shoulder_nose, -150.0);
        assert_eq!(m.shoulder_diff, 8.0);
        assert_eq!(m.eye_distance, 80.0);
        assert_eq!(m.tilt, 0.0);
    }
}
