//! Weekend Yoga Mode
//!
//! Pose recognition from body landmarks:
//! - Joint angles (elbows, shoulders, knees, hips)
//! - Rule-based classification of seven poses
//! - Consecutive-frame pose lock with a hold countdown

pub mod analysis;
pub mod angles;
pub mod classifier;
pub mod config;
pub mod lock;

pub use analysis::{PoseReading, YogaAnalysis};
pub use angles::{Extremities, JointAngles};
pub use classifier::{classify, PoseLabel};
pub use config::YogaConfig;
pub use lock::{LockPhase, PoseLock};

use landmarks::{Detection, LandmarkError};
use std::collections::BTreeMap;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// Yoga error types
#[derive(Error, Debug)]
pub enum YogaError {
    #[error("Landmarks unusable: {0}")]
    Landmarks(#[from] LandmarkError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Weekend monitoring module
pub struct YogaModule {
    lock: PoseLock,
}

impl YogaModule {
    pub fn new(config: YogaConfig) -> Result<Self, YogaError> {
        config.validate()?;
        Ok(Self {
            lock: PoseLock::new(&config),
        })
    }

    /// Analyze one frame. `detection` must already be in pixel coordinates.
    ///
    /// Without a usable body the lock is not advanced, not even to expire.
    pub fn process(&mut self, detection: &Detection, now: Instant) -> YogaAnalysis {
        let measured = detection.body.as_ref().and_then(|body| {
            JointAngles::from_body(body)
                .map_err(|e| debug!("Skipping pose update: {}", e))
                .ok()
        });

        let pose = measured.map(|(angles, extremities)| {
            let label = classify(&angles, &extremities);
            let phase = self.lock.observe(label, now);
            PoseReading {
                label,
                phase,
                locked_label: self.lock.locked_label(),
                counter: self.lock.counter(),
                angles,
            }
        });

        YogaAnalysis {
            body_detected: detection.body.is_some(),
            pose,
        }
    }

    pub fn reset_session(&mut self) {
        self.lock.reset_session();
    }

    pub fn holds_completed(&self) -> &BTreeMap<PoseLabel, u32> {
        self.lock.holds_completed()
    }

    pub fn lock(&self) -> &PoseLock {
        &self.lock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landmarks::{BodyLandmark, LandmarkSet, Point};
    use std::time::Duration;

    /// Standing with arms straight out to the sides
    fn t_pose() -> Detection {
        let mut points = vec![Point::new(0.0, 0.0); BodyLandmark::COUNT];
        let mut set = |l: BodyLandmark, x: f32, y: f32| points[l.index()] = Point::new(x, y);
        set(BodyLandmark::LeftShoulder, 280.0, 150.0);
        set(BodyLandmark::LeftElbow, 210.0, 150.0);
        set(BodyLandmark::LeftWrist, 140.0, 150.0);
        set(BodyLandmark::RightShoulder, 360.0, 150.0);
        set(BodyLandmark::RightElbow, 430.0, 150.0);
        set(BodyLandmark::RightWrist, 500.0, 150.0);
        set(BodyLandmark::LeftHip, 280.0, 300.0);
        set(BodyLandmark::RightHip, 360.0, 300.0);
        set(BodyLandmark::LeftKnee, 280.0, 380.0);
        set(BodyLandmark::RightKnee, 360.0, 380.0);
        set(BodyLandmark::LeftAnkle, 280.0, 460.0);
        set(BodyLandmark::RightAnkle, 360.0, 460.0);
        Detection {
            face: None,
            body: Some(LandmarkSet::new(points)),
        }
    }

    #[test]
    fn test_t_pose_locks_and_holds() {
        let mut module = YogaModule::new(YogaConfig::default()).unwrap();
        let t0 = Instant::now();
        let step = Duration::from_millis(33);

        let first = module.process(&t_pose(), t0);
        assert_eq!(first.pose.as_ref().unwrap().label, PoseLabel::TPose);

        for i in 1..6 {
            module.process(&t_pose(), t0 + step * i);
        }
        assert_eq!(module.lock().locked_label(), Some(PoseLabel::TPose));

        let holding = module.process(&t_pose(), t0 + Duration::from_secs(2));
        assert!(matches!(
            holding.pose.unwrap().phase,
            LockPhase::Holding { remaining_secs: 4 } | LockPhase::Holding { remaining_secs: 3 }
        ));

        let done = module.process(&t_pose(), t0 + Duration::from_secs(6));
        assert_eq!(done.pose.unwrap().phase, LockPhase::Completed);
        assert_eq!(module.holds_completed().get(&PoseLabel::TPose), Some(&1));
    }

    #[test]
    fn test_missing_body_freezes_the_lock() {
        let mut module = YogaModule::new(YogaConfig::default()).unwrap();
        let t0 = Instant::now();
        for i in 0..6 {
            module.process(&t_pose(), t0 + Duration::from_millis(33 * i));
        }
        assert!(module.lock().is_locked());

        let empty = module.process(&Detection::none(), t0 + Duration::from_secs(30));
        assert!(!empty.body_detected);
        assert!(empty.pose.is_none());
        assert!(module.lock().is_locked());
        assert_eq!(module.holds_completed().len(), 0);
    }

    #[test]
    fn test_partial_body_is_skipped() {
        let mut module = YogaModule::new(YogaConfig::default()).unwrap();
        let detection = Detection {
            face: None,
            body: Some(LandmarkSet::new(vec![Point::new(0.0, 0.0); 5])),
        };
        let a = module.process(&detection, Instant::now());
        assert!(a.body_detected);
        assert!(a.pose.is_none());
        assert_eq!(module.lock().counter(), 0);
    }

    #[test]
    fn test_reset_session() {
        let mut module = YogaModule::new(YogaConfig::default()).unwrap();
        let t0 = Instant::now();
        for i in 0..6 {
            module.process(&t_pose(), t0 + Duration::from_millis(33 * i));
        }
        module.process(&t_pose(), t0 + Duration::from_secs(6));
        assert_eq!(module.lock().total_holds(), 1);

        module.reset_session();
        assert!(module.holds_completed().is_empty());
    }
}
