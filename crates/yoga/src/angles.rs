//! Joint angles from body pose landmarks

use crate::YogaError;
use landmarks::geometry::three_point_angle;
use landmarks::{BodyLandmark, LandmarkSet, Point};
use serde::Serialize;

/// The eight joint angles the classifier reads, in degrees within [0, 180]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct JointAngles {
    pub left_elbow: f32,
    pub right_elbow: f32,
    pub left_shoulder: f32,
    pub right_shoulder: f32,
    pub left_knee: f32,
    pub right_knee: f32,
    pub left_hip: f32,
    pub right_hip: f32,
}

/// Body points the classifier needs beyond the angles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremities {
    pub left_wrist: Point,
    pub right_wrist: Point,
    pub left_ankle: Point,
    pub right_ankle: Point,
}

impl JointAngles {
    /// Measure from a pixel-space body pose set
    pub fn from_body(body: &LandmarkSet) -> Result<(Self, Extremities), YogaError> {
        use BodyLandmark::*;
        let p = |landmark: BodyLandmark| body.body(landmark);

        let (l_sh, r_sh) = (p(LeftShoulder)?, p(RightShoulder)?);
        let (l_el, r_el) = (p(LeftElbow)?, p(RightElbow)?);
        let (l_wr, r_wr) = (p(LeftWrist)?, p(RightWrist)?);
        let (l_hip, r_hip) = (p(LeftHip)?, p(RightHip)?);
        let (l_kn, r_kn) = (p(LeftKnee)?, p(RightKnee)?);
        let (l_an, r_an) = (p(LeftAnkle)?, p(RightAnkle)?);

        let angles = Self {
            left_elbow: three_point_angle(l_sh, l_el, l_wr),
            right_elbow: three_point_angle(r_sh, r_el, r_wr),
            left_shoulder: three_point_angle(l_el, l_sh, l_hip),
            right_shoulder: three_point_angle(r_hip, r_sh, r_el),
            left_knee: three_point_angle(l_hip, l_kn, l_an),
            right_knee: three_point_angle(r_hip, r_kn, r_an),
            left_hip: three_point_angle(l_sh, l_hip, l_kn),
            right_hip: three_point_angle(r_sh, r_hip, r_kn),
        };
        let extremities = Extremities {
            left_wrist: l_wr,
            right_wrist: r_wr,
            left_ankle: l_an,
            right_ankle: r_an,
        };
        Ok((angles, extremities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_limbs_read_180() {
        let mut points = vec![Point::new(0.0, 0.0); BodyLandmark::COUNT];
        let mut set = |l: BodyLandmark, x: f32, y: f32| points[l.index()] = Point::new(x, y);
        // Standing, arms hanging straight down
        set(BodyLandmark::LeftShoulder, 280.0, 150.0);
        set(BodyLandmark::LeftElbow, 280.0, 220.0);
        set(BodyLandmark::LeftWrist, 280.0, 290.0);
        set(BodyLandmark::RightShoulder, 360.0, 150.0);
        set(BodyLandmark::RightElbow, 360.0, 220.0);
        set(BodyLandmark::RightWrist, 360.0, 290.0);
        set(BodyLandmark::LeftHip, 290.0, 300.0);
        set(BodyLandmark::RightHip, 350.0, 300.0);
        set(BodyLandmark::LeftKnee, 290.0, 380.0);
        set(BodyLandmark::RightKnee, 350.0, 380.0);
        set(BodyLandmark::LeftAnkle, 290.0, 460.0);
        set(BodyLandmark::RightAnkle, 350.0, 460.0);

        let (angles, ext) = JointAngles::from_body(&LandmarkSet::new(points)).unwrap();
        assert!((angles.left_elbow - 180.0).abs() < 1e-3);
        assert!((angles.right_knee - 180.0).abs() < 1e-3);
        assert!((angles.left_hip - 180.0).abs() < 3.0);
        assert!(angles.left_shoulder < 10.0);
        assert_eq!(ext.left_ankle.y, 460.0);
    }

    #[test]
    fn test_short_set_is_an_error() {
        let set = LandmarkSet::new(vec![Point::new(0.0, 0.0); 12]);
        assert!(JointAngles::from_body(&set).is_err());
    }
}
