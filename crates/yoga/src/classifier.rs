//! Rule-based yoga pose classification
//!
//! Rules run in a fixed order and a later match overwrites an earlier one.
//! All angle bounds are exclusive.

use crate::angles::{Extremities, JointAngles};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognized poses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum PoseLabel {
    #[default]
    Unknown,
    /// Warrior II
    Virabhadrasana2,
    TPose,
    /// Tree
    Vrikshasana,
    /// Downward dog
    AdhoMukhaSvanasana,
    /// Standing forward bend
    Uttanasana,
    /// Chair
    Utkatasana,
    /// Raised hands
    UrdhvaHastasana,
}

impl PoseLabel {
    pub fn name(&self) -> &'static str {
        match self {
            PoseLabel::Unknown => "Unknown Pose",
            PoseLabel::Virabhadrasana2 => "Virabhadrasana II",
            PoseLabel::TPose => "T Pose",
            PoseLabel::Vrikshasana => "Vrikshasana",
            PoseLabel::AdhoMukhaSvanasana => "Adho Mukha Svanasana",
            PoseLabel::Uttanasana => "Uttanasana",
            PoseLabel::Utkatasana => "Utkatasana",
            PoseLabel::UrdhvaHastasana => "Urdhva Hastasana",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != PoseLabel::Unknown
    }
}

impl fmt::Display for PoseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Max vertical wrist-to-ankle gap for a forward bend (pixels)
const FORWARD_BEND_REACH_PX: f32 = 50.0;

fn within(value: f32, low: f32, high: f32) -> bool {
    low < value && value < high
}

fn both(left: f32, right: f32, low: f32, high: f32) -> bool {
    within(left, low, high) && within(right, low, high)
}

fn either(left: f32, right: f32, low: f32, high: f32) -> bool {
    within(left, low, high) || within(right, low, high)
}

/// Classify one frame's angles
pub fn classify(a: &JointAngles, ext: &Extremities) -> PoseLabel {
    let mut label = PoseLabel::Unknown;

    let elbows_straight = both(a.left_elbow, a.right_elbow, 165.0, 195.0);
    let knees_straight = both(a.left_knee, a.right_knee, 165.0, 195.0);

    if elbows_straight && both(a.left_shoulder, a.right_shoulder, 80.0, 110.0) {
        if either(a.left_knee, a.right_knee, 165.0, 195.0)
            && either(a.left_knee, a.right_knee, 90.0, 120.0)
        {
            label = PoseLabel::Virabhadrasana2;
        }
        if both(a.left_knee, a.right_knee, 160.0, 195.0) {
            label = PoseLabel::TPose;
        }
    }

    // Folded knee angles never exceed 180, so the left-knee arm cannot match
    if either(a.left_knee, a.right_knee, 165.0, 195.0)
        && (within(a.left_knee, 315.0, 335.0) || within(a.right_knee, 25.0, 45.0))
    {
        label = PoseLabel::Vrikshasana;
    }

    if elbows_straight
        && knees_straight
        && both(a.left_hip, a.right_hip, 60.0, 120.0)
        && (ext.left_wrist.y > ext.left_ankle.y || ext.right_wrist.y > ext.right_ankle.y)
    {
        label = PoseLabel::AdhoMukhaSvanasana;
    }

    if knees_straight
        && both(a.left_hip, a.right_hip, 20.0, 60.0)
        && ((ext.left_wrist.y - ext.left_ankle.y).abs() < FORWARD_BEND_REACH_PX
            || (ext.right_wrist.y - ext.right_ankle.y).abs() < FORWARD_BEND_REACH_PX)
    {
        label = PoseLabel::Uttanasana;
    }

    if both(a.left_knee, a.right_knee, 80.0, 120.0)
        && both(a.left_hip, a.right_hip, 80.0, 120.0)
        && both(a.left_shoulder, a.right_shoulder, 160.0, 200.0)
        && elbows_straight
    {
        label = PoseLabel::Utkatasana;
    }

    if knees_straight
        && both(a.left_hip, a.right_hip, 160.0, 195.0)
        && both(a.left_shoulder, a.right_shoulder, 160.0, 200.0)
        && elbows_straight
    {
        label = PoseLabel::UrdhvaHastasana;
    }

    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use landmarks::Point;
    use proptest::prelude::*;

    fn ext(wrist_y: f32, ankle_y: f32) -> Extremities {
        Extremities {
            left_wrist: Point::new(100.0, wrist_y),
            right_wrist: Point::new(200.0, wrist_y),
            left_ankle: Point::new(100.0, ankle_y),
            right_ankle: Point::new(200.0, ankle_y),
        }
    }

    fn angles(elbow: f32, shoulder: f32, knee: f32, hip: f32) -> JointAngles {
        JointAngles {
            left_elbow: elbow,
            right_elbow: elbow,
            left_shoulder: shoulder,
            right_shoulder: shoulder,
            left_knee: knee,
            right_knee: knee,
            left_hip: hip,
            right_hip: hip,
        }
    }

    #[test]
    fn test_t_pose() {
        let a = angles(175.0, 95.0, 175.0, 175.0);
        assert_eq!(classify(&a, &ext(150.0, 460.0)), PoseLabel::TPose);
    }

    #[test]
    fn test_warrior_two() {
        let mut a = angles(175.0, 95.0, 175.0, 150.0);
        a.right_knee = 105.0;
        assert_eq!(classify(&a, &ext(150.0, 460.0)), PoseLabel::Virabhadrasana2);
    }

    #[test]
    fn test_tree_from_right_knee() {
        let mut a = angles(90.0, 30.0, 175.0, 170.0);
        a.right_knee = 35.0;
        assert_eq!(classify(&a, &ext(150.0, 460.0)), PoseLabel::Vrikshasana);
    }

    #[test]
    fn test_downward_dog_needs_low_wrists() {
        let a = angles(175.0, 170.0, 175.0, 90.0);
        assert_eq!(classify(&a, &ext(470.0, 460.0)), PoseLabel::AdhoMukhaSvanasana);
        assert_eq!(classify(&a, &ext(300.0, 460.0)), PoseLabel::Unknown);
    }

    #[test]
    fn test_forward_bend() {
        let a = angles(150.0, 100.0, 175.0, 40.0);
        assert_eq!(classify(&a, &ext(430.0, 460.0)), PoseLabel::Uttanasana);
        assert_eq!(classify(&a, &ext(300.0, 460.0)), PoseLabel::Unknown);
    }

    #[test]
    fn test_chair() {
        let a = angles(175.0, 170.0, 100.0, 100.0);
        assert_eq!(classify(&a, &ext(50.0, 460.0)), PoseLabel::Utkatasana);
    }

    #[test]
    fn test_raised_hands_overwrites_earlier_matches() {
        let a = angles(175.0, 170.0, 175.0, 175.0);
        assert_eq!(classify(&a, &ext(50.0, 460.0)), PoseLabel::UrdhvaHastasana);
    }

    #[test]
    fn test_bounds_are_exclusive() {
        let a = angles(165.0, 95.0, 175.0, 175.0);
        assert_eq!(classify(&a, &ext(150.0, 460.0)), PoseLabel::Unknown);
    }

    #[test]
    fn test_labels() {
        assert_eq!(PoseLabel::Virabhadrasana2.to_string(), "Virabhadrasana II");
        assert_eq!(PoseLabel::default().name(), "Unknown Pose");
        assert!(!PoseLabel::Unknown.is_known());
    }

    proptest! {
        #[test]
        fn prop_bent_elbows_never_give_arm_poses(
            elbow in 0.0f32..160.0,
            shoulder in 0.0f32..180.0,
            knee in 0.0f32..180.0,
            hip in 0.0f32..180.0,
        ) {
            let label = classify(&angles(elbow, shoulder, knee, hip), &ext(150.0, 460.0));
            prop_assert!(!matches!(
                label,
                PoseLabel::TPose
                    | PoseLabel::Virabhadrasana2
                    | PoseLabel::AdhoMukhaSvanasana
                    | PoseLabel::Utkatasana
                    | PoseLabel::UrdhvaHastasana
            ));
        }
    }
}
