//! Landmark index schemes

/// Face mesh indices (468-point mesh, 478 with refined irises)
pub mod face {
    /// Nose tip
    pub const NOSE_TIP: usize = 1;

    /// Left eye contour: outer corner, two upper lid, inner corner, two lower lid
    pub const LEFT_EYE: [usize; 6] = [33, 159, 158, 133, 153, 145];

    /// Right eye contour in the same order as `LEFT_EYE`
    pub const RIGHT_EYE: [usize; 6] = [362, 386, 385, 263, 380, 374];

    /// Left eye outer corner
    pub const LEFT_EYE_OUTER: usize = 33;

    /// Right eye outer corner
    pub const RIGHT_EYE_OUTER: usize = 263;

    /// Points in the unrefined mesh
    pub const MESH_POINTS: usize = 468;
}

/// Body pose landmark indices (33 keypoints)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    /// Number of body keypoints
    pub const COUNT: usize = 33;

    pub fn index(self) -> usize {
        self as usize
    }
}
