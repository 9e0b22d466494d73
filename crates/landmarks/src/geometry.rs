//! Geometric primitives over landmark points
//!
//! All functions are pure and operate on the x/y plane.

use crate::Point;

/// Euclidean distance between two points
pub fn distance(a: Point, b: Point) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Eye aspect ratio from six contour points.
///
/// `EAR = (|p1-p5| + |p2-p4|) / (2 * |p0-p3|)` with p0/p3 the corners.
/// Returns 0.0 for a degenerate (zero-width) eye.
pub fn eye_aspect_ratio(eye: &[Point; 6]) -> f32 {
    let vertical_a = distance(eye[1], eye[5]);
    let vertical_b = distance(eye[2], eye[4]);
    let horizontal = distance(eye[0], eye[3]);
    if horizontal == 0.0 {
        return 0.0;
    }
    (vertical_a + vertical_b) / (2.0 * horizontal)
}

/// Angle at `b` formed by `a-b-c`, in degrees within [0, 180]
pub fn three_point_angle(a: Point, b: Point, c: Point) -> f32 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let angle = radians.to_degrees().abs();
    if angle > 180.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// Absolute angle of the line between the eyes, in degrees within [0, 180]
pub fn head_tilt_angle(left_eye: Point, right_eye: Point) -> f32 {
    let dx = right_eye.x - left_eye.x;
    let dy = right_eye.y - left_eye.y;
    dy.atan2(dx).to_degrees().abs()
}
