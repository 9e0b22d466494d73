//! Landmark points and sets

use crate::scheme::BodyLandmark;
use crate::LandmarkError;
use serde::{Deserialize, Serialize};

/// A landmark in normalized or pixel image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    /// Relative depth, 0 when the model gives none
    #[serde(default)]
    pub z: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub const fn with_z(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Ordered landmark points for one detected face or body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Point at a raw scheme index
    pub fn get(&self, index: usize) -> Result<Point, LandmarkError> {
        self.points.get(index).copied().ok_or(LandmarkError::MissingIndex {
            index,
            len: self.points.len(),
        })
    }

    /// Point for a named body landmark
    pub fn body(&self, landmark: BodyLandmark) -> Result<Point, LandmarkError> {
        self.get(landmark.index())
    }

    /// Gather a fixed group of points, e.g. the six eye-contour indices
    pub fn gather<const N: usize>(&self, indices: &[usize; N]) -> Result<[Point; N], LandmarkError> {
        let mut out = [Point::default(); N];
        for (slot, &index) in out.iter_mut().zip(indices.iter()) {
            *slot = self.get(index)?;
        }
        Ok(out)
    }

    /// Scale normalized coordinates to pixels. Depth scales with width.
    pub fn to_pixels(&self, width: u32, height: u32) -> LandmarkSet {
        let (w, h) = (width as f32, height as f32);
        LandmarkSet {
            points: self
                .points
                .iter()
                .map(|p| Point::with_z(p.x * w, p.y * h, p.z * w))
                .collect(),
        }
    }
}

impl FromIterator<Point> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_index_is_reported() {
        let set = LandmarkSet::new(vec![Point::new(0.5, 0.5); 3]);
        match set.get(7) {
            Err(LandmarkError::MissingIndex { index, len }) => {
                assert_eq!(index, 7);
                assert_eq!(len, 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_to_pixels_scales_axes() {
        let set = LandmarkSet::new(vec![Point::with_z(0.25, 0.5, -0.1)]);
        let px = set.to_pixels(640, 480);
        let p = px.get(0).unwrap();
        assert_eq!(p.x, 160.0);
        assert_eq!(p.y, 240.0);
        assert!((p.z + 64.0).abs() < 1e-3);
    }

    #[test]
    fn test_gather_preserves_order() {
        let set: LandmarkSet = (0..10).map(|i| Point::new(i as f32, 0.0)).collect();
        let group = set.gather(&[4, 1, 9]).unwrap();
        assert_eq!(group[0].x, 4.0);
        assert_eq!(group[1].x, 1.0);
        assert_eq!(group[2].x, 9.0);
        assert!(set.gather(&[2, 10]).is_err());
    }
}
