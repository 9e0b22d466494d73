//! Landmark Types and Geometry
//!
//! Numeric output of the face-mesh / body-pose models as consumed by the
//! wellness trackers:
//! - Landmark points and fixed-index landmark sets
//! - Face mesh and body pose index schemes
//! - Distance, eye-aspect-ratio and joint-angle primitives
//! - The `LandmarkProvider` seam to the detection backend

pub mod geometry;
pub mod scheme;
pub mod set;

pub use scheme::{face, BodyLandmark};
pub use set::{LandmarkSet, Point};

use camera_capture::VideoFrame;
use thiserror::Error;

/// Landmark error types
#[derive(Error, Debug)]
pub enum LandmarkError {
    #[error("Landmark index {index} missing (set has {len} points)")]
    MissingIndex { index: usize, len: usize },

    #[error("Detection failed: {0}")]
    Detection(String),

    #[error("Provider released")]
    Released,
}

/// Landmarks found in one frame. Absence means "not detected", never an error.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    /// Face mesh landmarks (normalized coordinates)
    pub face: Option<LandmarkSet>,
    /// Body pose landmarks (normalized coordinates)
    pub body: Option<LandmarkSet>,
}

impl Detection {
    pub fn none() -> Self {
        Self::default()
    }

    /// Convert both sets to pixel coordinates of a `width` x `height` frame
    pub fn to_pixels(&self, width: u32, height: u32) -> Detection {
        Detection {
            face: self.face.as_ref().map(|s| s.to_pixels(width, height)),
            body: self.body.as_ref().map(|s| s.to_pixels(width, height)),
        }
    }
}

/// Face/body landmark detection backend.
///
/// One provider belongs to one active monitoring mode; `release` frees its
/// model handles when the mode is torn down.
pub trait LandmarkProvider: Send {
    /// Run detection on a frame
    fn detect(&mut self, frame: &VideoFrame) -> Result<Detection, LandmarkError>;

    /// Release model handles
    fn release(&mut self) {}
}
