//! Camera Capture Library for the Wellness Monitor
//!
//! Provides the frame-source seam between camera hardware and the
//! per-frame processors:
//! - `FrameSource` trait distinguishing "no frame yet" from exhaustion
//! - RGB video frames with mirroring
//! - Encoding frames to JPEG/PNG for the render output
//! - Overlay annotations describing what to draw on a frame

pub mod frame;
pub mod overlay;
pub mod source;

pub use frame::{ImageFormat, VideoFrame};
pub use overlay::{Annotation, Severity};
pub use source::FrameQueue;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Invalid format: {0}")]
    Format(String),

    #[error("Streaming error: {0}")]
    Stream(String),

    #[error("Frame source exhausted")]
    Exhausted,

    #[error("Frame encoding failed: {0}")]
    Encode(String),

    #[error("Camera not initialized")]
    NotInitialized,
}

impl CameraError {
    /// Whether the source can never produce another frame
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CameraError::Stream(_))
    }
}

/// A supplier of raw frames.
///
/// `Ok(None)` means no frame is ready yet and the caller should try again;
/// `Err(_)` means the device failed or ran out.
pub trait FrameSource: Send {
    /// Fetch the next frame without blocking indefinitely
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CameraError>;

    /// Release the underlying device
    fn release(&mut self) {}
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Flip frames horizontally before processing (selfie view)
    pub mirror: bool,
    /// Output encoding for rendered frames
    pub image_format: ImageFormat,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            mirror: true,
            image_format: ImageFormat::Jpeg,
            jpeg_quality: 80,
        }
    }
}
