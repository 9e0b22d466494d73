//! Monitoring Session Controller
//!
//! Drives one active monitoring mode at a time:
//! - Weekday desk monitoring or weekend yoga, never both
//! - Per-frame pump from a frame source through the landmark provider
//! - Overlay annotations, encoded output frames and voice alerts
//! - Session reset and end-of-session summaries

pub mod config;
pub mod controller;
pub mod output;

pub use config::{Mode, SessionConfig};
pub use controller::MonitorController;
pub use output::{FrameDetail, FrameOutput};

use camera_capture::CameraError;
use desk_monitor::DeskError;
use storage::StorageError;
use thiserror::Error;
use yoga::YogaError;

/// Session error types
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No monitoring mode is active")]
    NoActiveMode,

    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Desk monitor error: {0}")]
    Desk(#[from] DeskError),

    #[error("Yoga error: {0}")]
    Yoga(#[from] YogaError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Controller state poisoned")]
    Poisoned,
}
