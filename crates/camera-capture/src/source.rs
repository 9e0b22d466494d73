//! In-memory frame source

use crate::{CameraError, FrameSource, VideoFrame};
use std::collections::VecDeque;
use tracing::debug;

/// Frame source backed by a queue of pre-captured frames.
///
/// A `None` entry yields "no frame yet" once; an empty queue is exhausted.
#[derive(Debug, Default)]
pub struct FrameQueue {
    frames: VecDeque<Option<VideoFrame>>,
    released: bool,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a frame
    pub fn push(&mut self, frame: VideoFrame) {
        self.frames.push_back(Some(frame));
    }

    /// Queue a "no frame yet" gap
    pub fn push_gap(&mut self) {
        self.frames.push_back(None);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl FromIterator<VideoFrame> for FrameQueue {
    fn from_iter<I: IntoIterator<Item = VideoFrame>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().map(Some).collect(),
            released: false,
        }
    }
}

impl FrameSource for FrameQueue {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, CameraError> {
        if self.released {
            return Err(CameraError::NotInitialized);
        }
        match self.frames.pop_front() {
            Some(entry) => Ok(entry),
            None => Err(CameraError::Exhausted),
        }
    }

    fn release(&mut self) {
        debug!("Releasing frame queue with {} pending entries", self.frames.len());
        self.frames.clear();
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_is_distinct_from_exhaustion() {
        let mut queue = FrameQueue::new();
        queue.push(VideoFrame::blank(2, 2, 0, 0));
        queue.push_gap();

        assert!(queue.next_frame().unwrap().is_some());
        assert!(queue.next_frame().unwrap().is_none());
        assert!(matches!(queue.next_frame(), Err(CameraError::Exhausted)));
    }

    #[test]
    fn test_released_queue_refuses_frames() {
        let mut queue: FrameQueue = (0..3).map(|i| VideoFrame::blank(1, 1, i, i as u32)).collect();
        queue.release();
        assert!(queue.is_released());
        assert!(matches!(queue.next_frame(), Err(CameraError::NotInitialized)));
    }
}
