//! Landmark trace replay
//!
//! A trace is JSON lines, one per frame:
//!
//! ```text
//! {"t_ms": 0, "face": [{"x": 0.41, "y": 0.32}, ...], "body": [...]}
//! {"t_ms": 33}
//! {"t_ms": 66, "error": "model timeout"}
//! ```
//!
//! Coordinates are normalized. `face`/`body` may be omitted when not
//! detected; `error` makes the provider fail on that frame.

use anyhow::{Context, Result};
use camera_capture::{FrameQueue, VideoFrame};
use landmarks::{Detection, LandmarkError, LandmarkProvider, LandmarkSet};
use serde::Deserialize;
use std::collections::VecDeque;
use std::io::BufRead;
use tracing::debug;

/// One recorded frame
#[derive(Debug, Clone, Deserialize)]
pub struct TraceFrame {
    pub t_ms: u64,
    #[serde(default)]
    pub face: Option<LandmarkSet>,
    #[serde(default)]
    pub body: Option<LandmarkSet>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Parse a trace. Blank lines and `#` comments are skipped.
pub fn read_trace(reader: impl BufRead) -> Result<Vec<TraceFrame>> {
    let mut frames = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading trace line {}", index + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let frame: TraceFrame = serde_json::from_str(line)
            .with_context(|| format!("parsing trace line {}", index + 1))?;
        frames.push(frame);
    }
    debug!("Loaded {} trace frames", frames.len());
    Ok(frames)
}

/// Session length covered by a trace, in whole seconds
pub fn trace_duration_secs(frames: &[TraceFrame]) -> u64 {
    match (frames.first(), frames.last()) {
        (Some(first), Some(last)) => last.t_ms.saturating_sub(first.t_ms) / 1000,
        _ => 0,
    }
}

/// Landmark provider answering from a recorded trace, one entry per call
pub struct TraceProvider {
    detections: VecDeque<Result<Detection, String>>,
    released: bool,
}

impl LandmarkProvider for TraceProvider {
    fn detect(&mut self, _frame: &VideoFrame) -> Result<Detection, LandmarkError> {
        if self.released {
            return Err(LandmarkError::Released);
        }
        match self.detections.pop_front() {
            Some(Ok(detection)) => Ok(detection),
            Some(Err(message)) => Err(LandmarkError::Detection(message)),
            None => Ok(Detection::none()),
        }
    }

    fn release(&mut self) {
        self.released = true;
        self.detections.clear();
    }
}

/// Split a trace into blank frames and the matching landmark provider
pub fn into_sources(frames: Vec<TraceFrame>, width: u32, height: u32) -> (FrameQueue, TraceProvider) {
    let mut queue = FrameQueue::new();
    let mut detections = VecDeque::with_capacity(frames.len());

    for (sequence, frame) in frames.into_iter().enumerate() {
        queue.push(VideoFrame::blank(
            width,
            height,
            frame.t_ms * 1_000_000,
            sequence as u32,
        ));
        detections.push_back(match frame.error {
            Some(message) => Err(message),
            None => Ok(Detection {
                face: frame.face,
                body: frame.body,
            }),
        });
    }

    (
        queue,
        TraceProvider {
            detections,
            released: false,
        },
    )
}
