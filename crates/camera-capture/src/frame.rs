//! Video frame types and processing

use crate::CameraError;
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Encoding used when serializing a frame for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Jpeg,
    Png,
}

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp relative to the source start (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Create a black frame, used by replay sources that carry no pixels
    pub fn blank(width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self::new(
            vec![0; (width * height * 3) as usize],
            width,
            height,
            timestamp_ns,
            sequence,
        )
    }

    /// Whether the pixel buffer matches the declared dimensions
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == (self.width as usize) * (self.height as usize) * 3
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        self.data
            .get(idx..idx + 3)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Flip the frame horizontally in place
    pub fn mirror(&mut self) {
        let row_len = (self.width * 3) as usize;
        if row_len == 0 {
            return;
        }
        for row in self.data.chunks_exact_mut(row_len) {
            let width = self.width as usize;
            for x in 0..width / 2 {
                let left = x * 3;
                let right = (width - 1 - x) * 3;
                for c in 0..3 {
                    row.swap(left + c, right + c);
                }
            }
        }
    }

    /// Serialize the frame into an encoded byte stream
    pub fn encode(&self, format: ImageFormat, jpeg_quality: u8) -> Result<Vec<u8>, CameraError> {
        let img = image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| CameraError::Format("pixel buffer does not match frame size".into()))?;

        let mut bytes = Vec::new();
        match format {
            ImageFormat::Jpeg => {
                let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                    &mut bytes,
                    jpeg_quality.clamp(1, 100),
                );
                encoder
                    .encode_image(&img)
                    .map_err(|e| CameraError::Encode(e.to_string()))?;
            }
            ImageFormat::Png => {
                img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
                    .map_err(|e| CameraError::Encode(e.to_string()))?;
            }
        }
        Ok(bytes)
    }
}
