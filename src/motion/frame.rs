//! Timestamped input frames.

use image::{DynamicImage, RgbImage, RgbaImage};

use crate::error::FrameError;

/// One camera frame as delivered to a tick.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbaImage,
    timestamp_ms: u64,
}

impl Frame {
    /// Wrap an already decoded RGBA image.
    pub fn new(image: RgbaImage, timestamp_ms: u64) -> Self {
        Self {
            image,
            timestamp_ms,
        }
    }

    /// Build a frame from a tightly packed RGBA buffer.
    pub fn from_rgba(
        width: u32,
        height: u32,
        data: Vec<u8>,
        timestamp_ms: u64,
    ) -> Result<Self, FrameError> {
        check_len(width, height, 4, data.len())?;
        let actual = data.len();
        let image = RgbaImage::from_raw(width, height, data).ok_or(FrameError::BufferSize {
            width,
            height,
            channels: 4,
            expected: expected_len(width, height, 4),
            actual,
        })?;
        Ok(Self::new(image, timestamp_ms))
    }

    /// Build a frame from a tightly packed RGB buffer. Alpha is set opaque.
    pub fn from_rgb(
        width: u32,
        height: u32,
        data: Vec<u8>,
        timestamp_ms: u64,
    ) -> Result<Self, FrameError> {
        check_len(width, height, 3, data.len())?;
        let actual = data.len();
        let rgb = RgbImage::from_raw(width, height, data).ok_or(FrameError::BufferSize {
            width,
            height,
            channels: 3,
            expected: expected_len(width, height, 3),
            actual,
        })?;
        Ok(Self::new(DynamicImage::ImageRgb8(rgb).into_rgba8(), timestamp_ms))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// True when the frame has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

fn expected_len(width: u32, height: u32, channels: u32) -> usize {
    width as usize * height as usize * channels as usize
}

fn check_len(width: u32, height: u32, channels: u32, actual: usize) -> Result<(), FrameError> {
    let expected = expected_len(width, height, channels);
    if actual != expected {
        return Err(FrameError::BufferSize {
            width,
            height,
            channels,
            expected,
            actual,
        });
    }
    Ok(())
}
