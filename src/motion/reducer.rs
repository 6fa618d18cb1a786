//! Downsampling to the fixed working resolution.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::motion::Frame;

/// Lower bound on the working height, whatever the source aspect ratio.
pub const MIN_WORKING_HEIGHT: u32 = 90;

/// A frame at working resolution, plus the factors mapping it back to the source.
#[derive(Debug, Clone)]
pub struct ReducedFrame {
    pub image: RgbaImage,
    /// Source width divided by working width
    pub scale_x: f32,
    /// Source height divided by working height
    pub scale_y: f32,
}

impl ReducedFrame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether two reduced frames can be differenced pixel for pixel.
    pub fn same_dimensions(&self, other: &ReducedFrame) -> bool {
        self.image.dimensions() == other.image.dimensions()
    }
}

/// Nearest-neighbor reducer to a fixed working width.
#[derive(Debug, Clone, Copy)]
pub struct FrameReducer {
    proc_width: u32,
}

impl FrameReducer {
    pub fn new(proc_width: u32) -> Self {
        Self { proc_width }
    }

    /// Working size for a source of `width` x `height`.
    ///
    /// Zero-area sources map to a 1x1 degenerate frame.
    pub fn working_size(&self, width: u32, height: u32) -> (u32, u32) {
        if width == 0 || height == 0 {
            return (1, 1);
        }
        let aspect = width as f32 / height as f32;
        let h = (self.proc_width as f32 / aspect).round() as u32;
        (self.proc_width, h.max(MIN_WORKING_HEIGHT))
    }

    pub fn reduce(&self, frame: &Frame) -> ReducedFrame {
        let (w, h) = self.working_size(frame.width(), frame.height());
        if frame.is_empty() {
            return ReducedFrame {
                image: RgbaImage::new(w, h),
                scale_x: 0.0,
                scale_y: 0.0,
            };
        }

        let image = if (w, h) == frame.image().dimensions() {
            frame.image().clone()
        } else {
            imageops::resize(frame.image(), w, h, FilterType::Nearest)
        };

        ReducedFrame {
            image,
            scale_x: frame.width() as f32 / w as f32,
            scale_y: frame.height() as f32 / h as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checkerboard(width: u32, height: u32) -> Frame {
        let image = RgbaImage::from_fn(width, height, |x, y| {
            if (x / 7 + y / 5) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        Frame::new(image, 0)
    }

    #[test]
    fn test_working_size_16_9() {
        let reducer = FrameReducer::new(240);
        assert_eq!(reducer.working_size(1280, 720), (240, 135));
        assert_eq!(reducer.working_size(1920, 1080), (240, 135));
    }

    #[test]
    fn test_working_size_clamps_height() {
        let reducer = FrameReducer::new(240);
        // 240 / 4 = 60, clamped to 90
        assert_eq!(reducer.working_size(400, 100), (240, 90));
        // portrait sources grow tall
        assert_eq!(reducer.working_size(480, 640), (240, 320));
    }

    #[test]
    fn test_zero_area_is_degenerate() {
        let reducer = FrameReducer::new(240);
        let reduced = reducer.reduce(&Frame::new(RgbaImage::new(0, 10), 0));
        assert_eq!((reduced.width(), reduced.height()), (1, 1));
        assert_eq!(reduced.scale_x, 0.0);
    }

    #[test]
    fn test_scale_factors() {
        let reducer = FrameReducer::new(240);
        let reduced = reducer.reduce(&checkerboard(1280, 720));
        assert_eq!((reduced.width(), reduced.height()), (240, 135));
        assert!((reduced.scale_x - 1280.0 / 240.0).abs() < 1e-5);
        assert!((reduced.scale_y - 720.0 / 135.0).abs() < 1e-5);
    }

    #[test]
    fn test_reduction_is_deterministic() {
        let reducer = FrameReducer::new(240);
        let frame = checkerboard(641, 479);
        let a = reducer.reduce(&frame);
        let b = reducer.reduce(&frame);
        assert_eq!(a.image, b.image);
    }

    #[test]
    fn test_same_size_is_identity() {
        let reducer = FrameReducer::new(240);
        let frame = checkerboard(240, 135);
        assert_eq!(&reducer.reduce(&frame).image, frame.image());
    }
}
