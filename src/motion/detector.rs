//! Temporal differencing into a coarse activity grid.

use log::debug;
use ndarray::Array2;

use crate::motion::ReducedFrame;

/// Per-block counts of changed pixels for one tick.
///
/// Shape is `(rows, cols)` = `(ceil(H / bin), ceil(W / bin))`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveGrid {
    counts: Array2<u32>,
    bin: u32,
}

impl ActiveGrid {
    /// A grid with no active cells, sized for a `width` x `height` working frame.
    pub fn inactive(width: u32, height: u32, bin: u32) -> Self {
        Self {
            counts: Array2::zeros(grid_shape(width, height, bin)),
            bin,
        }
    }

    pub fn rows(&self) -> usize {
        self.counts.nrows()
    }

    pub fn cols(&self) -> usize {
        self.counts.ncols()
    }

    pub fn bin(&self) -> u32 {
        self.bin
    }

    /// Changed-pixel count of a block.
    pub fn count(&self, row: usize, col: usize) -> u32 {
        self.counts[[row, col]]
    }

    /// A block is active once a full row's worth (`bin`) of its pixels changed.
    pub fn is_active(&self, row: usize, col: usize) -> bool {
        self.counts[[row, col]] >= self.bin
    }

    pub fn active_cells(&self) -> usize {
        self.counts.iter().filter(|&&c| c >= self.bin).count()
    }

    pub fn is_quiet(&self) -> bool {
        self.active_cells() == 0
    }
}

fn grid_shape(width: u32, height: u32, bin: u32) -> (usize, usize) {
    (height.div_ceil(bin) as usize, width.div_ceil(bin) as usize)
}

/// Frame differencing motion detector.
#[derive(Debug, Clone, Copy)]
pub struct MotionDetector {
    threshold: u32,
    bin: u32,
}

impl MotionDetector {
    /// `threshold` applies to the summed R+G+B absolute delta of a pixel.
    pub fn new(threshold: u32, bin: u32) -> Self {
        Self { threshold, bin }
    }

    /// True when `previous` exists and matches `current` in size.
    pub fn can_compare(previous: Option<&ReducedFrame>, current: &ReducedFrame) -> bool {
        previous.is_some_and(|p| p.same_dimensions(current))
    }

    /// Difference `current` against `previous`.
    ///
    /// Without a comparable previous frame the grid is all inactive (cold start).
    pub fn detect(&self, previous: Option<&ReducedFrame>, current: &ReducedFrame) -> ActiveGrid {
        let mut grid = ActiveGrid::inactive(current.width(), current.height(), self.bin);
        let Some(previous) = previous.filter(|p| p.same_dimensions(current)) else {
            debug!(
                "motion detector cold start at {}x{}",
                current.width(),
                current.height()
            );
            return grid;
        };

        let bin = self.bin;
        for ((x, y, cur), prev) in current
            .image
            .enumerate_pixels()
            .zip(previous.image.pixels())
        {
            let delta = u32::from(cur[0].abs_diff(prev[0]))
                + u32::from(cur[1].abs_diff(prev[1]))
                + u32::from(cur[2].abs_diff(prev[2]));
            if delta > self.threshold {
                grid.counts[[(y / bin) as usize, (x / bin) as usize]] += 1;
            }
        }
        grid
    }
}
