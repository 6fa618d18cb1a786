//! Connected-component extraction over the activity grid.

use std::collections::VecDeque;

use log::trace;

use crate::motion::ActiveGrid;
use crate::tracker::{Detection, Rect};

const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// An 8-connected group of active cells, as an inclusive box in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blob {
    pub min_col: usize,
    pub min_row: usize,
    pub max_col: usize,
    pub max_row: usize,
    /// Number of active cells in the component
    pub cells: usize,
}

impl Blob {
    /// Box in full-resolution pixels.
    pub fn to_rect(&self, bin: u32, scale_x: f32, scale_y: f32) -> Rect {
        let bin = bin as f32;
        Rect::new(
            self.min_col as f32 * bin * scale_x,
            self.min_row as f32 * bin * scale_y,
            (self.max_col - self.min_col + 1) as f32 * bin * scale_x,
            (self.max_row - self.min_row + 1) as f32 * bin * scale_y,
        )
    }
}

/// Turns an [`ActiveGrid`] into full-resolution detections.
#[derive(Debug, Clone, Copy)]
pub struct BlobExtractor {
    min_component_area: f32,
}

impl BlobExtractor {
    pub fn new(min_component_area: f32) -> Self {
        Self { min_component_area }
    }

    /// All connected components, in row-major order of their first cell.
    pub fn components(&self, grid: &ActiveGrid) -> Vec<Blob> {
        let (rows, cols) = (grid.rows(), grid.cols());
        let mut visited = vec![false; rows * cols];
        let mut blobs = Vec::new();
        let mut queue = VecDeque::new();

        for row in 0..rows {
            for col in 0..cols {
                if visited[row * cols + col] || !grid.is_active(row, col) {
                    continue;
                }

                let mut blob = Blob {
                    min_col: col,
                    min_row: row,
                    max_col: col,
                    max_row: row,
                    cells: 0,
                };
                visited[row * cols + col] = true;
                queue.push_back((row, col));

                while let Some((r, c)) = queue.pop_front() {
                    blob.min_col = blob.min_col.min(c);
                    blob.max_col = blob.max_col.max(c);
                    blob.min_row = blob.min_row.min(r);
                    blob.max_row = blob.max_row.max(r);
                    blob.cells += 1;

                    for &(dr, dc) in &NEIGHBORS {
                        let (Some(nr), Some(nc)) = (r.checked_add_signed(dr), c.checked_add_signed(dc))
                        else {
                            continue;
                        };
                        if nr >= rows || nc >= cols {
                            continue;
                        }
                        let idx = nr * cols + nc;
                        if visited[idx] || !grid.is_active(nr, nc) {
                            continue;
                        }
                        visited[idx] = true;
                        queue.push_back((nr, nc));
                    }
                }
                blobs.push(blob);
            }
        }
        blobs
    }

    /// Components large enough to count as detections, rescaled to the source frame.
    pub fn extract(&self, grid: &ActiveGrid, scale_x: f32, scale_y: f32) -> Vec<Detection> {
        self.components(grid)
            .into_iter()
            .filter_map(|blob| {
                let rect = blob.to_rect(grid.bin(), scale_x, scale_y);
                if !rect.has_positive_size() || rect.area() < self.min_component_area {
                    trace!("dropping blob {blob:?} with area {}", rect.area());
                    return None;
                }
                Some(Detection::from_rect(rect))
            })
            .collect()
    }
}
