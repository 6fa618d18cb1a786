//! Matching utilities for motion tracking.

use nalgebra::{Point2, distance};
use ndarray::Array2;

use crate::tracker::rect::{Rect, iou_batch};

/// Weight of the normalized centroid distance when ranking candidates.
pub const DISTANCE_WEIGHT: f32 = 0.2;

/// A detection for one tick, in full-resolution coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub bbox: Rect,
}

impl Detection {
    /// Create a detection from TLBR corners.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            bbox: Rect::from_tlbr(x1, y1, x2, y2),
        }
    }

    pub fn from_rect(bbox: Rect) -> Self {
        Self { bbox }
    }

    pub fn centroid(&self) -> Point2<f32> {
        self.bbox.centroid()
    }
}

/// Pairwise gating quantities between tracks (rows) and detections (columns).
#[derive(Debug, Clone)]
pub struct CostMatrices {
    pub iou: Array2<f32>,
    pub distance: Array2<f32>,
}

impl CostMatrices {
    pub fn compute(
        track_boxes: &[Rect],
        track_centroids: &[Point2<f32>],
        detections: &[Detection],
    ) -> Self {
        let det_boxes: Vec<Rect> = detections.iter().map(|d| d.bbox).collect();
        let mut dists = Array2::zeros((track_centroids.len(), detections.len()));
        for (i, c) in track_centroids.iter().enumerate() {
            for (j, d) in detections.iter().enumerate() {
                dists[[i, j]] = distance(c, &d.centroid());
            }
        }
        Self {
            iou: iou_batch(track_boxes, &det_boxes),
            distance: dists,
        }
    }

    /// Ranking score: IoU minus a penalty growing with centroid distance.
    pub fn score(&self, track: usize, det: usize, max_distance: f32) -> f32 {
        self.iou[[track, det]] - (self.distance[[track, det]] / max_distance) * DISTANCE_WEIGHT
    }
}

/// Acceptance gates for a ranked candidate.
#[derive(Debug, Clone, Copy)]
pub struct MatchGate {
    pub iou_threshold: f32,
    pub max_distance: f32,
}

impl MatchGate {
    /// Overlap OR proximity; the ranking score is never a gate.
    pub fn accepts(&self, iou: f32, distance: f32) -> bool {
        iou >= self.iou_threshold || distance < self.max_distance
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Greedy per-row assignment in row order.
///
/// Each track takes the best-scoring detection still available; ties keep the
/// lowest detection index. The candidate is then accepted or rejected by the
/// gate, and a rejected track does not consume its candidate.
pub fn greedy_assignment(costs: &CostMatrices, gate: MatchGate) -> AssignmentResult {
    let (num_rows, num_cols) = costs.iou.dim();
    let mut used = vec![false; num_cols];
    let mut matches = Vec::new();
    let mut unmatched_tracks = Vec::new();

    for row in 0..num_rows {
        let mut best: Option<(usize, f32)> = None;
        for col in (0..num_cols).filter(|&c| !used[c]) {
            let score = costs.score(row, col, gate.max_distance);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((col, score));
            }
        }

        match best {
            Some((col, _)) if gate.accepts(costs.iou[[row, col]], costs.distance[[row, col]]) => {
                used[col] = true;
                matches.push((row, col));
            }
            _ => unmatched_tracks.push(row),
        }
    }

    let unmatched_detections = used
        .iter()
        .enumerate()
        .filter_map(|(i, &u)| if u { None } else { Some(i) })
        .collect();

    AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const GATE: MatchGate = MatchGate {
        iou_threshold: 0.15,
        max_distance: 120.0,
    };

    fn costs(tracks: &[Rect], dets: &[Detection]) -> CostMatrices {
        let centroids: Vec<_> = tracks.iter().map(|r| r.centroid()).collect();
        CostMatrices::compute(tracks, &centroids, dets)
    }

    #[test]
    fn test_score_combines_iou_and_distance() {
        let tracks = [Rect::new(0.0, 0.0, 10.0, 10.0)];
        let dets = [Detection::from_rect(Rect::new(5.0, 5.0, 10.0, 10.0))];
        let c = costs(&tracks, &dets);
        let expected = 25.0 / 175.0 - (50.0f32.sqrt() / 120.0) * 0.2;
        assert_relative_eq!(c.score(0, 0, 120.0), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_inputs() {
        let c = costs(&[], &[Detection::new(0.0, 0.0, 10.0, 10.0)]);
        let result = greedy_assignment(&c, GATE);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_detections, vec![0]);

        let c = costs(&[Rect::new(0.0, 0.0, 10.0, 10.0)], &[]);
        let result = greedy_assignment(&c, GATE);
        assert_eq!(result.unmatched_tracks, vec![0]);
    }

    #[test]
    fn test_proximity_gate_without_overlap() {
        // disjoint boxes 30px apart still match on distance
        let tracks = [Rect::new(0.0, 0.0, 20.0, 20.0)];
        let dets = [Detection::from_rect(Rect::new(30.0, 0.0, 20.0, 20.0))];
        let result = greedy_assignment(&costs(&tracks, &dets), GATE);
        assert_eq!(result.matches, vec![(0, 0)]);
    }

    #[test]
    fn test_overlap_gate_beyond_distance() {
        // large boxes: 150px apart but IoU ~0.6
        let tracks = [Rect::new(0.0, 0.0, 600.0, 600.0)];
        let dets = [Detection::from_rect(Rect::new(150.0, 0.0, 600.0, 600.0))];
        let result = greedy_assignment(&costs(&tracks, &dets), GATE);
        assert_eq!(result.matches, vec![(0, 0)]);
    }

    #[test]
    fn test_far_detection_rejected() {
        let tracks = [Rect::new(0.0, 0.0, 20.0, 20.0)];
        let dets = [Detection::from_rect(Rect::new(300.0, 300.0, 20.0, 20.0))];
        let result = greedy_assignment(&costs(&tracks, &dets), GATE);
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched_tracks, vec![0]);
        assert_eq!(result.unmatched_detections, vec![0]);
    }

    #[test]
    fn test_greedy_follows_track_order() {
        // both tracks prefer detection 0; the first track gets it
        let tracks = [Rect::new(0.0, 0.0, 20.0, 20.0), Rect::new(2.0, 0.0, 20.0, 20.0)];
        let dets = [
            Detection::from_rect(Rect::new(1.0, 0.0, 20.0, 20.0)),
            Detection::from_rect(Rect::new(60.0, 0.0, 20.0, 20.0)),
        ];
        let result = greedy_assignment(&costs(&tracks, &dets), GATE);
        assert_eq!(result.matches, vec![(0, 0), (1, 1)]);
        assert!(result.unmatched_detections.is_empty());
    }

    #[test]
    fn test_ties_keep_first_detection() {
        let tracks = [Rect::new(50.0, 0.0, 20.0, 20.0)];
        let dets = [
            Detection::from_rect(Rect::new(20.0, 0.0, 20.0, 20.0)),
            Detection::from_rect(Rect::new(80.0, 0.0, 20.0, 20.0)),
        ];
        let result = greedy_assignment(&costs(&tracks, &dets), GATE);
        assert_eq!(result.matches, vec![(0, 0)]);
        assert_eq!(result.unmatched_detections, vec![1]);
    }
}
