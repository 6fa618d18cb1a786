//! Tick-to-tick tracker state and the pure per-tick step.

use log::{debug, trace};
use nalgebra::Point2;

use crate::motion::{BlobExtractor, Frame, FrameReducer, MotionDetector, ReducedFrame};
use crate::tracker::associator::{AssociationOutcome, Associator};
use crate::tracker::config::ValidatedConfig;
use crate::tracker::matching::Detection;
use crate::tracker::rect::Rect;
use crate::tracker::store::TrackStore;
use crate::tracker::track::Track;
use crate::tracker::track_state::TrackState;

/// Everything carried from one tick to the next.
#[derive(Debug, Clone, Default)]
pub struct TrackerState {
    pub store: TrackStore,
    /// Reduced frame of the last tick, the baseline for differencing
    pub previous: Option<ReducedFrame>,
    /// Number of ticks advanced so far
    pub tick: u64,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Results supplied by a landmark detector for the current frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalCues {
    /// Boxes associated ahead of the motion detections
    pub detections: Vec<Detection>,
    /// An anchor found by the landmark detector; suppresses primary selection
    pub anchor: Option<Point2<f32>>,
}

impl ExternalCues {
    pub fn none() -> Self {
        Self::default()
    }
}

/// The track chosen as overlay anchor for a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimaryTrack {
    pub id: u64,
    pub centroid: Point2<f32>,
    pub bbox: Rect,
    pub confidence: f32,
    /// `Coasting` when the anchor is a prediction rather than a fresh match
    pub state: TrackState,
}

impl From<&Track> for PrimaryTrack {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id,
            centroid: track.centroid,
            bbox: track.bbox,
            confidence: track.confidence,
            state: track.state(),
        }
    }
}

/// Read-only view of one tick's outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSnapshot {
    pub tick: u64,
    pub timestamp_ms: u64,
    /// Live tracks in store order
    pub tracks: Vec<Track>,
    /// `None` on cold-start ticks, when no track qualifies, or when an
    /// external anchor was supplied
    pub primary: Option<PrimaryTrack>,
    /// False on cold-start ticks, when no motion could be measured
    pub motion_ready: bool,
    pub association: AssociationOutcome,
}

/// Run one tick with no external cues.
pub fn advance(
    state: TrackerState,
    frame: &Frame,
    config: &ValidatedConfig,
) -> (TrackerState, TrackSnapshot) {
    advance_with(state, frame, config, &ExternalCues::none())
}

/// Run one tick: reduce, difference, extract blobs, associate, select primary.
///
/// On a cold-start tick (no comparable previous frame) the store is left
/// untouched and no primary is reported. External boxes without a finite,
/// positive size are dropped before association.
pub fn advance_with(
    mut state: TrackerState,
    frame: &Frame,
    config: &ValidatedConfig,
    cues: &ExternalCues,
) -> (TrackerState, TrackSnapshot) {
    let reducer = FrameReducer::new(config.proc_width);
    let detector = MotionDetector::new(config.motion_threshold, config.bin);
    let extractor = BlobExtractor::new(config.min_component_area);

    let reduced = reducer.reduce(frame);
    let previous = state.previous.take();
    let motion_ready = MotionDetector::can_compare(previous.as_ref(), &reduced);

    let mut association = AssociationOutcome::default();
    if motion_ready {
        let grid = detector.detect(previous.as_ref(), &reduced);
        let mut detections: Vec<Detection> = cues
            .detections
            .iter()
            .filter(|det| {
                let keep = det.bbox.has_positive_size();
                if !keep {
                    debug!("dropping external detection {:?}", det.bbox);
                }
                keep
            })
            .copied()
            .collect();
        detections.extend(extractor.extract(&grid, reduced.scale_x, reduced.scale_y));
        association = Associator::new(config).associate(&mut state.store, &detections);
        trace!(
            "tick {}: {} active cells, {} detections, {} tracks",
            state.tick + 1,
            grid.active_cells(),
            detections.len(),
            state.store.len()
        );
    }

    let primary = if motion_ready && cues.anchor.is_none() {
        state.store.select_primary().map(PrimaryTrack::from)
    } else {
        None
    };

    state.previous = Some(reduced);
    state.tick += 1;

    let snapshot = TrackSnapshot {
        tick: state.tick,
        timestamp_ms: frame.timestamp_ms(),
        tracks: state.store.tracks().to_vec(),
        primary,
        motion_ready,
        association,
    };
    (state, snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::config::TrackerConfig;
    use image::{Rgba, RgbaImage};

    fn frame_with_square(x: u32, y: u32, size: u32, ts: u64) -> Frame {
        let mut image = RgbaImage::from_pixel(240, 135, Rgba([0, 0, 0, 255]));
        for py in y..(y + size).min(135) {
            for px in x..(x + size).min(240) {
                image.put_pixel(px, py, Rgba([255, 255, 255, 255]));
            }
        }
        Frame::new(image, ts)
    }

    #[test]
    fn test_first_tick_is_cold_start() {
        let config = TrackerConfig::default().validated().unwrap();
        let (state, snap) = advance(TrackerState::new(), &frame_with_square(90, 38, 60, 0), &config);
        assert!(!snap.motion_ready);
        assert!(snap.tracks.is_empty());
        assert!(snap.primary.is_none());
        assert_eq!(state.tick, 1);
        assert!(state.previous.is_some());
    }

    #[test]
    fn test_square_appearing_spawns_track() {
        let config = TrackerConfig::default().validated().unwrap();
        let black = Frame::new(RgbaImage::from_pixel(240, 135, Rgba([0, 0, 0, 255])), 0);
        let (state, _) = advance(TrackerState::new(), &black, &config);
        let (_, snap) = advance(state, &frame_with_square(90, 38, 60, 33), &config);

        assert!(snap.motion_ready);
        assert_eq!(snap.tracks.len(), 1);
        assert_eq!(snap.association.spawned, vec![1]);
        let primary = snap.primary.unwrap();
        assert_eq!(primary.id, 1);
        assert_eq!(primary.state, TrackState::Tentative);
        assert_eq!(snap.timestamp_ms, 33);
    }

    #[test]
    fn test_resize_is_cold_start() {
        let config = TrackerConfig::default().validated().unwrap();
        let (state, _) = advance(TrackerState::new(), &frame_with_square(0, 0, 0, 0), &config);
        let (state, snap) = advance(state, &frame_with_square(90, 38, 60, 1), &config);
        assert_eq!(snap.primary.map(|p| p.id), Some(1));

        let tall = Frame::new(RgbaImage::from_pixel(240, 300, Rgba([255, 255, 255, 255])), 2);
        let (state, snap) = advance(state, &tall, &config);
        assert!(!snap.motion_ready);
        // the store survives, but its boxes belong to the old resolution
        assert_eq!(snap.tracks.len(), 1);
        assert!(snap.primary.is_none());
        assert_eq!(state.previous.as_ref().map(|p| p.height()), Some(300));
    }

    #[test]
    fn test_degenerate_external_boxes_are_dropped() {
        let config = TrackerConfig::default().validated().unwrap();
        let black = Frame::new(RgbaImage::from_pixel(240, 135, Rgba([0, 0, 0, 255])), 0);
        let (state, _) = advance(TrackerState::new(), &black, &config);

        let cues = ExternalCues {
            detections: vec![
                Detection::new(50.0, 50.0, 20.0, 50.0),
                Detection::new(10.0, 10.0, 10.0, 40.0),
                Detection::from_rect(Rect::new(f32::NAN, 0.0, 30.0, 30.0)),
                Detection::new(100.0, 20.0, 140.0, 60.0),
            ],
            anchor: None,
        };
        let (_, snap) = advance_with(state, &black, &config, &cues);
        assert_eq!(snap.tracks.len(), 1);
        assert_eq!(snap.association.spawned, vec![1]);
        assert_eq!(snap.tracks[0].bbox, Rect::new(100.0, 20.0, 40.0, 40.0));
        assert!(snap.tracks.iter().all(|t| t.bbox.has_positive_size()));
    }

    #[test]
    fn test_external_detections_come_first() {
        let config = TrackerConfig::default().validated().unwrap();
        let black = Frame::new(RgbaImage::from_pixel(240, 135, Rgba([0, 0, 0, 255])), 0);
        let (state, _) = advance(TrackerState::new(), &black, &config);

        let cues = ExternalCues {
            detections: vec![Detection::new(0.0, 0.0, 30.0, 30.0)],
            anchor: None,
        };
        let (_, snap) = advance_with(state, &frame_with_square(150, 60, 60, 1), &config, &cues);
        assert_eq!(snap.tracks.len(), 2);
        assert_eq!(snap.tracks[0].bbox, Rect::new(0.0, 0.0, 30.0, 30.0));
        assert_eq!(snap.tracks[0].id, 1);
    }

    #[test]
    fn test_external_anchor_suppresses_primary() {
        let config = TrackerConfig::default().validated().unwrap();
        let black = Frame::new(RgbaImage::from_pixel(240, 135, Rgba([0, 0, 0, 255])), 0);
        let (state, _) = advance(TrackerState::new(), &black, &config);

        let cues = ExternalCues {
            detections: Vec::new(),
            anchor: Some(Point2::new(120.0, 40.0)),
        };
        let (_, snap) = advance_with(state, &frame_with_square(90, 38, 60, 1), &config, &cues);
        assert_eq!(snap.tracks.len(), 1);
        assert!(snap.primary.is_none());
    }
}
