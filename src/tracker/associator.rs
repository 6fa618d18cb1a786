//! Per-tick association of detections to tracks.

use log::trace;

use crate::tracker::config::TrackerConfig;
use crate::tracker::matching::{self, AssignmentResult, CostMatrices, Detection, MatchGate};
use crate::tracker::rect::Rect;
use crate::tracker::store::TrackStore;

/// What one association pass did to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationOutcome {
    /// `(track id, detection index)` pairs
    pub matched: Vec<(u64, usize)>,
    pub missed: Vec<u64>,
    pub spawned: Vec<u64>,
    pub pruned: Vec<u64>,
}

/// Predict, match, update, age, spawn and prune, in that order.
#[derive(Debug, Clone)]
pub struct Associator {
    gate: MatchGate,
    config: TrackerConfig,
}

impl Associator {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            gate: MatchGate {
                iou_threshold: config.iou_threshold,
                max_distance: config.match_max_distance,
            },
            config: config.clone(),
        }
    }

    pub fn associate(&self, store: &mut TrackStore, detections: &[Detection]) -> AssociationOutcome {
        // Step 1: predict every track forward by its last velocity
        for track in store.tracks_mut() {
            track.predict();
        }

        // Step 2: rank candidates and greedily match in store order
        let boxes: Vec<Rect> = store.iter().map(|t| t.bbox).collect();
        let centroids: Vec<_> = store.iter().map(|t| t.centroid).collect();
        let costs = CostMatrices::compute(&boxes, &centroids, detections);
        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::greedy_assignment(&costs, self.gate);

        let mut outcome = AssociationOutcome::default();

        // Step 3: smooth matched tracks towards their detection
        for (itrack, idet) in matches {
            let track = &mut store.tracks_mut()[itrack];
            let alpha = self.config.alpha_for(track.miss);
            trace!(
                "track {} matched detection {idet} (iou {:.3}, dist {:.1})",
                track.id,
                costs.iou[[itrack, idet]],
                costs.distance[[itrack, idet]]
            );
            track.apply_match(&detections[idet], alpha);
            outcome.matched.push((track.id, idet));
        }

        // Step 4: age the rest, leaving them at their predicted position
        for itrack in unmatched_tracks {
            let track = &mut store.tracks_mut()[itrack];
            track.mark_missed();
            outcome.missed.push(track.id);
        }

        // Step 5: every leftover detection starts a track
        for idet in unmatched_detections {
            outcome.spawned.push(store.spawn(&detections[idet]));
        }

        // Step 6: evict tracks that coasted too long
        outcome.pruned = store.prune(self.config.max_miss);
        outcome
    }
}
