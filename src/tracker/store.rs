//! Ordered track storage and lifecycle.

use log::debug;

use crate::tracker::matching::Detection;
use crate::tracker::track::Track;

/// Bias added to confidence when weighting a track's area for primary selection.
pub const PRIMARY_CONFIDENCE_BIAS: f32 = 0.5;
/// Score penalty per missed tick for primary selection.
pub const PRIMARY_MISS_PENALTY: f32 = 500.0;

/// Primary-selection score: confidence-weighted area, heavily penalized by misses.
pub fn primary_score(track: &Track) -> f32 {
    track.bbox.area() * (PRIMARY_CONFIDENCE_BIAS + track.confidence)
        - track.miss as f32 * PRIMARY_MISS_PENALTY
}

/// All live tracks of a session, in creation order.
///
/// Ids start at 1 and are never reused, even after the track is pruned.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackStore {
    tracks: Vec<Track>,
    next_id: u64,
}

impl Default for TrackStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackStore {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 1,
        }
    }

    /// An empty store whose first spawned track gets `next_id`.
    pub fn starting_at(next_id: u64) -> Self {
        Self {
            tracks: Vec::new(),
            next_id: next_id.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub(crate) fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }

    pub fn get(&self, id: u64) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Id the next spawned track will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Start a new track at the end of the store and return its id.
    pub fn spawn(&mut self, detection: &Detection) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let track = Track::spawn(id, detection);
        debug!("spawned track {id} at {:?}", track.bbox.to_tlwh());
        self.tracks.push(track);
        id
    }

    /// Drop every track whose miss count exceeds `max_miss`. Returns the dropped ids.
    pub fn prune(&mut self, max_miss: u32) -> Vec<u64> {
        let mut removed = Vec::new();
        self.tracks.retain(|t| {
            if t.miss > max_miss {
                removed.push(t.id);
                false
            } else {
                true
            }
        });
        if !removed.is_empty() {
            debug!("pruned tracks {removed:?}");
        }
        removed
    }

    /// The best overlay anchor, or `None` when the store is empty.
    ///
    /// Ties go to the earliest track in store order.
    pub fn select_primary(&self) -> Option<&Track> {
        let mut best: Option<(&Track, f32)> = None;
        for track in &self.tracks {
            let score = primary_score(track);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((track, score));
            }
        }
        best.map(|(track, _)| track)
    }
}
