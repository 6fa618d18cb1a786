//! Stateful wrapper around [`advance_with`].

use log::debug;

use crate::error::{ConfigError, TickError};
use crate::motion::Frame;
use crate::tracker::config::{TrackerConfig, ValidatedConfig};
use crate::tracker::state::{ExternalCues, TrackSnapshot, TrackerState, advance_with};
use crate::tracker::store::TrackStore;

/// A tick computed against a copy of the tracker state, not yet committed.
///
/// Dropping it abandons the tick without touching the tracker.
#[derive(Debug, Clone)]
pub struct StagedTick {
    base_tick: u64,
    state: TrackerState,
    snapshot: TrackSnapshot,
}

impl StagedTick {
    /// Snapshot this tick will publish if committed.
    pub fn snapshot(&self) -> &TrackSnapshot {
        &self.snapshot
    }
}

pub struct MotionTracker {
    state: TrackerState,
    config: ValidatedConfig,
}

impl MotionTracker {
    pub fn new(config: TrackerConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_validated(config.validated()?))
    }

    pub fn with_validated(config: ValidatedConfig) -> Self {
        Self {
            state: TrackerState::new(),
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn store(&self) -> &TrackStore {
        &self.state.store
    }

    pub fn tick(&self) -> u64 {
        self.state.tick
    }

    /// Process one frame with no external cues.
    pub fn update(&mut self, frame: &Frame) -> TrackSnapshot {
        self.update_with(frame, &ExternalCues::none())
    }

    pub fn update_with(&mut self, frame: &Frame, cues: &ExternalCues) -> TrackSnapshot {
        let state = std::mem::take(&mut self.state);
        let (state, snapshot) = advance_with(state, frame, &self.config, cues);
        self.state = state;
        snapshot
    }

    /// Compute a tick without committing it.
    pub fn stage(&self, frame: &Frame, cues: &ExternalCues) -> StagedTick {
        let (state, snapshot) = advance_with(self.state.clone(), frame, &self.config, cues);
        StagedTick {
            base_tick: self.state.tick,
            state,
            snapshot,
        }
    }

    /// Apply a staged tick in one step.
    ///
    /// Fails if another tick was committed since the tick was staged.
    pub fn commit(&mut self, staged: StagedTick) -> Result<TrackSnapshot, TickError> {
        if staged.base_tick != self.state.tick {
            return Err(TickError::Stale {
                staged_from: staged.base_tick,
                current: self.state.tick,
            });
        }
        self.state = staged.state;
        Ok(staged.snapshot)
    }

    /// Forget all tracks and the differencing baseline. Ids keep increasing.
    pub fn reset(&mut self) {
        debug!("tracker reset at tick {}", self.state.tick);
        self.state.previous = None;
        let next_id = self.state.store.next_id();
        self.state.store = TrackStore::starting_at(next_id);
    }
}
