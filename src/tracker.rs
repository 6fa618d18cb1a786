mod associator;
mod config;
mod matching;
mod motion_tracker;
mod rect;
mod state;
mod store;
mod track;
mod track_state;

pub use associator::{AssociationOutcome, Associator};
pub use config::{TrackerConfig, ValidatedConfig};
pub use matching::{AssignmentResult, CostMatrices, Detection, MatchGate, greedy_assignment};
pub use motion_tracker::{MotionTracker, StagedTick};
pub use rect::{Rect, iou_batch};
pub use state::{ExternalCues, PrimaryTrack, TrackSnapshot, TrackerState, advance, advance_with};
pub use store::{TrackStore, primary_score};
pub use track::{CONFIDENCE_STEP, INITIAL_CONFIDENCE, Track, TrackColor};
pub use track_state::TrackState;
