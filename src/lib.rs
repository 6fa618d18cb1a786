//! Detector-free multi-object tracking for camera overlays.
//!
//! Moving regions are found by differencing consecutive downsampled frames,
//! grouped into blobs, and associated frame-to-frame into persistent tracks.
//! The best track of each tick is exposed as an anchor for overlay placement
//! when no landmark detector is available.
//!
//! ```rust,ignore
//! use motion_track::{Frame, MotionTracker, TrackerConfig};
//!
//! let mut tracker = MotionTracker::new(TrackerConfig::default())?;
//! let snapshot = tracker.update(&Frame::from_rgba(640, 480, pixels, ts)?);
//! if let Some(primary) = snapshot.primary {
//!     println!("anchor at {:?}", primary.centroid);
//! }
//! ```

pub mod error;
pub mod integration;
pub mod motion;
pub mod tracker;

pub use error::{ConfigError, Error, FrameError, Result, TickError};
pub use integration::{Anchor, AnchorOrigin, FallbackAnchor, LandmarkSource, TrackerPipeline};
pub use motion::{ActiveGrid, Blob, BlobExtractor, Frame, FrameReducer, MotionDetector, ReducedFrame};
pub use tracker::{
    Detection, ExternalCues, MotionTracker, PrimaryTrack, Rect, StagedTick, Track, TrackColor,
    TrackSnapshot, TrackState, TrackStore, TrackerConfig, TrackerState, ValidatedConfig, advance,
    advance_with,
};
