//! Integration module for connecting landmark detectors and overlay compositors
//! with the motion tracker.
//!
//! A [`LandmarkSource`] may supply detection boxes and an anchor of its own;
//! the [`TrackerPipeline`] merges them with motion tracking and always hands
//! the compositor an [`Anchor`], falling back to a frame-relative position.

mod anchor;
mod detector;
mod pipeline;

pub use anchor::{Anchor, AnchorOrigin, FallbackAnchor};
pub use detector::{LandmarkSource, NoLandmarks};
pub use pipeline::{FrameClock, PipelineOutput, TrackerPipeline};
