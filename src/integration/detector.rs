//! Trait for landmark detectors that run alongside the motion tracker.

use crate::motion::Frame;
use crate::tracker::ExternalCues;

/// Trait for face, hand or pose detectors feeding the tracker.
///
/// Implement this trait to let a landmark model supply extra detection boxes
/// and, when it has a confident fix, the overlay anchor itself.
///
/// # Example
///
/// ```ignore
/// use motion_track::{Frame, ExternalCues, LandmarkSource};
///
/// struct FaceBoxes;
///
/// impl LandmarkSource for FaceBoxes {
///     type Error = std::io::Error;
///
///     fn locate(&mut self, frame: &Frame) -> Result<ExternalCues, Self::Error> {
///         Ok(ExternalCues::none())
///     }
/// }
/// ```
pub trait LandmarkSource {
    /// Error type for detection failures.
    type Error: std::fmt::Display;

    /// Inspect `frame` and report whatever landmarks were found.
    fn locate(&mut self, frame: &Frame) -> Result<ExternalCues, Self::Error>;
}

/// A source that never finds anything: pure motion tracking.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLandmarks;

impl LandmarkSource for NoLandmarks {
    type Error = std::convert::Infallible;

    fn locate(&mut self, _frame: &Frame) -> Result<ExternalCues, Self::Error> {
        Ok(ExternalCues::none())
    }
}
