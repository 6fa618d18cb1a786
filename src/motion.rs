//! Motion front-end: frame reduction, temporal differencing and blob extraction.
//!
//! Everything here is stateless. The previous reduced frame is carried by
//! [`TrackerState`](crate::tracker::TrackerState) between ticks.

mod blob;
mod detector;
mod frame;
mod reducer;

pub use blob::{Blob, BlobExtractor};
pub use detector::{ActiveGrid, MotionDetector};
pub use frame::Frame;
pub use reducer::{FrameReducer, MIN_WORKING_HEIGHT, ReducedFrame};
