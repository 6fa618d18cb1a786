//! Error types for the motion tracker.
//!
//! Only configuration and input-buffer problems are errors. Cold-start ticks,
//! empty detection sets and "no primary track" are ordinary outcomes.

use thiserror::Error;

/// Result type alias for the tracker crate
pub type Result<T> = std::result::Result<T, Error>;

/// A tuning knob outside its legal range. Raised once, when a configuration is accepted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("procWidth must be positive")]
    ZeroProcWidth,

    #[error("bin must be positive")]
    ZeroBin,

    #[error("matchMaxDistance must be positive and finite, got {0}")]
    InvalidMatchDistance(f32),

    #[error("minComponentArea must be non-negative and finite, got {0}")]
    InvalidMinArea(f32),

    #[error("iouThreshold must lie in [0, 1], got {0}")]
    InvalidIouThreshold(f32),

    #[error("{name} must lie in (0, 1], got {value}")]
    InvalidAlpha { name: &'static str, value: f32 },
}

/// Raw pixel data that does not describe a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("pixel buffer holds {actual} bytes, {width}x{height} with {channels} channels needs {expected}")]
    BufferSize {
        width: u32,
        height: u32,
        channels: u32,
        expected: usize,
        actual: usize,
    },
}

/// A staged tick that can no longer be committed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickError {
    #[error("tick staged from tick {staged_from} but tracker is at tick {current}")]
    Stale { staged_from: u64, current: u64 },
}

/// Errors that can occur anywhere in the crate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid frame: {0}")]
    Frame(#[from] FrameError),

    #[error("tick rejected: {0}")]
    Tick(#[from] TickError),
}
