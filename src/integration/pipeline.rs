//! TrackerPipeline for combining landmark detection with motion tracking.

use log::warn;

use crate::error::{self, ConfigError};
use crate::integration::anchor::{Anchor, FallbackAnchor};
use crate::integration::detector::{LandmarkSource, NoLandmarks};
use crate::motion::Frame;
use crate::tracker::{ExternalCues, MotionTracker, TrackSnapshot, TrackerConfig};

/// Frame-rate estimate from consecutive frame timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<u64>,
    fps: Option<u32>,
}

impl FrameClock {
    /// Record a frame timestamp and return the current estimate.
    ///
    /// Repeated or decreasing timestamps keep the previous estimate.
    pub fn tick(&mut self, timestamp_ms: u64) -> Option<u32> {
        if let Some(last) = self.last_ms {
            let dt = timestamp_ms.saturating_sub(last);
            if dt > 0 {
                self.fps = Some((1000.0 / dt as f64).round() as u32);
            }
        }
        self.last_ms = Some(timestamp_ms);
        self.fps
    }

    pub fn fps(&self) -> Option<u32> {
        self.fps
    }
}

/// Everything an overlay compositor needs for one frame.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub snapshot: TrackSnapshot,
    pub anchor: Anchor,
    pub fps: Option<u32>,
}

/// A combined tracker that runs a landmark source and the motion tracker per frame.
pub struct TrackerPipeline<S: LandmarkSource> {
    source: S,
    tracker: MotionTracker,
    fallback: FallbackAnchor,
    clock: FrameClock,
}

impl TrackerPipeline<NoLandmarks> {
    /// Motion tracking only.
    pub fn motion_only(config: TrackerConfig, fallback: FallbackAnchor) -> Result<Self, ConfigError> {
        Self::new(NoLandmarks, config, fallback)
    }
}

impl<S: LandmarkSource> TrackerPipeline<S> {
    pub fn new(source: S, config: TrackerConfig, fallback: FallbackAnchor) -> Result<Self, ConfigError> {
        Ok(Self {
            source,
            tracker: MotionTracker::new(config)?,
            fallback,
            clock: FrameClock::default(),
        })
    }

    /// Process a single frame.
    ///
    /// A failing landmark source is logged and the tick continues on motion alone.
    pub fn process_frame(&mut self, frame: &Frame) -> PipelineOutput {
        let cues = match self.source.locate(frame) {
            Ok(cues) => cues,
            Err(e) => {
                warn!("landmark source failed, tracking motion only: {e}");
                ExternalCues::none()
            }
        };

        let snapshot = self.tracker.update_with(frame, &cues);
        let anchor = Anchor::resolve(
            cues.anchor,
            snapshot.primary.as_ref(),
            self.fallback,
            frame.width(),
            frame.height(),
        );
        let fps = self.clock.tick(frame.timestamp_ms());

        PipelineOutput {
            snapshot,
            anchor,
            fps,
        }
    }

    /// Process a raw RGBA buffer, rejecting one whose length does not match its size.
    pub fn process_rgba(
        &mut self,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        timestamp_ms: u64,
    ) -> error::Result<PipelineOutput> {
        let frame = Frame::from_rgba(width, height, pixels, timestamp_ms)?;
        Ok(self.process_frame(&frame))
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn tracker(&self) -> &MotionTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut MotionTracker {
        &mut self.tracker
    }

    pub fn set_fallback(&mut self, fallback: FallbackAnchor) {
        self.fallback = fallback;
    }
}
