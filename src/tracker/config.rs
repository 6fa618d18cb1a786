//! Tuning knobs for the whole pipeline.

use std::ops::Deref;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the motion tracker.
///
/// Deserializes from camelCase keys (`procWidth`, `maxMiss`, ...); missing keys
/// take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackerConfig {
    /// Working width frames are reduced to
    pub proc_width: u32,
    /// Summed R+G+B delta a pixel must exceed to count as changed
    pub motion_threshold: u32,
    /// Side of a grid block in working pixels
    pub bin: u32,
    /// Minimum full-resolution blob area in px²
    pub min_component_area: f32,
    /// Centroid distance gate, also the distance normalizer when ranking
    pub match_max_distance: f32,
    /// IoU gate
    pub iou_threshold: f32,
    /// Exponential smoothing weight given to a matched detection
    pub smoothing_alpha: f32,
    /// Smoothing weight for a track matching again after misses; `None` uses `smoothing_alpha`
    pub reacquire_alpha: Option<f32>,
    /// Consecutive misses a track survives
    pub max_miss: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            proc_width: 240,
            motion_threshold: 50,
            bin: 10,
            min_component_area: 500.0,
            match_max_distance: 120.0,
            iou_threshold: 0.15,
            smoothing_alpha: 0.25,
            reacquire_alpha: None,
            max_miss: 7,
        }
    }
}

impl TrackerConfig {
    pub fn with_proc_width(mut self, proc_width: u32) -> Self {
        self.proc_width = proc_width;
        self
    }

    pub fn with_motion_threshold(mut self, threshold: u32) -> Self {
        self.motion_threshold = threshold;
        self
    }

    pub fn with_bin(mut self, bin: u32) -> Self {
        self.bin = bin;
        self
    }

    pub fn with_min_component_area(mut self, area: f32) -> Self {
        self.min_component_area = area;
        self
    }

    pub fn with_match_max_distance(mut self, distance: f32) -> Self {
        self.match_max_distance = distance;
        self
    }

    pub fn with_iou_threshold(mut self, threshold: f32) -> Self {
        self.iou_threshold = threshold;
        self
    }

    pub fn with_smoothing_alpha(mut self, alpha: f32) -> Self {
        self.smoothing_alpha = alpha;
        self
    }

    pub fn with_reacquire_alpha(mut self, alpha: f32) -> Self {
        self.reacquire_alpha = Some(alpha);
        self
    }

    pub fn with_max_miss(mut self, max_miss: u32) -> Self {
        self.max_miss = max_miss;
        self
    }

    /// Smoothing weight for a track that has missed `miss` ticks before this match.
    pub fn alpha_for(&self, miss: u32) -> f32 {
        match self.reacquire_alpha {
            Some(alpha) if miss > 0 => alpha,
            _ => self.smoothing_alpha,
        }
    }

    /// Check every knob. Per-tick code assumes a validated configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.proc_width == 0 {
            return Err(ConfigError::ZeroProcWidth);
        }
        if self.bin == 0 {
            return Err(ConfigError::ZeroBin);
        }
        if !(self.match_max_distance.is_finite() && self.match_max_distance > 0.0) {
            return Err(ConfigError::InvalidMatchDistance(self.match_max_distance));
        }
        if !(self.min_component_area.is_finite() && self.min_component_area >= 0.0) {
            return Err(ConfigError::InvalidMinArea(self.min_component_area));
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(ConfigError::InvalidIouThreshold(self.iou_threshold));
        }
        check_alpha("smoothingAlpha", self.smoothing_alpha)?;
        if let Some(alpha) = self.reacquire_alpha {
            check_alpha("reacquireAlpha", alpha)?;
        }
        debug!("tracker config accepted: {self:?}");
        Ok(())
    }

    /// Validate and seal the configuration for per-tick use.
    pub fn validated(self) -> Result<ValidatedConfig, ConfigError> {
        self.validate()?;
        Ok(ValidatedConfig(self))
    }
}

/// A [`TrackerConfig`] that passed [`TrackerConfig::validate`].
///
/// Only [`TrackerConfig::validated`] builds one, so the per-tick step never
/// sees a zero `bin` or `procWidth`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig(TrackerConfig);

impl ValidatedConfig {
    pub fn into_inner(self) -> TrackerConfig {
        self.0
    }
}

impl Deref for ValidatedConfig {
    type Target = TrackerConfig;

    fn deref(&self) -> &TrackerConfig {
        &self.0
    }
}

impl TryFrom<TrackerConfig> for ValidatedConfig {
    type Error = ConfigError;

    fn try_from(config: TrackerConfig) -> Result<Self, ConfigError> {
        config.validated()
    }
}

fn check_alpha(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidAlpha { name, value })
    }
}
