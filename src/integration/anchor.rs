//! Overlay anchors and their frame-relative fallbacks.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::tracker::{PrimaryTrack, Rect};

/// Where the overlay goes when neither a landmark nor a track is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackAnchor {
    #[default]
    Center,
    Face,
    Hand,
    Feet,
    Body,
}

impl FallbackAnchor {
    /// Anchor position as fractions of frame width and height.
    pub fn fraction(&self) -> (f32, f32) {
        match self {
            FallbackAnchor::Center => (0.5, 0.5),
            FallbackAnchor::Face => (0.5, 0.18),
            FallbackAnchor::Hand => (0.68, 0.55),
            FallbackAnchor::Feet => (0.5, 0.75),
            FallbackAnchor::Body => (0.5, 0.25),
        }
    }

    pub fn resolve(&self, width: u32, height: u32) -> Point2<f32> {
        let (fx, fy) = self.fraction();
        Point2::new(width as f32 * fx, height as f32 * fy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorOrigin {
    Landmark,
    Track(u64),
    Fallback,
}

/// Final overlay anchor for a tick, in full-resolution coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub point: Point2<f32>,
    pub bbox: Option<Rect>,
    pub origin: AnchorOrigin,
}

impl Anchor {
    /// Landmark first, then the primary track, then the fallback position.
    pub fn resolve(
        landmark: Option<Point2<f32>>,
        primary: Option<&PrimaryTrack>,
        fallback: FallbackAnchor,
        width: u32,
        height: u32,
    ) -> Self {
        if let Some(point) = landmark {
            return Self {
                point,
                bbox: None,
                origin: AnchorOrigin::Landmark,
            };
        }
        match primary {
            Some(track) => Self {
                point: track.centroid,
                bbox: Some(track.bbox),
                origin: AnchorOrigin::Track(track.id),
            },
            None => Self {
                point: fallback.resolve(width, height),
                bbox: None,
                origin: AnchorOrigin::Fallback,
            },
        }
    }

    /// Reflect horizontally for a mirrored (selfie) preview.
    pub fn mirrored(&self, frame_width: f32) -> Self {
        Self {
            point: Point2::new(frame_width - self.point.x, self.point.y),
            bbox: self.bbox.map(|b| b.mirrored(frame_width)),
            origin: self.origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::TrackState;

    #[test]
    fn test_fallback_positions() {
        assert_eq!(FallbackAnchor::Center.resolve(200, 100), Point2::new(100.0, 50.0));
        assert_eq!(FallbackAnchor::Feet.resolve(200, 100), Point2::new(100.0, 75.0));
        assert_eq!(FallbackAnchor::Hand.fraction(), (0.68, 0.55));
    }

    #[test]
    fn test_resolution_order() {
        let primary = PrimaryTrack {
            id: 4,
            centroid: Point2::new(30.0, 40.0),
            bbox: Rect::new(20.0, 30.0, 20.0, 20.0),
            confidence: 0.7,
            state: TrackState::Tracked,
        };

        let a = Anchor::resolve(Some(Point2::new(1.0, 2.0)), Some(&primary), FallbackAnchor::Center, 100, 100);
        assert_eq!(a.origin, AnchorOrigin::Landmark);

        let a = Anchor::resolve(None, Some(&primary), FallbackAnchor::Center, 100, 100);
        assert_eq!(a.origin, AnchorOrigin::Track(4));
        assert_eq!(a.bbox, Some(primary.bbox));

        let a = Anchor::resolve(None, None, FallbackAnchor::Face, 100, 100);
        assert_eq!(a.origin, AnchorOrigin::Fallback);
        assert_eq!(a.point, Point2::new(50.0, 18.0));
    }

    #[test]
    fn test_mirrored_anchor() {
        let anchor = Anchor {
            point: Point2::new(10.0, 5.0),
            bbox: Some(Rect::new(0.0, 0.0, 20.0, 10.0)),
            origin: AnchorOrigin::Track(1),
        };
        let m = anchor.mirrored(100.0);
        assert_eq!(m.point, Point2::new(90.0, 5.0));
        assert_eq!(m.bbox, Some(Rect::new(80.0, 0.0, 20.0, 10.0)));
    }

    #[test]
    fn test_fallback_serde() {
        let anchor: FallbackAnchor = serde_json::from_str(r#""feet""#).unwrap();
        assert_eq!(anchor, FallbackAnchor::Feet);
    }
}
