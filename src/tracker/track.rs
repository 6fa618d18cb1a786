//! Single motion track.

use nalgebra::{Point2, Vector2};

use crate::tracker::matching::Detection;
use crate::tracker::rect::Rect;
use crate::tracker::track_state::TrackState;

/// Confidence of a freshly spawned track.
pub const INITIAL_CONFIDENCE: f32 = 0.5;
/// Confidence gained per matched tick.
pub const CONFIDENCE_STEP: f32 = 0.1;

/// Display color, derived from the track id only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackColor {
    /// Hue in degrees, `(id * 47) mod 360`
    pub hue: u16,
}

impl TrackColor {
    pub const SATURATION: f32 = 0.8;
    pub const LIGHTNESS: f32 = 0.5;

    pub fn for_id(id: u64) -> Self {
        Self {
            hue: ((id % 360) * 47 % 360) as u16,
        }
    }

    /// CSS color string, e.g. `hsl(47 80% 50%)`.
    pub fn to_css(&self) -> String {
        format!(
            "hsl({} {}% {}%)",
            self.hue,
            (Self::SATURATION * 100.0).round(),
            (Self::LIGHTNESS * 100.0).round()
        )
    }

    pub fn to_rgb(&self) -> [u8; 3] {
        let s = Self::SATURATION;
        let l = Self::LIGHTNESS;
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = f32::from(self.hue) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match self.hue / 60 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        [r, g, b].map(|v| ((v + m) * 255.0).round() as u8)
    }
}

/// A persistent, smoothed estimate of one moving region.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Unique track identifier, never reused within a store
    pub id: u64,
    /// Smoothed box, always centered on `centroid`
    pub bbox: Rect,
    pub centroid: Point2<f32>,
    /// Smoothed centroid displacement of the last match, in px per tick
    pub velocity: Vector2<f32>,
    /// Consecutive ticks without a match
    pub miss: u32,
    /// Number of matched ticks, counting the spawn
    pub age: u32,
    pub confidence: f32,
    pub color: TrackColor,
}

impl Track {
    /// Start a track on an unmatched detection.
    pub fn spawn(id: u64, detection: &Detection) -> Self {
        Self {
            id,
            bbox: detection.bbox,
            centroid: detection.centroid(),
            velocity: Vector2::zeros(),
            miss: 0,
            age: 1,
            confidence: INITIAL_CONFIDENCE,
            color: TrackColor::for_id(id),
        }
    }

    pub fn state(&self) -> TrackState {
        if self.miss > 0 {
            TrackState::Coasting
        } else if self.age <= 1 {
            TrackState::Tentative
        } else {
            TrackState::Tracked
        }
    }

    /// Advance by the last velocity estimate, keeping the size.
    pub fn predict(&mut self) {
        self.centroid += self.velocity;
        self.bbox = Rect::from_center(self.centroid, self.bbox.width, self.bbox.height);
    }

    /// Blend the matched detection into the (predicted) geometry.
    pub fn apply_match(&mut self, detection: &Detection, alpha: f32) {
        let target = detection.centroid();
        let next = self.centroid * (1.0 - alpha) + target.coords * alpha;
        let width = self.bbox.width * (1.0 - alpha) + detection.bbox.width * alpha;
        let height = self.bbox.height * (1.0 - alpha) + detection.bbox.height * alpha;

        self.velocity = next - self.centroid;
        self.centroid = next;
        self.bbox = Rect::from_center(next, width, height);
        self.miss = 0;
        self.age += 1;
        self.confidence = (self.confidence + CONFIDENCE_STEP).min(1.0);
    }

    /// Record a tick without a match. Geometry stays as predicted.
    pub fn mark_missed(&mut self) {
        self.miss += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn det(x: f32, y: f32, w: f32, h: f32) -> Detection {
        Detection::from_rect(Rect::new(x, y, w, h))
    }

    #[test]
    fn test_spawn_defaults() {
        let track = Track::spawn(3, &det(10.0, 20.0, 40.0, 60.0));
        assert_eq!(track.centroid, Point2::new(30.0, 50.0));
        assert_eq!(track.velocity, Vector2::zeros());
        assert_eq!((track.miss, track.age), (0, 1));
        assert_eq!(track.confidence, 0.5);
        assert_eq!(track.state(), TrackState::Tentative);
        assert_eq!(track.color.hue, 141);
    }

    #[test]
    fn test_apply_match_smooths() {
        let mut track = Track::spawn(1, &det(0.0, 0.0, 100.0, 100.0));
        track.apply_match(&det(40.0, 0.0, 60.0, 100.0), 0.25);

        // centroid 50 → 0.75*50 + 0.25*70
        assert_relative_eq!(track.centroid.x, 55.0);
        assert_relative_eq!(track.centroid.y, 50.0);
        assert_relative_eq!(track.bbox.width, 90.0);
        assert_relative_eq!(track.velocity.x, 5.0);
        assert_relative_eq!(track.velocity.y, 0.0);
        assert_eq!(track.bbox.centroid(), track.centroid);
        assert_eq!((track.miss, track.age), (0, 2));
        assert_relative_eq!(track.confidence, 0.6);
        assert_eq!(track.state(), TrackState::Tracked);
    }

    #[test]
    fn test_confidence_caps_at_one() {
        let mut track = Track::spawn(1, &det(0.0, 0.0, 10.0, 10.0));
        for _ in 0..20 {
            track.apply_match(&det(0.0, 0.0, 10.0, 10.0), 0.25);
        }
        assert_eq!(track.confidence, 1.0);
    }

    #[test]
    fn test_predict_and_miss() {
        let mut track = Track::spawn(1, &det(0.0, 0.0, 10.0, 10.0));
        track.velocity = Vector2::new(2.0, -1.0);
        track.predict();
        track.mark_missed();
        assert_eq!(track.centroid, Point2::new(7.0, 4.0));
        assert_eq!(track.bbox.to_tlwh(), [2.0, -1.0, 10.0, 10.0]);
        assert_eq!(track.miss, 1);
        assert_eq!(track.age, 1);
        assert_eq!(track.confidence, 0.5);
        assert_eq!(track.state(), TrackState::Coasting);
    }

    #[test]
    fn test_color_from_id() {
        assert_eq!(TrackColor::for_id(1).hue, 47);
        assert_eq!(TrackColor::for_id(8).hue, 16);
        assert_eq!(TrackColor::for_id(1).to_css(), "hsl(47 80% 50%)");
        let [r, g, b] = TrackColor { hue: 0 }.to_rgb();
        assert!(r > 200);
        assert_eq!(g, b);
        assert!(g < 30);
        let [r, g, b] = TrackColor { hue: 120 }.to_rgb();
        assert!(g > r && g > b);
    }
}
