//! Trust score rendering
//!
//! Maps a score in [0, 100] to a ring offset (for a circular gauge), a band,
//! a color, a label and an emoji. A single five-band scheme is used
//! everywhere a score is shown.

use std::f64::consts::PI;
use std::fmt;

/// Geometry of the circular score gauge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    /// Outer radius
    pub radius: f64,
    /// Stroke width of the ring
    pub stroke_width: f64,
}

impl RingGeometry {
    /// Radius of the stroke centre line
    pub fn normalized_radius(&self) -> f64 {
        self.radius - self.stroke_width / 2.0
    }

    /// Circumference of the stroke centre line
    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.normalized_radius()
    }

    /// Dash offset leaving `score` percent of the ring drawn
    ///
    /// `ring_offset(0) == circumference()` and `ring_offset(100) == 0`.
    pub fn ring_offset(&self, score: u8) -> f64 {
        let score = score.min(100);
        self.circumference() * f64::from(100 - score) / 100.0
    }
}

impl Default for RingGeometry {
    fn default() -> Self {
        Self {
            radius: 100.0,
            stroke_width: 18.0,
        }
    }
}

/// Trust band a score falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrustBand {
    /// 0–20
    VeryLow,
    /// 21–40
    Low,
    /// 41–60
    Moderate,
    /// 61–80
    High,
    /// 81–100
    VeryHigh,
}

impl TrustBand {
    /// Band for a score (clamped to 100)
    pub fn for_score(score: u8) -> Self {
        match score.min(100) {
            0..=20 => TrustBand::VeryLow,
            21..=40 => TrustBand::Low,
            41..=60 => TrustBand::Moderate,
            61..=80 => TrustBand::High,
            _ => TrustBand::VeryHigh,
        }
    }

    /// Short machine name
    pub fn as_str(&self) -> &'static str {
        match self {
            TrustBand::VeryLow => "very-low",
            TrustBand::Low => "low",
            TrustBand::Moderate => "moderate",
            TrustBand::High => "high",
            TrustBand::VeryHigh => "very-high",
        }
    }

    /// Hex color used for the ring and score text
    pub fn color(&self) -> &'static str {
        match self {
            TrustBand::VeryLow => "#B91C1C",
            TrustBand::Low => "#EA580C",
            TrustBand::Moderate => "#D97706",
            TrustBand::High => "#16A34A",
            TrustBand::VeryHigh => "#059669",
        }
    }

    /// Human-readable verdict line
    pub fn label(&self) -> &'static str {
        match self {
            TrustBand::VeryLow => "Very Low Trust Score - Likely Misinformation",
            TrustBand::Low => "Low Trust Score - Exercise Caution",
            TrustBand::Moderate => "Moderate Trust Score - Some Verification Needed",
            TrustBand::High => "High Trust Score - Generally Reliable",
            TrustBand::VeryHigh => "Very High Trust Score - Well Supported",
        }
    }

    /// Emoji shown next to the label
    pub fn emoji(&self) -> &'static str {
        match self {
            TrustBand::VeryLow => "\u{26D4}",
            TrustBand::Low => "\u{26A0}\u{FE0F}",
            TrustBand::Moderate => "\u{1F914}",
            TrustBand::High => "\u{1F44D}",
            TrustBand::VeryHigh => "\u{2705}",
        }
    }
}

impl fmt::Display for TrustBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to draw a score
#[derive(Debug, Clone, PartialEq)]
pub struct TrustScoreDescriptor {
    /// Clamped score
    pub score: u8,
    /// Ring circumference
    pub circumference: f64,
    /// Dash offset for the ring
    pub ring_offset: f64,
    /// Band the score falls into
    pub band: TrustBand,
    /// Hex color
    pub color: &'static str,
    /// Verdict line
    pub label: &'static str,
    /// Emoji
    pub emoji: &'static str,
}

/// Pure score → descriptor renderer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrustScoreRenderer {
    geometry: RingGeometry,
}

impl TrustScoreRenderer {
    /// Renderer for a custom gauge geometry
    pub fn new(geometry: RingGeometry) -> Self {
        Self { geometry }
    }

    /// Gauge geometry in use
    pub fn geometry(&self) -> RingGeometry {
        self.geometry
    }

    /// Render a score; values outside [0, 100] are clamped
    ///
    /// # Examples
    ///
    /// ```
    /// use factcheck_domain::{TrustBand, TrustScoreRenderer};
    ///
    /// let renderer = TrustScoreRenderer::default();
    /// let descriptor = renderer.render(25);
    /// assert_eq!(descriptor.band, TrustBand::Low);
    /// assert_eq!(renderer.render(100).ring_offset, 0.0);
    /// ```
    pub fn render(&self, score: i64) -> TrustScoreDescriptor {
        let score = score.clamp(0, 100) as u8;
        let band = TrustBand::for_score(score);

        TrustScoreDescriptor {
            score,
            circumference: self.geometry.circumference(),
            ring_offset: self.geometry.ring_offset(score),
            band,
            color: band.color(),
            label: band.label(),
            emoji: band.emoji(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ring_offset_endpoints() {
        let renderer = TrustScoreRenderer::default();
        let c = renderer.geometry().circumference();

        assert_eq!(renderer.render(0).ring_offset, c);
        assert_eq!(renderer.render(100).ring_offset, 0.0);
        assert!((c - 2.0 * PI * 91.0).abs() < 1e-9);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(TrustBand::for_score(0), TrustBand::VeryLow);
        assert_eq!(TrustBand::for_score(20), TrustBand::VeryLow);
        assert_eq!(TrustBand::for_score(21), TrustBand::Low);
        assert_eq!(TrustBand::for_score(40), TrustBand::Low);
        assert_eq!(TrustBand::for_score(41), TrustBand::Moderate);
        assert_eq!(TrustBand::for_score(60), TrustBand::Moderate);
        assert_eq!(TrustBand::for_score(61), TrustBand::High);
        assert_eq!(TrustBand::for_score(80), TrustBand::High);
        assert_eq!(TrustBand::for_score(81), TrustBand::VeryHigh);
        assert_eq!(TrustBand::for_score(100), TrustBand::VeryHigh);
    }

    #[test]
    fn test_out_of_range_clamped() {
        let renderer = TrustScoreRenderer::default();
        assert_eq!(renderer.render(-20).score, 0);
        assert_eq!(renderer.render(250).score, 100);
        assert_eq!(renderer.render(250).band, TrustBand::VeryHigh);
    }

    #[test]
    fn test_descriptor_matches_band() {
        let descriptor = TrustScoreRenderer::default().render(25);
        assert_eq!(descriptor.band, TrustBand::Low);
        assert_eq!(descriptor.color, TrustBand::Low.color());
        assert_eq!(descriptor.label, TrustBand::Low.label());
    }

    proptest! {
        #[test]
        fn prop_ring_offset_strictly_decreasing(a in 0u8..=100, b in 0u8..=100) {
            prop_assume!(a < b);
            let renderer = TrustScoreRenderer::default();
            prop_assert!(renderer.render(a as i64).ring_offset > renderer.render(b as i64).ring_offset);
        }

        #[test]
        fn prop_band_non_decreasing(a in 0u8..=100, b in 0u8..=100) {
            prop_assume!(a <= b);
            prop_assert!(TrustBand::for_score(a) <= TrustBand::for_score(b));
        }
    }
}
