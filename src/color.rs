//! Color model for pixel rendering.
//!
//! Colors carry floating-point channels conventionally in [0, 255] with an
//! optional alpha. Channel arithmetic is deliberately unclamped; values are
//! rounded and clamped only when written into an output bitmap (see
//! `render::bitmap`). Operations return new values, nothing mutates in place.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default per-channel tolerance for approximate color equality.
pub const EQ_TOLERANCE: f32 = 8.0;

/// Default tolerance for alpha comparison (alpha treated as opacity).
pub const ALPHA_TOLERANCE: f32 = 0.05;

/// Default tolerance for hue comparison (hue normalized to [0, 1)).
pub const HUE_TOLERANCE: f32 = 1.0 / 16.0;

// =============================================================================
// Color
// =============================================================================

/// An RGB color with optional alpha.
///
/// Channels are conventionally in [0, 255] but nothing enforces the range;
/// interpolation between out-of-range endpoints stays out of range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f32>,
}

/// Hue, saturation and lightness, each component in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Color {
    /// Opaque color from integer-valued channels.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: None }
    }

    /// Color with explicit alpha.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a: Some(a) }
    }

    /// Convert HSL (each component in [0, 1]) to a color with channels scaled
    /// to [0, 255]. Output is not clamped or rounded.
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        if s == 0.0 {
            // Achromatic
            let v = l * 255.0;
            return Self::rgb(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self::rgb(
            hue_to_channel(p, q, h + 1.0 / 3.0) * 255.0,
            hue_to_channel(p, q, h) * 255.0,
            hue_to_channel(p, q, h - 1.0 / 3.0) * 255.0,
        )
    }

    /// Convert to HSL with each component in [0, 1].
    ///
    /// The degenerate case max == min (achromatic) yields h = s = 0.
    pub fn to_hsl(self) -> Hsl {
        let r = self.r / 255.0;
        let g = self.g / 255.0;
        let b = self.b / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let d = max - min;
        let s = d / (1.0 - (2.0 * l - 1.0).abs());

        // Standard 6-sector hue, normalized to [0, 1]
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        } / 6.0;

        Hsl { h, s, l }
    }

    /// Linear interpolation per channel: `self + round((other - self) * t)`.
    ///
    /// The delta is rounded to the nearest integer before adding, so for
    /// integer-valued endpoints `lerp(c1, c2, 0) == c1` and
    /// `lerp(c1, c2, 1) == c2` hold exactly. Alpha is not interpolated;
    /// the result is always opaque-by-default (a = None). No clamping.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::rgb(
            self.r + ((other.r - self.r) * t).round(),
            self.g + ((other.g - self.g) * t).round(),
            self.b + ((other.b - self.b) * t).round(),
        )
    }

    /// Approximate equality with the default tolerance, ignoring alpha.
    pub fn approx_eq(self, other: Self) -> bool {
        self.approx_eq_within(other, EQ_TOLERANCE, false)
    }

    /// Approximate equality: each of |Δr|, |Δg|, |Δb| strictly below
    /// `tolerance`, and when `compare_alpha` is set, |Δa| below 0.05
    /// (a missing alpha compares as fully opaque, 1.0).
    pub fn approx_eq_within(self, other: Self, tolerance: f32, compare_alpha: bool) -> bool {
        let cmp = |a: f32, b: f32, t: f32| (a - b).abs() < t;

        cmp(self.r, other.r, tolerance)
            && cmp(self.g, other.g, tolerance)
            && cmp(self.b, other.b, tolerance)
            && (!compare_alpha
                || cmp(
                    self.a.unwrap_or(1.0),
                    other.a.unwrap_or(1.0),
                    ALPHA_TOLERANCE,
                ))
    }

    /// Compare only the derived hue component, with the default tolerance.
    pub fn hue_eq(self, other: Self) -> bool {
        self.hue_eq_within(other, HUE_TOLERANCE)
    }

    /// Compare only the derived hue component.
    pub fn hue_eq_within(self, other: Self, tolerance: f32) -> bool {
        (self.to_hsl().h - other.to_hsl().h).abs() < tolerance
    }

    /// CSS-style string: `rgb(r, g, b)` without alpha, `rgba(r,g,b,a)` with.
    pub fn to_css_string(self) -> String {
        match self.a {
            None => format!("rgb({}, {}, {})", self.r, self.g, self.b),
            Some(a) => format!("rgba({},{},{},{})", self.r, self.g, self.b, a),
        }
    }
}

/// Map a hue position to one channel value via the six-piece linear segments
/// of the standard HSL→RGB formula. `t` is wrapped into [0, 1) first.
fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let mut t = t;
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl fmt::Display for Color {
    /// Fixed-width `[  r,  g,  b]` debug form, each channel right-aligned to
    /// 3 characters with zero-decimal rounding.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:>3},{:>3},{:>3}]",
            self.r.round(),
            self.g.round(),
            self.b.round()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hsl_primaries() {
        // Hue 0 at full saturation, half lightness is pure red
        let red = Color::from_hsl(0.0, 1.0, 0.5);
        assert!(red.approx_eq(Color::rgb(255.0, 0.0, 0.0)));

        let green = Color::from_hsl(1.0 / 3.0, 1.0, 0.5);
        assert!(green.approx_eq(Color::rgb(0.0, 255.0, 0.0)));

        let blue = Color::from_hsl(2.0 / 3.0, 1.0, 0.5);
        assert!(blue.approx_eq(Color::rgb(0.0, 0.0, 255.0)));
    }

    #[test]
    fn test_from_hsl_achromatic() {
        let gray = Color::from_hsl(0.7, 0.0, 0.5);
        assert_eq!(gray.r, gray.g);
        assert_eq!(gray.g, gray.b);
        assert!((gray.r - 127.5).abs() < 0.01);
    }

    #[test]
    fn test_to_hsl_achromatic() {
        let hsl = Color::rgb(100.0, 100.0, 100.0).to_hsl();
        assert_eq!(hsl.h, 0.0);
        assert_eq!(hsl.s, 0.0);
        assert!((hsl.l - 100.0 / 255.0).abs() < 0.001);
    }

    #[test]
    fn test_hsl_round_trip() {
        let samples = [
            Color::rgb(12.0, 200.0, 97.0),
            Color::rgb(255.0, 0.0, 0.0),
            Color::rgb(3.0, 3.0, 250.0),
            Color::rgb(180.0, 180.0, 60.0),
        ];
        for c in samples {
            let hsl = c.to_hsl();
            let back = Color::from_hsl(hsl.h, hsl.s, hsl.l).to_hsl();
            assert!((hsl.h - back.h).abs() < 0.01, "hue drift for {c}");
            assert!((hsl.s - back.s).abs() < 0.01, "saturation drift for {c}");
            assert!((hsl.l - back.l).abs() < 0.01, "lightness drift for {c}");
        }
    }

    #[test]
    fn test_lerp_endpoints_exact() {
        let c1 = Color::rgb(10.0, 250.0, 3.0);
        let c2 = Color::rgb(200.0, 0.0, 99.0);
        assert_eq!(c1.lerp(c2, 0.0), c1);
        assert_eq!(c1.lerp(c2, 1.0), c2);
    }

    #[test]
    fn test_lerp_midpoint() {
        let c = Color::rgb(0.0, 0.0, 0.0).lerp(Color::rgb(100.0, 50.0, 255.0), 0.5);
        assert_eq!(c, Color::rgb(50.0, 25.0, 128.0));
    }

    #[test]
    fn test_lerp_does_not_clamp() {
        // Out-of-range endpoints stay out of range
        let c = Color::rgb(0.0, 0.0, 0.0).lerp(Color::rgb(300.0, -100.0, 0.0), 1.0);
        assert_eq!(c.r, 300.0);
        assert_eq!(c.g, -100.0);
    }

    #[test]
    fn test_approx_eq_reflexive_and_symmetric() {
        let c1 = Color::rgb(40.0, 80.0, 120.0);
        let c2 = Color::rgb(45.0, 84.0, 113.0);
        assert!(c1.approx_eq(c1));
        assert_eq!(c1.approx_eq(c2), c2.approx_eq(c1));
    }

    #[test]
    fn test_approx_eq_tolerance_is_strict() {
        let c1 = Color::rgb(0.0, 0.0, 0.0);
        assert!(c1.approx_eq(Color::rgb(7.0, 7.0, 7.0)));
        assert!(!c1.approx_eq(Color::rgb(8.0, 0.0, 0.0)));
    }

    #[test]
    fn test_approx_eq_alpha() {
        let c1 = Color::rgba(10.0, 10.0, 10.0, 0.5);
        let c2 = Color::rgba(10.0, 10.0, 10.0, 0.9);
        assert!(c1.approx_eq_within(c2, EQ_TOLERANCE, false));
        assert!(!c1.approx_eq_within(c2, EQ_TOLERANCE, true));
        assert!(c1.approx_eq_within(Color::rgba(10.0, 10.0, 10.0, 0.52), EQ_TOLERANCE, true));
    }

    #[test]
    fn test_hue_eq() {
        // Two reds of different brightness share a hue
        let dark_red = Color::rgb(128.0, 0.0, 0.0);
        let bright_red = Color::rgb(255.0, 10.0, 10.0);
        assert!(dark_red.hue_eq(bright_red));

        let blue = Color::rgb(0.0, 0.0, 255.0);
        assert!(!dark_red.hue_eq(blue));
    }

    #[test]
    fn test_css_string() {
        assert_eq!(
            Color::rgb(255.0, 128.0, 0.0).to_css_string(),
            "rgb(255, 128, 0)"
        );
        assert_eq!(
            Color::rgba(255.0, 128.0, 0.0, 0.5).to_css_string(),
            "rgba(255,128,0,0.5)"
        );
    }

    #[test]
    fn test_display_fixed_width() {
        assert_eq!(format!("{}", Color::rgb(255.0, 8.0, 0.0)), "[255,  8,  0]");
        assert_eq!(format!("{}", Color::rgb(1.4, 99.6, 10.0)), "[  1,100, 10]");
    }

    #[test]
    fn test_serde_round_trip() {
        let c = Color::rgb(12.0, 34.0, 56.0);
        let json = serde_json::to_string(&c).unwrap();
        // Alpha is omitted entirely when absent
        assert!(!json.contains("\"a\""));
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
