use crate::coords::{Rect, Vec2};

use super::Color;

/// Gradient spread behavior outside [0, 1] range.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum SpreadMode {
    /// Clamp to edge stops.
    #[default]
    Pad,
    /// Repeat the gradient pattern.
    Repeat,
    /// Mirror-repeat the gradient pattern.
    Reflect,
}

/// A single gradient stop.
///
/// `t` is expected in [0, 1]; the rasterizer clamps out-of-range values.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Linear gradient definition in logical pixel space.
///
/// Semantics:
/// - `start` and `end` are positions in the same coordinate space as geometry.
/// - Stop colors are premultiplied [`Color`]s; the rasterizer un-premultiplies
///   them because tiny-skia interpolates straight alpha.
/// - `spread` defines out-of-range behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
    pub spread: SpreadMode,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, stops: Vec<ColorStop>, spread: SpreadMode) -> Self {
        Self { start, end, stops, spread }
    }

    /// Builds the gradient line CSS `linear-gradient(<angle>deg, ...)` uses for `rect`.
    ///
    /// CSS angles run clockwise from "to top" (0deg). The line passes through
    /// the rectangle center and is long enough that the 0% and 100% stops
    /// touch the two opposite corners: `|w·sin θ| + |h·cos θ|`.
    pub fn css_angle(rect: Rect, angle_deg: f32, stops: Vec<ColorStop>) -> Self {
        let theta = angle_deg.to_radians();
        let dir = Vec2::new(theta.sin(), -theta.cos());
        let len = (rect.size.x * theta.sin()).abs() + (rect.size.y * theta.cos()).abs();
        let c = rect.center();
        let half = dir * (len * 0.5);
        Self::new(c - half, c + half, stops, SpreadMode::Pad)
    }

    /// Returns true when the gradient definition is structurally usable.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self.stops.iter().all(|s| s.t.is_finite() && s.color.is_finite())
            && self.stops.len() >= 2
            && (self.end.x != self.start.x || self.end.y != self.start.y)
    }
}

/// Circular radial gradient centered at `center`, reaching its last stop at `radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub radius: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(center: Vec2, radius: f32, stops: Vec<ColorStop>) -> Self {
        Self { center, radius, stops }
    }

    /// CSS `radial-gradient(circle at center, ...)` sizing: the circle reaches
    /// the farthest corner of `rect`.
    pub fn farthest_corner(rect: Rect, stops: Vec<ColorStop>) -> Self {
        let radius = (rect.size * 0.5).length();
        Self::new(rect.center(), radius, stops)
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.radius.is_finite()
            && self.radius > 0.0
            && self.stops.len() >= 2
            && self.stops.iter().all(|s| s.t.is_finite() && s.color.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops() -> Vec<ColorStop> {
        vec![ColorStop::new(0.0, Color::white()), ColorStop::new(1.0, Color::black())]
    }

    #[test]
    fn css_135deg_runs_top_left_to_bottom_right() {
        let g = LinearGradient::css_angle(Rect::new(0.0, 0.0, 700.0, 500.0), 135.0, stops());
        // Line length = (700 + 500)·√½; direction (√½, √½).
        assert!(g.start.x < 350.0 && g.start.y < 250.0);
        assert!(g.end.x > 350.0 && g.end.y > 250.0);
        let len = (g.end - g.start).length();
        assert!((len - 1200.0 * std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-2);
        assert!(g.is_valid());
    }

    #[test]
    fn css_90deg_is_horizontal_across_the_width() {
        let g = LinearGradient::css_angle(Rect::new(0.0, 0.0, 700.0, 500.0), 90.0, stops());
        assert!((g.start.x - 0.0).abs() < 1e-3);
        assert!((g.end.x - 700.0).abs() < 1e-3);
        assert!((g.start.y - 250.0).abs() < 1e-3);
    }

    #[test]
    fn farthest_corner_radius_reaches_the_corner() {
        let g = RadialGradient::farthest_corner(Rect::new(0.0, 0.0, 700.0, 500.0), stops());
        assert!((g.radius - (350.0f32.hypot(250.0))).abs() < 1e-3);
        assert_eq!(g.center, Vec2::new(350.0, 250.0));
    }
}
