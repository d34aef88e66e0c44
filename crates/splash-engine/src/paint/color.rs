use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are expected to be multiplied by `a` (premultiplied alpha).
///
/// Values coming from CSS-style strings are sRGB bytes; they are stored
/// unconverted (the rasterizer composites in the same space the browser does).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex color `{0}`")]
    InvalidHex(String),
    #[error("invalid rgb()/rgba() color `{0}`")]
    InvalidFunction(String),
    #[error("unsupported color syntax `{0}`")]
    Unsupported(String),
}

impl Color {
    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    #[inline]
    pub const fn black() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 }
    }

    #[inline]
    pub const fn white() -> Self {
        Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 }
    }

    /// Creates a premultiplied color from straight sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: (r.clamp(0.0, 1.0)) * a,
            g: (g.clamp(0.0, 1.0)) * a,
            b: (b.clamp(0.0, 1.0)) * a,
            a,
        }
    }

    /// Returns a straight-alpha representation.
    ///
    /// For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Straight-alpha sRGB bytes, rounded.
    pub fn to_srgb_u8(self) -> [u8; 4] {
        let (r, g, b, a) = self.to_straight();
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(r), q(g), q(b), q(a)]
    }

    /// Multiplies the whole color (including alpha) by `opacity`.
    ///
    /// This is the premultiplied equivalent of CSS `opacity` on a single layer.
    #[inline]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let o = opacity.clamp(0.0, 1.0);
        Self { r: self.r * o, g: self.g * o, b: self.b * o, a: self.a * o }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Parses a CSS color string.
    ///
    /// Accepted: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
    /// `rgba(r, g, b, a)` (alpha in `[0, 1]`), and the keywords
    /// `transparent`, `black`, `white`.
    pub fn parse_css(s: &str) -> Result<Self, ColorParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(s.to_string()));
        }
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "transparent" => return Ok(Self::transparent()),
            "black" => return Ok(Self::black()),
            "white" => return Ok(Self::white()),
            _ => {}
        }
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_args(args).ok_or_else(|| ColorParseError::InvalidFunction(s.to_string()));
        }
        Err(ColorParseError::Unsupported(s.to_string()))
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_css(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_srgb_u8();
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let [r, g, b, a] = match hex.len() {
        3 => [nibble(0)?, nibble(1)?, nibble(2)?, 255],
        4 => [nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?],
        6 => [byte(0)?, byte(2)?, byte(4)?, 255],
        8 => [byte(0)?, byte(2)?, byte(4)?, byte(6)?],
        _ => return None,
    };
    Some(Color::from_srgb_u8(r, g, b, a))
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |p: &str| -> Option<f32> {
        let v: f32 = p.parse().ok()?;
        (0.0..=255.0).contains(&v).then_some(v / 255.0)
    };
    match parts.as_slice() {
        [r, g, b] => Some(Color::from_straight(channel(r)?, channel(g)?, channel(b)?, 1.0)),
        [r, g, b, a] => {
            let a: f32 = a.parse().ok()?;
            if !(0.0..=1.0).contains(&a) {
                return None;
            }
            Some(Color::from_straight(channel(r)?, channel(g)?, channel(b)?, a))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Color::parse_css("#ffffff").unwrap(), Color::white());
        assert_eq!(Color::parse_css("#000").unwrap(), Color::black());
        assert_eq!(Color::parse_css("#1a1a1a").unwrap().to_srgb_u8(), [0x1a, 0x1a, 0x1a, 255]);
    }

    #[test]
    fn hex_alpha_is_premultiplied() {
        let c = Color::parse_css("#ffffff80").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
        assert!((c.r - c.a).abs() < 1e-6);
    }

    #[test]
    fn parses_rgba_function() {
        let c = Color::parse_css("rgba(0, 0, 0, 0.5)").unwrap();
        assert_eq!(c, Color::from_straight(0.0, 0.0, 0.0, 0.5));
        assert_eq!(Color::parse_css("RGB(255,255,255)").unwrap(), Color::white());
    }

    #[test]
    fn rejects_malformed_strings() {
        assert_eq!(Color::parse_css("  "), Err(ColorParseError::Empty));
        assert!(matches!(Color::parse_css("#12"), Err(ColorParseError::InvalidHex(_))));
        assert!(matches!(Color::parse_css("#gggggg"), Err(ColorParseError::InvalidHex(_))));
        assert!(matches!(Color::parse_css("rgb(300, 0, 0)"), Err(ColorParseError::InvalidFunction(_))));
        assert!(matches!(Color::parse_css("hsl(0, 0%, 0%)"), Err(ColorParseError::Unsupported(_))));
    }

    #[test]
    fn display_round_trips_through_hex() {
        assert_eq!(Color::parse_css("#A1A1AA").unwrap().to_string(), "#a1a1aa");
    }

    #[test]
    fn opacity_scales_all_channels() {
        let c = Color::white().with_opacity(0.4);
        assert!((c.a - 0.4).abs() < 1e-6);
        assert!((c.g - 0.4).abs() < 1e-6);
    }
}
