//! Style/content model of a splash screen.
//!
//! [`SplashModel`] is a value object: every mutation consumes the model and
//! returns the updated one, so a host can swap it in wholesale. The
//! background gradient is derived from its two colors and can only change
//! through [`SplashModel::set_gradient`] (or a preset).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use splash_engine::coords::FitMode;
use splash_engine::paint::{Color, ColorParseError};

use crate::error::StudioError;
use crate::preset::Preset;

pub const DEFAULT_AE_LOGO_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/c/cb/Adobe_After_Effects_CC_icon.svg";
pub const DEFAULT_CC_LOGO_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/4/4c/Adobe_Creative_Cloud_rainbow_icon.svg";
pub const DEFAULT_ARTWORK_URL: &str = "https://picsum.photos/seed/ae-splash/400/500";

// ── ColorValue ────────────────────────────────────────────────────────────

/// A color string that is known to parse.
///
/// Keeps the text the user supplied (so it round-trips unchanged) next to
/// the parsed color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorValue {
    text: String,
    color: Color,
}

impl ColorValue {
    pub fn parse(text: &str) -> Result<Self, ColorParseError> {
        let text = text.trim();
        let color = Color::parse_css(text)?;
        Ok(Self { text: text.to_string(), color })
    }

    /// Opaque `#rrggbb` color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            text: format!("#{r:02x}{g:02x}{b:02x}"),
            color: Color::from_srgb_u8(r, g, b, 255),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }
}

impl FromStr for ColorValue {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ColorValue {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ColorValue> for String {
    fn from(value: ColorValue) -> Self {
        value.text
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.text)
    }
}

// ── Enums ─────────────────────────────────────────────────────────────────

/// Scaling of the artwork inside its band.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkFit {
    Contain,
    #[default]
    Cover,
}

impl ArtworkFit {
    pub fn fit_mode(self) -> FitMode {
        match self {
            ArtworkFit::Contain => FitMode::Contain,
            ArtworkFit::Cover => FitMode::Cover,
        }
    }
}

/// Which background source is active.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    Solid,
    #[default]
    Gradient,
    Image,
}

/// The four asset fields of the model.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AssetSlot {
    AeLogo,
    CcLogo,
    Artwork,
    Background,
}

impl AssetSlot {
    pub const ALL: [AssetSlot; 4] =
        [AssetSlot::AeLogo, AssetSlot::CcLogo, AssetSlot::Artwork, AssetSlot::Background];
}

// ── BackgroundGradient ────────────────────────────────────────────────────

/// Two-color linear background gradient at a fixed 135° angle.
///
/// The CSS form is derived at construction; there is no way to set it
/// independently of the colors.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundGradient {
    start: ColorValue,
    end: ColorValue,
    css: String,
}

impl BackgroundGradient {
    pub const ANGLE_DEG: f32 = 135.0;

    pub fn new(start: ColorValue, end: ColorValue) -> Self {
        let css = format!("linear-gradient(135deg, {start} 0%, {end} 100%)");
        Self { start, end, css }
    }

    #[inline]
    pub fn start(&self) -> &ColorValue {
        &self.start
    }

    #[inline]
    pub fn end(&self) -> &ColorValue {
        &self.end
    }

    /// `linear-gradient(135deg, <start> 0%, <end> 100%)`.
    #[inline]
    pub fn css(&self) -> &str {
        &self.css
    }
}

// ── SplashModel ───────────────────────────────────────────────────────────

/// Everything that defines one splash screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ModelRepr", into = "ModelRepr")]
pub struct SplashModel {
    pub ae_logo_url: String,
    pub cc_logo_url: String,
    pub artwork_url: String,
    pub artwork_fit: ArtworkFit,
    pub background_url: String,
    pub bg_type: BackgroundType,
    pub bg_color: ColorValue,
    gradient: BackgroundGradient,
    pub title: String,
    pub subtitle: String,
    pub cc_logo_text: String,
    pub title_color: ColorValue,
    pub subtitle_color: ColorValue,
    pub cc_logo_text_color: ColorValue,
    pub preset: Preset,
    pub font_family: String,
}

impl Default for SplashModel {
    fn default() -> Self {
        Self {
            ae_logo_url: DEFAULT_AE_LOGO_URL.to_string(),
            cc_logo_url: DEFAULT_CC_LOGO_URL.to_string(),
            artwork_url: DEFAULT_ARTWORK_URL.to_string(),
            artwork_fit: ArtworkFit::Cover,
            background_url: String::new(),
            bg_type: BackgroundType::Gradient,
            bg_color: ColorValue::rgb(0x1a, 0x1a, 0x1a),
            gradient: BackgroundGradient::new(
                ColorValue::rgb(0x1a, 0x1a, 0x1a),
                ColorValue::rgb(0x00, 0x00, 0x00),
            ),
            title: "After Effects".to_string(),
            subtitle: "2025 Release".to_string(),
            cc_logo_text: "Adobe Creative Cloud".to_string(),
            title_color: ColorValue::rgb(0xff, 0xff, 0xff),
            subtitle_color: ColorValue::rgb(0xa1, 0xa1, 0xaa),
            cc_logo_text_color: ColorValue::rgb(0xa1, 0xa1, 0xaa),
            preset: Preset::Dark,
            font_family: "Inter, sans-serif".to_string(),
        }
    }
}

impl SplashModel {
    #[inline]
    pub fn gradient(&self) -> &BackgroundGradient {
        &self.gradient
    }

    /// Derived CSS gradient string.
    #[inline]
    pub fn bg_gradient(&self) -> &str {
        self.gradient.css()
    }

    /// Replaces both gradient colors and the derived gradient in one step.
    pub fn set_gradient(mut self, start: ColorValue, end: ColorValue) -> Self {
        self.gradient = BackgroundGradient::new(start, end);
        self
    }

    /// Merges `preset`'s patch into the model and tags it with the preset.
    pub fn apply_preset(self, preset: Preset) -> Self {
        let mut model = preset.patch().apply(self);
        model.preset = preset;
        model
    }

    #[inline]
    pub fn asset(&self, slot: AssetSlot) -> &str {
        match slot {
            AssetSlot::AeLogo => &self.ae_logo_url,
            AssetSlot::CcLogo => &self.cc_logo_url,
            AssetSlot::Artwork => &self.artwork_url,
            AssetSlot::Background => &self.background_url,
        }
    }

    pub fn with_asset(mut self, slot: AssetSlot, reference: impl Into<String>) -> Self {
        let field = match slot {
            AssetSlot::AeLogo => &mut self.ae_logo_url,
            AssetSlot::CcLogo => &mut self.cc_logo_url,
            AssetSlot::Artwork => &mut self.artwork_url,
            AssetSlot::Background => &mut self.background_url,
        };
        *field = reference.into();
        self
    }

    /// Restores one asset field to its session-start value.
    pub fn reset_asset(self, slot: AssetSlot) -> Self {
        let default = SplashModel::default();
        self.with_asset(slot, default.asset(slot))
    }

    /// Every non-empty asset reference, in slot order.
    pub fn asset_references(&self) -> impl Iterator<Item = &str> {
        AssetSlot::ALL.into_iter().map(move |s| self.asset(s)).filter(|r| !r.is_empty())
    }

    /// Reads a model saved as JSON. Missing fields take their default values.
    pub fn load(path: &Path) -> Result<Self, StudioError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| StudioError::Io { path: path.to_path_buf(), source })?;
        let model = serde_json::from_str(&text)
            .map_err(|source| StudioError::Model { path: path.to_path_buf(), source })?;
        log::debug!("loaded model from {}", path.display());
        Ok(model)
    }
}

// ── serde representation ─────────────────────────────────────────────────

/// Flat on-disk form. Omitted fields fall back to the default model and
/// `bgGradient` is always recomputed on load.
#[derive(Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ModelRepr {
    ae_logo_url: String,
    cc_logo_url: String,
    artwork_url: String,
    artwork_fit: ArtworkFit,
    background_url: String,
    bg_type: BackgroundType,
    bg_color: ColorValue,
    #[serde(skip_deserializing)]
    bg_gradient: String,
    gradient_start: ColorValue,
    gradient_end: ColorValue,
    title: String,
    subtitle: String,
    cc_logo_text: String,
    title_color: ColorValue,
    subtitle_color: ColorValue,
    cc_logo_text_color: ColorValue,
    preset: Preset,
    font_family: String,
}

impl Default for ModelRepr {
    fn default() -> Self {
        SplashModel::default().into()
    }
}

impl From<SplashModel> for ModelRepr {
    fn from(m: SplashModel) -> Self {
        let BackgroundGradient { start, end, css } = m.gradient;
        Self {
            ae_logo_url: m.ae_logo_url,
            cc_logo_url: m.cc_logo_url,
            artwork_url: m.artwork_url,
            artwork_fit: m.artwork_fit,
            background_url: m.background_url,
            bg_type: m.bg_type,
            bg_color: m.bg_color,
            bg_gradient: css,
            gradient_start: start,
            gradient_end: end,
            title: m.title,
            subtitle: m.subtitle,
            cc_logo_text: m.cc_logo_text,
            title_color: m.title_color,
            subtitle_color: m.subtitle_color,
            cc_logo_text_color: m.cc_logo_text_color,
            preset: m.preset,
            font_family: m.font_family,
        }
    }
}

impl From<ModelRepr> for SplashModel {
    fn from(r: ModelRepr) -> Self {
        Self {
            ae_logo_url: r.ae_logo_url,
            cc_logo_url: r.cc_logo_url,
            artwork_url: r.artwork_url,
            artwork_fit: r.artwork_fit,
            background_url: r.background_url,
            bg_type: r.bg_type,
            bg_color: r.bg_color,
            gradient: BackgroundGradient::new(r.gradient_start, r.gradient_end),
            title: r.title,
            subtitle: r.subtitle,
            cc_logo_text: r.cc_logo_text,
            title_color: r.title_color,
            subtitle_color: r.subtitle_color,
            cc_logo_text_color: r.cc_logo_text_color,
            preset: r.preset,
            font_family: r.font_family,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn color(s: &str) -> ColorValue {
        ColorValue::parse(s).unwrap()
    }

    // ── ColorValue ────────────────────────────────────────────────────────

    #[test]
    fn color_value_keeps_its_text() {
        let c = color("  rgba(255, 0, 0, 0.5) ");
        assert_eq!(c.as_str(), "rgba(255, 0, 0, 0.5)");
        assert!((c.color().a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn color_value_rejects_garbage() {
        assert!(ColorValue::parse("").is_err());
        assert!(ColorValue::parse("#12").is_err());
        assert!(ColorValue::parse("chartreuse-ish").is_err());
    }

    // ── gradient ──────────────────────────────────────────────────────────

    #[test]
    fn set_gradient_encodes_both_stops_at_135deg() {
        let m = SplashModel::default().set_gradient(color("#ff0000"), color("#00ff00"));
        assert_eq!(m.bg_gradient(), "linear-gradient(135deg, #ff0000 0%, #00ff00 100%)");
        assert_eq!(m.gradient().start().as_str(), "#ff0000");
        assert_eq!(m.gradient().end().as_str(), "#00ff00");
    }

    #[test]
    fn set_gradient_is_idempotent() {
        let once = SplashModel::default().set_gradient(color("#123"), color("#456"));
        let twice = once.clone().set_gradient(color("#123"), color("#456"));
        assert_eq!(once.bg_gradient(), twice.bg_gradient());
        assert_eq!(once, twice);
    }

    #[test]
    fn default_gradient_matches_default_colors() {
        let m = SplashModel::default();
        assert_eq!(m.bg_gradient(), "linear-gradient(135deg, #1a1a1a 0%, #000000 100%)");
    }

    // ── assets ────────────────────────────────────────────────────────────

    #[test]
    fn reset_asset_restores_only_that_field() {
        let edited = AssetSlot::ALL
            .into_iter()
            .fold(SplashModel::default(), |m, slot| m.with_asset(slot, "blob:splash/9"));
        let edited = SplashModel { title: "Premiere".into(), ..edited };

        for slot in AssetSlot::ALL {
            let reset = edited.clone().reset_asset(slot);
            assert_eq!(reset.asset(slot), SplashModel::default().asset(slot));

            let expected = edited.clone().with_asset(slot, SplashModel::default().asset(slot));
            assert_eq!(reset, expected);
            for other in AssetSlot::ALL.into_iter().filter(|s| *s != slot) {
                assert_eq!(reset.asset(other), "blob:splash/9");
            }
            assert_eq!(reset.title, "Premiere");
        }
    }

    #[test]
    fn asset_references_skip_empty_slots() {
        let model = SplashModel::default();
        let refs: Vec<&str> = model.asset_references().collect();
        assert_eq!(refs, vec![DEFAULT_AE_LOGO_URL, DEFAULT_CC_LOGO_URL, DEFAULT_ARTWORK_URL]);
    }

    // ── serde ─────────────────────────────────────────────────────────────

    #[test]
    fn json_uses_camel_case_and_writes_derived_gradient() {
        let v = serde_json::to_value(SplashModel::default()).unwrap();
        assert_eq!(v["aeLogoUrl"], DEFAULT_AE_LOGO_URL);
        assert_eq!(v["bgType"], "gradient");
        assert_eq!(v["artworkFit"], "cover");
        assert_eq!(v["preset"], "dark");
        assert_eq!(v["gradientStart"], "#1a1a1a");
        assert_eq!(v["bgGradient"], "linear-gradient(135deg, #1a1a1a 0%, #000000 100%)");
    }

    #[test]
    fn partial_json_falls_back_to_defaults_and_recomputes_gradient() {
        let json = r##"{
            "title": "Photoshop",
            "gradientStart": "#ffffff",
            "bgGradient": "linear-gradient(90deg, red, blue)"
        }"##;
        let m: SplashModel = serde_json::from_str(json).unwrap();
        assert_eq!(m.title, "Photoshop");
        assert_eq!(m.subtitle, "2025 Release");
        assert_eq!(m.bg_gradient(), "linear-gradient(135deg, #ffffff 0%, #000000 100%)");
    }

    #[test]
    fn invalid_color_in_json_is_rejected() {
        let err = serde_json::from_str::<SplashModel>(r#"{ "titleColor": "not-a-color" }"#);
        assert!(err.is_err());
    }

    #[test]
    fn load_reports_which_file_is_broken() {
        let path = std::env::temp_dir().join(format!("splash-model-{}.json", std::process::id()));
        std::fs::write(&path, "{ \"title\": 3 }").unwrap();
        let err = SplashModel::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(&err, StudioError::Model { path: p, .. } if *p == path), "{err}");

        let missing = SplashModel::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(missing, StudioError::Io { .. }));
    }

    #[test]
    fn json_round_trip_preserves_model() {
        let m = SplashModel::default()
            .apply_preset(Preset::Neon)
            .with_asset(AssetSlot::Background, "art/bg.png");
        let back: SplashModel = serde_json::from_str(&serde_json::to_string(&m).unwrap()).unwrap();
        assert_eq!(back, m);
    }
}
