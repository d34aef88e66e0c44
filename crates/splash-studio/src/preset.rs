use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ArtworkFit, BackgroundType, ColorValue, SplashModel};

/// Named color/background bundles.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Dark,
    Light,
    Neon,
    Creative,
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("unknown preset `{0}` (expected dark, light, neon or creative)")]
pub struct UnknownPreset(pub String);

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Dark, Preset::Light, Preset::Neon, Preset::Creative];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Dark => "dark",
            Preset::Light => "light",
            Preset::Neon => "neon",
            Preset::Creative => "creative",
        }
    }

    /// The fields this preset overrides.
    pub fn patch(self) -> PresetPatch {
        let rgb = ColorValue::rgb;
        let (bg, start, end, title, sub) = match self {
            Preset::Dark => (
                rgb(0x11, 0x11, 0x11),
                rgb(0x1e, 0x1e, 0x1e),
                rgb(0x0a, 0x0a, 0x0a),
                rgb(0xff, 0xff, 0xff),
                rgb(0xa1, 0xa1, 0xaa),
            ),
            Preset::Light => (
                rgb(0xf4, 0xf4, 0xf5),
                rgb(0xff, 0xff, 0xff),
                rgb(0xe4, 0xe4, 0xe7),
                rgb(0x18, 0x18, 0x1b),
                rgb(0x71, 0x71, 0x7a),
            ),
            Preset::Neon => (
                rgb(0x00, 0x00, 0x00),
                rgb(0x1a, 0x0b, 0x2e),
                rgb(0x00, 0x00, 0x00),
                rgb(0xd8, 0xb4, 0xfe),
                rgb(0x81, 0x8c, 0xf8),
            ),
            // The creative bundle was once radial; it is a 135° linear blend now
            // so `bgGradient` stays derivable from its two colors.
            Preset::Creative => (
                rgb(0x2e, 0x10, 0x65),
                rgb(0x4c, 0x1d, 0x95),
                rgb(0x1e, 0x1b, 0x4b),
                rgb(0xff, 0xff, 0xff),
                rgb(0xc4, 0xb5, 0xfd),
            ),
        };
        PresetPatch {
            bg_color: Some(bg),
            gradient: Some((start, end)),
            title_color: Some(title),
            subtitle_color: Some(sub.clone()),
            cc_logo_text_color: Some(sub),
            artwork_fit: Some(ArtworkFit::Cover),
            bg_type: Some(BackgroundType::Gradient),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

/// Partial model update. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetPatch {
    pub bg_color: Option<ColorValue>,
    pub gradient: Option<(ColorValue, ColorValue)>,
    pub title_color: Option<ColorValue>,
    pub subtitle_color: Option<ColorValue>,
    pub cc_logo_text_color: Option<ColorValue>,
    pub artwork_fit: Option<ArtworkFit>,
    pub bg_type: Option<BackgroundType>,
}

impl PresetPatch {
    pub fn apply(self, mut model: SplashModel) -> SplashModel {
        if let Some(c) = self.bg_color {
            model.bg_color = c;
        }
        if let Some(c) = self.title_color {
            model.title_color = c;
        }
        if let Some(c) = self.subtitle_color {
            model.subtitle_color = c;
        }
        if let Some(c) = self.cc_logo_text_color {
            model.cc_logo_text_color = c;
        }
        if let Some(fit) = self.artwork_fit {
            model.artwork_fit = fit;
        }
        if let Some(t) = self.bg_type {
            model.bg_type = t;
        }
        match self.gradient {
            Some((start, end)) => model.set_gradient(start, end),
            None => model,
        }
    }
}
