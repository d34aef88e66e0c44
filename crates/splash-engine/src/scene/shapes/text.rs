use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Requested font weight. The font system falls back to the closest loaded face.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Medium,
    Bold,
}

/// Horizontal alignment of each line inside `max_width`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

/// Styling for one run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// CSS-style font specifier, e.g. `"Inter, sans-serif"`.
    pub family: String,
    pub weight: FontWeight,
    /// Font size in logical pixels.
    pub size: f32,
    /// Line height as a multiple of the font's natural line height.
    pub line_height: f32,
    /// Extra advance after every glyph, in logical pixels.
    pub letter_spacing: f32,
    pub color: Color,
}

impl TextStyle {
    pub fn new(family: impl Into<String>, size: f32, color: Color) -> Self {
        Self {
            family: family.into(),
            weight: FontWeight::Regular,
            size,
            line_height: 1.0,
            letter_spacing: 0.0,
            color,
        }
    }

    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn letter_spacing(mut self, letter_spacing: f32) -> Self {
        self.letter_spacing = letter_spacing;
        self
    }
}

/// A paragraph inside a [`TextCmd`]. `gap_after` separates it from the next run.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub style: TextStyle,
    pub gap_after: f32,
}

/// Vertically stacked text runs.
///
/// Runs are laid out top to bottom starting at `origin`; each run wraps
/// inside `max_width` and the next run begins below the previous run's
/// measured height. Layout therefore depends on font metrics only, which
/// keeps the renderer independent of loaded fonts.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub origin: Vec2,
    pub max_width: Option<f32>,
    pub align: TextAlign,
    pub runs: Vec<TextRun>,
}

impl DrawList {
    /// Records a stack of text runs.
    pub fn push_text_stack(
        &mut self,
        z: ZIndex,
        origin: Vec2,
        max_width: Option<f32>,
        align: TextAlign,
        runs: Vec<TextRun>,
    ) {
        self.push(z, DrawCmd::Text(TextCmd { origin, max_width, align, runs }));
    }

    /// Records a single run of text.
    pub fn push_text(
        &mut self,
        z: ZIndex,
        text: impl Into<String>,
        style: TextStyle,
        origin: Vec2,
        max_width: Option<f32>,
        align: TextAlign,
    ) {
        let run = TextRun { text: text.into(), style, gap_after: 0.0 };
        self.push_text_stack(z, origin, max_width, align, vec![run]);
    }
}
