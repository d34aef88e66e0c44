//! Pure renderer: `(model, mode, interaction) -> Scene`.
//!
//! The canvas is a fixed 700×500 split into three vertical bands:
//!
//! ```text
//! 0          250          450          700
//! ┌──────────┬────────────┬────────────┐
//! │ logo     │            │            │
//! │ title    │  reserved  │  artwork   │
//! │ subtitle │            │            │
//! │ cc row   │            │            │
//! └──────────┴────────────┴────────────┘
//! ```
//!
//! Interactive-only layers (tilt, band guide, outline) are built only for
//! [`RenderMode::Interactive`]; an export scene never contains them.

use splash_engine::coords::{FitMode, Rect, Vec2, Viewport};
use splash_engine::paint::{Color, ColorStop, LinearGradient, RadialGradient};
use splash_engine::scene::{
    Border, DrawList, FontWeight, Scene, TextAlign, TextRun, TextStyle, ZIndex,
};

use crate::interaction::InteractionState;
use crate::model::{BackgroundGradient, BackgroundType, SplashModel};

pub const CANVAS_WIDTH: u32 = 700;
pub const CANVAS_HEIGHT: u32 = 500;
pub const CANVAS: Viewport = Viewport::new(CANVAS_WIDTH as f32, CANVAS_HEIGHT as f32);

const PADDING: f32 = 32.0;
const BAND_TEXT: Rect = Rect::new(0.0, 0.0, 250.0, 500.0);
const BAND_RESERVED: Rect = Rect::new(250.0, 0.0, 200.0, 500.0);
const BAND_ARTWORK: Rect = Rect::new(450.0, 0.0, 250.0, 500.0);

const LOGO: Rect = Rect::new(PADDING, PADDING, 64.0, 64.0);
const TITLE_TOP: f32 = 128.0;
const TITLE_SIZE: f32 = 30.0;
const SUBTITLE_GAP: f32 = 8.0;
const SUBTITLE_SIZE: f32 = 14.0;
const CC_LOGO: Rect = Rect::new(PADDING, 436.0, 32.0, 32.0);
const CAPTION_SIZE: f32 = 10.0;
const CAPTION_GAP: f32 = 8.0;

const PLACEHOLDER_LABEL: &str = "NO ARTWORK";
const OUTLINE_RADIUS: f32 = 8.0;

/// Which variant of the scene to build.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum RenderMode {
    /// Live preview: tilt and editing guides included.
    #[default]
    Interactive,
    /// Capture: only what ends up in the PNG.
    Export,
}

#[inline]
pub fn canvas_rect() -> Rect {
    Rect::new(0.0, 0.0, CANVAS.width, CANVAS.height)
}

/// Builds the scene for `model`.
///
/// The result always has an intrinsic size of 700×500; `interaction` only
/// feeds the interactive layers, never the content.
pub fn render(model: &SplashModel, mode: RenderMode, interaction: &InteractionState) -> Scene {
    let mut scene = Scene::new(Vec2::new(CANVAS.width, CANVAS.height));

    paint_background(&mut scene.content, model);
    paint_text_band(&mut scene.content, model);
    paint_artwork_band(&mut scene.content, model);
    paint_vignette(&mut scene.content);

    if mode == RenderMode::Interactive {
        scene.tilt = Some(interaction.cursor.tilt());
        scene.overlay = Some(interactive_overlay());
    }
    scene
}

/// Linear paint running at 135° across `rect`, from the gradient start color to its end color.
pub fn gradient_paint(gradient: &BackgroundGradient, rect: Rect) -> LinearGradient {
    LinearGradient::css_angle(
        rect,
        BackgroundGradient::ANGLE_DEG,
        vec![
            ColorStop::new(0.0, gradient.start().color()),
            ColorStop::new(1.0, gradient.end().color()),
        ],
    )
}

fn paint_background(list: &mut DrawList, model: &SplashModel) {
    let canvas = canvas_rect();
    list.push_solid_rect(ZIndex::BACKGROUND, canvas, Color::black());
    match model.bg_type {
        BackgroundType::Solid => list.push_solid_rect(ZIndex::BACKGROUND, canvas, model.bg_color.color()),
        BackgroundType::Gradient => {
            list.push_rect(ZIndex::BACKGROUND, canvas, gradient_paint(model.gradient(), canvas));
        }
        BackgroundType::Image => {
            list.push_clip(canvas);
            list.push_image(ZIndex::BACKGROUND, canvas, model.background_url.as_str(), FitMode::Cover);
            list.pop_clip();
        }
    }
}

fn paint_text_band(list: &mut DrawList, model: &SplashModel) {
    let family = model.font_family.as_str();
    list.push_clip(BAND_TEXT);

    list.push_image(ZIndex::CONTENT, LOGO, model.ae_logo_url.as_str(), FitMode::Contain);

    let title = TextStyle::new(family, TITLE_SIZE, model.title_color.color())
        .weight(FontWeight::Bold)
        .line_height(1.25)
        .letter_spacing(-0.025 * TITLE_SIZE);
    let subtitle = TextStyle::new(family, SUBTITLE_SIZE, model.subtitle_color.color().with_opacity(0.8))
        .weight(FontWeight::Medium);
    list.push_text_stack(
        ZIndex::CONTENT,
        Vec2::new(PADDING, TITLE_TOP),
        Some(BAND_TEXT.size.x - 2.0 * PADDING),
        TextAlign::Left,
        vec![
            TextRun { text: model.title.clone(), style: title, gap_after: SUBTITLE_GAP },
            TextRun { text: model.subtitle.clone(), style: subtitle, gap_after: 0.0 },
        ],
    );

    let has_cc_logo = !model.cc_logo_url.is_empty();
    list.push_image(ZIndex::CONTENT, CC_LOGO, model.cc_logo_url.as_str(), FitMode::Contain);

    let caption_x = if has_cc_logo { CC_LOGO.max().x + CAPTION_GAP } else { PADDING };
    let caption = TextStyle::new(family, CAPTION_SIZE, model.cc_logo_text_color.color().with_opacity(0.4))
        .weight(FontWeight::Bold)
        .letter_spacing(0.1 * CAPTION_SIZE);
    list.push_text(
        ZIndex::CONTENT,
        model.cc_logo_text.to_uppercase(),
        caption,
        Vec2::new(caption_x, CC_LOGO.center().y - CAPTION_SIZE * 0.5),
        Some(BAND_TEXT.max().x - PADDING - caption_x),
        TextAlign::Left,
    );

    list.pop_clip();
}

fn paint_artwork_band(list: &mut DrawList, model: &SplashModel) {
    list.push_clip(BAND_ARTWORK);
    if model.artwork_url.is_empty() {
        list.push_solid_rect(ZIndex::CONTENT, BAND_ARTWORK, Color::white().with_opacity(0.05));
        let label = TextStyle::new(model.font_family.as_str(), CAPTION_SIZE, Color::from_srgb_u8(0x3f, 0x3f, 0x46, 255))
            .letter_spacing(0.1 * CAPTION_SIZE);
        list.push_text(
            ZIndex::CONTENT,
            PLACEHOLDER_LABEL,
            label,
            Vec2::new(BAND_ARTWORK.origin.x, BAND_ARTWORK.center().y - CAPTION_SIZE * 0.5),
            Some(BAND_ARTWORK.size.x),
            TextAlign::Center,
        );
    } else {
        list.push_image(ZIndex::CONTENT, BAND_ARTWORK, model.artwork_url.as_str(), model.artwork_fit.fit_mode());
    }
    list.pop_clip();
}

fn paint_vignette(list: &mut DrawList) {
    let canvas = canvas_rect();
    let vignette = RadialGradient::farthest_corner(
        canvas,
        vec![
            ColorStop::new(0.0, Color::transparent()),
            ColorStop::new(1.0, Color::black().with_opacity(0.1)),
        ],
    );
    list.push_rect(ZIndex::DECORATION, canvas, vignette);
}

fn interactive_overlay() -> DrawList {
    let mut overlay = DrawList::new();
    let guide = Color::white().with_opacity(0.02);
    let divider = Color::white().with_opacity(0.05);

    overlay.push_solid_rect(ZIndex::CONTENT, BAND_RESERVED, guide);
    overlay.push_solid_rect(ZIndex::CONTENT, Rect::new(BAND_RESERVED.origin.x, 0.0, 1.0, CANVAS.height), divider);
    overlay.push_solid_rect(ZIndex::CONTENT, Rect::new(BAND_RESERVED.max().x - 1.0, 0.0, 1.0, CANVAS.height), divider);

    let indigo = Color::from_srgb_u8(0x63, 0x66, 0xf1, 255).with_opacity(0.2);
    overlay.push_outline(ZIndex::DECORATION, canvas_rect(), OUTLINE_RADIUS, Border::new(2.0, indigo));
    overlay
}
