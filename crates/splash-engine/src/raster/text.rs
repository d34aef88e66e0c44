use fontdue::layout::{
    CoordinateSystem, HorizontalAlign, Layout, LayoutSettings, TextStyle as FontdueStyle,
};
use resvg::tiny_skia::Pixmap;

use crate::coords::Rect;
use crate::scene::{TextAlign, TextCmd};
use crate::text::FontSystem;

/// Lays out and blends every run of `cmd` into `pixmap`.
///
/// Layout happens at device size (`size * scale`) so glyph positions match
/// what a viewer sees at that scale. Runs without a resolvable font are
/// skipped but still reserve `size * line_height` of vertical space, keeping
/// the following runs where they would be with fonts available.
pub(super) fn draw_text(
    pixmap: &mut Pixmap,
    fonts: &FontSystem,
    cmd: &TextCmd,
    clip: Option<Rect>,
    scale: f32,
) {
    let device_clip = clip
        .map(|c| Rect::new(c.origin.x * scale, c.origin.y * scale, c.size.x * scale, c.size.y * scale))
        .unwrap_or(Rect::new(0.0, 0.0, pixmap.width() as f32, pixmap.height() as f32));

    let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
    let mut y = cmd.origin.y;

    for run in &cmd.runs {
        let style = &run.style;
        let Some(font) = fonts.resolve(&style.family, style.weight).and_then(|id| fonts.get(id)) else {
            log::debug!("no font for `{}`, skipping text run", style.family);
            if !run.text.is_empty() {
                y += style.size * style.line_height;
            }
            y += run.gap_after;
            continue;
        };

        layout.reset(&LayoutSettings {
            x: cmd.origin.x * scale,
            y: y * scale,
            max_width: cmd.max_width.map(|w| w * scale),
            horizontal_align: match cmd.align {
                TextAlign::Left => HorizontalAlign::Left,
                TextAlign::Center => HorizontalAlign::Center,
            },
            line_height: style.line_height,
            ..LayoutSettings::default()
        });
        layout.append(&[font], &FontdueStyle::new(&run.text, style.size * scale, 0));

        let spacing = style.letter_spacing * scale;
        let color = style.color;
        let lines = layout.lines().cloned().unwrap_or_default();
        let glyphs = layout.glyphs();

        for line in &lines {
            let count = line.glyph_end.saturating_sub(line.glyph_start) + 1;
            // Centered lines grow symmetrically when spacing is added.
            let shift = match cmd.align {
                TextAlign::Left => 0.0,
                TextAlign::Center => -(count.saturating_sub(1) as f32) * spacing * 0.5,
            };
            for (i, g) in glyphs
                .iter()
                .enumerate()
                .take(line.glyph_end + 1)
                .skip(line.glyph_start)
            {
                if !g.char_data.rasterize() || g.width == 0 || g.height == 0 {
                    continue;
                }
                let (metrics, coverage) = font.rasterize_config(g.key);
                let gx = (g.x + shift + (i - line.glyph_start) as f32 * spacing).round() as i32;
                let gy = g.y.round() as i32;
                blend_coverage(
                    pixmap,
                    &coverage,
                    metrics.width,
                    metrics.height,
                    gx,
                    gy,
                    [color.r, color.g, color.b, color.a],
                    device_clip,
                );
            }
        }

        y += layout.height() / scale + run.gap_after;
    }
}

/// Source-over blend of a coverage mask tinted with a premultiplied color.
#[allow(clippy::too_many_arguments)]
fn blend_coverage(
    pixmap: &mut Pixmap,
    coverage: &[u8],
    w: usize,
    h: usize,
    x: i32,
    y: i32,
    color: [f32; 4],
    clip: Rect,
) {
    let pw = pixmap.width() as i32;
    let ph = pixmap.height() as i32;
    let data = pixmap.data_mut();

    for row in 0..h as i32 {
        let py = y + row;
        if py < 0 || py >= ph || (py as f32) < clip.origin.y || (py as f32) >= clip.max().y {
            continue;
        }
        for col in 0..w as i32 {
            let px = x + col;
            if px < 0 || px >= pw || (px as f32) < clip.origin.x || (px as f32) >= clip.max().x {
                continue;
            }
            let cov = coverage[(row * w as i32 + col) as usize] as f32 / 255.0;
            if cov <= 0.0 {
                continue;
            }
            let src = color.map(|c| c * cov);
            let inv = 1.0 - src[3];
            let i = ((py * pw + px) * 4) as usize;
            for (k, s) in src.iter().enumerate() {
                let dst = data[i + k] as f32 / 255.0;
                data[i + k] = ((s + dst * inv).clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        }
    }
}
