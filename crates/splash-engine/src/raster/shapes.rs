use resvg::tiny_skia::{
    self, FillRule, FilterQuality, GradientStop, Mask, Path, PathBuilder, Pattern, Pixmap, Point,
    Shader, Stroke, Transform,
};

use crate::assets::DecodedImage;
use crate::coords::{CornerRadii, Rect};
use crate::paint::{Color, ColorStop, Paint, SpreadMode};
use crate::scene::{ImageCmd, RectCmd, RoundedRectCmd};

/// Cubic Bézier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

pub(super) fn fill_rect(pixmap: &mut Pixmap, cmd: &RectCmd, clip: Option<Rect>, ts: Transform) {
    let visible = match clip {
        Some(c) => cmd.rect.intersect(c),
        None => Some(cmd.rect),
    };
    let Some(rect) = visible.and_then(to_skia_rect) else { return };
    let paint = skia_paint(&cmd.paint);
    pixmap.fill_rect(rect, &paint, ts, None);
}

pub(super) fn fill_rounded_rect(
    pixmap: &mut Pixmap,
    cmd: &RoundedRectCmd,
    clip: Option<Rect>,
    ts: Transform,
) {
    let mask = clip.and_then(|c| clip_mask(pixmap, c, ts));
    if clip.is_some() && mask.is_none() {
        return;
    }

    if let Some(fill) = &cmd.paint {
        if let Some(path) = rounded_rect_path(cmd.rect, cmd.radii) {
            pixmap.fill_path(&path, &skia_paint(fill), FillRule::Winding, ts, mask.as_ref());
        }
    }

    if let Some(border) = &cmd.border {
        if border.width <= 0.0 {
            return;
        }
        // Stroke centered on an inset path so the border stays inside `rect`.
        let half = border.width * 0.5;
        let radii = CornerRadii {
            top_left: (cmd.radii.top_left - half).max(0.0),
            top_right: (cmd.radii.top_right - half).max(0.0),
            bottom_right: (cmd.radii.bottom_right - half).max(0.0),
            bottom_left: (cmd.radii.bottom_left - half).max(0.0),
        };
        if let Some(path) = rounded_rect_path(cmd.rect.inset(half), radii) {
            let stroke = Stroke { width: border.width, ..Stroke::default() };
            let paint = skia_paint(&Paint::Solid(border.color));
            pixmap.stroke_path(&path, &paint, &stroke, ts, mask.as_ref());
        }
    }
}

pub(super) fn draw_image(
    pixmap: &mut Pixmap,
    cmd: &ImageCmd,
    image: &DecodedImage,
    clip: Option<Rect>,
    ts: Transform,
    scale: f32,
) {
    let placed = cmd.rect.fit(image.intrinsic_size(), cmd.fit);
    let visible = cmd
        .rect
        .intersect(placed)
        .and_then(|r| match clip {
            Some(c) => r.intersect(c),
            None => Some(r),
        });
    let Some(window) = visible else { return };
    let Some(fill) = to_skia_rect(window) else { return };

    let Some((source, covered)) = image.to_pixmap(placed, window, scale) else {
        log::warn!("image `{}` could not be prepared for drawing", cmd.source);
        return;
    };

    let pattern_ts = Transform::from_translate(covered.origin.x, covered.origin.y).pre_scale(
        covered.size.x / source.width() as f32,
        covered.size.y / source.height() as f32,
    );
    let shader = Pattern::new(
        source.as_ref(),
        tiny_skia::SpreadMode::Pad,
        FilterQuality::Bilinear,
        cmd.opacity.clamp(0.0, 1.0),
        pattern_ts,
    );
    let paint = tiny_skia::Paint { shader, anti_alias: false, ..tiny_skia::Paint::default() };
    pixmap.fill_rect(fill, &paint, ts, None);
}

fn clip_mask(pixmap: &Pixmap, clip: Rect, ts: Transform) -> Option<Mask> {
    let mut mask = Mask::new(pixmap.width(), pixmap.height())?;
    let path = PathBuilder::from_rect(to_skia_rect(clip)?);
    mask.fill_path(&path, FillRule::Winding, false, ts);
    Some(mask)
}

fn rounded_rect_path(rect: Rect, radii: CornerRadii) -> Option<Path> {
    if rect.is_empty() {
        return None;
    }
    let r = radii.clamped_to(rect.size.x, rect.size.y);
    if r.is_zero() {
        return Some(PathBuilder::from_rect(to_skia_rect(rect)?));
    }

    let (x0, y0) = (rect.origin.x, rect.origin.y);
    let max = rect.max();
    let (x1, y1) = (max.x, max.y);

    let mut pb = PathBuilder::new();
    pb.move_to(x0 + r.top_left, y0);
    pb.line_to(x1 - r.top_right, y0);
    pb.cubic_to(
        x1 - r.top_right * (1.0 - KAPPA), y0,
        x1, y0 + r.top_right * (1.0 - KAPPA),
        x1, y0 + r.top_right,
    );
    pb.line_to(x1, y1 - r.bottom_right);
    pb.cubic_to(
        x1, y1 - r.bottom_right * (1.0 - KAPPA),
        x1 - r.bottom_right * (1.0 - KAPPA), y1,
        x1 - r.bottom_right, y1,
    );
    pb.line_to(x0 + r.bottom_left, y1);
    pb.cubic_to(
        x0 + r.bottom_left * (1.0 - KAPPA), y1,
        x0, y1 - r.bottom_left * (1.0 - KAPPA),
        x0, y1 - r.bottom_left,
    );
    pb.line_to(x0, y0 + r.top_left);
    pb.cubic_to(
        x0, y0 + r.top_left * (1.0 - KAPPA),
        x0 + r.top_left * (1.0 - KAPPA), y0,
        x0 + r.top_left, y0,
    );
    pb.close();
    pb.finish()
}

fn to_skia_rect(r: Rect) -> Option<tiny_skia::Rect> {
    if r.is_empty() || !r.is_finite() {
        return None;
    }
    tiny_skia::Rect::from_xywh(r.origin.x, r.origin.y, r.size.x, r.size.y)
}

pub(super) fn skia_color(c: Color) -> tiny_skia::Color {
    let (r, g, b, a) = c.to_straight();
    tiny_skia::Color::from_rgba(r, g, b, a).unwrap_or(tiny_skia::Color::TRANSPARENT)
}

fn skia_stops(stops: &[ColorStop]) -> Vec<GradientStop> {
    stops
        .iter()
        .map(|s| GradientStop::new(s.t.clamp(0.0, 1.0), skia_color(s.color)))
        .collect()
}

fn skia_spread(spread: SpreadMode) -> tiny_skia::SpreadMode {
    match spread {
        SpreadMode::Pad => tiny_skia::SpreadMode::Pad,
        SpreadMode::Repeat => tiny_skia::SpreadMode::Repeat,
        SpreadMode::Reflect => tiny_skia::SpreadMode::Reflect,
    }
}

/// Last stop color, used when a gradient degenerates.
fn fallback(stops: &[ColorStop]) -> Shader<'static> {
    let c = stops.last().map(|s| s.color).unwrap_or(Color::transparent());
    Shader::SolidColor(skia_color(c))
}

fn skia_paint(paint: &Paint) -> tiny_skia::Paint<'static> {
    let shader = match paint {
        Paint::Solid(c) => Shader::SolidColor(skia_color(*c)),
        Paint::LinearGradient(g) if g.is_valid() => tiny_skia::LinearGradient::new(
            Point::from_xy(g.start.x, g.start.y),
            Point::from_xy(g.end.x, g.end.y),
            skia_stops(&g.stops),
            skia_spread(g.spread),
            Transform::identity(),
        )
        .unwrap_or_else(|| fallback(&g.stops)),
        Paint::LinearGradient(g) => fallback(&g.stops),
        Paint::RadialGradient(g) if g.is_valid() => {
            let center = Point::from_xy(g.center.x, g.center.y);
            tiny_skia::RadialGradient::new(
                center,
                center,
                g.radius,
                skia_stops(&g.stops),
                tiny_skia::SpreadMode::Pad,
                Transform::identity(),
            )
            .unwrap_or_else(|| fallback(&g.stops))
        }
        Paint::RadialGradient(g) => fallback(&g.stops),
    };
    tiny_skia::Paint { shader, anti_alias: true, ..tiny_skia::Paint::default() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::LinearGradient;

    #[test]
    fn rounded_path_bounds_match_rect() {
        let path = rounded_rect_path(Rect::new(10.0, 20.0, 100.0, 50.0), CornerRadii::all(8.0)).unwrap();
        let b = path.bounds();
        assert!((b.left() - 10.0).abs() < 1e-3);
        assert!((b.bottom() - 70.0).abs() < 1e-3);
    }

    #[test]
    fn empty_rect_has_no_path() {
        assert!(rounded_rect_path(Rect::new(0.0, 0.0, 0.0, 10.0), CornerRadii::all(2.0)).is_none());
    }

    #[test]
    fn degenerate_gradient_falls_back_to_last_stop() {
        let g = LinearGradient::new(
            Vec2::new(5.0, 5.0),
            Vec2::new(5.0, 5.0),
            vec![ColorStop::new(0.0, Color::white()), ColorStop::new(1.0, Color::black())],
            SpreadMode::Pad,
        );
        let paint = skia_paint(&Paint::LinearGradient(g));
        assert!(matches!(paint.shader, Shader::SolidColor(c) if c == tiny_skia::Color::BLACK));
    }

    #[test]
    fn gradient_fill_interpolates_between_stops() {
        let mut pixmap = Pixmap::new(100, 1).unwrap();
        let cmd = RectCmd {
            rect: Rect::new(0.0, 0.0, 100.0, 1.0),
            paint: Paint::LinearGradient(LinearGradient::new(
                Vec2::new(0.0, 0.0),
                Vec2::new(100.0, 0.0),
                vec![ColorStop::new(0.0, Color::black()), ColorStop::new(1.0, Color::white())],
                SpreadMode::Pad,
            )),
        };
        fill_rect(&mut pixmap, &cmd, None, Transform::identity());
        let left = pixmap.pixel(2, 0).unwrap().red();
        let right = pixmap.pixel(97, 0).unwrap().red();
        assert!(left < 20 && right > 235, "left {left} right {right}");
    }
}
