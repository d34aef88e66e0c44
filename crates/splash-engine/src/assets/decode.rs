use std::fmt;

use resvg::tiny_skia::{IntSize, Pixmap, Transform};
use resvg::usvg;

use crate::coords::{Rect, Vec2};

use super::AssetError;

/// A decoded image asset.
///
/// Raster formats are decoded eagerly into a premultiplied pixmap. SVG
/// documents stay vector so they can be rasterized at whatever size the
/// destination slot needs.
pub enum DecodedImage {
    Raster(Pixmap),
    Vector(usvg::Tree),
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.intrinsic_size();
        let kind = match self {
            DecodedImage::Raster(_) => "Raster",
            DecodedImage::Vector(_) => "Vector",
        };
        write!(f, "DecodedImage::{kind}({}x{})", size.x, size.y)
    }
}

impl DecodedImage {
    /// Decodes `bytes`; `reference` is only used in error messages.
    pub fn decode(reference: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let decode_err = |reason: String| AssetError::Decode {
            reference: reference.to_string(),
            reason,
        };

        if looks_like_svg(bytes) {
            let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
                .map_err(|e| decode_err(e.to_string()))?;
            return Ok(DecodedImage::Vector(tree));
        }

        let rgba = image::load_from_memory(bytes)
            .map_err(|e| decode_err(e.to_string()))?
            .to_rgba8();
        let (w, h) = rgba.dimensions();
        let size = IntSize::from_wh(w, h).ok_or_else(|| decode_err(format!("invalid size {w}x{h}")))?;

        let mut data = rgba.into_raw();
        premultiply_rgba_in_place(&mut data);
        let pixmap = Pixmap::from_vec(data, size)
            .ok_or_else(|| decode_err("pixmap allocation failed".to_string()))?;
        Ok(DecodedImage::Raster(pixmap))
    }

    /// Natural size in pixels (SVG: the document's declared size).
    pub fn intrinsic_size(&self) -> Vec2 {
        match self {
            DecodedImage::Raster(p) => Vec2::new(p.width() as f32, p.height() as f32),
            DecodedImage::Vector(tree) => Vec2::new(tree.size().width(), tree.size().height()),
        }
    }

    /// Produces a pixmap for drawing the image stretched over `placed`, and
    /// the logical rect that pixmap covers.
    ///
    /// Raster images come back whole at their natural resolution, covering
    /// `placed` (the caller scales them while drawing). Vector images are
    /// rendered at `scale` device pixels per logical pixel, but only inside
    /// `window`, so a cover fit far larger than its slot costs no more than
    /// the visible part.
    pub fn to_pixmap(&self, placed: Rect, window: Rect, scale: f32) -> Option<(Pixmap, Rect)> {
        match self {
            DecodedImage::Raster(p) => Some((p.clone(), placed)),
            DecodedImage::Vector(tree) => {
                let w = (window.size.x * scale).ceil().max(1.0) as u32;
                let h = (window.size.y * scale).ceil().max(1.0) as u32;
                let mut pixmap = Pixmap::new(w, h)?;
                let size = tree.size();
                let transform = Transform::from_translate(
                    (placed.origin.x - window.origin.x) * scale,
                    (placed.origin.y - window.origin.y) * scale,
                )
                .pre_scale(placed.size.x * scale / size.width(), placed.size.y * scale / size.height());
                resvg::render(tree, transform, &mut pixmap.as_mut());
                let covered = Rect::new(window.origin.x, window.origin.y, w as f32 / scale, h as f32 / scale);
                Some((pixmap, covered))
            }
        }
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start_matches('\u{feff}').trim_start();
    head.starts_with("<svg") || ((head.starts_with("<?xml") || head.starts_with("<!--")) && head.contains("<svg"))
}

fn premultiply_rgba_in_place(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
}
