//! CPU rasterization of a [`Scene`] into a [`Bitmap`].
//!
//! Built on `tiny-skia` (re-exported by `resvg`). Drawing happens in logical
//! pixels with a single device transform for the capture scale, so the same
//! scene produces identical geometry at any scale.
//!
//! Failure policy:
//! - invalid output dimensions are an error
//! - an asset that cannot be resolved or decoded leaves its slot blank
//! - text without a resolvable font is skipped

mod bitmap;
mod shapes;
mod text;
mod tilt;

pub use bitmap::Bitmap;

use resvg::tiny_skia::{Pixmap, Transform};
use thiserror::Error;

use crate::assets::AssetStore;
use crate::scene::{DrawCmd, DrawList, Scene};
use crate::text::FontSystem;

/// Errors produced by [`Rasterizer::rasterize`].
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("invalid output size {width}x{height} at scale {scale}")]
    InvalidSize { width: u32, height: u32, scale: f32 },

    #[error("failed to allocate a {0}x{1} pixmap")]
    Allocation(u32, u32),

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Output parameters for one rasterization.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RasterOptions {
    /// Logical output width; the bitmap is `width * scale` pixels wide.
    pub width: u32,
    pub height: u32,
    pub scale: f32,
    /// Leave uncovered pixels transparent instead of white.
    pub transparent_background: bool,
    /// Serve `http(s)` asset references (from the store's prefetch cache).
    pub allow_remote_assets: bool,
}

impl RasterOptions {
    /// Logical `width`×`height` at scale 1 with a transparent background.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: 1.0,
            transparent_background: true,
            allow_remote_assets: true,
        }
    }

    /// Device pixel dimensions of the output.
    pub fn device_size(&self) -> Result<(u32, u32), RasterError> {
        let invalid = || RasterError::InvalidSize {
            width: self.width,
            height: self.height,
            scale: self.scale,
        };
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(invalid());
        }
        let w = (self.width as f32 * self.scale).round() as u32;
        let h = (self.height as f32 * self.scale).round() as u32;
        if w == 0 || h == 0 {
            return Err(invalid());
        }
        Ok((w, h))
    }
}

/// Software rasterizer borrowing the session's fonts and assets.
pub struct Rasterizer<'a> {
    fonts: &'a FontSystem,
    assets: &'a AssetStore,
}

impl<'a> Rasterizer<'a> {
    pub fn new(fonts: &'a FontSystem, assets: &'a AssetStore) -> Self {
        Self { fonts, assets }
    }

    /// Rasterizes `scene` into a new bitmap.
    pub fn rasterize(&self, scene: &Scene, opts: &RasterOptions) -> Result<Bitmap, RasterError> {
        let (w, h) = opts.device_size()?;
        let mut target = Pixmap::new(w, h).ok_or(RasterError::Allocation(w, h))?;
        if !opts.transparent_background {
            target.fill(resvg::tiny_skia::Color::WHITE);
        }

        match &scene.tilt {
            None => self.draw_list(&mut target, &scene.content, opts),
            Some(tilt) => {
                let mut layer = Pixmap::new(w, h).ok_or(RasterError::Allocation(w, h))?;
                self.draw_list(&mut layer, &scene.content, opts);
                tilt::project(&layer, &mut target, tilt, opts.scale);
            }
        }

        if let Some(overlay) = &scene.overlay {
            self.draw_list(&mut target, overlay, opts);
        }

        log::debug!(
            "rasterized scene ({} content item(s), tilt: {}, overlay: {}) into {w}x{h}",
            scene.content.len(),
            scene.tilt.is_some(),
            scene.overlay.is_some(),
        );
        Ok(Bitmap::from_pixmap(&target))
    }

    fn draw_list(&self, pixmap: &mut Pixmap, list: &DrawList, opts: &RasterOptions) {
        let ts = Transform::from_scale(opts.scale, opts.scale);
        for item in list.items_in_paint_order() {
            if item.clip_rect.is_some_and(|c| c.is_empty()) {
                continue;
            }
            match &item.cmd {
                DrawCmd::Rect(cmd) => shapes::fill_rect(pixmap, cmd, item.clip_rect, ts),
                DrawCmd::RoundedRect(cmd) => shapes::fill_rounded_rect(pixmap, cmd, item.clip_rect, ts),
                DrawCmd::Image(cmd) => {
                    match self.assets.load_image(&cmd.source, opts.allow_remote_assets) {
                        Ok(image) => shapes::draw_image(pixmap, cmd, &image, item.clip_rect, ts, opts.scale),
                        Err(e) => log::warn!("image slot left blank: {e}"),
                    }
                }
                DrawCmd::Text(cmd) => text::draw_text(pixmap, self.fonts, cmd, item.clip_rect, opts.scale),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{FitMode, Rect, Vec2};
    use crate::paint::Color;
    use crate::scene::{SurfaceTilt, ZIndex};

    fn solid_scene(color: Color) -> Scene {
        let mut scene = Scene::new(Vec2::new(70.0, 50.0));
        scene.content.push_solid_rect(ZIndex::BACKGROUND, Rect::new(0.0, 0.0, 70.0, 50.0), color);
        scene
    }

    fn raster(scene: &Scene, opts: RasterOptions) -> Bitmap {
        let fonts = FontSystem::new();
        let assets = AssetStore::new();
        Rasterizer::new(&fonts, &assets).rasterize(scene, &opts).unwrap()
    }

    #[test]
    fn output_has_exact_device_dimensions() {
        let scene = solid_scene(Color::black());
        let bmp = raster(&scene, RasterOptions::new(70, 50));
        assert_eq!((bmp.width(), bmp.height()), (70, 50));

        let bmp = raster(&scene, RasterOptions { scale: 2.0, ..RasterOptions::new(70, 50) });
        assert_eq!((bmp.width(), bmp.height()), (140, 100));
    }

    #[test]
    fn rejects_zero_sizes_and_bad_scales() {
        let fonts = FontSystem::new();
        let assets = AssetStore::new();
        let r = Rasterizer::new(&fonts, &assets);
        let scene = solid_scene(Color::black());
        assert!(matches!(
            r.rasterize(&scene, &RasterOptions::new(0, 50)),
            Err(RasterError::InvalidSize { .. })
        ));
        assert!(r
            .rasterize(&scene, &RasterOptions { scale: f32::NAN, ..RasterOptions::new(70, 50) })
            .is_err());
    }

    #[test]
    fn transparent_background_leaves_uncovered_pixels_clear() {
        let empty = Scene::new(Vec2::new(10.0, 10.0));
        let bmp = raster(&empty, RasterOptions::new(10, 10));
        assert_eq!(bmp.pixel(5, 5), [0, 0, 0, 0]);

        let bmp = raster(&empty, RasterOptions { transparent_background: false, ..RasterOptions::new(10, 10) });
        assert_eq!(bmp.pixel(5, 5), [255, 255, 255, 255]);
    }

    #[test]
    fn clip_rect_limits_fills() {
        let mut scene = Scene::new(Vec2::new(70.0, 50.0));
        scene.content.push_clip(Rect::new(0.0, 0.0, 25.0, 50.0));
        scene.content.push_solid_rect(ZIndex::CONTENT, Rect::new(0.0, 0.0, 70.0, 50.0), Color::white());
        scene.content.pop_clip();
        let bmp = raster(&scene, RasterOptions::new(70, 50));
        assert_eq!(bmp.pixel(10, 10), [255, 255, 255, 255]);
        assert_eq!(bmp.pixel(40, 10), [0, 0, 0, 0]);
    }

    #[test]
    fn unresolvable_image_leaves_slot_blank() {
        let mut scene = solid_scene(Color::black());
        scene.content.push_image(
            ZIndex::CONTENT,
            Rect::new(45.0, 0.0, 25.0, 50.0),
            "blob:splash/404",
            FitMode::Cover,
        );
        let bmp = raster(&scene, RasterOptions::new(70, 50));
        assert_eq!(bmp.pixel(60, 25), [0, 0, 0, 255]);
    }

    #[test]
    fn sliver_svg_with_cover_fit_fills_its_slot() {
        let sliver = r##"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="10000"><rect width="1" height="10000" fill="#00ff00"/></svg>"##;
        let mut assets = AssetStore::new();
        let handle = assets.ingest(sliver.as_bytes().to_vec());
        let mut scene = solid_scene(Color::black());
        scene.content.push_image(ZIndex::CONTENT, Rect::new(45.0, 0.0, 25.0, 50.0), handle.as_str(), FitMode::Cover);

        let fonts = FontSystem::new();
        let bmp = Rasterizer::new(&fonts, &assets).rasterize(&scene, &RasterOptions::new(70, 50)).unwrap();
        let [r, g, _, a] = bmp.pixel(57, 25);
        assert!(r < 40 && g > 200 && a == 255, "{:?}", bmp.pixel(57, 25));
        assert_eq!(bmp.pixel(20, 25), [0, 0, 0, 255]);
    }

    #[test]
    fn overlay_is_not_tilted() {
        let mut scene = Scene::new(Vec2::new(100.0, 100.0));
        scene.tilt = Some(SurfaceTilt {
            rotate_x_deg: 0.0,
            rotate_y_deg: 60.0,
            perspective: 200.0,
            transition_ms: 100,
        });
        scene.content.push_solid_rect(ZIndex::BACKGROUND, Rect::new(0.0, 0.0, 100.0, 100.0), Color::white());
        let mut overlay = DrawList::new();
        overlay.push_solid_rect(ZIndex::DECORATION, Rect::new(0.0, 0.0, 4.0, 4.0), Color::black());
        scene.overlay = Some(overlay);

        let bmp = raster(&scene, RasterOptions::new(100, 100));
        // Strong Y rotation pulls the content's left edge inward; the overlay stays put.
        assert_eq!(bmp.pixel(1, 1), [0, 0, 0, 255]);
        assert_eq!(bmp.pixel(10, 50), [0, 0, 0, 0]);
        assert_eq!(bmp.pixel(50, 50), [255, 255, 255, 255]);
    }
}
