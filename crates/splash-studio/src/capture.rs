//! Capture collaborator: turns an export scene into a bitmap.

use std::cell::RefCell;
use std::future::{ready, Future};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use splash_engine::assets::AssetStore;
use splash_engine::raster::{Bitmap, RasterError, RasterOptions, Rasterizer};
use splash_engine::scene::Scene;
use splash_engine::text::FontSystem;
use thiserror::Error;

use crate::render::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Parameters handed to a capture collaborator.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureConfig {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
    pub allow_cross_origin: bool,
    pub transparent_background: bool,
    pub verbose_logging: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            scale: 1.0,
            allow_cross_origin: true,
            transparent_background: true,
            verbose_logging: false,
        }
    }
}

impl From<&CaptureConfig> for RasterOptions {
    fn from(cfg: &CaptureConfig) -> Self {
        RasterOptions {
            width: cfg.width,
            height: cfg.height,
            scale: cfg.scale,
            transparent_background: cfg.transparent_background,
            allow_remote_assets: cfg.allow_cross_origin,
        }
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("rasterization failed: {0}")]
    Raster(#[from] RasterError),

    #[error("capture failed: {0}")]
    Other(String),
}

/// Rasterizes a scene.
///
/// `Ok(None)` means the collaborator ran but produced no image; the shell
/// treats it like a failure.
pub trait Capture {
    fn capture(
        &self,
        scene: &Scene,
        config: &CaptureConfig,
    ) -> impl Future<Output = Result<Option<Bitmap>, CaptureError>>;
}

/// [`Capture`] on the engine's CPU rasterizer.
///
/// Shares the session asset store with the editor shell so `blob:` handles
/// ingested there resolve here.
pub struct SoftwareCapture {
    fonts: FontSystem,
    assets: Rc<RefCell<AssetStore>>,
}

impl SoftwareCapture {
    pub fn new(fonts: FontSystem, assets: Rc<RefCell<AssetStore>>) -> Self {
        Self { fonts, assets }
    }

    #[inline]
    pub fn assets(&self) -> &Rc<RefCell<AssetStore>> {
        &self.assets
    }

    /// Synchronous rasterization, also used for previews.
    pub fn rasterize(&self, scene: &Scene, config: &CaptureConfig) -> Result<Bitmap, CaptureError> {
        let assets = self.assets.borrow();
        let bitmap = Rasterizer::new(&self.fonts, &assets).rasterize(scene, &RasterOptions::from(config))?;
        if config.verbose_logging {
            log::info!(
                "captured {}x{} at scale {} (cross-origin: {}, transparent: {})",
                bitmap.width(),
                bitmap.height(),
                config.scale,
                config.allow_cross_origin,
                config.transparent_background,
            );
        }
        Ok(bitmap)
    }
}

impl Capture for SoftwareCapture {
    fn capture(
        &self,
        scene: &Scene,
        config: &CaptureConfig,
    ) -> impl Future<Output = Result<Option<Bitmap>, CaptureError>> {
        // Rasterization completes before the future is returned; the scene
        // is fully settled once `render` hands it over.
        ready(self.rasterize(scene, config).map(Some))
    }
}
