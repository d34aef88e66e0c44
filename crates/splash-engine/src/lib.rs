//! Splash engine crate.
//!
//! Renderer-agnostic building blocks for the splash studio: geometry, paint,
//! draw-command scenes, fonts, assets, and a CPU rasterizer producing
//! pixel-exact bitmaps.

pub mod assets;
pub mod coords;
pub mod logging;
pub mod paint;
pub mod raster;
pub mod scene;
pub mod text;
