//! Coordinate and geometry types shared by the scene, rasterizer, and studio.
//!
//! Canonical space:
//! - Logical pixels (capture scale 1 means one logical pixel per output pixel)
//! - Origin top-left
//! - +X right, +Y down

mod corner_radii;
mod rect;
mod vec2;
mod viewport;

pub use corner_radii::CornerRadii;
pub use rect::{FitMode, Rect};
pub use vec2::Vec2;
pub use viewport::Viewport;
