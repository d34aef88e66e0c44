use crate::coords::Vec2;

use super::DrawList;

/// 3D tilt of the composited content surface.
///
/// Matches CSS `perspective(p) rotateY(y) rotateX(x)` about the surface
/// center: positive `rotate_y_deg` pushes the right edge away from the viewer,
/// positive `rotate_x_deg` pushes the top edge away.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceTilt {
    pub rotate_x_deg: f32,
    pub rotate_y_deg: f32,
    /// Distance from the viewer to the surface plane, in logical pixels.
    pub perspective: f32,
    /// Suggested ease-out transition when the tilt changes.
    pub transition_ms: u32,
}

/// A complete composited surface ready for rasterization.
///
/// - `content` is drawn first; when `tilt` is present the whole content
///   layer is projected through it.
/// - `overlay` is drawn last, untransformed.
///
/// The intrinsic size is fixed at construction and is independent of any
/// display scaling the host applies.
#[derive(Debug, Clone)]
pub struct Scene {
    size: Vec2,
    pub content: DrawList,
    pub tilt: Option<SurfaceTilt>,
    pub overlay: Option<DrawList>,
}

impl Scene {
    pub fn new(size: Vec2) -> Self {
        Self { size, content: DrawList::new(), tilt: None, overlay: None }
    }

    /// Intrinsic size in logical pixels.
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// True when any presentation-only layer (tilt or overlay) is present.
    #[inline]
    pub fn has_interactive_layers(&self) -> bool {
        self.tilt.is_some() || self.overlay.is_some()
    }
}
