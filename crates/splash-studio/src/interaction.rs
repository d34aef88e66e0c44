//! Presentation-only interaction state: normalized cursor and fit-scale.
//!
//! Nothing in here is serialized or reaches an exported image.

use splash_engine::coords::{Vec2, Viewport};
use splash_engine::scene::SurfaceTilt;

use crate::render::CANVAS;

/// Maximum tilt in degrees at either edge of the canvas.
pub const TILT_RANGE_DEG: f32 = 15.0;
pub const TILT_PERSPECTIVE: f32 = 1000.0;
pub const TILT_TRANSITION_MS: u32 = 100;

/// Padding subtracted from the workspace before fitting the canvas.
pub const DEFAULT_WORKSPACE_PADDING: f32 = 64.0;
/// Lower bound for the fit-scale so degenerate workspaces still render.
pub const MIN_FIT_SCALE: f32 = 0.05;

/// Cursor position normalized to the workspace, both axes in [0, 1].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CursorPos {
    x: f32,
    y: f32,
}

impl CursorPos {
    pub const CENTER: CursorPos = CursorPos { x: 0.5, y: 0.5 };

    /// Clamps both coordinates into [0, 1]. Non-finite input maps to the center.
    pub fn new(x: f32, y: f32) -> Self {
        let finite = |v: f32| if v.is_finite() { v } else { 0.5 };
        let p = Vec2::new(finite(x), finite(y)).clamp_unit();
        Self { x: p.x, y: p.y }
    }

    /// Normalizes a pointer position inside a workspace of `size`.
    pub fn from_pointer(pos: Vec2, size: Viewport) -> Self {
        if !size.is_valid() {
            return Self::CENTER;
        }
        Self::new(pos.x / size.width, pos.y / size.height)
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.y
    }

    /// Tilt derived from the cursor: rotateY follows x, rotateX follows -y.
    pub fn tilt(self) -> SurfaceTilt {
        SurfaceTilt {
            rotate_x_deg: -(self.y - 0.5) * TILT_RANGE_DEG,
            rotate_y_deg: (self.x - 0.5) * TILT_RANGE_DEG,
            perspective: TILT_PERSPECTIVE,
            transition_ms: TILT_TRANSITION_MS,
        }
    }
}

impl Default for CursorPos {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Interaction state owned by the editor shell.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct InteractionState {
    pub cursor: CursorPos,
    /// Display scale of the canvas inside the workspace, in (0, 1].
    pub fit_scale: f32,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self { cursor: CursorPos::CENTER, fit_scale: 1.0 }
    }
}

/// `min(1, (W - padding) / 700, (H - padding) / 500)`, floored at [`MIN_FIT_SCALE`].
pub fn fit_scale(workspace: Viewport, padding: f32) -> f32 {
    workspace.fit_scale(CANVAS, padding, MIN_FIT_SCALE)
}
