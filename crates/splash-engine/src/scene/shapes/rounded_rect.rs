use crate::coords::{CornerRadii, Rect};
use crate::paint::Paint;
use crate::scene::{DrawCmd, DrawList, ZIndex};

use super::Border;

/// Rounded rectangle draw payload.
///
/// `paint = None` draws only the border (an outline).
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedRectCmd {
    pub rect: Rect,
    pub radii: CornerRadii,
    pub paint: Option<Paint>,
    pub border: Option<Border>,
}

impl DrawList {
    /// Records a rounded rectangle with optional fill and border.
    #[inline]
    pub fn push_rounded_rect(
        &mut self,
        z: ZIndex,
        rect: Rect,
        radii: CornerRadii,
        paint: Option<Paint>,
        border: Option<Border>,
    ) {
        self.push(z, DrawCmd::RoundedRect(RoundedRectCmd { rect, radii, paint, border }));
    }

    /// Records an unfilled rounded outline.
    #[inline]
    pub fn push_outline(&mut self, z: ZIndex, rect: Rect, radius: f32, border: Border) {
        self.push_rounded_rect(z, rect, CornerRadii::all(radius), None, Some(border));
    }
}
