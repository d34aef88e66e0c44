use crate::coords::Rect;
use crate::paint::{Color, Paint};
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Rectangle draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub paint: Paint,
}

impl DrawList {
    /// Records a rectangle fill.
    #[inline]
    pub fn push_rect(&mut self, z: ZIndex, rect: Rect, paint: impl Into<Paint>) {
        self.push(z, DrawCmd::Rect(RectCmd { rect, paint: paint.into() }));
    }

    /// Records a solid rectangle fill.
    #[inline]
    pub fn push_solid_rect(&mut self, z: ZIndex, rect: Rect, color: Color) {
        self.push_rect(z, rect, Paint::Solid(color));
    }
}
