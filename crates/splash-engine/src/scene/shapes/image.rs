use crate::coords::{FitMode, Rect};
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Image draw payload.
///
/// `source` is an asset reference resolved at rasterization time (URL, path,
/// or `blob:` handle). The image is placed inside `rect` according to `fit`
/// and always clipped to `rect`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCmd {
    pub rect: Rect,
    pub source: String,
    pub fit: FitMode,
    pub opacity: f32,
}

impl DrawList {
    /// Records an image draw command. Empty sources are ignored.
    pub fn push_image(&mut self, z: ZIndex, rect: Rect, source: impl Into<String>, fit: FitMode) {
        let source = source.into();
        if source.is_empty() {
            return;
        }
        self.push(z, DrawCmd::Image(ImageCmd { rect, source, fit, opacity: 1.0 }));
    }
}
