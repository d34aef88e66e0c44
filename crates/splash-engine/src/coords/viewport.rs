/// Size of a display area in logical pixels.
///
/// Used by hosts to describe the workspace a fixed-size canvas is shown in.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Largest uniform scale `<= 1` at which `content` fits inside this viewport
    /// after removing `padding` from both axes.
    ///
    /// The result is never below `min_scale`, so degenerate workspaces still
    /// produce a usable (positive) display scale.
    pub fn fit_scale(self, content: Viewport, padding: f32, min_scale: f32) -> f32 {
        if !content.is_valid() {
            return 1.0;
        }
        let available_w = self.width - padding;
        let available_h = self.height - padding;
        let scale = 1.0f32
            .min(available_w / content.width)
            .min(available_h / content.height);
        if scale.is_finite() { scale.max(min_scale) } else { min_scale }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Viewport = Viewport::new(700.0, 500.0);

    #[test]
    fn roomy_workspace_never_upscales() {
        let s = Viewport::new(900.0, 700.0).fit_scale(CANVAS, 64.0, 0.05);
        assert_eq!(s, 1.0);
    }

    #[test]
    fn cramped_workspace_fits_the_tighter_axis() {
        let s = Viewport::new(600.0, 400.0).fit_scale(CANVAS, 64.0, 0.05);
        assert!((s - 0.672).abs() < 1e-6);
    }

    #[test]
    fn degenerate_workspace_keeps_a_positive_scale() {
        let s = Viewport::new(10.0, 10.0).fit_scale(CANVAS, 64.0, 0.05);
        assert_eq!(s, 0.05);
    }
}
