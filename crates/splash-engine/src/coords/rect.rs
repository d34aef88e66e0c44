use super::Vec2;

/// How a source of a given aspect ratio is placed inside a destination box.
///
/// Mirrors CSS `object-fit`: both modes preserve the aspect ratio and center
/// the result.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum FitMode {
    /// Fit entirely within the box; may leave empty bands (letterbox).
    #[default]
    Contain,
    /// Fill the box completely; overflow is cropped by the caller's clip.
    Cover,
}

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x * 0.5, self.origin.y + self.size.y * 0.5)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Shrinks the rectangle by `d` on every side. Never produces negative sizes.
    #[inline]
    pub fn inset(self, d: f32) -> Self {
        Rect::new(
            self.origin.x + d,
            self.origin.y + d,
            (self.size.x - 2.0 * d).max(0.0),
            (self.size.y - 2.0 * d).max(0.0),
        )
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.origin.x
            && p.y >= self.origin.y
            && p.x < self.origin.x + self.size.x
            && p.y < self.origin.y + self.size.y
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let x0 = self.origin.x.max(other.origin.x);
        let y0 = self.origin.y.max(other.origin.y);
        let x1 = (self.origin.x + self.size.x).min(other.origin.x + other.size.x);
        let y1 = (self.origin.y + self.size.y).min(other.origin.y + other.size.y);

        let w = x1 - x0;
        let h = y1 - y0;

        if w <= 0.0 || h <= 0.0 {
            None
        } else {
            Some(Rect::new(x0, y0, w, h))
        }
    }

    /// Places content of `content_size` inside `self` according to `fit`.
    ///
    /// The returned rectangle is centered on `self`. With [`FitMode::Cover`] it
    /// may extend past `self` on one axis.
    pub fn fit(self, content_size: Vec2, fit: FitMode) -> Rect {
        if content_size.x <= 0.0 || content_size.y <= 0.0 || self.is_empty() {
            return self;
        }
        let sx = self.size.x / content_size.x;
        let sy = self.size.y / content_size.y;
        let s = match fit {
            FitMode::Contain => sx.min(sy),
            FitMode::Cover => sx.max(sy),
        };
        let size = content_size * s;
        let c = self.center();
        Rect::new(c.x - size.x * 0.5, c.y - size.y * 0.5, size.x, size.y)
    }
}
