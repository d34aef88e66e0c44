/// Z-ordering key for draw items.
///
/// Higher values appear on top of lower values.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Backgrounds and base fills.
    pub const BACKGROUND: ZIndex = ZIndex(0);
    /// Regular content (text, logos, artwork).
    pub const CONTENT: ZIndex = ZIndex(10);
    /// Decorative layers drawn over content.
    pub const DECORATION: ZIndex = ZIndex(20);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}
