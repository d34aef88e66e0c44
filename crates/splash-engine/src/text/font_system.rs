use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::scene::FontWeight;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Well-known system locations probed by [`FontSystem::with_system_fonts`],
/// as `(path, weight)` pairs.
const SYSTEM_FONTS: &[(&str, FontWeight)] = &[
    ("/usr/share/fonts/TTF/DejaVuSans.ttf", FontWeight::Regular),
    ("/usr/share/fonts/TTF/DejaVuSans-Bold.ttf", FontWeight::Bold),
    ("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf", FontWeight::Regular),
    ("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf", FontWeight::Bold),
    ("/usr/share/fonts/dejavu/DejaVuSans.ttf", FontWeight::Regular),
    ("/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf", FontWeight::Bold),
    ("/usr/share/fonts/noto/NotoSans-Regular.ttf", FontWeight::Regular),
    ("/usr/share/fonts/noto/NotoSans-Bold.ttf", FontWeight::Bold),
    ("/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf", FontWeight::Regular),
    ("/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf", FontWeight::Bold),
];

/// Owns a collection of loaded fonts and maps CSS-style family names onto them.
///
/// Resolution of a specifier such as `"Inter, sans-serif"` walks the list left
/// to right and returns the first registered family; generic or unknown names
/// fall through to the default face (the first font loaded). A missing weight
/// falls back to the family's regular face.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
    families: HashMap<(String, FontWeight), FontId>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new(), families: HashMap::new() }
    }

    /// Loads whichever of the well-known system fonts exist, registering them
    /// under the family `"system"`.
    ///
    /// An empty system (no fonts found) is valid: text is then skipped at
    /// rasterization time.
    pub fn with_system_fonts() -> Self {
        let mut fonts = Self::new();
        for (path, weight) in SYSTEM_FONTS {
            if fonts.families.contains_key(&("system".to_string(), *weight)) {
                continue;
            }
            if let Err(e) = fonts.load_font_file(Path::new(path), "system", *weight) {
                log::trace!("skipping system font {path}: {e}");
            }
        }
        log::debug!("font system ready with {} face(s)", fonts.fonts.len());
        fonts
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    ///
    /// Returns the `FontId` that identifies the font.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    /// Loads a font file and registers it under `family` / `weight`.
    pub fn load_font_file(
        &mut self,
        path: &Path,
        family: &str,
        weight: FontWeight,
    ) -> Result<FontId, FontLoadError> {
        let bytes = std::fs::read(path)
            .map_err(|e| FontLoadError(format!("{}: {e}", path.display())))?;
        let id = self.load_font(&bytes)?;
        self.register_family(family, weight, id);
        Ok(id)
    }

    /// Associates a family name (case-insensitive) and weight with a loaded font.
    pub fn register_family(&mut self, family: &str, weight: FontWeight, id: FontId) {
        self.families.insert((normalize_family(family), weight), id);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Resolves a CSS-style font specifier to a loaded face.
    pub fn resolve(&self, specifier: &str, weight: FontWeight) -> Option<FontId> {
        for name in specifier.split(',').map(normalize_family) {
            if name.is_empty() {
                continue;
            }
            if let Some(id) = self.families.get(&(name.clone(), weight)) {
                return Some(*id);
            }
            if let Some(id) = self.families.get(&(name, FontWeight::Regular)) {
                return Some(*id);
            }
        }
        self.default_for(weight)
    }

    fn default_for(&self, weight: FontWeight) -> Option<FontId> {
        if self.fonts.is_empty() {
            return None;
        }
        // Prefer any registered face with the requested weight before the first-loaded face.
        let mut candidates: Vec<FontId> = self
            .families
            .iter()
            .filter(|((_, w), _)| *w == weight)
            .map(|(_, id)| *id)
            .collect();
        candidates.sort_by_key(|id| id.0);
        candidates.first().copied().or(Some(FontId(0)))
    }

    /// Returns a reference to the underlying `fontdue::Font`, if `id` is valid.
    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_family(name: &str) -> String {
    name.trim().trim_matches(|c| c == '"' || c == '\'').to_ascii_lowercase()
}
