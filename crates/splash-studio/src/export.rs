//! Packaging a captured bitmap as a downloadable PNG.

use std::time::{SystemTime, UNIX_EPOCH};

use splash_engine::raster::{Bitmap, RasterError};

pub const DEFAULT_FILE_PREFIX: &str = "AE";

/// A finished export, ready to be written wherever the host saves downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// Encodes `bitmap` as a best-compression PNG.
    pub fn encode(file_name: String, bitmap: &Bitmap) -> Result<Self, RasterError> {
        let bytes = bitmap.encode_png()?;
        log::debug!("encoded {file_name} ({} bytes)", bytes.len());
        Ok(Self { file_name, bytes })
    }
}

/// Produces `<prefix>-Splash-<millis>.png` names.
///
/// Timestamps are wall-clock milliseconds, bumped when needed so that names
/// strictly increase within one namer.
#[derive(Debug, Clone)]
pub struct FileNamer {
    prefix: String,
    last_millis: u64,
}

impl FileNamer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), last_millis: 0 }
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn next_name(&mut self) -> String {
        self.name_at(now_millis())
    }

    fn name_at(&mut self, millis: u64) -> String {
        let stamp = millis.max(self.last_millis.saturating_add(1));
        self.last_millis = stamp;
        format!("{}-Splash-{stamp}.png", self.prefix)
    }
}

impl Default for FileNamer {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_PREFIX)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// True for names of the form `<prefix>-Splash-<digits>.png`.
pub fn is_export_file_name(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix("-Splash-"))
        .and_then(|rest| rest.strip_suffix(".png"))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
