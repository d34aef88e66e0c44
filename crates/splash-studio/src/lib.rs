//! Splash Studio: the editor core for a fixed 700×500 splash screen.
//!
//! - [`model`] / [`preset`]: the style/content model and its named bundles
//! - [`render`]: pure `(model, mode, interaction) -> Scene` layout
//! - [`capture`]: the rasterizing collaborator used by exports
//! - [`shell`]: session state, input handlers, and the export state machine
//!
//! # Quick start
//!
//! ```rust,ignore
//! use splash_studio::prelude::*;
//!
//! let assets = Rc::new(RefCell::new(AssetStore::new()));
//! let capture = SoftwareCapture::new(FontSystem::with_system_fonts(), Rc::clone(&assets));
//! let shell = EditorShell::new(StudioConfig::default(), capture, assets);
//!
//! shell.apply_preset(Preset::Neon);
//! shell.export().await;
//! for event in shell.drain_events() {
//!     if let ShellEvent::Download(file) = event {
//!         std::fs::write(&file.file_name, &file.bytes)?;
//!     }
//! }
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod export;
pub mod interaction;
pub mod model;
pub mod preset;
pub mod render;
pub mod shell;
pub mod workspace;

pub use error::StudioError;
pub use shell::EditorShell;

/// The types a host needs to drive a session.
pub mod prelude {
    pub use crate::capture::{Capture, CaptureConfig, CaptureError, SoftwareCapture};
    pub use crate::config::{ExportConfig, StudioConfig};
    pub use crate::export::ExportFile;
    pub use crate::interaction::{CursorPos, InteractionState};
    pub use crate::model::{ArtworkFit, AssetSlot, BackgroundType, ColorValue, SplashModel};
    pub use crate::preset::Preset;
    pub use crate::render::{render, RenderMode};
    pub use crate::shell::{EditorShell, ExportOutcome, ExportState, ShellEvent};
    pub use crate::workspace::{ResizeSubscription, Workspace};
    pub use crate::StudioError;

    pub use splash_engine::assets::AssetStore;
    pub use splash_engine::coords::{Vec2, Viewport};
    pub use splash_engine::raster::Bitmap;
    pub use splash_engine::text::FontSystem;
}
