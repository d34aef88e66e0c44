//! Editor shell: owns the session and sequences exports.
//!
//! The shell is single-threaded. Every handler takes `&self`; state lives in
//! `Cell`/`RefCell` so an in-flight [`EditorShell::export`] future and the
//! input handlers can share one shell without locks.

use std::cell::{Cell, Ref, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use splash_engine::assets::{AssetError, AssetRef, AssetStore};
use splash_engine::coords::{Vec2, Viewport};
use splash_engine::raster::Bitmap;
use splash_engine::scene::Scene;

use crate::capture::{Capture, CaptureError};
use crate::config::StudioConfig;
use crate::error::StudioError;
use crate::export::{ExportFile, FileNamer};
use crate::interaction::{fit_scale, CursorPos, InteractionState};
use crate::model::{AssetSlot, ColorValue, SplashModel};
use crate::preset::Preset;
use crate::render::{render, RenderMode};
use crate::workspace::{ResizeSubscription, Workspace};

// ── Events ────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ExportState {
    #[default]
    Idle,
    Exporting,
}

/// Something the host should present to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// Offer `file` as a download.
    Download(ExportFile),
    /// Show a short failure message.
    FailureNotice(String),
}

/// Result of one call to [`EditorShell::export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Downloaded { file_name: String },
    Failed,
    /// Another export was already running; nothing was captured.
    Rejected,
}

const FAILURE_MESSAGE: &str = "Export failed. Please try again.";

/// Ends the export even when the export future is dropped mid-way: the state
/// returns to idle and blob handles released meanwhile are revoked.
struct ExportGuard<'a, C>(&'a EditorShell<C>);

impl<C> Drop for ExportGuard<'_, C> {
    fn drop(&mut self) {
        self.0.state.set(ExportState::Idle);
        let deferred = std::mem::take(&mut *self.0.deferred_release.borrow_mut());
        self.0.release_blobs(deferred);
    }
}

// ── EditorShell ───────────────────────────────────────────────────────────

pub struct EditorShell<C> {
    config: StudioConfig,
    capture: C,
    assets: Rc<RefCell<AssetStore>>,
    model: RefCell<SplashModel>,
    interaction: Cell<InteractionState>,
    workspace_size: Cell<Viewport>,
    state: Cell<ExportState>,
    namer: RefCell<FileNamer>,
    outbox: RefCell<VecDeque<ShellEvent>>,
    /// References dropped from the model while an export was in flight.
    deferred_release: RefCell<Vec<String>>,
}

impl<C: Capture> EditorShell<C> {
    /// Starts a session with the default model.
    pub fn new(config: StudioConfig, capture: C, assets: Rc<RefCell<AssetStore>>) -> Self {
        let namer = FileNamer::new(config.export.file_prefix.clone());
        Self {
            config,
            capture,
            assets,
            model: RefCell::new(SplashModel::default()),
            interaction: Cell::new(InteractionState::default()),
            workspace_size: Cell::new(Viewport::default()),
            state: Cell::new(ExportState::Idle),
            namer: RefCell::new(namer),
            outbox: RefCell::new(VecDeque::new()),
            deferred_release: RefCell::new(Vec::new()),
        }
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    #[inline]
    pub fn capture(&self) -> &C {
        &self.capture
    }

    #[inline]
    pub fn assets(&self) -> &Rc<RefCell<AssetStore>> {
        &self.assets
    }

    #[inline]
    pub fn model(&self) -> Ref<'_, SplashModel> {
        self.model.borrow()
    }

    #[inline]
    pub fn interaction(&self) -> InteractionState {
        self.interaction.get()
    }

    #[inline]
    pub fn cursor(&self) -> CursorPos {
        self.interaction.get().cursor
    }

    #[inline]
    pub fn fit_scale(&self) -> f32 {
        self.interaction.get().fit_scale
    }

    #[inline]
    pub fn export_state(&self) -> ExportState {
        self.state.get()
    }

    /// Mode the preview is currently rendered in.
    pub fn render_mode(&self) -> RenderMode {
        match self.state.get() {
            ExportState::Idle => RenderMode::Interactive,
            ExportState::Exporting => RenderMode::Export,
        }
    }

    /// Current scene for the host to paint.
    pub fn scene(&self) -> Scene {
        render(&self.model.borrow(), self.render_mode(), &self.interaction.get())
    }

    /// Removes and returns every queued event, oldest first.
    pub fn drain_events(&self) -> Vec<ShellEvent> {
        self.outbox.borrow_mut().drain(..).collect()
    }

    // ── model edits ───────────────────────────────────────────────────────

    /// Replaces the model with `edit(model)`.
    pub fn edit(&self, edit: impl FnOnce(SplashModel) -> SplashModel) {
        let current = self.model.borrow().clone();
        let previous: Vec<String> = current.asset_references().map(str::to_string).collect();
        *self.model.borrow_mut() = edit(current);
        if self.state.get() == ExportState::Exporting {
            // The export scene may still point at these handles.
            self.deferred_release.borrow_mut().extend(previous);
        } else {
            self.release_blobs(previous);
        }
    }

    /// Replaces the whole model (e.g. one loaded from disk).
    pub fn load_model(&self, model: SplashModel) {
        self.edit(|_| model);
    }

    pub fn apply_preset(&self, preset: Preset) {
        log::debug!("applying preset {preset}");
        self.edit(|m| m.apply_preset(preset));
    }

    pub fn set_gradient(&self, start: ColorValue, end: ColorValue) {
        self.edit(|m| m.set_gradient(start, end));
    }

    pub fn reset_asset(&self, slot: AssetSlot) {
        self.edit(|m| m.reset_asset(slot));
    }

    pub fn assign_asset(&self, slot: AssetSlot, reference: impl Into<String>) {
        let reference = reference.into();
        self.edit(|m| m.with_asset(slot, reference));
    }

    /// Stores user-supplied bytes and points `slot` at the new `blob:` handle.
    pub fn ingest_asset(&self, slot: AssetSlot, bytes: Vec<u8>) -> String {
        let handle = self.assets.borrow_mut().ingest(bytes);
        self.assign_asset(slot, handle.clone());
        handle
    }

    /// Like [`ingest_asset`](Self::ingest_asset), reading the bytes from `path`.
    pub fn ingest_asset_file(&self, slot: AssetSlot, path: &std::path::Path) -> Result<String, AssetError> {
        let handle = self.assets.borrow_mut().ingest_file(path)?;
        self.assign_asset(slot, handle.clone());
        Ok(handle)
    }

    // ── interaction ───────────────────────────────────────────────────────

    /// Pointer moved to `pos` (workspace coordinates). Ignored while exporting.
    pub fn pointer_move(&self, pos: Vec2) {
        if self.state.get() == ExportState::Exporting {
            return;
        }
        let mut interaction = self.interaction.get();
        interaction.cursor = CursorPos::from_pointer(pos, self.workspace_size.get());
        self.interaction.set(interaction);
    }

    /// Pointer left the workspace: recenters the cursor.
    pub fn pointer_leave(&self) {
        let mut interaction = self.interaction.get();
        interaction.cursor = CursorPos::CENTER;
        self.interaction.set(interaction);
    }

    /// Recomputes the fit-scale for a workspace of `size`.
    pub fn set_workspace_size(&self, size: Viewport) {
        self.workspace_size.set(size);
        let mut interaction = self.interaction.get();
        interaction.fit_scale = fit_scale(size, self.config.workspace_padding);
        self.interaction.set(interaction);
        log::trace!("fit-scale {} for {}x{}", interaction.fit_scale, size.width, size.height);
    }

    // ── export ────────────────────────────────────────────────────────────

    /// Runs one export: render in export mode, settle, capture, package.
    ///
    /// A second call while an export is in flight returns
    /// [`ExportOutcome::Rejected`] without capturing. Exactly one event is
    /// queued per accepted export: a download or a failure notice.
    pub async fn export(&self) -> ExportOutcome {
        if self.state.get() == ExportState::Exporting {
            log::debug!("export already in progress; ignoring request");
            return ExportOutcome::Rejected;
        }
        self.state.set(ExportState::Exporting);
        let _guard = ExportGuard(self);

        let scene = self.scene();
        let delay = self.config.export.settle_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let capture_config = self.config.export.capture_config();
        let result = self.capture.capture(&scene, &capture_config).await;
        match self.package(result) {
            Ok(file) => {
                let file_name = file.file_name.clone();
                log::info!("exported {file_name}");
                self.outbox.borrow_mut().push_back(ShellEvent::Download(file));
                ExportOutcome::Downloaded { file_name }
            }
            Err(err) => {
                log::error!("export failed: {err}");
                self.outbox
                    .borrow_mut()
                    .push_back(ShellEvent::FailureNotice(FAILURE_MESSAGE.to_string()));
                ExportOutcome::Failed
            }
        }
    }

    fn package(&self, result: Result<Option<Bitmap>, CaptureError>) -> Result<ExportFile, StudioError> {
        let bitmap = result?.ok_or(StudioError::EmptyCapture)?;
        let file_name = self.namer.borrow_mut().next_name();
        Ok(ExportFile::encode(file_name, &bitmap)?)
    }
}

impl<C> EditorShell<C> {
    /// Revokes the blob handles among `references` that no slot refers to.
    fn release_blobs(&self, references: Vec<String>) {
        let model = self.model.borrow();
        let mut assets = self.assets.borrow_mut();
        for reference in references {
            if AssetSlot::ALL.into_iter().any(|slot| model.asset(slot) == reference.as_str()) {
                continue;
            }
            if let AssetRef::Blob(handle) = AssetRef::parse(&reference) {
                if assets.revoke(&handle) {
                    log::debug!("revoked {handle}");
                }
            }
        }
    }
}

impl<C: Capture + 'static> EditorShell<C> {
    /// Tracks `workspace`'s size: the fit-scale is recomputed now and on every
    /// resize until the returned subscription is dropped.
    pub fn attach(self: &Rc<Self>, workspace: &Workspace) -> ResizeSubscription {
        self.set_workspace_size(workspace.size());
        let shell: Weak<Self> = Rc::downgrade(self);
        workspace.subscribe(move |size| {
            if let Some(shell) = shell.upgrade() {
                shell.set_workspace_size(size);
            }
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use splash_engine::text::FontSystem;

    use super::*;
    use crate::capture::{CaptureConfig, SoftwareCapture};
    use crate::export::is_export_file_name;

    /// Scripted capture collaborator.
    #[derive(Default)]
    struct FakeCapture {
        calls: Cell<usize>,
        fail: Cell<bool>,
        empty: Cell<bool>,
        delay: Cell<Duration>,
        last_config: Cell<Option<CaptureConfig>>,
        saw_interactive_layers: Cell<bool>,
    }

    impl Capture for FakeCapture {
        async fn capture(
            &self,
            scene: &Scene,
            config: &CaptureConfig,
        ) -> Result<Option<Bitmap>, CaptureError> {
            self.calls.set(self.calls.get() + 1);
            self.last_config.set(Some(*config));
            self.saw_interactive_layers.set(scene.has_interactive_layers());
            let delay = self.delay.get();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if self.fail.get() {
                return Err(CaptureError::Other("canvas tainted".into()));
            }
            if self.empty.get() {
                return Ok(None);
            }
            Ok(Bitmap::from_rgba(1, 1, vec![0, 0, 0, 255]))
        }
    }

    /// Software capture that keeps a copy of the last bitmap it produced.
    struct RecordingCapture {
        inner: SoftwareCapture,
        last: RefCell<Option<Bitmap>>,
    }

    impl Capture for RecordingCapture {
        async fn capture(
            &self,
            scene: &Scene,
            config: &CaptureConfig,
        ) -> Result<Option<Bitmap>, CaptureError> {
            let bitmap = self.inner.rasterize(scene, config)?;
            *self.last.borrow_mut() = Some(bitmap.clone());
            Ok(Some(bitmap))
        }
    }

    fn software_shell(config: StudioConfig) -> EditorShell<RecordingCapture> {
        let assets = Rc::new(RefCell::new(AssetStore::new()));
        let capture = RecordingCapture {
            inner: SoftwareCapture::new(FontSystem::new(), Rc::clone(&assets)),
            last: RefCell::new(None),
        };
        let shell = EditorShell::new(config, capture, assets);
        shell.edit(|m| AssetSlot::ALL.into_iter().fold(m, |m, s| m.with_asset(s, "")));
        shell
    }

    fn red_png() -> Vec<u8> {
        Bitmap::from_rgba(1, 1, vec![255, 0, 0, 255]).unwrap().encode_png().unwrap()
    }

    fn png_size(bytes: &[u8]) -> (u32, u32) {
        let be = |at: usize| u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        (be(16), be(20))
    }

    fn is_red([r, g, b, _]: [u8; 4]) -> bool {
        r > 200 && g < 40 && b < 40
    }

    fn shell() -> EditorShell<FakeCapture> {
        EditorShell::new(StudioConfig::default(), FakeCapture::default(), Rc::new(RefCell::new(AssetStore::new())))
    }

    fn downloads(events: &[ShellEvent]) -> usize {
        events.iter().filter(|e| matches!(e, ShellEvent::Download(_))).count()
    }

    fn notices(events: &[ShellEvent]) -> usize {
        events.iter().filter(|e| matches!(e, ShellEvent::FailureNotice(_))).count()
    }

    // ── export state machine ──────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn successful_export_downloads_exactly_once() {
        let shell = shell();
        let outcome = shell.export().await;

        let ExportOutcome::Downloaded { file_name } = outcome else {
            panic!("expected a download, got {outcome:?}");
        };
        assert!(is_export_file_name(&file_name, "AE"), "{file_name}");
        assert_eq!(shell.export_state(), ExportState::Idle);

        let events = shell.drain_events();
        assert_eq!(downloads(&events), 1);
        assert_eq!(notices(&events), 0);
        let ShellEvent::Download(file) = &events[0] else { unreachable!() };
        assert_eq!(&file.bytes[..4], b"\x89PNG");
        assert_eq!(shell.capture().calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn second_click_while_exporting_is_a_no_op() {
        let shell = shell();
        let second = async {
            // Runs once the first export is parked in its settle delay.
            assert_eq!(shell.export_state(), ExportState::Exporting);
            let outcome = shell.export().await;
            assert_eq!(shell.export_state(), ExportState::Exporting);
            outcome
        };
        let (first, second) = tokio::join!(shell.export(), second);

        assert!(matches!(first, ExportOutcome::Downloaded { .. }));
        assert_eq!(second, ExportOutcome::Rejected);
        assert_eq!(shell.capture().calls.get(), 1);
        assert_eq!(downloads(&shell.drain_events()), 1);
        assert_eq!(shell.export_state(), ExportState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn capture_failure_shows_one_notice_and_no_download() {
        let shell = shell();
        shell.capture().fail.set(true);

        assert_eq!(shell.export().await, ExportOutcome::Failed);
        assert_eq!(shell.export_state(), ExportState::Idle);
        let events = shell.drain_events();
        assert_eq!(downloads(&events), 0);
        assert_eq!(notices(&events), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_bitmap_counts_as_failure() {
        let shell = shell();
        shell.capture().empty.set(true);

        assert_eq!(shell.export().await, ExportOutcome::Failed);
        let events = shell.drain_events();
        assert_eq!((downloads(&events), notices(&events)), (0, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn capture_sees_export_scene_and_contract_config() {
        let shell = shell();
        shell.set_workspace_size(Viewport::new(600.0, 400.0));
        shell.pointer_move(Vec2::new(600.0, 0.0));
        shell.export().await;

        assert!(!shell.capture().saw_interactive_layers.get());
        assert_eq!(shell.capture().last_config.get(), Some(CaptureConfig::default()));
    }

    #[tokio::test(start_paused = true)]
    async fn export_waits_for_the_settle_delay() {
        let shell = shell();
        let start = tokio::time::Instant::now();
        shell.export().await;
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn successive_exports_get_distinct_names() {
        let shell = shell();
        let mut names = Vec::new();
        for _ in 0..3 {
            if let ExportOutcome::Downloaded { file_name } = shell.export().await {
                names.push(file_name);
            }
        }
        assert_eq!(names.len(), 3);
        assert!(names[0] < names[1] && names[1] < names[2], "{names:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_export_returns_to_idle() {
        let shell = shell();
        let timed_out = tokio::time::timeout(Duration::from_millis(10), shell.export()).await;
        assert!(timed_out.is_err());
        assert_eq!(shell.export_state(), ExportState::Idle);
        assert!(shell.drain_events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn exported_png_is_700x500_under_a_custom_config() {
        let mut config = StudioConfig::default();
        config.workspace_padding = 300.0;
        config.export.settle_delay_ms = 5;
        config.export.file_prefix = "PR".into();
        let shell = software_shell(config);
        shell.set_workspace_size(Viewport::new(400.0, 300.0));

        let ExportOutcome::Downloaded { file_name } = shell.export().await else {
            panic!("export failed");
        };
        assert!(is_export_file_name(&file_name, "PR"), "{file_name}");
        let events = shell.drain_events();
        let ShellEvent::Download(file) = &events[0] else { unreachable!() };
        assert_eq!(png_size(&file.bytes), (700, 500));
    }

    // ── edits during an export ────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn asset_reset_mid_export_keeps_the_clicked_artwork() {
        let shell = software_shell(StudioConfig::default());
        let handle = shell.ingest_asset(AssetSlot::Artwork, red_png());
        let reset = async {
            shell.reset_asset(AssetSlot::Artwork);
            assert!(shell.assets().borrow().contains_blob(&handle));
        };
        let (outcome, ()) = tokio::join!(shell.export(), reset);

        assert!(matches!(outcome, ExportOutcome::Downloaded { .. }));
        let bitmap = shell.capture().last.borrow_mut().take().unwrap();
        assert!(is_red(bitmap.pixel(575, 250)), "{:?}", bitmap.pixel(575, 250));
        assert_eq!(shell.model().artwork_url, SplashModel::default().artwork_url);
        assert!(!shell.assets().borrow().contains_blob(&handle));
    }

    #[tokio::test(start_paused = true)]
    async fn edits_mid_export_reach_the_model_but_not_the_file() {
        let shell = software_shell(StudioConfig::default());
        shell.ingest_asset(AssetSlot::Artwork, red_png());
        let replace = async {
            shell.assign_asset(AssetSlot::Artwork, "");
            shell.apply_preset(Preset::Light);
        };
        tokio::join!(shell.export(), replace);

        let bitmap = shell.capture().last.borrow_mut().take().unwrap();
        assert!(is_red(bitmap.pixel(575, 250)));
        assert_eq!(shell.model().preset, Preset::Light);
        assert!(shell.model().artwork_url.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn blob_reassigned_before_export_ends_survives() {
        let shell = software_shell(StudioConfig::default());
        let handle = shell.ingest_asset(AssetSlot::Artwork, red_png());
        let shuffle = async {
            shell.assign_asset(AssetSlot::Artwork, "");
            shell.assign_asset(AssetSlot::Background, handle.clone());
        };
        tokio::join!(shell.export(), shuffle);

        assert_eq!(shell.export_state(), ExportState::Idle);
        assert!(shell.assets().borrow().contains_blob(&handle));
        assert_eq!(shell.model().background_url, handle);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_export_still_revokes_released_blobs() {
        let shell = software_shell(StudioConfig::default());
        let handle = shell.ingest_asset(AssetSlot::Artwork, red_png());
        let export = shell.export();
        let reset = async {
            shell.reset_asset(AssetSlot::Artwork);
        };
        let _ = tokio::time::timeout(Duration::from_millis(10), async { tokio::join!(export, reset) }).await;

        assert_eq!(shell.export_state(), ExportState::Idle);
        assert!(!shell.assets().borrow().contains_blob(&handle));
    }

    // ── interaction ───────────────────────────────────────────────────────

    #[test]
    fn pointer_leave_recenters_cursor() {
        let shell = shell();
        shell.set_workspace_size(Viewport::new(800.0, 600.0));
        shell.pointer_move(Vec2::new(10.0, 590.0));
        assert_ne!(shell.cursor(), CursorPos::CENTER);
        shell.pointer_leave();
        assert_eq!((shell.cursor().x(), shell.cursor().y()), (0.5, 0.5));
    }

    #[tokio::test(start_paused = true)]
    async fn pointer_moves_are_dropped_while_exporting() {
        let shell = shell();
        shell.set_workspace_size(Viewport::new(800.0, 600.0));
        let while_exporting = async {
            assert_eq!(shell.render_mode(), RenderMode::Export);
            shell.pointer_move(Vec2::new(0.0, 0.0));
            assert_eq!(shell.cursor(), CursorPos::CENTER);
            assert!(!shell.scene().has_interactive_layers());
            shell.pointer_leave();
            assert_eq!(shell.cursor(), CursorPos::CENTER);
        };
        tokio::join!(shell.export(), while_exporting);

        shell.pointer_move(Vec2::new(0.0, 0.0));
        assert_eq!(shell.cursor(), CursorPos::new(0.0, 0.0));
        assert!(shell.scene().has_interactive_layers());
    }

    #[test]
    fn attach_tracks_workspace_until_dropped() {
        let shell = Rc::new(shell());
        let ws = Workspace::new(Viewport::new(900.0, 700.0));
        let sub = shell.attach(&ws);
        assert_eq!(shell.fit_scale(), 1.0);

        ws.resize(Viewport::new(600.0, 400.0));
        assert!((shell.fit_scale() - 0.672).abs() < 1e-6);

        drop(sub);
        ws.resize(Viewport::new(900.0, 700.0));
        assert!((shell.fit_scale() - 0.672).abs() < 1e-6);
    }

    // ── model edits ───────────────────────────────────────────────────────

    #[test]
    fn ingested_asset_is_revoked_when_replaced() {
        let shell = shell();
        let handle = shell.ingest_asset(AssetSlot::Artwork, vec![1, 2, 3]);
        assert_eq!(shell.model().artwork_url, handle);
        assert!(shell.assets().borrow().contains_blob(&handle));

        shell.reset_asset(AssetSlot::Artwork);
        assert_eq!(shell.model().artwork_url, SplashModel::default().artwork_url);
        assert!(!shell.assets().borrow().contains_blob(&handle));
    }

    #[test]
    fn shared_blob_survives_until_last_slot_releases_it() {
        let shell = shell();
        let handle = shell.ingest_asset(AssetSlot::AeLogo, vec![9]);
        shell.assign_asset(AssetSlot::CcLogo, handle.clone());
        shell.reset_asset(AssetSlot::AeLogo);
        assert!(shell.assets().borrow().contains_blob(&handle));
        shell.reset_asset(AssetSlot::CcLogo);
        assert!(!shell.assets().borrow().contains_blob(&handle));
    }

    #[test]
    fn preset_and_gradient_edits_reach_the_model() {
        let shell = shell();
        shell.apply_preset(Preset::Neon);
        assert_eq!(shell.model().preset, Preset::Neon);
        shell.set_gradient(ColorValue::rgb(0, 0, 255), ColorValue::rgb(255, 0, 0));
        assert_eq!(shell.model().bg_gradient(), "linear-gradient(135deg, #0000ff 0%, #ff0000 100%)");
    }
}
