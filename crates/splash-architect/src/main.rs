use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use splash_engine::assets::AssetStore;
use splash_engine::coords::{Vec2, Viewport};
use splash_engine::logging::{init_logging, LoggingConfig};
use splash_engine::scene::FontWeight;
use splash_engine::text::FontSystem;
use splash_studio::capture::SoftwareCapture;
use splash_studio::config::StudioConfig;
use splash_studio::export::ExportFile;
use splash_studio::model::{AssetSlot, BackgroundType, SplashModel};
use splash_studio::preset::Preset;
use splash_studio::shell::{EditorShell, ExportOutcome, ShellEvent};
use splash_studio::workspace::Workspace;

type Shell = EditorShell<SoftwareCapture>;

#[derive(Parser)]
#[command(name = "splash-architect")]
#[command(about = "Design and export 700x500 splash screens")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the splash screen and write `<prefix>-Splash-<millis>.png`.
    Export {
        #[command(flatten)]
        session: SessionArgs,

        /// Directory the PNG is written to.
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Render the live preview (tilt and guides) at the workspace fit-scale.
    Preview {
        #[command(flatten)]
        session: SessionArgs,

        /// Workspace size as WIDTHxHEIGHT.
        #[arg(long, default_value = "1280x800", value_parser = parse_size)]
        workspace: Viewport,

        /// Normalized cursor position as X,Y (each in 0..1).
        #[arg(long, value_parser = parse_cursor)]
        cursor: Option<Vec2>,

        #[arg(short, long, default_value = "preview.png")]
        out: PathBuf,
    },
    /// List the built-in presets.
    Presets,
    /// Print the default model as JSON.
    DefaultModel,
}

#[derive(Args)]
struct SessionArgs {
    /// Model JSON (camelCase fields; omitted fields keep their defaults).
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Studio config TOML.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Apply a preset after loading the model.
    #[arg(short, long)]
    preset: Option<Preset>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    subtitle: Option<String>,

    /// Main logo file (replaces `aeLogoUrl`).
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Bottom-row logo file (replaces `ccLogoUrl`).
    #[arg(long)]
    cc_logo: Option<PathBuf>,

    #[arg(long)]
    artwork: Option<PathBuf>,

    /// Background image file; also switches the background to image mode.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Regular face registered under the model's primary font family.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Bold face registered under the model's primary font family.
    #[arg(long)]
    bold_font: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::from_verbosity(cli.verbose));

    match cli.command {
        Command::Export { session, out_dir } => run_export(&session, &out_dir),
        Command::Preview { session, workspace, cursor, out } => {
            run_preview(&session, workspace, cursor, &out)
        }
        Command::Presets => {
            print_presets();
            Ok(())
        }
        Command::DefaultModel => {
            println!("{}", serde_json::to_string_pretty(&SplashModel::default())?);
            Ok(())
        }
    }
}

// ── commands ──────────────────────────────────────────────────────────────

fn run_export(args: &SessionArgs, out_dir: &Path) -> Result<()> {
    let shell = open_session(args)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start the async runtime")?;
    let outcome = runtime.block_on(shell.export());

    for event in shell.drain_events() {
        match event {
            ShellEvent::Download(file) => {
                let path = save(&file, out_dir)?;
                println!("  wrote {}", path.display());
            }
            ShellEvent::FailureNotice(message) => eprintln!("  {message}"),
        }
    }

    match outcome {
        ExportOutcome::Downloaded { .. } => Ok(()),
        ExportOutcome::Failed => bail!("export failed"),
        ExportOutcome::Rejected => bail!("an export was already in progress"),
    }
}

fn run_preview(args: &SessionArgs, size: Viewport, cursor: Option<Vec2>, out: &Path) -> Result<()> {
    let shell = Rc::new(open_session(args)?);
    let workspace = Workspace::new(size);
    let _subscription = shell.attach(&workspace);

    if let Some(c) = cursor {
        shell.pointer_move(Vec2::new(c.x * size.width, c.y * size.height));
    }

    let mut capture_config = shell.config().export.capture_config();
    capture_config.scale = shell.fit_scale();
    let bitmap = shell
        .capture()
        .rasterize(&shell.scene(), &capture_config)
        .context("failed to rasterize the preview")?;
    let png = bitmap.encode_png().context("failed to encode the preview")?;
    std::fs::write(out, png).with_context(|| format!("failed to write {}", out.display()))?;

    println!(
        "  preview {}x{} (fit-scale {:.3}) -> {}",
        bitmap.width(),
        bitmap.height(),
        shell.fit_scale(),
        out.display()
    );
    Ok(())
}

fn print_presets() {
    println!();
    println!("  ╔══════════╦═════════╦═════════════════════╦═════════╦══════════╗");
    println!("  ║ preset   ║ bg      ║ gradient            ║ title   ║ subtitle ║");
    println!("  ╠══════════╬═════════╬═════════════════════╬═════════╬══════════╣");
    for preset in Preset::ALL {
        let m = SplashModel::default().apply_preset(preset);
        let g = m.gradient();
        println!(
            "  ║ {:<8} ║ {:<7} ║ {:<7} -> {:<7}  ║ {:<7} ║ {:<8} ║",
            preset.name(),
            m.bg_color,
            g.start(),
            g.end(),
            m.title_color,
            m.subtitle_color,
        );
    }
    println!("  ╚══════════╩═════════╩═════════════════════╩═════════╩══════════╝");
    println!();
}

// ── session setup ─────────────────────────────────────────────────────────

fn open_session(args: &SessionArgs) -> Result<Shell> {
    let config = match &args.config {
        Some(path) => StudioConfig::load(path)?,
        None => StudioConfig::default(),
    };
    let mut model = match &args.model {
        Some(path) => SplashModel::load(path)?,
        None => SplashModel::default(),
    };
    if let Some(preset) = args.preset {
        model = model.apply_preset(preset);
    }
    if let Some(title) = &args.title {
        model.title = title.clone();
    }
    if let Some(subtitle) = &args.subtitle {
        model.subtitle = subtitle.clone();
    }
    if args.background.is_some() {
        model.bg_type = BackgroundType::Image;
    }

    let fonts = load_fonts(args, &model)?;
    let assets = Rc::new(RefCell::new(AssetStore::new()));
    let shell = EditorShell::new(config, SoftwareCapture::new(fonts, Rc::clone(&assets)), assets);
    shell.load_model(model);

    let files = [
        (AssetSlot::AeLogo, &args.logo),
        (AssetSlot::CcLogo, &args.cc_logo),
        (AssetSlot::Artwork, &args.artwork),
        (AssetSlot::Background, &args.background),
    ];
    for (slot, path) in files {
        if let Some(path) = path {
            shell
                .ingest_asset_file(slot, path)
                .with_context(|| format!("failed to load {}", path.display()))?;
        }
    }

    prefetch_remote(&shell);
    Ok(shell)
}

fn load_fonts(args: &SessionArgs, model: &SplashModel) -> Result<FontSystem> {
    let mut fonts = FontSystem::with_system_fonts();
    let family = model.font_family.split(',').next().unwrap_or_default().trim();
    for (path, weight) in [(&args.font, FontWeight::Regular), (&args.bold_font, FontWeight::Bold)] {
        if let Some(path) = path {
            fonts
                .load_font_file(path, family, weight)
                .with_context(|| format!("failed to load font {}", path.display()))?;
        }
    }
    if fonts.is_empty() {
        log::warn!("no fonts available; text will be skipped (use --font)");
    }
    Ok(fonts)
}

#[cfg(feature = "remote")]
fn prefetch_remote(shell: &Shell) {
    if !shell.config().export.capture_config().allow_cross_origin {
        return;
    }
    let model = shell.model();
    shell.assets().borrow_mut().prefetch(model.asset_references());
}

#[cfg(not(feature = "remote"))]
fn prefetch_remote(shell: &Shell) {
    let remote = shell
        .model()
        .asset_references()
        .filter(|r| r.starts_with("http://") || r.starts_with("https://"))
        .count();
    if remote > 0 {
        log::info!("{remote} remote asset(s) left blank (built without the `remote` feature)");
    }
}

fn save(file: &ExportFile, out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let path = out_dir.join(&file.file_name);
    std::fs::write(&path, &file.bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

// ── argument parsers ──────────────────────────────────────────────────────

fn parse_size(s: &str) -> Result<Viewport, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{s}`"))?;
    let w: f32 = w.trim().parse().map_err(|_| format!("invalid width `{w}`"))?;
    let h: f32 = h.trim().parse().map_err(|_| format!("invalid height `{h}`"))?;
    let size = Viewport::new(w, h);
    if !size.is_valid() {
        return Err(format!("workspace must be positive, got `{s}`"));
    }
    Ok(size)
}

fn parse_cursor(s: &str) -> Result<Vec2, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got `{s}`"))?;
    let x: f32 = x.trim().parse().map_err(|_| format!("invalid x `{x}`"))?;
    let y: f32 = y.trim().parse().map_err(|_| format!("invalid y `{y}`"))?;
    Ok(Vec2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_workspace_sizes() {
        assert_eq!(parse_size("1280x800").unwrap(), Viewport::new(1280.0, 800.0));
        assert_eq!(parse_size("600 X 400").unwrap(), Viewport::new(600.0, 400.0));
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x10").is_err());
    }

    #[test]
    fn parses_cursor_positions() {
        assert_eq!(parse_cursor("0.25, 1").unwrap(), Vec2::new(0.25, 1.0));
        assert!(parse_cursor("left").is_err());
    }

    #[test]
    fn cli_accepts_export_flags() {
        let cli = Cli::try_parse_from([
            "splash-architect", "-v", "export", "--preset", "neon", "--title", "Premiere", "-o", "out",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        let Command::Export { session, out_dir } = cli.command else { panic!("expected export") };
        assert_eq!(session.preset, Some(Preset::Neon));
        assert_eq!(session.title.as_deref(), Some("Premiere"));
        assert_eq!(out_dir, PathBuf::from("out"));
    }

    #[test]
    fn cli_rejects_unknown_presets() {
        assert!(Cli::try_parse_from(["splash-architect", "export", "--preset", "sepia"]).is_err());
    }

    #[test]
    fn session_applies_overrides() {
        let args = SessionArgs {
            model: None,
            config: None,
            preset: Some(Preset::Light),
            title: Some("Audition".into()),
            subtitle: None,
            logo: None,
            cc_logo: None,
            artwork: None,
            background: None,
            font: None,
            bold_font: None,
        };
        let shell = open_session(&args).unwrap();
        assert_eq!(shell.model().title, "Audition");
        assert_eq!(shell.model().preset, Preset::Light);
        assert_eq!(shell.model().subtitle, "2025 Release");
    }
}
