use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "fieldwave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Trace a single frame and write it as `electric_field.svg`.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Scene JSON (params, theme, time, size, trace options).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Animation time in seconds; overrides the scene.
    #[arg(long)]
    time: Option<f64>,

    /// Color theme; overrides the scene.
    #[arg(long, value_enum)]
    theme: Option<ThemeChoice>,

    /// Output width in pixels; overrides the scene.
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels; overrides the scene.
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeChoice {
    Light,
    Dark,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn read_scene(args: &SceneArgs) -> anyhow::Result<fieldwave::SceneConfig> {
    let mut scene = match &args.config {
        Some(path) => fieldwave::SceneConfig::from_path(path)
            .with_context(|| format!("load scene '{}'", path.display()))?,
        None => fieldwave::SceneConfig::default(),
    };
    if let Some(t) = args.time {
        scene.time = t;
    }
    if let Some(theme) = args.theme {
        scene.theme = match theme {
            ThemeChoice::Light => fieldwave::Theme::Light,
            ThemeChoice::Dark => fieldwave::Theme::Dark,
        };
    }
    if args.width.is_some() {
        scene.width = args.width;
    }
    if args.height.is_some() {
        scene.height = args.height;
    }
    Ok(scene)
}

fn make_session(scene: &fieldwave::SceneConfig) -> anyhow::Result<fieldwave::FieldSession> {
    let opts = fieldwave::SessionOpts {
        trace: scene.trace,
        ..fieldwave::SessionOpts::default()
    };
    let mut session = fieldwave::FieldSession::new(scene.params, opts)?;
    session.set_theme(scene.theme);

    session.clock().seek(scene.time);
    if scene.paused {
        session.clock().pause();
    }

    let surface = fieldwave::CpuSurface::new(scene.surface_opts())?;
    session.attach_surface(Box::new(surface));
    Ok(session)
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create output dir '{}'", dir.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.scene)?;
    let mut session = make_session(&scene)?;

    // The first tick only anchors the clock, so the frame shows exactly `scene.time`.
    let outcome = session.frame(Instant::now())?;
    tracing::debug!(?outcome, "rendered frame");
    let frame = session.capture()?;

    if let Some(parent) = args.out.parent() {
        ensure_dir(parent)?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.scene)?;
    let mut session = make_session(&scene)?;

    let artifact = session.try_export_svg().context("export svg")?;

    ensure_dir(&args.out)?;
    let path = args.out.join(&artifact.file_name);
    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("write svg '{}'", path.display()))?;

    eprintln!("wrote {} ({})", path.display(), artifact.mime_type);
    Ok(())
}
