use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use swapmotion::{
    ApproxMeasurer, Choreography, CpuRasterizer, Fps, FrameIndex, Sequencer, Stage, StageRenderer,
    TextLayoutEngine, choreography, default_mp4_config, find_system_font, render_frame,
    render_to_mp4, swap_demo,
};

#[derive(Parser, Debug)]
#[command(name = "swapmotion", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render the full animation as an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Dump the resolved script (objects and timeline) as JSON.
    Timeline(TimelineArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Font file; defaults to a discovered system font.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Frame clock rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Font file; defaults to a discovered system font.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Frame clock rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = true)]
    overwrite: bool,
}

#[derive(Parser, Debug)]
struct TimelineArgs {
    /// Font file for exact text metrics; without one, positions are
    /// resolved with approximate metrics.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Timeline(args) => cmd_timeline(args),
    }
}

fn load_font(font: Option<PathBuf>) -> anyhow::Result<Vec<u8>> {
    let path = match font {
        Some(p) => p,
        None => find_system_font()
            .context("no usable font found; pass one explicitly with --font")?,
    };
    std::fs::read(&path).with_context(|| format!("read font '{}'", path.display()))
}

/// Build the rasterizer first, then resolve the script through its layout
/// engine so placement and rasterization share one set of text metrics.
fn build_pipeline(font_bytes: Vec<u8>, fps: u32) -> anyhow::Result<(Stage, CpuRasterizer)> {
    let fps = Fps::new(fps, 1)?;
    let mut rasterizer =
        CpuRasterizer::new(choreography::CANVAS, choreography::BACKGROUND, font_bytes)?;
    let script = swap_demo(rasterizer.engine_mut())?;

    let mut stage = StageRenderer::new(script.canvas, script.background, fps);
    Sequencer::run(&script, &mut stage)?;
    Ok((stage.finish()?, rasterizer))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let font_bytes = load_font(args.font)?;
    let (stage, mut rasterizer) = build_pipeline(font_bytes, args.fps)?;
    let frame = render_frame(&stage, &mut rasterizer, FrameIndex(args.frame))?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
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

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let font_bytes = load_font(args.font)?;
    let (stage, mut rasterizer) = build_pipeline(font_bytes, args.fps)?;

    let mut cfg = default_mp4_config(&args.out, stage.canvas.width, stage.canvas.height, args.fps);
    cfg.overwrite = args.overwrite;
    render_to_mp4(&stage, &mut rasterizer, cfg)?;

    eprintln!(
        "wrote {} ({} frames at {} fps)",
        args.out.display(),
        stage.duration.0,
        args.fps
    );
    Ok(())
}

fn cmd_timeline(args: TimelineArgs) -> anyhow::Result<()> {
    let choreography: Choreography = match args.font {
        Some(path) => {
            let bytes =
                std::fs::read(&path).with_context(|| format!("read font '{}'", path.display()))?;
            let mut engine = TextLayoutEngine::new(bytes)?;
            swap_demo(&mut engine)?
        }
        None => swap_demo(&mut ApproxMeasurer)?,
    };

    let json = serde_json::to_string_pretty(&choreography)?;
    match args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&path, json).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
