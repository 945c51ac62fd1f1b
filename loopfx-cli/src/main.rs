use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use loopfx::{
    BufferPool, EffectInstance, EffectPreset, EffectRegistry, Frame, ParamKind, RenderThreading,
};

#[derive(Parser, Debug)]
#[command(name = "loopfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List built-in effects and their parameters.
    Effects(EffectsArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a whole loop as numbered PNGs.
    Render(RenderArgs),
    /// Check that frame `total` reproduces frame 0.
    CheckLoop(CheckLoopArgs),
}

#[derive(Args, Debug)]
struct EffectsArgs {
    /// Print as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// Which effect to run: a preset file, or an id with inline parameters.
#[derive(Args, Debug)]
struct EffectSource {
    /// Effect preset JSON file.
    #[arg(long, conflicts_with_all = ["effect", "params"])]
    preset: Option<PathBuf>,

    /// Effect id.
    #[arg(long, required_unless_present = "preset")]
    effect: Option<String>,

    /// Inline parameter object, e.g. '{"amplitude": 6}'.
    #[arg(long)]
    params: Option<String>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    source: EffectSource,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Frames per loop.
    #[arg(long)]
    total: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    source: EffectSource,

    /// Frames per loop.
    #[arg(long)]
    total: u64,

    /// Output directory; frames are written as `frame_00000.png`, ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per batch.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,
}

#[derive(Args, Debug)]
struct CheckLoopArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    source: EffectSource,

    /// Frames per loop.
    #[arg(long)]
    total: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Effects(args) => cmd_effects(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::CheckLoop(args) => cmd_check_loop(args),
    }
}

fn cmd_effects(args: EffectsArgs) -> anyhow::Result<()> {
    let reg = EffectRegistry::builtin();
    if args.json {
        let list: Vec<_> = reg
            .descriptors()
            .map(|d| {
                serde_json::json!({
                    "id": d.id(),
                    "name": d.metadata().name,
                    "description": d.metadata().description,
                    "defaults": d.default_config().to_json(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    for d in reg.descriptors() {
        let meta = d.metadata();
        println!("{} - {}", meta.id, meta.description);
        for p in meta.params {
            println!("    {:<20} {:<28} {}", p.name, describe_kind(&p.kind), p.doc);
        }
    }
    Ok(())
}

fn describe_kind(kind: &ParamKind) -> String {
    match kind {
        ParamKind::Float { min, max, default } => format!("float [{min}, {max}] = {default}"),
        ParamKind::Int { min, max, default } => format!("int [{min}, {max}] = {default}"),
        ParamKind::Bool { default } => format!("bool = {default}"),
        ParamKind::Choice { options, default } => format!("{} = {default}", options.join("|")),
        ParamKind::Color { default } => format!("color = {default}"),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let input = read_png(&args.in_path)?;
    let instance = load_instance(&args.source, &input)?;
    let pool = BufferPool::default();
    let frame = loopfx::render_frame(&instance, &input, args.frame, args.total, &pool)?;
    write_png(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let input = read_png(&args.in_path)?;
    let instance = load_instance(&args.source, &input)?;
    let threading = RenderThreading {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
    };
    let (frames, stats) = loopfx::render_loop(&instance, &input, args.total, &threading)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (i, frame) in frames.iter().enumerate() {
        write_png(&args.out_dir.join(format!("frame_{i:05}.png")), frame)?;
    }
    eprintln!(
        "wrote {} frames to {} ({} chunks, {} buffers allocated)",
        stats.frames_rendered,
        args.out_dir.display(),
        stats.chunks,
        stats.pool.alloc_buffers
    );
    Ok(())
}

fn cmd_check_loop(args: CheckLoopArgs) -> anyhow::Result<()> {
    let input = read_png(&args.in_path)?;
    let instance = load_instance(&args.source, &input)?;
    let pool = BufferPool::default();
    let report = loopfx::verify_loop_closure(&instance, &input, args.total, &pool)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.closes() {
        anyhow::bail!(
            "frame {} ({:016x}) differs from frame 0 ({:016x})",
            report.total,
            report.wrapped,
            report.first
        );
    }
    Ok(())
}

fn load_instance(source: &EffectSource, input: &Frame) -> anyhow::Result<EffectInstance> {
    let preset = match (&source.preset, &source.effect) {
        (Some(path), _) => EffectPreset::from_path(path)?,
        (None, Some(id)) => {
            let mut p = EffectPreset::new(id.as_str());
            if let Some(raw) = &source.params {
                p.params = serde_json::from_str(raw).context("parse --params")?;
            }
            p
        }
        (None, None) => anyhow::bail!("either --preset or --effect is required"),
    };
    Ok(preset.instantiate_for(&EffectRegistry::builtin(), input.width, input.height)?)
}

fn read_png(path: &Path) -> anyhow::Result<Frame> {
    let img = image::open(path)
        .with_context(|| format!("read image '{}'", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(Frame::new(width, height, img.into_raw())?)
}

fn write_png(path: &Path, frame: &Frame) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
