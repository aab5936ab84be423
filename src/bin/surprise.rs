use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use surprise::{
    Bounds, Clock as _, GlyphRaster as _, JsonLinesRenderer, ManualClock, PresentationConfig,
    Rng64, Sequencer, SvgTextRaster, SystemClock,
};

#[derive(Parser, Debug)]
#[command(name = "surprise", version)]
struct Cli {
    /// Log progress and sequencer events to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a presentation headlessly and write one JSON snapshot per frame.
    Simulate(SimulateArgs),
    /// Print the text-shaped target points for a message as JSON.
    Targets(TargetsArgs),
    /// Write the rasterized glyph mask for a message as a grayscale PNG.
    Mask(MaskArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Presentation config JSON (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated frames per second.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Simulated duration in seconds.
    #[arg(long, default_value_t = 40.0)]
    seconds: f64,

    /// Request "advance" at these times (seconds, repeatable).
    #[arg(long = "advance-at")]
    advance_at: Vec<f64>,

    /// Force the reduced-motion preference on.
    #[arg(long, default_value_t = false)]
    reduced_motion: bool,

    /// Seed for scatter and target sampling.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Output JSON-lines path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TargetsArgs {
    #[arg(long, default_value = "Happy Birthday")]
    text: String,

    #[arg(long, default_value_t = 28)]
    count: usize,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 720.0)]
    height: f64,

    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Extra font directory.
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct MaskArgs {
    #[arg(long, default_value = "Happy Birthday")]
    text: String,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Extra font directory.
    #[arg(long)]
    font_dir: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::Targets(args) => cmd_targets(args),
        Command::Mask(args) => cmd_mask(args),
    }
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be > 0");
    }
    if !(args.seconds.is_finite() && args.seconds >= 0.0) {
        anyhow::bail!("--seconds must be >= 0");
    }

    let mut config = match &args.config {
        Some(path) => PresentationConfig::from_path(path)?,
        None => PresentationConfig::default(),
    };
    config.reduced_motion |= args.reduced_motion;

    let unix_origin = SystemClock::new().unix_millis().unwrap_or_default();
    let clock = ManualClock::with_unix_origin(0.0, unix_origin);
    let raster = SvgTextRaster::new(config.glyph.font_dir.as_deref());
    let mut seq = Sequencer::new(config, clock.clone(), Rng64::new(args.seed), Box::new(raster))?;

    let out: Box<dyn Write> = match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(path)
                .with_context(|| format!("create output '{}'", path.display()))?;
            Box::new(BufWriter::new(f))
        }
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    let mut renderer = JsonLinesRenderer::new(out);

    let mut advances = args.advance_at.clone();
    advances.sort_by(f64::total_cmp);
    let mut advances = advances.into_iter().peekable();

    let frames = (args.seconds * args.fps).ceil() as u64;
    seq.start();
    for i in 0..=frames {
        if !seq.should_reschedule() {
            break;
        }
        let t = i as f64 / args.fps;
        clock.set(t);
        while advances.next_if(|&at| at <= t).is_some() {
            let moved = seq.advance();
            tracing::debug!(t, moved, "advance requested");
        }
        for event in seq.tick() {
            tracing::debug!(t, ?event, "sequencer event");
        }
        surprise::present_to(Some(&mut renderer), &seq.snapshot());
    }
    seq.stop();

    let frames_written = renderer.frames();
    renderer.into_inner().flush().context("flush snapshots")?;
    tracing::info!(frames = frames_written, "simulation finished");
    if let Some(path) = &args.out {
        eprintln!("wrote {} ({frames_written} frames)", path.display());
    }
    Ok(())
}

fn cmd_targets(args: TargetsArgs) -> anyhow::Result<()> {
    let config = PresentationConfig::default();
    let bounds = Bounds::new(args.width, args.height)?;
    let raster = SvgTextRaster::new(args.font_dir.as_deref());
    let mut rng = Rng64::new(args.seed);
    let points = surprise::compute_targets(
        &raster,
        &args.text,
        args.count,
        bounds,
        &config.glyph,
        &mut rng,
    );

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &points).context("write targets JSON")?;
    writeln!(stdout).context("write targets JSON")?;
    Ok(())
}

fn cmd_mask(args: MaskArgs) -> anyhow::Result<()> {
    let config = PresentationConfig::default();
    let bounds = Bounds::new(args.width, args.height)?;
    let raster = SvgTextRaster::new(args.font_dir.as_deref());
    let mask = raster.rasterize(&args.text, bounds, &config.glyph)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        mask.alpha(),
        mask.width(),
        mask.height(),
        image::ColorType::L8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
