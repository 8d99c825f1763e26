use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use imgseq::{
    FrameIndex, Manifest, MemoryHost, OutputFrame, PixelFormat, SequenceOptions, SequenceReader,
};

#[derive(Parser, Debug)]
#[command(name = "imgseq", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a sequence and print its stream info as JSON.
    Info(InfoArgs),
    /// Write a single frame as a PNG.
    Frame(FrameArgs),
    /// Write every frame as numbered PNGs.
    Dump(DumpArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Source images in frame order.
    #[arg(required_unless_present = "manifest", conflicts_with = "manifest")]
    files: Vec<PathBuf>,

    /// JSON manifest listing the source images.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Frame rate numerator (default 24, or the manifest's).
    #[arg(long)]
    fps_num: Option<u32>,

    /// Frame rate denominator (default 1, or the manifest's).
    #[arg(long)]
    fps_den: Option<u32>,
}

impl SourceArgs {
    fn options(&self) -> anyhow::Result<SequenceOptions> {
        let opts = match &self.manifest {
            Some(path) => Manifest::from_path(path)?,
            None => SequenceOptions::new(self.files.iter().cloned()),
        };
        if self.fps_num.is_none() && self.fps_den.is_none() {
            return Ok(opts);
        }
        let num = self.fps_num.unwrap_or(opts.fps.num);
        let den = self.fps_den.unwrap_or(opts.fps.den);
        Ok(opts.with_fps(num, den)?)
    }
}

#[derive(Parser, Debug)]
struct InfoArgs {
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Frame index (0-based); past the end yields the last frame.
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Dump(args) => cmd_dump(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let reader = SequenceReader::open(args.source.options()?)?;
    let mut host = MemoryHost::default();
    reader.init(&mut host);

    let files: Vec<String> = reader
        .sequence()
        .files()
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    let fps = reader.sequence().fps();
    let info = serde_json::json!({
        "video": reader.video_info(),
        "frames_per_second": fps.as_f64(),
        "frame_duration_secs": fps.frame_duration_secs(),
        "row_size": reader.sequence().row_size(),
        "files": files,
    });
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let reader = SequenceReader::open(args.source.options()?)?;
    let mut host = MemoryHost::default();
    reader.init(&mut host);

    let frame = reader.get_frame(FrameIndex(args.frame), &host)?;
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    write_png(&frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let reader = SequenceReader::open(args.source.options()?)?;
    let mut host = MemoryHost::default();
    reader.init(&mut host);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = args.threads {
        pool = pool.num_threads(threads);
    }
    let pool = pool.build().context("build rayon thread pool")?;

    let count = reader.frame_count();
    let host = &host;
    let reader = &reader;
    let out_dir = &args.out_dir;
    pool.install(|| {
        (0..count).into_par_iter().try_for_each(|n| -> anyhow::Result<()> {
            let frame = reader.get_frame(FrameIndex(n), host)?;
            write_png(&frame, &out_dir.join(format!("frame_{n:06}.png")))
        })
    })?;

    eprintln!("wrote {count} frames to {}", args.out_dir.display());
    Ok(())
}

fn write_png(frame: &OutputFrame, out: &Path) -> anyhow::Result<()> {
    let mut bytes = frame.to_interleaved();
    if frame.format.bytes_per_sample() == 2 {
        for sample in bytes.chunks_exact_mut(2) {
            let v = u16::from_le_bytes([sample[0], sample[1]]);
            sample.copy_from_slice(&v.to_ne_bytes());
        }
    }
    let color = match frame.format {
        PixelFormat::Gray8 => image::ColorType::L8,
        PixelFormat::Gray16 => image::ColorType::L16,
        PixelFormat::Rgb24 => image::ColorType::Rgb8,
        PixelFormat::Rgb48 => image::ColorType::Rgb16,
    };
    image::save_buffer_with_format(
        out,
        &bytes,
        frame.geometry.width,
        frame.geometry.height,
        color,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))
}
