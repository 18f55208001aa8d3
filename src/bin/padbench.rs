use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use padbench::{
    BenchOpts, BenchReport, CapabilityTag, ChromaSubsampling, EncodeSettings, FailurePolicy,
    FileSink, JpegCodec, Offset, Processor,
};

#[derive(Parser, Debug)]
#[command(
    name = "padbench",
    version,
    about = "Pad a synthetic image into a larger canvas and JPEG-encode it, timing each phase."
)]
struct Cli {
    /// Timed iterations.
    #[arg(long, short = 'n', default_value_t = 3)]
    iterations: usize,

    /// Untimed iterations run first.
    #[arg(long, default_value_t = 0)]
    warmup: usize,

    /// Source width in pixels.
    #[arg(long, default_value_t = 19_000)]
    source_width: usize,

    /// Source height in pixels.
    #[arg(long, default_value_t = 19_000)]
    source_height: usize,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 20_000)]
    canvas_width: usize,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 20_000)]
    canvas_height: usize,

    /// Source column inside the canvas.
    #[arg(long, default_value_t = 500)]
    offset_x: usize,

    /// Source row inside the canvas.
    #[arg(long, default_value_t = 500)]
    offset_y: usize,

    /// Byte value of every source byte.
    #[arg(long, default_value_t = 128)]
    fill: u8,

    /// Row workers (defaults to hardware concurrency).
    #[arg(long)]
    workers: Option<usize>,

    /// Force a kernel class instead of detecting one (none, narrow or wide).
    #[arg(long)]
    tag: Option<CapabilityTag>,

    /// Scale canvas bytes by this factor after each copy.
    #[arg(long)]
    brightness: Option<f32>,

    /// JPEG quality (1..=100).
    #[arg(long, default_value_t = 100)]
    quality: u8,

    /// Chroma subsampling.
    #[arg(long, value_enum, default_value_t = SubsamplingChoice::Yuv444)]
    subsampling: SubsamplingChoice,

    /// Disable the fast-DCT hint.
    #[arg(long)]
    accurate_dct: bool,

    /// Artifact path, overwritten every iteration.
    #[arg(long, short = 'o', default_value = padbench::DEFAULT_OUTPUT)]
    out: PathBuf,

    /// What to do when an iteration fails.
    #[arg(long, value_enum, default_value_t = PolicyChoice::Abort)]
    on_failure: PolicyChoice,

    /// Print the report as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Log verbosity (-v debug, -vv trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SubsamplingChoice {
    Yuv444,
    Yuv420,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyChoice {
    Abort,
    Skip,
}

impl Cli {
    fn opts(&self) -> BenchOpts {
        BenchOpts {
            source_width: self.source_width,
            source_height: self.source_height,
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            offset: Offset::new(self.offset_x, self.offset_y),
            fill: self.fill,
            iterations: self.iterations,
            warmup: self.warmup,
            workers: self.workers,
            tag: self.tag,
            brightness: self.brightness,
            encode: EncodeSettings {
                quality: self.quality,
                subsampling: match self.subsampling {
                    SubsamplingChoice::Yuv444 => ChromaSubsampling::Yuv444,
                    SubsamplingChoice::Yuv420 => ChromaSubsampling::Yuv420,
                },
                fast_dct: !self.accurate_dct,
            },
            on_failure: match self.on_failure {
                PolicyChoice::Abort => FailurePolicy::Abort,
                PolicyChoice::Skip => FailurePolicy::Skip,
            },
        }
    }
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let opts = cli.opts();
    let mut processor = Processor::new(&opts).context("set up benchmark")?;

    if !cli.json {
        println!("architecture: {}", padbench::arch_name());
        println!(
            "vector extension: {} (using {})",
            padbench::extension_name(),
            processor.tag()
        );
        println!(
            "source {}x{} -> canvas {}x{} at ({}, {}), {} worker(s)",
            opts.source_width,
            opts.source_height,
            opts.canvas_width,
            opts.canvas_height,
            opts.offset.x,
            opts.offset.y,
            processor.worker_count()
        );
    }

    let mut codec = JpegCodec::new();
    let mut sink = FileSink::new(&cli.out);
    let report = processor.run(&mut codec, &mut sink);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    } else {
        print_report(&report);
    }

    if let Some(first) = report.failures.first() {
        anyhow::bail!(
            "{} iteration(s) failed; first: {first}",
            report.failures.len()
        );
    }
    Ok(())
}

fn print_report(report: &BenchReport) {
    for t in &report.timings {
        let m = t.millis();
        println!(
            "iteration {}: copy {:.3} ms, transform {:.3} ms, encode {:.3} ms, write {:.3} ms, total {:.3} ms",
            t.iteration, m.copy_ms, m.transform_ms, m.encode_ms, m.write_ms, m.total_ms
        );
    }
    for e in &report.failures {
        println!("failed: {e}");
    }
    if let Some(m) = report.mean() {
        println!(
            "mean over {} iteration(s): copy {:.3} ms, transform {:.3} ms, encode {:.3} ms, write {:.3} ms, total {:.3} ms",
            report.timings.len(),
            m.copy_ms,
            m.transform_ms,
            m.encode_ms,
            m.write_ms,
            m.total_ms
        );
    }
}
