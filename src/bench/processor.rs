use std::time::{Duration, Instant};

use crate::{
    bench::report::{BenchReport, PhaseTiming},
    encode::codec::{EncodeSettings, ImageCodec, PixelFormat},
    encode::sink::ArtifactSink,
    foundation::core::{BYTES_PER_PIXEL, Offset, PixelBuffer},
    foundation::error::{PadError, PadResult, Phase, RunStage},
    render::compositor::Compositor,
    simd::{self, CapabilityTag},
};

/// What the loop does after a failed iteration.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failure.
    #[default]
    Abort,
    /// Record the failure and run the remaining iterations.
    Skip,
}

/// Benchmark configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchOpts {
    /// Source width in pixels.
    pub source_width: usize,
    /// Source height in pixels.
    pub source_height: usize,
    /// Canvas width in pixels.
    pub canvas_width: usize,
    /// Canvas height in pixels.
    pub canvas_height: usize,
    /// Source placement inside the canvas.
    pub offset: Offset,
    /// Byte value of every source byte. The canvas starts zeroed.
    pub fill: u8,
    /// Timed iterations.
    pub iterations: usize,
    /// Untimed iterations run before the timed ones.
    pub warmup: usize,
    /// Worker count (`None` = hardware concurrency).
    pub workers: Option<usize>,
    /// Kernel class (`None` = detect).
    pub tag: Option<CapabilityTag>,
    /// Brightness factor for the optional transform phase.
    pub brightness: Option<f32>,
    /// Codec settings.
    pub encode: EncodeSettings,
    /// Failure handling.
    pub on_failure: FailurePolicy,
}

impl Default for BenchOpts {
    fn default() -> Self {
        Self {
            source_width: 19_000,
            source_height: 19_000,
            canvas_width: 20_000,
            canvas_height: 20_000,
            offset: Offset::new(500, 500),
            fill: 128,
            iterations: 3,
            warmup: 0,
            workers: None,
            tag: None,
            brightness: None,
            encode: EncodeSettings::default(),
            on_failure: FailurePolicy::Abort,
        }
    }
}

impl BenchOpts {
    /// Reject configurations the loop cannot run.
    pub fn validate(&self) -> PadResult<()> {
        if self.iterations == 0 {
            return Err(PadError::validation("iterations must be >= 1"));
        }
        if self.source_width == 0 || self.source_height == 0 {
            return Err(PadError::validation(format!(
                "source dimensions must be non-zero, got {}x{}",
                self.source_width, self.source_height
            )));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(PadError::validation(format!(
                "canvas dimensions must be non-zero, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if u32::try_from(self.canvas_width).is_err() || u32::try_from(self.canvas_height).is_err()
        {
            return Err(PadError::validation(format!(
                "canvas {}x{} exceeds u32 dimensions",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.workers == Some(0) {
            return Err(PadError::validation("workers must be >= 1 when set"));
        }
        if let Some(b) = self.brightness
            && !b.is_finite()
        {
            return Err(PadError::validation(format!(
                "brightness must be finite, got {b}"
            )));
        }
        Ok(())
    }
}

/// Owns the buffers of a benchmark run and executes its iterations.
///
/// The canvas is not cleared between iterations; each copy overwrites the same region from the
/// unchanged source, so every iteration encodes identical content.
#[derive(Debug)]
pub struct Processor {
    source: PixelBuffer,
    canvas: PixelBuffer,
    offset: Offset,
    compositor: Compositor,
    brightness: Option<f32>,
    encode: EncodeSettings,
    width: u32,
    height: u32,
    iterations: usize,
    warmup: usize,
    on_failure: FailurePolicy,
}

impl Processor {
    /// Allocate a flat `opts.fill` source and a zeroed canvas and build the worker pool.
    pub fn new(opts: &BenchOpts) -> PadResult<Self> {
        opts.validate()?;
        let source = PixelBuffer::filled(
            opts.source_width,
            opts.source_height,
            BYTES_PER_PIXEL,
            opts.fill,
        )?;
        Self::with_source(opts, source)
    }

    /// Like [`Processor::new`] with caller-provided source pixels. `opts.fill` is ignored.
    ///
    /// The source must be RGB8 and match `opts.source_width x opts.source_height`. It is not
    /// mutated afterwards.
    pub fn with_source(opts: &BenchOpts, source: PixelBuffer) -> PadResult<Self> {
        opts.validate()?;
        if source.bytes_per_pixel() != BYTES_PER_PIXEL {
            return Err(PadError::validation(format!(
                "source must have {BYTES_PER_PIXEL} bytes per pixel, got {}",
                source.bytes_per_pixel()
            )));
        }
        if (source.width(), source.height()) != (opts.source_width, opts.source_height) {
            return Err(PadError::validation(format!(
                "source is {}x{}, options expect {}x{}",
                source.width(),
                source.height(),
                opts.source_width,
                opts.source_height
            )));
        }

        let tag = opts.tag.unwrap_or_else(simd::detect);
        if !tag.is_supported() {
            tracing::warn!(%tag, "kernel class not available on this host; using scalar rows");
        }

        let canvas = PixelBuffer::new(opts.canvas_width, opts.canvas_height, BYTES_PER_PIXEL)?;
        let compositor = Compositor::new(tag, opts.workers)?;

        let width = u32::try_from(opts.canvas_width)
            .map_err(|_| PadError::validation("canvas width exceeds u32"))?;
        let height = u32::try_from(opts.canvas_height)
            .map_err(|_| PadError::validation("canvas height exceeds u32"))?;

        tracing::info!(
            source = %format_args!("{}x{}", opts.source_width, opts.source_height),
            canvas = %format_args!("{}x{}", opts.canvas_width, opts.canvas_height),
            %tag,
            workers = compositor.worker_count(),
            "processor ready"
        );

        Ok(Self {
            source,
            canvas,
            offset: opts.offset,
            compositor,
            brightness: opts.brightness,
            encode: opts.encode,
            width,
            height,
            iterations: opts.iterations,
            warmup: opts.warmup,
            on_failure: opts.on_failure,
        })
    }

    /// Kernel class used for row copies.
    pub fn tag(&self) -> CapabilityTag {
        self.compositor.tag()
    }

    /// Worker count.
    pub fn worker_count(&self) -> usize {
        self.compositor.worker_count()
    }

    /// Source buffer.
    pub fn source(&self) -> &PixelBuffer {
        &self.source
    }

    /// Canvas as left by the last iteration.
    pub fn canvas(&self) -> &PixelBuffer {
        &self.canvas
    }

    /// Run one iteration: copy, optional transform, compress, write.
    ///
    /// Errors come back as [`PadError::Iteration`] carrying `iteration` and the failed phase.
    pub fn run_iteration(
        &mut self,
        iteration: usize,
        codec: &mut dyn ImageCodec,
        sink: &mut dyn ArtifactSink,
    ) -> PadResult<PhaseTiming> {
        self.run_pass(RunStage::Timed, iteration, codec, sink)
    }

    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(stage = %stage, iteration = iteration, codec = codec.name())
    )]
    fn run_pass(
        &mut self,
        stage: RunStage,
        iteration: usize,
        codec: &mut dyn ImageCodec,
        sink: &mut dyn ArtifactSink,
    ) -> PadResult<PhaseTiming> {
        let started = Instant::now();

        let copy = self
            .compositor
            .composite(&self.source, &mut self.canvas, self.offset)
            .map_err(|e| e.in_stage(stage, iteration, Phase::Copy))?;

        let transform = match self.brightness {
            Some(factor) => self.compositor.transform(&mut self.canvas, factor),
            None => Duration::ZERO,
        };

        let encode_started = Instant::now();
        let bytes = codec
            .compress(
                self.canvas.as_bytes(),
                self.width,
                self.height,
                PixelFormat::Rgb8,
                &self.encode,
            )
            .map_err(|e| e.in_stage(stage, iteration, Phase::Encode))?;
        let encode = encode_started.elapsed();
        let total = started.elapsed();

        let write_started = Instant::now();
        sink.write_artifact(&bytes)
            .map_err(|e| e.in_stage(stage, iteration, Phase::Write))?;

        let timing = PhaseTiming {
            iteration,
            copy,
            transform,
            encode,
            write: write_started.elapsed(),
            total,
        };
        tracing::debug!(bytes = bytes.len(), ?timing, "iteration done");
        Ok(timing)
    }

    /// Run the configured warmup passes, then the timed iterations.
    ///
    /// Failures are collected in the report. Under [`FailurePolicy::Abort`] the first failure
    /// ends the run; timings recorded before it are kept. A failed warmup always ends the run
    /// and is reported with [`RunStage::Warmup`].
    pub fn run(&mut self, codec: &mut dyn ImageCodec, sink: &mut dyn ArtifactSink) -> BenchReport {
        let mut report = BenchReport::new(self.tag(), self.worker_count(), self.iterations);

        for w in 0..self.warmup {
            if let Err(err) = self.run_pass(RunStage::Warmup, w, codec, sink) {
                tracing::warn!(warmup = w, error = %err, "warmup failed");
                report.failures.push(err);
                report.halted = true;
                return report;
            }
        }

        for i in 0..self.iterations {
            match self.run_iteration(i, codec, sink) {
                Ok(timing) => {
                    tracing::info!(
                        iteration = i,
                        copy_ms = timing.millis().copy_ms,
                        encode_ms = timing.millis().encode_ms,
                        total_ms = timing.millis().total_ms,
                        "iteration"
                    );
                    report.timings.push(timing);
                }
                Err(err) => {
                    tracing::warn!(iteration = i, error = %err, "iteration failed");
                    report.failures.push(err);
                    if self.on_failure == FailurePolicy::Abort {
                        report.halted = i + 1 < self.iterations;
                        break;
                    }
                }
            }
        }
        report
    }
}

/// Build a [`Processor`] from `opts` and run it to completion.
pub fn run_benchmark(
    opts: &BenchOpts,
    codec: &mut dyn ImageCodec,
    sink: &mut dyn ArtifactSink,
) -> PadResult<BenchReport> {
    let mut processor = Processor::new(opts)?;
    Ok(processor.run(codec, sink))
}

#[cfg(test)]
#[path = "../../tests/unit/bench/processor.rs"]
mod tests;
