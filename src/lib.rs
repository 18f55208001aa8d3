//! padbench measures the cost of padding a large image into a larger canvas and compressing it.
//!
//! Each benchmark iteration runs these phases over a synthetic RGB8 source:
//!
//! 1. **Copy**: place the source into the canvas at an offset, one contiguous row at a time,
//!    with rows split across a fixed pool of workers and each row copied by the widest vector
//!    kernel the host supports.
//! 2. **Transform** (optional): scale every canvas byte by a brightness factor with the same
//!    kernels and partitioning.
//! 3. **Encode**: compress the canvas with an [`ImageCodec`] (JPEG by default).
//! 4. **Write**: hand the stream to an [`ArtifactSink`], overwriting the previous artifact.
//!
//! Every vector kernel has a scalar twin with byte-identical output, so the detected
//! [`CapabilityTag`] only changes timings.
//!
//! `unsafe` is denied crate-wide and allowed only inside the per-architecture kernel modules.
#![deny(unsafe_code)]
#![deny(missing_docs)]

mod bench;
mod encode;
mod foundation;
mod render;
mod simd;

pub use bench::processor::{BenchOpts, FailurePolicy, Processor, run_benchmark};
pub use bench::report::{BenchReport, PhaseMillis, PhaseTiming};
pub use encode::codec::{ChromaSubsampling, EncodeSettings, ImageCodec, JpegCodec, PixelFormat};
pub use encode::sink::{ArtifactSink, DEFAULT_OUTPUT, FileSink, InMemorySink, ensure_parent_dir};
pub use foundation::core::{BYTES_PER_PIXEL, Offset, PixelBuffer};
pub use foundation::error::{ErrorKind, PadError, PadResult, Phase, RunStage};
pub use render::compositor::Compositor;
pub use render::workers::{RowWorkers, default_worker_count, partition_rows};
pub use simd::{
    CapabilityTag, arch_name, detect, extension_name, scale_byte, vector_copy, vector_transform,
};
