//! The timed composite-and-encode loop.
//!
//! A [`processor::Processor`] owns the source, the canvas and the compositor. Each iteration
//! copies the source into the canvas, optionally scales brightness, compresses the canvas and
//! writes the artifact; [`report::BenchReport`] collects the per-phase timings.

/// Options, the processor and the iteration loop.
pub mod processor;
/// Timings, means and the JSON report.
pub mod report;
