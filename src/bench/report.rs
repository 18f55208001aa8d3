use std::time::Duration;

use serde_json::json;

use crate::{foundation::error::PadError, simd::CapabilityTag};

/// Durations of one successful iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseTiming {
    /// Zero-based iteration index.
    pub iteration: usize,
    /// Compositing the source into the canvas.
    pub copy: Duration,
    /// Optional brightness pass; zero when disabled.
    pub transform: Duration,
    /// Codec compression.
    pub encode: Duration,
    /// Writing the artifact.
    pub write: Duration,
    /// Start of the copy phase to the end of compression. Excludes `write`.
    pub total: Duration,
}

impl PhaseTiming {
    /// Same timing in fractional milliseconds.
    pub fn millis(&self) -> PhaseMillis {
        PhaseMillis {
            copy_ms: ms(self.copy),
            transform_ms: ms(self.transform),
            encode_ms: ms(self.encode),
            write_ms: ms(self.write),
            total_ms: ms(self.total),
        }
    }
}

/// Phase durations in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
#[allow(missing_docs)]
pub struct PhaseMillis {
    pub copy_ms: f64,
    pub transform_ms: f64,
    pub encode_ms: f64,
    pub write_ms: f64,
    pub total_ms: f64,
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1e3
}

/// Outcome of a benchmark run.
#[derive(Debug)]
pub struct BenchReport {
    /// Kernel class used for row copies.
    pub tag: CapabilityTag,
    /// Row worker count.
    pub workers: usize,
    /// Successful iterations, in iteration order.
    pub timings: Vec<PhaseTiming>,
    /// Failed iterations, each a [`PadError::Iteration`].
    pub failures: Vec<PadError>,
    /// `true` when a failure stopped the loop before all iterations ran.
    pub halted: bool,
}

impl BenchReport {
    pub(crate) fn new(tag: CapabilityTag, workers: usize, iterations: usize) -> Self {
        Self {
            tag,
            workers,
            timings: Vec::with_capacity(iterations),
            failures: Vec::new(),
            halted: false,
        }
    }

    /// `true` when every iteration succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Arithmetic mean of each phase over the successful iterations.
    pub fn mean(&self) -> Option<PhaseMillis> {
        let n = self.timings.len();
        if n == 0 {
            return None;
        }
        let mut acc = PhaseMillis::default();
        for t in &self.timings {
            let m = t.millis();
            acc.copy_ms += m.copy_ms;
            acc.transform_ms += m.transform_ms;
            acc.encode_ms += m.encode_ms;
            acc.write_ms += m.write_ms;
            acc.total_ms += m.total_ms;
        }
        let n = n as f64;
        Some(PhaseMillis {
            copy_ms: acc.copy_ms / n,
            transform_ms: acc.transform_ms / n,
            encode_ms: acc.encode_ms / n,
            write_ms: acc.write_ms / n,
            total_ms: acc.total_ms / n,
        })
    }

    /// Machine-readable form of the report.
    pub fn to_json(&self) -> serde_json::Value {
        let iterations = self
            .timings
            .iter()
            .map(|t| json!({ "iteration": t.iteration, "timing": t.millis() }))
            .collect::<Vec<_>>();
        let failures = self
            .failures
            .iter()
            .map(|e| {
                let (iteration, phase) = e
                    .location()
                    .map(|(i, p)| (Some(i), Some(p)))
                    .unwrap_or((None, None));
                json!({
                    "stage": e.stage(),
                    "iteration": iteration,
                    "phase": phase,
                    "kind": format!("{:?}", e.kind()),
                    "message": e.to_string(),
                })
            })
            .collect::<Vec<_>>();

        json!({
            "arch": crate::simd::arch_name(),
            "tag": self.tag,
            "workers": self.workers,
            "iterations": iterations,
            "mean": self.mean(),
            "failures": failures,
            "halted": self.halted,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bench/report.rs"]
mod tests;
