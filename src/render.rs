//! Canvas compositing: row partitioning, the worker pool and the compositor itself.

/// Source-into-canvas placement.
pub mod compositor;
/// Row partitioning and the parallel-for pool.
pub mod workers;
