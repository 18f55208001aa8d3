use std::time::{Duration, Instant};

use crate::{
    foundation::core::{Offset, PixelBuffer},
    foundation::error::{PadError, PadResult},
    render::workers::RowWorkers,
    simd::{CapabilityTag, vector_copy, vector_transform},
};

/// Row-parallel placement of a source buffer into a larger canvas.
#[derive(Debug)]
pub struct Compositor {
    tag: CapabilityTag,
    workers: RowWorkers,
}

impl Compositor {
    /// Create a compositor that copies rows with `tag` kernels on `workers` threads
    /// (`None` = hardware concurrency).
    pub fn new(tag: CapabilityTag, workers: Option<usize>) -> PadResult<Self> {
        Ok(Self {
            tag,
            workers: RowWorkers::new(workers)?,
        })
    }

    /// Kernel class used for row copies.
    pub fn tag(&self) -> CapabilityTag {
        self.tag
    }

    /// Number of row partitions / worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.workers()
    }

    /// Copy `source` into `canvas` with its top-left corner at `offset`, returning the
    /// elapsed copy time.
    ///
    /// Canvas rows and columns outside the placed region are left untouched; parts of the
    /// source that fall outside the canvas are clipped.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(tag = %self.tag, workers = self.workers.workers(), x = offset.x, y = offset.y)
    )]
    pub fn composite(
        &self,
        source: &PixelBuffer,
        canvas: &mut PixelBuffer,
        offset: Offset,
    ) -> PadResult<Duration> {
        let bpp = canvas.bytes_per_pixel();
        if source.bytes_per_pixel() != bpp {
            return Err(PadError::validation(format!(
                "source has {} bytes per pixel, canvas has {bpp}",
                source.bytes_per_pixel()
            )));
        }

        let started = Instant::now();
        let tag = self.tag;
        let canvas_row_bytes = canvas.row_bytes();
        let canvas_height = canvas.height();
        // Byte window of each canvas row that receives source bytes.
        let dst_start = offset.x.saturating_mul(bpp);
        let copy_len = if dst_start >= canvas_row_bytes {
            0
        } else {
            source.row_bytes().min(canvas_row_bytes - dst_start)
        };
        let src_rows = offset.y..offset.y.saturating_add(source.height());

        if copy_len == 0 || src_rows.start >= canvas_height {
            tracing::debug!("source placed entirely outside the canvas; nothing to copy");
            return Ok(started.elapsed());
        }

        self.workers.for_each_range(
            canvas.as_bytes_mut(),
            canvas_row_bytes,
            canvas_height,
            |rows, chunk| {
                for (y, dst_row) in rows.zip(chunk.chunks_exact_mut(canvas_row_bytes)) {
                    if !src_rows.contains(&y) {
                        continue;
                    }
                    let src_y = y - offset.y;
                    let Some(src_row) = source.row(src_y) else {
                        continue;
                    };
                    vector_copy(
                        &src_row[..copy_len],
                        &mut dst_row[dst_start..dst_start + copy_len],
                        tag,
                    );
                }
            },
        );

        let elapsed = started.elapsed();
        tracing::debug!(elapsed_ms = elapsed.as_secs_f64() * 1e3, "composite done");
        Ok(elapsed)
    }

    /// Scale every canvas byte by `factor` (see [`vector_transform`]) using the same row
    /// partition as [`Compositor::composite`]. Returns the elapsed time.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(tag = %self.tag, factor = f64::from(factor))
    )]
    pub fn transform(&self, canvas: &mut PixelBuffer, factor: f32) -> Duration {
        let started = Instant::now();
        let tag = self.tag;
        let row_bytes = canvas.row_bytes();
        let height = canvas.height();
        self.workers
            .for_each_range(canvas.as_bytes_mut(), row_bytes, height, |_, chunk| {
                vector_transform(chunk, factor, tag);
            });
        started.elapsed()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
