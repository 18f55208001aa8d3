use crate::foundation::error::{PadError, PadResult};

/// Bytes per pixel of the benchmark's RGB8 layout.
pub const BYTES_PER_PIXEL: usize = 3;

/// Pixel position of the source's top-left corner inside the canvas.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Offset {
    /// Column, in pixels.
    pub x: usize,
    /// Row, in pixels.
    pub y: usize,
}

impl Offset {
    /// Create an offset.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Row-major interleaved pixel storage.
///
/// `data.len() == width * height * bytes_per_pixel` holds for every constructed value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a buffer with every byte set to `fill`.
    pub fn filled(
        width: usize,
        height: usize,
        bytes_per_pixel: usize,
        fill: u8,
    ) -> PadResult<Self> {
        if !(1..=4).contains(&bytes_per_pixel) {
            return Err(PadError::validation(format!(
                "bytes_per_pixel must be in 1..=4, got {bytes_per_pixel}"
            )));
        }
        let len = width
            .checked_mul(height)
            .and_then(|px| px.checked_mul(bytes_per_pixel))
            .ok_or_else(|| {
                PadError::validation(format!(
                    "pixel buffer {width}x{height}x{bytes_per_pixel} overflows usize"
                ))
            })?;
        Ok(Self {
            width,
            height,
            bytes_per_pixel,
            data: vec![fill; len],
        })
    }

    /// Allocate a zeroed buffer.
    pub fn new(width: usize, height: usize, bytes_per_pixel: usize) -> PadResult<Self> {
        Self::filled(width, height, bytes_per_pixel, 0)
    }

    /// Allocate a zeroed RGB8 buffer.
    pub fn rgb8(width: usize, height: usize) -> PadResult<Self> {
        Self::new(width, height, BYTES_PER_PIXEL)
    }

    /// Wrap existing bytes, checking the length invariant.
    pub fn from_raw(
        width: usize,
        height: usize,
        bytes_per_pixel: usize,
        data: Vec<u8>,
    ) -> PadResult<Self> {
        let expected = Self::new(width, height, bytes_per_pixel)?.data.len();
        if data.len() != expected {
            return Err(PadError::validation(format!(
                "pixel data length {} does not match {width}x{height}x{bytes_per_pixel} = {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            bytes_per_pixel,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Bytes per row.
    pub fn row_bytes(&self) -> usize {
        self.width * self.bytes_per_pixel
    }

    /// Whole buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whole buffer, mutable.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Row `y`, or `None` past the last row.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.row_bytes();
        self.data.get(y * stride..(y + 1) * stride)
    }

    /// Row `y`, mutable, or `None` past the last row.
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.row_bytes();
        self.data.get_mut(y * stride..(y + 1) * stride)
    }

    /// `len` pixels of row `y` starting at column `x`, or `None` if any of it is out of range.
    pub fn span(&self, x: usize, y: usize, len: usize) -> Option<&[u8]> {
        let bpp = self.bytes_per_pixel;
        let end_px = x.checked_add(len)?;
        if end_px > self.width {
            return None;
        }
        self.row(y)?.get(x * bpp..end_px * bpp)
    }

    /// Bytes of pixel `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        self.span(x, y, 1)
    }

    /// Set every byte to `value`.
    pub fn fill(&mut self, value: u8) {
        self.data.fill(value);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
