use image::ImageEncoder as _;

use crate::foundation::error::{PadError, PadResult};

/// Interleaved pixel layout handed to a codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// 8-bit R, G, B.
    Rgb8,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb8 => 3,
        }
    }
}

/// Chroma sampling of the compressed stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ChromaSubsampling {
    /// Full-resolution chroma (4:4:4).
    #[default]
    Yuv444,
    /// Chroma halved in both directions (4:2:0).
    Yuv420,
}

/// Settings for one compression call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EncodeSettings {
    /// Quality in `1..=100`.
    pub quality: u8,
    /// Chroma sampling.
    pub subsampling: ChromaSubsampling,
    /// Request a faster, slightly less accurate DCT where the codec offers one.
    pub fast_dct: bool,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            quality: 100,
            subsampling: ChromaSubsampling::Yuv444,
            fast_dct: true,
        }
    }
}

/// Lossy image compressor used by the benchmark's encode phase.
pub trait ImageCodec {
    /// Short codec name for logs and reports.
    fn name(&self) -> &'static str;

    /// Compress a `width x height` buffer of `format` pixels with `settings`.
    ///
    /// Settings the codec cannot honour are reported as [`PadError::CodecInit`]; failures on
    /// the buffer itself as [`PadError::CodecCompress`].
    fn compress(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: PixelFormat,
        settings: &EncodeSettings,
    ) -> PadResult<Vec<u8>>;
}

/// Baseline JPEG via the `image` crate.
///
/// The encoder writes every component at full resolution and has a single DCT
/// implementation, so only [`ChromaSubsampling::Yuv444`] is accepted and
/// [`EncodeSettings::fast_dct`] is only logged.
#[derive(Clone, Copy, Debug, Default)]
pub struct JpegCodec;

impl JpegCodec {
    /// Largest side the JPEG format can describe.
    pub const MAX_DIMENSION: u32 = u16::MAX as u32;

    /// Create a codec.
    pub fn new() -> Self {
        Self
    }

    fn check_settings(&self, width: u32, height: u32, settings: &EncodeSettings) -> PadResult<()> {
        let EncodeSettings {
            quality,
            subsampling,
            ..
        } = *settings;
        if !(1..=100).contains(&quality) {
            return Err(PadError::codec_init(format!(
                "jpeg quality must be in 1..=100, got {quality}"
            )));
        }
        if subsampling != ChromaSubsampling::Yuv444 {
            return Err(PadError::codec_init(format!(
                "jpeg encoder does not support {subsampling:?} chroma subsampling"
            )));
        }
        if width == 0 || height == 0 || width > Self::MAX_DIMENSION || height > Self::MAX_DIMENSION
        {
            return Err(PadError::codec_init(format!(
                "jpeg dimensions must be in 1..={}, got {width}x{height}",
                Self::MAX_DIMENSION
            )));
        }
        Ok(())
    }
}

impl ImageCodec for JpegCodec {
    fn name(&self) -> &'static str {
        "jpeg"
    }

    fn compress(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: PixelFormat,
        settings: &EncodeSettings,
    ) -> PadResult<Vec<u8>> {
        self.check_settings(width, height, settings)?;

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(format.bytes_per_pixel()));
        if expected != Some(pixels.len()) {
            return Err(PadError::codec_compress(format!(
                "buffer has {} bytes, expected {width}x{height} {format:?}",
                pixels.len()
            )));
        }

        let color = match format {
            PixelFormat::Rgb8 => image::ExtendedColorType::Rgb8,
        };

        let mut out = Vec::with_capacity(pixels.len() / 8);
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, settings.quality)
            .write_image(pixels, width, height, color)
            .map_err(|e| PadError::codec_compress(format!("jpeg encode failed: {e}")))?;

        tracing::trace!(bytes = out.len(), fast_dct = settings.fast_dct, "jpeg stream ready");
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/codec.rs"]
mod tests;
