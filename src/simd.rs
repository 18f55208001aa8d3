//! Vector capability detection and byte-kernel dispatch.
//!
//! The host's vector width is probed once and reduced to a [`CapabilityTag`]. Every kernel has a
//! scalar twin that produces the same bytes, so the tag only changes throughput, never output.

mod scalar;

#[cfg(target_arch = "aarch64")]
#[allow(unsafe_code)]
mod neon;
#[cfg(target_arch = "x86_64")]
#[allow(unsafe_code)]
mod x86;

use std::fmt;
use std::sync::OnceLock;

/// Vector extension class available for byte kernels.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityTag {
    /// No usable vector extension; scalar code only.
    #[default]
    None,
    /// 128-bit lanes (NEON on aarch64, SSE4.1 on x86_64).
    Narrow,
    /// 256-bit lanes (AVX2 on x86_64).
    Wide,
}

impl CapabilityTag {
    /// All tags, narrowest first.
    pub const ALL: [CapabilityTag; 3] = [Self::None, Self::Narrow, Self::Wide];

    /// Bytes processed per vector step.
    pub const fn chunk_width(self) -> usize {
        match self {
            Self::None => 1,
            Self::Narrow => 16,
            Self::Wide => 32,
        }
    }

    /// Smallest length routed to the vector path.
    pub const fn min_vector_len(self) -> usize {
        self.chunk_width() * 2
    }

    /// Whether this host can execute the tag's kernels.
    pub fn is_supported(self) -> bool {
        match self {
            Self::None => true,
            Self::Narrow => narrow_available(),
            Self::Wide => wide_available(),
        }
    }

    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Narrow => "narrow",
            Self::Wide => "wide",
        }
    }
}

impl fmt::Display for CapabilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CapabilityTag {
    type Err = crate::PadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "scalar" => Ok(Self::None),
            "narrow" | "128" => Ok(Self::Narrow),
            "wide" | "256" => Ok(Self::Wide),
            other => Err(crate::PadError::validation(format!(
                "unknown capability tag '{other}' (expected none, narrow or wide)"
            ))),
        }
    }
}

/// Widest vector class usable on this host. Probed once per process.
pub fn detect() -> CapabilityTag {
    static TAG: OnceLock<CapabilityTag> = OnceLock::new();
    *TAG.get_or_init(|| {
        let tag = if wide_available() {
            CapabilityTag::Wide
        } else if narrow_available() {
            CapabilityTag::Narrow
        } else {
            CapabilityTag::None
        };
        tracing::debug!(%tag, extension = extension_name_for(tag), "vector capability detected");
        tag
    })
}

/// Name of the concrete instruction set behind [`detect`].
pub fn extension_name() -> &'static str {
    extension_name_for(detect())
}

fn extension_name_for(tag: CapabilityTag) -> &'static str {
    match tag {
        CapabilityTag::None => "none",
        CapabilityTag::Narrow if cfg!(target_arch = "aarch64") => "neon",
        CapabilityTag::Narrow => "sse4.1",
        CapabilityTag::Wide => "avx2",
    }
}

/// Target architecture name.
pub const fn arch_name() -> &'static str {
    if cfg!(target_arch = "x86_64") {
        "x86_64"
    } else if cfg!(target_arch = "aarch64") {
        "aarch64"
    } else {
        "unknown"
    }
}

fn wide_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        std::arch::is_x86_feature_detected!("avx2")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

fn narrow_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        std::arch::is_x86_feature_detected!("sse4.1")
    }
    #[cfg(target_arch = "aarch64")]
    {
        std::arch::is_aarch64_feature_detected!("neon")
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        false
    }
}

/// Tag that will actually run for a `len`-byte job.
///
/// Unsupported tags and short inputs go to the scalar path.
#[inline]
fn route(tag: CapabilityTag, len: usize) -> CapabilityTag {
    if tag == CapabilityTag::None || len < tag.min_vector_len() || !tag.is_supported() {
        CapabilityTag::None
    } else {
        tag
    }
}

/// Copy `min(src.len(), dst.len())` bytes from `src` into `dst`; returns the byte count.
///
/// The result is identical for every tag.
pub fn vector_copy(src: &[u8], dst: &mut [u8], tag: CapabilityTag) -> usize {
    let len = src.len().min(dst.len());
    let (src, dst) = (&src[..len], &mut dst[..len]);
    match route(tag, len) {
        #[cfg(target_arch = "x86_64")]
        CapabilityTag::Wide => x86::copy_wide(src, dst),
        #[cfg(target_arch = "x86_64")]
        CapabilityTag::Narrow => x86::copy_narrow(src, dst),
        #[cfg(target_arch = "aarch64")]
        CapabilityTag::Narrow => neon::copy_narrow(src, dst),
        _ => scalar::copy(src, dst),
    }
    len
}

/// Replace every byte `b` with `clamp(round(b * factor), 0, 255)`, rounding the `f32` product
/// half up.
///
/// NaN products saturate to 0. The vector lanes evaluate the same `f32` operations as
/// [`scale_byte`], so the result is identical for every tag.
pub fn vector_transform(buf: &mut [u8], factor: f32, tag: CapabilityTag) {
    match route(tag, buf.len()) {
        #[cfg(target_arch = "x86_64")]
        CapabilityTag::Wide => x86::transform_wide(buf, factor),
        #[cfg(target_arch = "x86_64")]
        CapabilityTag::Narrow => x86::transform_narrow(buf, factor),
        #[cfg(target_arch = "aarch64")]
        CapabilityTag::Narrow => neon::transform_narrow(buf, factor),
        _ => scalar::transform(buf, factor),
    }
}

/// Scalar reference for [`vector_transform`].
#[inline(always)]
pub fn scale_byte(b: u8, factor: f32) -> u8 {
    scalar::scale_byte(b, factor)
}

#[cfg(test)]
#[path = "../tests/unit/simd/dispatch.rs"]
mod tests;
