//! SSE4.1 (16-byte) and AVX2 (32-byte) kernels.
//!
//! The safe entry points re-check the CPU feature before entering a `target_feature` function,
//! so a tag forced by the caller can never execute unsupported instructions.

use std::arch::x86_64::{
    _CMP_GE_OQ, __m128, __m128i, __m256, __m256i, _mm_add_ps, _mm_and_ps, _mm_cmpge_ps,
    _mm_cvtepi32_ps, _mm_cvtepu8_epi32, _mm_cvttps_epi32, _mm_floor_ps, _mm_loadu_si128,
    _mm_max_ps, _mm_min_ps, _mm_mul_ps, _mm_packus_epi16, _mm_packus_epi32, _mm_set1_ps,
    _mm_setzero_ps, _mm_srli_si128, _mm_storeu_si128, _mm_sub_ps, _mm256_add_ps, _mm256_and_ps,
    _mm256_castsi256_si128, _mm256_cmp_ps, _mm256_cvtepi32_ps, _mm256_cvtepu8_epi32,
    _mm256_cvttps_epi32, _mm256_extracti128_si256, _mm256_floor_ps, _mm256_loadu_si256,
    _mm256_max_ps, _mm256_min_ps, _mm256_mul_ps, _mm256_packus_epi32, _mm256_permute4x64_epi64,
    _mm256_set1_ps, _mm256_setzero_ps, _mm256_storeu_si256, _mm256_sub_ps,
};

use super::scalar;

const NARROW: usize = 16;
const WIDE: usize = 32;

pub(super) fn copy_wide(src: &[u8], dst: &mut [u8]) {
    if std::arch::is_x86_feature_detected!("avx2") {
        unsafe { copy_avx2(src, dst) }
    } else {
        scalar::copy(src, dst);
    }
}

pub(super) fn copy_narrow(src: &[u8], dst: &mut [u8]) {
    if std::arch::is_x86_feature_detected!("sse4.1") {
        unsafe { copy_sse41(src, dst) }
    } else {
        scalar::copy(src, dst);
    }
}

pub(super) fn transform_wide(buf: &mut [u8], factor: f32) {
    if std::arch::is_x86_feature_detected!("avx2") {
        unsafe { transform_avx2(buf, factor) }
    } else {
        scalar::transform(buf, factor);
    }
}

pub(super) fn transform_narrow(buf: &mut [u8], factor: f32) {
    if std::arch::is_x86_feature_detected!("sse4.1") {
        unsafe { transform_sse41(buf, factor) }
    } else {
        scalar::transform(buf, factor);
    }
}

// ---------------------------------------------------------------------------
// Copy
// ---------------------------------------------------------------------------

#[target_feature(enable = "avx2")]
unsafe fn copy_avx2(src: &[u8], dst: &mut [u8]) {
    debug_assert_eq!(src.len(), dst.len());
    let body = src.len() - src.len() % WIDE;
    for (s, d) in src[..body]
        .chunks_exact(WIDE)
        .zip(dst[..body].chunks_exact_mut(WIDE))
    {
        // Each chunk is exactly 32 bytes, so the unaligned load/store stays in bounds.
        unsafe {
            let v = _mm256_loadu_si256(s.as_ptr() as *const __m256i);
            _mm256_storeu_si256(d.as_mut_ptr() as *mut __m256i, v);
        }
    }
    scalar::copy(&src[body..], &mut dst[body..]);
}

#[target_feature(enable = "sse4.1")]
unsafe fn copy_sse41(src: &[u8], dst: &mut [u8]) {
    debug_assert_eq!(src.len(), dst.len());
    let body = src.len() - src.len() % NARROW;
    for (s, d) in src[..body]
        .chunks_exact(NARROW)
        .zip(dst[..body].chunks_exact_mut(NARROW))
    {
        unsafe {
            let v = _mm_loadu_si128(s.as_ptr() as *const __m128i);
            _mm_storeu_si128(d.as_mut_ptr() as *mut __m128i, v);
        }
    }
    scalar::copy(&src[body..], &mut dst[body..]);
}

// ---------------------------------------------------------------------------
// Transform: widen u8 -> f32, x = v * factor, round half up via floor(x) + (x - floor(x) >= 0.5),
// clamp [0, 255], narrow.
// ---------------------------------------------------------------------------

#[target_feature(enable = "sse4.1")]
unsafe fn scale4_sse41(px: __m128i, k: __m128, half: __m128, lo: __m128, hi: __m128) -> __m128i {
    let x = _mm_mul_ps(_mm_cvtepi32_ps(px), k);
    let r = _mm_floor_ps(x);
    let up = _mm_and_ps(_mm_cmpge_ps(_mm_sub_ps(x, r), half), _mm_set1_ps(1.0));
    let r = _mm_add_ps(r, up);
    // max(r, 0) returns the second operand for NaN lanes.
    _mm_cvttps_epi32(_mm_min_ps(_mm_max_ps(r, lo), hi))
}

#[target_feature(enable = "sse4.1")]
unsafe fn transform_sse41(buf: &mut [u8], factor: f32) {
    let body = buf.len() - buf.len() % NARROW;
    let k = _mm_set1_ps(factor);
    let half = _mm_set1_ps(0.5);
    let lo = _mm_setzero_ps();
    let hi = _mm_set1_ps(255.0);

    for chunk in buf[..body].chunks_exact_mut(NARROW) {
        unsafe {
            let v = _mm_loadu_si128(chunk.as_ptr() as *const __m128i);
            let r0 = scale4_sse41(_mm_cvtepu8_epi32(v), k, half, lo, hi);
            let r1 = scale4_sse41(_mm_cvtepu8_epi32(_mm_srli_si128(v, 4)), k, half, lo, hi);
            let r2 = scale4_sse41(_mm_cvtepu8_epi32(_mm_srli_si128(v, 8)), k, half, lo, hi);
            let r3 = scale4_sse41(_mm_cvtepu8_epi32(_mm_srli_si128(v, 12)), k, half, lo, hi);
            let words_lo = _mm_packus_epi32(r0, r1);
            let words_hi = _mm_packus_epi32(r2, r3);
            let out = _mm_packus_epi16(words_lo, words_hi);
            _mm_storeu_si128(chunk.as_mut_ptr() as *mut __m128i, out);
        }
    }
    scalar::transform(&mut buf[body..], factor);
}

#[target_feature(enable = "avx2")]
unsafe fn scale8_avx2(px: __m256i, k: __m256, half: __m256, lo: __m256, hi: __m256) -> __m256i {
    let x = _mm256_mul_ps(_mm256_cvtepi32_ps(px), k);
    let r = _mm256_floor_ps(x);
    let ge = _mm256_cmp_ps::<_CMP_GE_OQ>(_mm256_sub_ps(x, r), half);
    let r = _mm256_add_ps(r, _mm256_and_ps(ge, _mm256_set1_ps(1.0)));
    _mm256_cvttps_epi32(_mm256_min_ps(_mm256_max_ps(r, lo), hi))
}

/// Scale 16 bytes held in `v`, returning them narrowed back to u8 in order.
#[target_feature(enable = "avx2")]
unsafe fn scale16_avx2(
    v: __m128i,
    k: __m256,
    half: __m256,
    lo: __m256,
    hi: __m256,
) -> __m128i {
    unsafe {
        let a = scale8_avx2(_mm256_cvtepu8_epi32(v), k, half, lo, hi);
        let b = scale8_avx2(_mm256_cvtepu8_epi32(_mm_srli_si128(v, 8)), k, half, lo, hi);
        // packus works per 128-bit lane; the permute restores a0..a7, b0..b7 order.
        let words = _mm256_permute4x64_epi64(_mm256_packus_epi32(a, b), 0b11_01_10_00);
        _mm_packus_epi16(
            _mm256_castsi256_si128(words),
            _mm256_extracti128_si256(words, 1),
        )
    }
}

#[target_feature(enable = "avx2")]
unsafe fn transform_avx2(buf: &mut [u8], factor: f32) {
    let body = buf.len() - buf.len() % WIDE;
    let k = _mm256_set1_ps(factor);
    let half = _mm256_set1_ps(0.5);
    let lo = _mm256_setzero_ps();
    let hi = _mm256_set1_ps(255.0);

    for chunk in buf[..body].chunks_exact_mut(WIDE) {
        unsafe {
            let p = chunk.as_mut_ptr();
            let v0 = _mm_loadu_si128(p as *const __m128i);
            let v1 = _mm_loadu_si128(p.add(NARROW) as *const __m128i);
            let r0 = scale16_avx2(v0, k, half, lo, hi);
            let r1 = scale16_avx2(v1, k, half, lo, hi);
            _mm_storeu_si128(p as *mut __m128i, r0);
            _mm_storeu_si128(p.add(NARROW) as *mut __m128i, r1);
        }
    }
    scalar::transform(&mut buf[body..], factor);
}
