//! NEON (16-byte) kernels.

use std::arch::aarch64::{
    float32x4_t, uint32x4_t, vaddq_f32, vbslq_f32, vcgeq_f32, vcombine_u8, vcombine_u16,
    vcvtq_f32_u32, vcvtq_u32_f32, vdupq_n_f32, vget_high_u8, vget_high_u16, vget_low_u8,
    vget_low_u16, vld1q_u8, vmaxnmq_f32, vminnmq_f32, vmovl_u8, vmovl_u16, vmovn_u16, vmovn_u32,
    vmulq_f32, vrndmq_f32, vst1q_u8, vsubq_f32,
};

use super::scalar;

const NARROW: usize = 16;

pub(super) fn copy_narrow(src: &[u8], dst: &mut [u8]) {
    if std::arch::is_aarch64_feature_detected!("neon") {
        unsafe { copy_neon(src, dst) }
    } else {
        scalar::copy(src, dst);
    }
}

pub(super) fn transform_narrow(buf: &mut [u8], factor: f32) {
    if std::arch::is_aarch64_feature_detected!("neon") {
        unsafe { transform_neon(buf, factor) }
    } else {
        scalar::transform(buf, factor);
    }
}

#[target_feature(enable = "neon")]
unsafe fn copy_neon(src: &[u8], dst: &mut [u8]) {
    debug_assert_eq!(src.len(), dst.len());
    let body = src.len() - src.len() % NARROW;
    for (s, d) in src[..body]
        .chunks_exact(NARROW)
        .zip(dst[..body].chunks_exact_mut(NARROW))
    {
        unsafe {
            let v = vld1q_u8(s.as_ptr());
            vst1q_u8(d.as_mut_ptr(), v);
        }
    }
    scalar::copy(&src[body..], &mut dst[body..]);
}

#[target_feature(enable = "neon")]
unsafe fn scale4_neon(
    px: uint32x4_t,
    k: float32x4_t,
    half: float32x4_t,
    lo: float32x4_t,
    hi: float32x4_t,
) -> uint32x4_t {
    let x = vmulq_f32(vcvtq_f32_u32(px), k);
    let r = vrndmq_f32(x);
    let up = vcgeq_f32(vsubq_f32(x, r), half);
    let r = vbslq_f32(up, vaddq_f32(r, vdupq_n_f32(1.0)), r);
    // The *nm variants return the numeric operand for NaN lanes.
    vcvtq_u32_f32(vminnmq_f32(vmaxnmq_f32(r, lo), hi))
}

#[target_feature(enable = "neon")]
unsafe fn transform_neon(buf: &mut [u8], factor: f32) {
    let body = buf.len() - buf.len() % NARROW;
    let k = vdupq_n_f32(factor);
    let half = vdupq_n_f32(0.5);
    let lo = vdupq_n_f32(0.0);
    let hi = vdupq_n_f32(255.0);

    for chunk in buf[..body].chunks_exact_mut(NARROW) {
        unsafe {
            let v = vld1q_u8(chunk.as_ptr());
            let w_lo = vmovl_u8(vget_low_u8(v));
            let w_hi = vmovl_u8(vget_high_u8(v));

            let r0 = scale4_neon(vmovl_u16(vget_low_u16(w_lo)), k, half, lo, hi);
            let r1 = scale4_neon(vmovl_u16(vget_high_u16(w_lo)), k, half, lo, hi);
            let r2 = scale4_neon(vmovl_u16(vget_low_u16(w_hi)), k, half, lo, hi);
            let r3 = scale4_neon(vmovl_u16(vget_high_u16(w_hi)), k, half, lo, hi);

            let n_lo = vcombine_u16(vmovn_u32(r0), vmovn_u32(r1));
            let n_hi = vcombine_u16(vmovn_u32(r2), vmovn_u32(r3));
            vst1q_u8(
                chunk.as_mut_ptr(),
                vcombine_u8(vmovn_u16(n_lo), vmovn_u16(n_hi)),
            );
        }
    }
    scalar::transform(&mut buf[body..], factor);
}
