#[inline(always)]
pub(crate) fn scale_byte(b: u8, factor: f32) -> u8 {
    let x = f32::from(b) * factor;
    let r = x.floor();
    // x - floor(x) is exact; adding 0.5 to x first is not.
    let r = if x - r >= 0.5 { r + 1.0 } else { r };
    // max/min (not clamp) so NaN lands on 0, matching the vector max/min ordering.
    r.max(0.0).min(255.0) as u8
}

#[inline]
pub(crate) fn copy(src: &[u8], dst: &mut [u8]) {
    dst.copy_from_slice(src);
}

#[inline]
pub(crate) fn transform(buf: &mut [u8], factor: f32) {
    for b in buf {
        *b = scale_byte(*b, factor);
    }
}
