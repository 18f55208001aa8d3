use super::*;

#[test]
fn length_invariant_holds() {
    let buf = PixelBuffer::rgb8(7, 5).unwrap();
    assert_eq!(buf.as_bytes().len(), 7 * 5 * BYTES_PER_PIXEL);
    assert_eq!(buf.row_bytes(), 21);
}

#[test]
fn overflow_is_validation_error() {
    let err = PixelBuffer::rgb8(usize::MAX, 2).unwrap_err();
    assert!(err.to_string().contains("overflows"));
}

#[test]
fn bytes_per_pixel_is_bounded() {
    assert!(PixelBuffer::new(1, 1, 0).is_err());
    assert!(PixelBuffer::new(1, 1, 5).is_err());
    assert!(PixelBuffer::new(1, 1, 4).is_ok());
}

#[test]
fn from_raw_checks_length() {
    assert!(PixelBuffer::from_raw(2, 2, 1, vec![0; 4]).is_ok());
    assert!(PixelBuffer::from_raw(2, 2, 1, vec![0; 5]).is_err());
}

#[test]
fn row_and_span_access_is_bounds_checked() {
    let mut buf = PixelBuffer::new(4, 3, 1).unwrap();
    buf.row_mut(1).unwrap().copy_from_slice(&[1, 2, 3, 4]);

    assert_eq!(buf.row(1), Some(&[1u8, 2, 3, 4][..]));
    assert!(buf.row(3).is_none());
    assert!(buf.row_mut(3).is_none());

    assert_eq!(buf.span(1, 1, 2), Some(&[2u8, 3][..]));
    assert!(buf.span(3, 1, 2).is_none());
    assert!(buf.span(usize::MAX, 1, 2).is_none());
    assert_eq!(buf.pixel(3, 1), Some(&[4u8][..]));
    assert!(buf.pixel(4, 1).is_none());
}

#[test]
fn filled_sets_every_byte() {
    let buf = PixelBuffer::filled(3, 2, 3, 128).unwrap();
    assert!(buf.as_bytes().iter().all(|&b| b == 128));
}
