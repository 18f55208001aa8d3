use super::*;

fn gray(width: u32, height: u32) -> Vec<u8> {
    vec![128u8; width as usize * height as usize * 3]
}

fn settings(quality: u8, subsampling: ChromaSubsampling) -> EncodeSettings {
    EncodeSettings {
        quality,
        subsampling,
        ..EncodeSettings::default()
    }
}

#[test]
fn jpeg_round_trips_dimensions() {
    let mut codec = JpegCodec::new();
    let bytes = codec
        .compress(
            &gray(24, 10),
            24,
            10,
            PixelFormat::Rgb8,
            &settings(100, ChromaSubsampling::Yuv444),
        )
        .unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8], "SOI marker");

    let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Jpeg).unwrap();
    let rgb = decoded.to_rgb8();
    assert_eq!(rgb.dimensions(), (24, 10));

    let px = rgb.get_pixel(12, 5);
    for c in px.0 {
        assert!((i32::from(c) - 128).abs() <= 2, "flat gray survives q100, got {c}");
    }
}

#[test]
fn invalid_quality_is_init_failure() {
    let mut codec = JpegCodec::new();
    for q in [0u8, 101, 255] {
        let err = codec
            .compress(
                &gray(2, 2),
                2,
                2,
                PixelFormat::Rgb8,
                &settings(q, ChromaSubsampling::Yuv444),
            )
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::CodecInit, "q={q}");
    }
}

#[test]
fn unsupported_subsampling_is_init_failure() {
    let err = JpegCodec::new()
        .compress(
            &gray(2, 2),
            2,
            2,
            PixelFormat::Rgb8,
            &settings(90, ChromaSubsampling::Yuv420),
        )
        .unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::CodecInit);
}

#[test]
fn oversized_or_empty_dimensions_are_init_failures() {
    let mut codec = JpegCodec::new();
    let err = codec
        .compress(
            &[],
            0,
            4,
            PixelFormat::Rgb8,
            &settings(90, ChromaSubsampling::Yuv444),
        )
        .unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::CodecInit);

    let err = codec
        .compress(
            &[],
            70_000,
            1,
            PixelFormat::Rgb8,
            &settings(90, ChromaSubsampling::Yuv444),
        )
        .unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::CodecInit);
}

#[test]
fn short_buffer_is_compress_failure() {
    let err = JpegCodec::new()
        .compress(
            &[0u8; 5],
            2,
            2,
            PixelFormat::Rgb8,
            &settings(90, ChromaSubsampling::Yuv444),
        )
        .unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::CodecCompress);
}

#[test]
fn defaults_request_max_quality_full_chroma_fast_dct() {
    let s = EncodeSettings::default();
    assert_eq!(s.quality, 100);
    assert_eq!(s.subsampling, ChromaSubsampling::Yuv444);
    assert!(s.fast_dct);
    assert_eq!(PixelFormat::Rgb8.bytes_per_pixel(), 3);
}

#[test]
fn fast_dct_request_does_not_change_the_stream() {
    let mut codec = JpegCodec::new();
    let pixels: Vec<u8> = (0..16 * 8 * 3).map(|i| (i * 7 % 256) as u8).collect();
    let fast = codec
        .compress(&pixels, 16, 8, PixelFormat::Rgb8, &EncodeSettings::default())
        .unwrap();
    let accurate = EncodeSettings {
        fast_dct: false,
        ..EncodeSettings::default()
    };
    let slow = codec
        .compress(&pixels, 16, 8, PixelFormat::Rgb8, &accurate)
        .unwrap();
    assert_eq!(fast, slow);
}
