use super::*;
use crate::simd::detect;

fn gradient(width: usize, height: usize, bpp: usize) -> PixelBuffer {
    let data = (0..width * height * bpp)
        .map(|i| (i % 251) as u8 + 1)
        .collect();
    PixelBuffer::from_raw(width, height, bpp, data).unwrap()
}

/// Check the placement contract pixel by pixel against an untouched copy of the canvas.
fn assert_placed(before: &PixelBuffer, after: &PixelBuffer, src: &PixelBuffer, off: Offset) {
    for y in 0..after.height() {
        for x in 0..after.width() {
            let inside = x >= off.x
                && x < off.x + src.width()
                && y >= off.y
                && y < off.y + src.height();
            let got = after.pixel(x, y).unwrap();
            if inside {
                assert_eq!(got, src.pixel(x - off.x, y - off.y).unwrap(), "({x},{y})");
            } else {
                assert_eq!(got, before.pixel(x, y).unwrap(), "({x},{y}) outside");
            }
        }
    }
}

#[test]
fn small_source_lands_at_offset() {
    let source = PixelBuffer::filled(4, 4, 1, 5).unwrap();
    let mut canvas = PixelBuffer::new(10, 10, 1).unwrap();
    let compositor = Compositor::new(CapabilityTag::None, Some(3)).unwrap();

    compositor
        .composite(&source, &mut canvas, Offset::new(2, 2))
        .unwrap();

    for y in 0..10 {
        for x in 0..10 {
            let want = if (2..6).contains(&x) && (2..6).contains(&y) {
                5
            } else {
                0
            };
            assert_eq!(canvas.pixel(x, y).unwrap(), &[want], "({x},{y})");
        }
    }
}

#[test]
fn placement_matches_source_for_every_tag_and_worker_count() {
    let source = gradient(41, 29, 3);
    for tag in CapabilityTag::ALL {
        for workers in [1usize, 2, 5, 16, 64] {
            let mut canvas = PixelBuffer::filled(60, 50, 3, 9).unwrap();
            let before = canvas.clone();
            let off = Offset::new(7, 11);
            Compositor::new(tag, Some(workers))
                .unwrap()
                .composite(&source, &mut canvas, off)
                .unwrap();
            assert_placed(&before, &canvas, &source, off);
        }
    }
}

#[test]
fn right_and_bottom_overflow_is_clipped() {
    let source = gradient(30, 30, 3);
    let mut canvas = PixelBuffer::filled(40, 35, 3, 200).unwrap();
    let before = canvas.clone();
    let off = Offset::new(25, 20);
    Compositor::new(detect(), Some(4))
        .unwrap()
        .composite(&source, &mut canvas, off)
        .unwrap();
    assert_placed(&before, &canvas, &source, off);
    assert_eq!(canvas.as_bytes().len(), before.as_bytes().len());
}

#[test]
fn offset_outside_canvas_writes_nothing() {
    let source = gradient(8, 8, 1);
    let compositor = Compositor::new(detect(), Some(2)).unwrap();
    for off in [
        Offset::new(10, 0),
        Offset::new(0, 10),
        Offset::new(usize::MAX, usize::MAX),
    ] {
        let mut canvas = PixelBuffer::filled(10, 10, 1, 77).unwrap();
        compositor.composite(&source, &mut canvas, off).unwrap();
        assert!(canvas.as_bytes().iter().all(|&b| b == 77), "{off:?}");
    }
}

#[test]
fn source_larger_than_canvas_fills_canvas() {
    let source = gradient(20, 20, 2);
    let mut canvas = PixelBuffer::new(8, 6, 2).unwrap();
    let before = canvas.clone();
    Compositor::new(detect(), Some(3))
        .unwrap()
        .composite(&source, &mut canvas, Offset::default())
        .unwrap();
    assert_placed(&before, &canvas, &source, Offset::default());
}

#[test]
fn mismatched_bytes_per_pixel_is_rejected() {
    let source = PixelBuffer::new(2, 2, 1).unwrap();
    let mut canvas = PixelBuffer::new(4, 4, 3).unwrap();
    let err = Compositor::new(CapabilityTag::None, Some(1))
        .unwrap()
        .composite(&source, &mut canvas, Offset::default())
        .unwrap_err();
    assert!(err.to_string().contains("bytes per pixel"));
}

#[test]
fn empty_canvas_is_a_noop() {
    let source = gradient(4, 4, 3);
    let mut canvas = PixelBuffer::rgb8(0, 0).unwrap();
    Compositor::new(detect(), Some(2))
        .unwrap()
        .composite(&source, &mut canvas, Offset::default())
        .unwrap();
    assert!(canvas.as_bytes().is_empty());
}

#[test]
fn transform_scales_whole_canvas() {
    for tag in CapabilityTag::ALL {
        let mut canvas = PixelBuffer::filled(33, 17, 3, 10).unwrap();
        Compositor::new(tag, Some(4))
            .unwrap()
            .transform(&mut canvas, 2.0);
        assert!(canvas.as_bytes().iter().all(|&b| b == 20), "tag={tag}");
    }
}
