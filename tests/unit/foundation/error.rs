use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PadError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PadError::codec_init("x")
            .to_string()
            .contains("codec init error:")
    );
    assert!(
        PadError::codec_compress("x")
            .to_string()
            .contains("codec compress error:")
    );
    assert!(
        PadError::io("write 'out.jpg'", std::io::Error::other("x"))
            .to_string()
            .contains("io error: write 'out.jpg'")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PadError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert_eq!(err.kind(), ErrorKind::Other);
}

#[test]
fn iteration_wrapper_keeps_kind_and_location() {
    let err = PadError::codec_compress("bad buffer").in_iteration(2, Phase::Encode);
    assert_eq!(err.kind(), ErrorKind::CodecCompress);
    assert_eq!(err.location(), Some((2, Phase::Encode)));

    let msg = err.to_string();
    assert!(msg.contains("iteration 2"));
    assert!(msg.contains("encode phase"));
    assert!(msg.contains("bad buffer"));
}

#[test]
fn io_kind_survives_wrapping() {
    let err = PadError::io("write", std::io::Error::other("disk full")).in_iteration(0, Phase::Write);
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn warmup_failures_are_labelled_apart_from_timed_ones() {
    let timed = PadError::codec_init("q").in_iteration(0, Phase::Encode);
    let warm = PadError::codec_init("q").in_warmup(0, Phase::Encode);

    assert_eq!(timed.stage(), Some(RunStage::Timed));
    assert_eq!(warm.stage(), Some(RunStage::Warmup));
    assert_eq!(warm.location(), Some((0, Phase::Encode)));
    assert_eq!(warm.kind(), ErrorKind::CodecInit);
    assert!(warm.to_string().starts_with("warmup iteration 0 failed during encode phase"));
    assert!(timed.to_string().starts_with("iteration 0 failed during encode phase"));
    assert_eq!(PadError::validation("x").stage(), None);
}
