use super::*;

#[test]
fn display_names_offending_file() {
    let err = SeqError::ResolutionMismatch {
        index: 1,
        expected: Geometry::new(64, 48),
        found: Geometry::new(32, 32),
    };
    let msg = err.to_string();
    assert!(msg.starts_with("file 1:"));
    assert!(msg.contains("32x32"));
    assert!(msg.contains("64x48"));

    assert_eq!(SeqError::NoSourceFiles.to_string(), "no source file");
    assert!(
        SeqError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn only_decode_failure_is_per_request() {
    let decode = SeqError::decode_failed(4, "a.png", "truncated");
    assert!(!decode.is_construction());
    assert_eq!(decode.file_index(), Some(4));

    assert!(SeqError::NoSourceFiles.is_construction());
    assert!(SeqError::OutOfMemory { bytes: 1 }.is_construction());
    assert_eq!(SeqError::OutOfMemory { bytes: 1 }.file_index(), None);
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SeqError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
