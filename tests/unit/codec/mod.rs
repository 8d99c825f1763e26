use std::path::PathBuf;

use super::*;

#[test]
fn default_flags_request_every_transform() {
    assert_eq!(NormalizeFlags::default(), NormalizeFlags::ALL);
    assert!(!NormalizeFlags::NONE.strip_alpha);
}

#[test]
fn open_errors_map_to_sequence_taxonomy() {
    let path = PathBuf::from("missing.png");

    let err = CodecError::Io(std::io::Error::from(std::io::ErrorKind::NotFound))
        .into_open_error(2, &path);
    assert!(matches!(err, SeqError::SourceUnreadable { index: 2, .. }));

    let err = CodecError::NotAnImage.into_open_error(0, &path);
    assert!(matches!(err, SeqError::NotAnImage { index: 0, .. }));

    let err = CodecError::Malformed("bad IHDR".to_string()).into_open_error(5, &path);
    let msg = err.to_string();
    assert!(msg.starts_with("file 5:"), "{msg}");
    assert!(msg.contains("bad IHDR"));
}
