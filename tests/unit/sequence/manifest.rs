use super::*;

#[test]
fn relative_entries_join_the_manifest_dir() {
    let m = Manifest::from_json_str(r#"{ "files": ["a.png", "/abs/b.png", ""] }"#).unwrap();
    let opts = m.into_options(Path::new("/seq")).unwrap();
    assert_eq!(
        opts.files,
        vec![
            PathBuf::from("/seq/a.png"),
            PathBuf::from("/abs/b.png"),
            PathBuf::new()
        ]
    );
    assert_eq!(opts.fps, Fps::default());
}

#[test]
fn fps_is_validated() {
    let m = Manifest::from_json_str(r#"{ "files": ["a.png"], "fps": { "num": 25, "den": 0 } }"#)
        .unwrap();
    assert!(m.into_options(Path::new(".")).is_err());

    let m = Manifest::from_json_str(r#"{ "files": ["a.png"], "fps": { "num": 25, "den": 1 } }"#)
        .unwrap();
    assert_eq!(m.into_options(Path::new(".")).unwrap().fps.num, 25);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = Manifest::from_json_str(r#"{ "files": [], "rate": 3 }"#).unwrap_err();
    assert!(err.to_string().contains("manifest error:"));
}

#[test]
fn missing_manifest_file_is_reported() {
    let err = Manifest::from_path("/definitely/not/here/seq.json").unwrap_err();
    assert!(err.to_string().contains("read manifest"));
}
