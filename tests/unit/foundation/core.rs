use super::*;

#[test]
fn frame_index_clamps_to_last_frame() {
    assert_eq!(FrameIndex(0).clamp_to(3), FrameIndex(0));
    assert_eq!(FrameIndex(2).clamp_to(3), FrameIndex(2));
    assert_eq!(FrameIndex(3).clamp_to(3), FrameIndex(2));
    assert_eq!(FrameIndex(u64::MAX).clamp_to(3), FrameIndex(2));
    assert_eq!(FrameIndex(7).clamp_to(0), FrameIndex(0));
}

#[test]
fn fps_rejects_zero_terms() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(24, 0).is_err());
    assert_eq!(Fps::new(30000, 1001).unwrap().num, 30000);
}

#[test]
fn fps_default_and_duration() {
    assert_eq!(Fps::default(), Fps { num: 24, den: 1 });

    let ntsc = Fps::new(30000, 1001).unwrap();
    assert_eq!(ntsc.frame_duration(), (1001, 30000));
    assert!((ntsc.frame_duration_secs() - 1001.0 / 30000.0).abs() < 1e-12);
    assert!((ntsc.as_f64() - 29.97).abs() < 0.01);
}

#[test]
fn geometry_display() {
    assert_eq!(Geometry::new(64, 48).to_string(), "64x48");
}
