use super::*;

#[test]
fn memory_host_records_info_and_aligns_frames() {
    let mut host = MemoryHost::default();
    assert_eq!(host.alignment(), 32);
    assert!(host.video_info().is_none());

    let info = VideoInfo {
        format: PixelFormat::Rgb48,
        geometry: Geometry::new(7, 3),
        frame_count: 5,
        fps: Fps::default(),
    };
    host.set_video_info(&info);
    assert_eq!(host.video_info(), Some(&info));

    let frame = host.new_video_frame(info.format, info.geometry);
    assert_eq!(frame.planes.len(), 3);
    assert_eq!(frame.plane(0).stride, 32);
    assert_eq!(frame.geometry, info.geometry);
}
