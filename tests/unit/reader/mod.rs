use std::sync::Arc;
use std::sync::atomic::Ordering;

use super::*;
use crate::foundation::core::{Fps, Geometry};
use crate::format::negotiate::{ChannelLayout, PixelFormat};
use crate::host::MemoryHost;
use crate::test_support::{MockCodec, MockFile, header};

fn three_gray_frames() -> SequenceReader<MockCodec> {
    let codec = MockCodec::new()
        .gray8("0.png", 64, 48, 10)
        .gray8("1.png", 64, 48, 20)
        .gray8("2.png", 64, 48, 30);
    SequenceReader::open_with_codec(SequenceOptions::new(["0.png", "1.png", "2.png"]), codec)
        .unwrap()
}

#[test]
fn gray_sequence_serves_each_file() {
    let reader = three_gray_frames();
    let mut host = MemoryHost::default();
    reader.init(&mut host);

    let info = host.video_info().unwrap();
    assert_eq!(info.frame_count, 3);
    assert_eq!(info.geometry, Geometry::new(64, 48));
    assert_eq!(info.format, PixelFormat::Gray8);
    assert_eq!(info.fps, Fps { num: 24, den: 1 });

    for (i, fill) in [10u8, 20, 30].into_iter().enumerate() {
        let frame = reader.get_frame(FrameIndex(i as u64), &host).unwrap();
        assert_eq!(frame.planes.len(), 1);
        assert!(frame.plane(0).data.iter().all(|&b| b == fill));
        assert_eq!(
            frame.props,
            FrameProps {
                duration_num: 1,
                duration_den: 24
            }
        );
    }
}

#[test]
fn requests_past_the_end_hold_the_last_frame() {
    let reader = three_gray_frames();
    let host = MemoryHost::default();
    let last = reader.get_frame(FrameIndex(2), &host).unwrap();
    for n in [3, 4, 1000, u64::MAX] {
        assert_eq!(reader.get_frame(FrameIndex(n), &host).unwrap(), last);
    }
}

#[test]
fn every_request_decodes_again() {
    let reader = three_gray_frames();
    let host = MemoryHost::default();
    reader.get_frame(FrameIndex(0), &host).unwrap();
    reader.get_frame(FrameIndex(0), &host).unwrap();
    assert_eq!(reader.codec.decodes.load(Ordering::SeqCst), 2);
}

#[test]
fn decode_failure_only_fails_its_request() {
    let codec = MockCodec::new()
        .gray8("0.png", 4, 4, 1)
        .with(
            "1.png",
            MockFile::Truncated {
                header: header(4, 4, ChannelLayout::Gray, 8),
            },
        )
        .gray8("2.png", 4, 4, 3);
    let reader =
        SequenceReader::open_with_codec(SequenceOptions::new(["0.png", "1.png", "2.png"]), codec)
            .unwrap();
    let host = MemoryHost::new(4);

    assert!(reader.get_frame(FrameIndex(0), &host).is_ok());
    let err = reader.get_frame(FrameIndex(1), &host).unwrap_err();
    assert!(matches!(err, SeqError::DecodeFailed { index: 1, .. }));
    assert!(!err.is_construction());

    let frame = reader.get_frame(FrameIndex(2), &host).unwrap();
    assert_eq!(frame.plane(0).data, vec![3u8; 16]);
}

#[test]
fn non_initial_activations_produce_nothing() {
    let reader = three_gray_frames();
    let host = MemoryHost::default();

    for reason in [ActivationReason::AllFramesReady, ActivationReason::Abandoned] {
        assert!(
            reader
                .request_frame(FrameIndex(0), reason, &host)
                .unwrap()
                .is_none()
        );
    }
    assert_eq!(reader.codec.decodes.load(Ordering::SeqCst), 0);

    let frame = reader
        .request_frame(FrameIndex(1), ActivationReason::Initial, &host)
        .unwrap()
        .unwrap();
    assert!(frame.plane(0).data.iter().all(|&b| b == 20));
}

#[test]
fn construction_errors_expose_no_reader() {
    let codec = MockCodec::new()
        .gray8("0.png", 64, 48, 0)
        .gray8("1.png", 32, 32, 0);
    let err = SequenceReader::open_with_codec(SequenceOptions::new(["0.png", "1.png"]), codec)
        .unwrap_err();
    assert!(err.is_construction());
    assert!(matches!(err, SeqError::ResolutionMismatch { index: 1, .. }));
}

#[test]
fn concurrent_requests_are_serialized() {
    let codec = (0..8u8).fold(MockCodec::new(), |c, i| {
        c.gray8(&format!("{i}.png"), 16, 16, i)
    });
    let files: Vec<String> = (0..8).map(|i| format!("{i}.png")).collect();
    let reader = Arc::new(
        SequenceReader::open_with_codec(SequenceOptions::new(files), codec).unwrap(),
    );
    let host = Arc::new(MemoryHost::default());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let reader = Arc::clone(&reader);
            let host = Arc::clone(&host);
            std::thread::spawn(move || {
                for round in 0..16u64 {
                    let n = (round + t) % 8;
                    let frame = reader.get_frame(FrameIndex(n), host.as_ref()).unwrap();
                    let plane = frame.plane(0);
                    for y in 0..16 {
                        assert!(plane.row(y)[..16].iter().all(|&b| u64::from(b) == n));
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}
