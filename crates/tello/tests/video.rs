mod common;

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tello::video::{
    DecodeSession, PassthroughDecoder, PipelineState, PixelFormat, UdpVideoSession, VideoConfig,
    VideoError, VideoFrame,
};
use tello::{Tello, TelloConfig};

use common::{client_config, FakeDrone};

fn loopback_video() -> VideoConfig {
    VideoConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        read_timeout: Duration::from_millis(20),
        segment_size: 8,
        ..VideoConfig::default()
    }
}

/// A client whose video socket reports its ephemeral address once bound.
fn client_with_reported_video_addr(
    drone: SocketAddr,
    opened: Arc<AtomicUsize>,
) -> (Tello, mpsc::Receiver<SocketAddr>) {
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    let factory = move |config: &VideoConfig| -> tello::video::Result<Box<dyn DecodeSession>> {
        opened.fetch_add(1, Ordering::SeqCst);
        let session = UdpVideoSession::bind(config, PassthroughDecoder)?;
        let _ = tx.lock().unwrap().send(session.local_addr()?);
        Ok(Box::new(session))
    };
    let config = TelloConfig {
        client: client_config(drone),
        video: loopback_video(),
    };
    (Tello::with_session_factory(config, factory), rx)
}

fn wait_for_sequence(tello: &Tello, sequence: u64) -> VideoFrame {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(frame) = tello.frame() {
            if frame.sequence >= sequence {
                return frame;
            }
        }
        assert!(Instant::now() < deadline, "no frame with sequence {sequence}");
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn capture_start_stop_and_concurrent_reads() {
    let fake = FakeDrone::spawn(vec!["ok", "ok", "ok"]);
    let opened = Arc::new(AtomicUsize::new(0));
    let (mut tello, video_addr) = client_with_reported_video_addr(fake.addr(), opened.clone());

    tello.start().unwrap();
    assert!(tello.frame().is_none());

    tello.start_video().unwrap();
    tello.start_video().unwrap();
    assert_eq!(tello.video_state(), PipelineState::Running);
    assert_eq!(opened.load(Ordering::SeqCst), 1);

    let video_addr = video_addr.recv_timeout(Duration::from_secs(2)).unwrap();
    let camera = UdpSocket::bind("127.0.0.1:0").unwrap();
    camera.send_to(b"AAAAAAAA", video_addr).unwrap();
    camera.send_to(b"B", video_addr).unwrap();
    let first = wait_for_sequence(&tello, 1);
    assert_eq!(first.format, PixelFormat::Encoded);
    assert_eq!(first.data.as_ref(), b"AAAAAAAAB");

    camera.send_to(b"CCC", video_addr).unwrap();
    let second = wait_for_sequence(&tello, 2);
    assert_eq!(second.data.as_ref(), b"CCC");
    // The earlier copy is unaffected by the newer frame.
    assert_eq!(first.data.as_ref(), b"AAAAAAAAB");

    tello.stop_video().unwrap();
    tello.stop_video().unwrap();
    assert_eq!(tello.video_state(), PipelineState::Stopped);

    let tello = Arc::new(tello);
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let tello = Arc::clone(&tello);
            thread::spawn(move || {
                for _ in 0..500 {
                    let frame = tello.frame().expect("last frame survives stop");
                    assert_eq!(frame.sequence, 2);
                }
            })
        })
        .collect();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(fake.finish(), vec!["command", "streamon", "streamoff"]);
}

#[test]
fn rejected_streamon_starts_nothing() {
    let fake = FakeDrone::spawn(vec!["ok", "error"]);
    let opened = Arc::new(AtomicUsize::new(0));
    let (mut tello, _video_addr) = client_with_reported_video_addr(fake.addr(), opened.clone());

    tello.start().unwrap();
    let err = tello.start_video().unwrap_err();

    assert!(matches!(err, VideoError::StreamStartFailed(_)));
    assert_eq!(tello.video_state(), PipelineState::Stopped);
    assert_eq!(opened.load(Ordering::SeqCst), 0);
    assert!(tello.frame().is_none());
    assert_eq!(fake.finish(), vec!["command", "streamon"]);
}

#[test]
fn video_requires_handshake() {
    let fake = FakeDrone::spawn(vec![]);
    let (mut tello, _video_addr) =
        client_with_reported_video_addr(fake.addr(), Arc::new(AtomicUsize::new(0)));

    let err = tello.start_video().unwrap_err();
    assert!(matches!(err, VideoError::StreamStartFailed(_)));
    assert!(fake.finish().is_empty());
}
