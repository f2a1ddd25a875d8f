use std::time::Duration;

use fbgrab_core::pixel::framebuffer::PIXEL_COUNT;
use fbgrab_core::{
    capture, decode, ConnectionParams, Error, StreamEnd, FRAME_BYTES, SCREEN_HEIGHT, SCREEN_WIDTH,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Solid 0xF800 (full red) frame, little-endian.
fn red_frame() -> Vec<u8> {
    std::iter::repeat([0x00u8, 0xF8])
        .take(PIXEL_COUNT)
        .flatten()
        .collect()
}

/// Accepts one connection, checks the request token, sends `payload` in
/// mixed-size writes, waits `linger`, then closes.
async fn mock_device(payload: Vec<u8>, linger: Duration) -> (u16, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = vec![0u8; b"getscreen".len()];
        socket.read_exact(&mut request).await.unwrap();

        for piece in payload.chunks(4000) {
            socket.write_all(piece).await.unwrap();
        }
        socket.flush().await.unwrap();
        tokio::time::sleep(linger).await;
        request
    });

    (port, handle)
}

/// Behaves like the device's screen server: sends `payload` without reading
/// the request, waits `linger`, then closes. The unread token makes the close
/// a connection reset.
async fn unread_request_device(payload: Vec<u8>, linger: Duration) -> (u16, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        // Token queued but never consumed
        socket.readable().await.unwrap();

        socket.write_all(&payload).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(linger).await;
    });

    (port, handle)
}

fn local_params(port: u16) -> ConnectionParams {
    let mut params = ConnectionParams::new("127.0.0.1", port);
    params.connect_timeout = Duration::from_secs(2);
    params.idle_timeout = Some(Duration::from_secs(2));
    params
}

#[tokio::test]
async fn captures_and_decodes_full_frame() {
    let (port, device) = mock_device(red_frame(), Duration::ZERO).await;

    let capture = capture(&local_params(port)).await.unwrap();
    assert!(capture.end.is_clean());
    assert_eq!(capture.data.len(), FRAME_BYTES);
    assert_eq!(device.await.unwrap(), b"getscreen");

    let raw = capture.into_frame(FRAME_BYTES).unwrap();
    let rgb = decode(&raw, SCREEN_WIDTH, SCREEN_HEIGHT).unwrap();
    assert_eq!(rgb.len(), PIXEL_COUNT * 3);
    for px in rgb.chunks_exact(3) {
        assert_eq!(px, [0xF8, 0x00, 0x00]);
    }
}

#[tokio::test]
async fn short_capture_fails_to_decode() {
    let (port, device) = mock_device(vec![0u8; 1000], Duration::ZERO).await;

    let capture = capture(&local_params(port)).await.unwrap();
    device.await.unwrap();
    assert!(capture.end.is_clean());

    let raw = capture.into_frame(FRAME_BYTES).unwrap();
    assert!(matches!(
        decode(&raw, SCREEN_WIDTH, SCREEN_HEIGHT),
        Err(Error::TruncatedData {
            expected: FRAME_BYTES,
            actual: 1000
        })
    ));
}

#[tokio::test]
async fn idle_device_after_full_frame_is_tolerated() {
    let (port, device) = mock_device(red_frame(), Duration::from_secs(1)).await;

    let mut params = local_params(port);
    params.idle_timeout = Some(Duration::from_millis(200));

    let capture = capture(&params).await.unwrap();
    assert!(matches!(capture.end, StreamEnd::IdleTimeout(_)));
    assert_eq!(capture.into_frame(FRAME_BYTES).unwrap().len(), FRAME_BYTES);
    device.await.unwrap();
}

#[tokio::test]
async fn reset_after_full_frame_still_decodes() {
    let (port, device) = unread_request_device(red_frame(), Duration::from_millis(500)).await;

    let capture = capture(&local_params(port)).await.unwrap();
    device.await.unwrap();

    match &capture.end {
        StreamEnd::Fault(e) => assert_eq!(e.kind(), std::io::ErrorKind::ConnectionReset),
        other => panic!("expected connection reset, got {}", other),
    }
    assert_eq!(capture.data.len(), FRAME_BYTES);

    let raw = capture.into_frame(FRAME_BYTES).unwrap();
    let rgb = decode(&raw, SCREEN_WIDTH, SCREEN_HEIGHT).unwrap();
    assert!(rgb.chunks_exact(3).all(|px| px == [0xF8, 0x00, 0x00]));
}

#[tokio::test]
async fn reset_mid_frame_is_transfer_fault() {
    let half = FRAME_BYTES / 2;
    let (port, device) = unread_request_device(vec![0u8; half], Duration::from_millis(500)).await;

    let capture = capture(&local_params(port)).await.unwrap();
    device.await.unwrap();

    assert!(matches!(capture.end, StreamEnd::Fault(_)));
    assert_eq!(capture.data.len(), half);

    match capture.into_frame(FRAME_BYTES) {
        Err(Error::TransferFault {
            received, expected, ..
        }) => {
            assert_eq!(received, half);
            assert_eq!(expected, FRAME_BYTES);
        }
        other => panic!("expected TransferFault, got {:?}", other.map(|v| v.len())),
    }
}

#[tokio::test]
async fn refused_connection_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    match capture(&local_params(port)).await {
        Err(Error::ConnectionFailure { addr, .. }) => {
            assert_eq!(addr, format!("127.0.0.1:{}", port));
        }
        other => panic!("expected ConnectionFailure, got {:?}", other),
    }
}

#[tokio::test]
async fn invalid_params_rejected_before_connecting() {
    let mut params = ConnectionParams::new("127.0.0.1", 1);
    params.chunk_size = 0;
    assert!(matches!(
        capture(&params).await,
        Err(Error::InvalidParams(_))
    ));
}
