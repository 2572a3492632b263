//! End-to-end capture pipeline tests: synthetic device through the
//! tick loop to the display sink and the packet queue, plus failure
//! and lifecycle scenarios.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::time::timeout;

use wavemesh_core::{
    CaptureConfig, CaptureDevice, CaptureService, MeshError, PixelFormat, TestPatternDevice,
    VideoFrame, ZstdEncoder,
};

// ── Helpers ──────────────────────────────────────────────────────

fn fast_config() -> CaptureConfig {
    CaptureConfig {
        tick_interval: Duration::from_millis(1),
        ..CaptureConfig::default()
    }
}

/// Device whose grab fails on every second call.
struct FlakyDevice {
    inner: TestPatternDevice,
    calls: u64,
}

impl FlakyDevice {
    fn new() -> Self {
        Self {
            inner: TestPatternDevice::new(8, 8),
            calls: 0,
        }
    }
}

impl CaptureDevice for FlakyDevice {
    fn open(&mut self) -> Result<(), MeshError> {
        self.inner.open()
    }

    fn grab(&mut self) -> Result<VideoFrame, MeshError> {
        self.calls += 1;
        if self.calls % 2 == 0 {
            return Err(MeshError::DeviceUnavailable);
        }
        self.inner.grab()
    }

    fn close(&mut self) {
        self.inner.close();
    }
}

/// Device producing frames with an unexpected channel count.
struct GrayDevice;

impl CaptureDevice for GrayDevice {
    fn open(&mut self) -> Result<(), MeshError> {
        Ok(())
    }

    fn grab(&mut self) -> Result<VideoFrame, MeshError> {
        Ok(VideoFrame {
            width: 8,
            height: 8,
            format: PixelFormat::Gray8,
            data: vec![0; 64],
            timestamp: Instant::now(),
        })
    }

    fn close(&mut self) {}
}

/// Device that cannot be acquired at all.
struct MissingDevice;

impl CaptureDevice for MissingDevice {
    fn open(&mut self) -> Result<(), MeshError> {
        Err(MeshError::DeviceUnavailable)
    }

    fn grab(&mut self) -> Result<VideoFrame, MeshError> {
        Err(MeshError::DeviceUnavailable)
    }

    fn close(&mut self) {}
}

/// Wrapper that records whether the device is currently held open.
struct TrackedDevice {
    inner: TestPatternDevice,
    held: Arc<AtomicBool>,
}

impl CaptureDevice for TrackedDevice {
    fn open(&mut self) -> Result<(), MeshError> {
        self.held.store(true, Ordering::SeqCst);
        self.inner.open()
    }

    fn grab(&mut self) -> Result<VideoFrame, MeshError> {
        self.inner.grab()
    }

    fn close(&mut self) {
        self.held.store(false, Ordering::SeqCst);
        self.inner.close();
    }
}

// ── Pipeline flow ────────────────────────────────────────────────

#[tokio::test]
async fn pipeline_delivers_frames_and_packets() {
    let mut svc = CaptureService::with_config(
        Box::new(TestPatternDevice::new(16, 12)),
        fast_config(),
    );
    svc.set_encoder(Box::new(ZstdEncoder::new(1)));

    let mut packets = svc.take_packet_receiver().unwrap();
    let frames = svc.frame_receiver();
    let stats = svc.stats_receiver();
    let stop = svc.stop_handle();

    let handle = tokio::spawn(async move { svc.run().await });

    for expected_seq in 0..3u64 {
        let pkt = timeout(Duration::from_secs(5), packets.recv())
            .await
            .expect("timed out waiting for packet")
            .expect("packet channel closed");
        assert_eq!(pkt.sequence, expected_seq);
        assert_eq!(pkt.width, 16);
        assert_eq!(pkt.height, 12);
        assert!(!pkt.payload.is_empty());
    }

    stop.store(false, Ordering::SeqCst);
    handle.await.unwrap().unwrap();

    // Display sink saw a canonical frame.
    let latest = frames.borrow().clone().expect("no frame published");
    assert_eq!(latest.format, PixelFormat::Rgb8);

    let snapshot = stats.borrow().clone();
    assert!(snapshot.frames_captured >= 3);
    assert!(snapshot.bytes_encoded > 0);
}

#[tokio::test]
async fn device_failures_skip_the_tick_and_continue() {
    let mut svc = CaptureService::with_config(Box::new(FlakyDevice::new()), fast_config());
    let mut stats = svc.stats_receiver();
    let stop = svc.stop_handle();

    let handle = tokio::spawn(async move { svc.run().await });

    // Wait until both outcomes have been observed.
    timeout(Duration::from_secs(5), async {
        loop {
            stats.changed().await.unwrap();
            let snap = stats.borrow().clone();
            if snap.frames_captured >= 2 && snap.frames_skipped >= 2 {
                break;
            }
        }
    })
    .await
    .expect("pipeline did not both capture and skip");

    stop.store(false, Ordering::SeqCst);
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn unexpected_channel_count_never_reaches_the_sinks() {
    let mut svc = CaptureService::with_config(Box::new(GrayDevice), fast_config());
    let frames = svc.frame_receiver();
    let mut stats = svc.stats_receiver();
    let stop = svc.stop_handle();

    let handle = tokio::spawn(async move { svc.run().await });

    timeout(Duration::from_secs(5), async {
        loop {
            stats.changed().await.unwrap();
            if stats.borrow().frames_skipped >= 3 {
                break;
            }
        }
    })
    .await
    .expect("format errors were not skipped");

    stop.store(false, Ordering::SeqCst);
    handle.await.unwrap().unwrap();

    assert!(frames.borrow().is_none());
}

// ── Lifecycle ────────────────────────────────────────────────────

#[tokio::test]
async fn open_failure_aborts_the_run() {
    let mut svc = CaptureService::new(Box::new(MissingDevice));
    let result = svc.run().await;
    assert!(matches!(result, Err(MeshError::DeviceUnavailable)));
    assert!(!svc.is_running());
}

#[tokio::test]
async fn stop_releases_the_device() {
    let held = Arc::new(AtomicBool::new(false));
    let device = TrackedDevice {
        inner: TestPatternDevice::new(4, 4),
        held: Arc::clone(&held),
    };

    let mut svc = CaptureService::with_config(Box::new(device), fast_config());
    let mut frames = svc.frame_receiver();
    let stop = svc.stop_handle();

    let handle = tokio::spawn(async move { svc.run().await });

    // Let at least one frame through, then stop.
    timeout(Duration::from_secs(5), frames.changed())
        .await
        .expect("no frame captured")
        .unwrap();
    assert!(held.load(Ordering::SeqCst));

    stop.store(false, Ordering::SeqCst);
    handle.await.unwrap().unwrap();
    assert!(!held.load(Ordering::SeqCst));
}
