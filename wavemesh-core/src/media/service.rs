//! Timer-driven webcam capture service.
//!
//! Orchestrates the full capture pipeline:
//!
//! 1. A [`CaptureDevice`] produces one raw frame per tick.
//! 2. The frame is converted to the canonical RGB layout.
//! 3. An optional [`EncoderSink`] turns it into a network packet.
//! 4. The [`BandwidthEstimator`] records the encoded byte count.
//! 5. The canonical frame is published to the display sink.
//!
//! Everything runs sequentially on one Tokio task; the estimator and
//! counters are never touched concurrently. The service runs until
//! [`stop`](CaptureService::stop) is called or an unrecoverable error
//! occurs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::warn;

use crate::error::MeshError;
use crate::media::bandwidth::BandwidthEstimator;
use crate::media::encoder::{EncodedPacket, EncoderSink};
use crate::media::source::CaptureDevice;
use crate::media::types::VideoFrame;

// ── CaptureConfig ────────────────────────────────────────────────

/// Configuration for [`CaptureService`].
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Delay between capture ticks. One frame is grabbed per tick.
    pub tick_interval: Duration,
    /// Channel count a grabbed frame must have to be processed.
    pub expected_channels: usize,
    /// Capacity of the outgoing packet queue.
    pub queue_capacity: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50), // ~20 frames/second
            expected_channels: 3,
            queue_capacity: 32,
        }
    }
}

// ── CaptureStats ─────────────────────────────────────────────────

/// Running counters exposed to status readouts.
#[derive(Debug, Clone, Default)]
pub struct CaptureStats {
    /// Frames successfully captured and published.
    pub frames_captured: u64,
    /// Ticks skipped because the device failed or produced an
    /// unexpected format.
    pub frames_skipped: u64,
    /// Encoded packets dropped because the outgoing queue was full.
    pub packets_dropped: u64,
    /// Total encoded bytes produced.
    pub bytes_encoded: u64,
    /// Smoothed throughput in bytes/second.
    pub bandwidth_bps: f64,
}

// ── CaptureService ───────────────────────────────────────────────

/// Tick-driven capture loop feeding the display and encoder sinks.
///
/// # Lifetime
///
/// Call [`run`](Self::run) to start the loop; it acquires the device,
/// runs until [`stop`](Self::stop) is called, and releases the device
/// on exit. `stop` is idempotent, and the device is also released on
/// drop.
pub struct CaptureService {
    device: Box<dyn CaptureDevice>,
    encoder: Option<Box<dyn EncoderSink>>,
    bandwidth: BandwidthEstimator,
    config: CaptureConfig,
    running: Arc<AtomicBool>,
    stats: CaptureStats,
    /// Display sink: always holds the latest canonical frame.
    frame_tx: watch::Sender<Option<VideoFrame>>,
    frame_rx: watch::Receiver<Option<VideoFrame>>,
    stats_tx: watch::Sender<CaptureStats>,
    stats_rx: watch::Receiver<CaptureStats>,
    /// Outgoing packet queue toward the network layer.
    packet_tx: mpsc::Sender<EncodedPacket>,
    packet_rx: Option<mpsc::Receiver<EncodedPacket>>,
}

impl CaptureService {
    /// Create a service around `device` with default configuration.
    pub fn new(device: Box<dyn CaptureDevice>) -> Self {
        Self::with_config(device, CaptureConfig::default())
    }

    /// Create a service with explicit configuration.
    pub fn with_config(device: Box<dyn CaptureDevice>, config: CaptureConfig) -> Self {
        let (frame_tx, frame_rx) = watch::channel(None);
        let (stats_tx, stats_rx) = watch::channel(CaptureStats::default());
        let (packet_tx, packet_rx) = mpsc::channel(config.queue_capacity.max(1));

        Self {
            device,
            encoder: None,
            bandwidth: BandwidthEstimator::new(),
            config,
            running: Arc::new(AtomicBool::new(false)),
            stats: CaptureStats::default(),
            frame_tx,
            frame_rx,
            stats_tx,
            stats_rx,
            packet_tx,
            packet_rx: Some(packet_rx),
        }
    }

    /// Attach the encoder sink. Without one, frames only reach the
    /// display sink and no packets or bandwidth samples are produced.
    pub fn set_encoder(&mut self, encoder: Box<dyn EncoderSink>) {
        self.encoder = Some(encoder);
    }

    /// Obtain a `watch::Receiver` that yields the latest canonical
    /// frame whenever one is captured.
    pub fn frame_receiver(&self) -> watch::Receiver<Option<VideoFrame>> {
        self.frame_rx.clone()
    }

    /// Obtain a `watch::Receiver` for the running counters.
    pub fn stats_receiver(&self) -> watch::Receiver<CaptureStats> {
        self.stats_rx.clone()
    }

    /// Take the receiving end of the outgoing packet queue.
    ///
    /// There is exactly one consumer; returns `None` on every call
    /// after the first.
    pub fn take_packet_receiver(&mut self) -> Option<mpsc::Receiver<EncodedPacket>> {
        self.packet_rx.take()
    }

    /// A cloneable handle that can be used to stop the service from
    /// another task.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Current smoothed bandwidth in bytes/second.
    pub fn estimated_bandwidth(&self) -> f64 {
        self.bandwidth.bytes_per_sec()
    }

    /// Run the capture loop.
    ///
    /// Acquires the device, then grabs one frame per tick until
    /// stopped. A tick whose grab fails with a device or format error
    /// is logged and skipped; any other error aborts the run. The
    /// device is released before returning.
    pub async fn run(&mut self) -> Result<(), MeshError> {
        self.device.open()?;
        self.running.store(true, Ordering::SeqCst);

        let mut ticker = tokio::time::interval(self.config.tick_interval);
        // A stalled tick is simply lost; the loop never bursts to catch up.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while self.running.load(Ordering::SeqCst) {
            ticker.tick().await;

            match self.tick() {
                Ok(()) => {}
                Err(e @ (MeshError::DeviceUnavailable | MeshError::UnexpectedFormat { .. })) => {
                    self.stats.frames_skipped += 1;
                    self.publish_stats();
                    warn!("capture tick skipped: {e}");
                }
                Err(e) => {
                    self.device.close();
                    self.running.store(false, Ordering::SeqCst);
                    return Err(e);
                }
            }
        }

        self.device.close();
        Ok(())
    }

    /// Signal the service to stop. Safe to call repeatedly.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the capture loop is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    // ── Internal ─────────────────────────────────────────────────

    /// One capture tick: grab, validate, convert, encode, publish.
    fn tick(&mut self) -> Result<(), MeshError> {
        let raw = self.device.grab()?;

        if raw.channels() != self.config.expected_channels {
            return Err(MeshError::UnexpectedFormat {
                expected: self.config.expected_channels,
                actual: raw.channels(),
            });
        }

        let frame = raw.to_rgb();

        if let Some(encoder) = self.encoder.as_mut() {
            let packet = encoder.encode(&frame)?;
            let size = packet.byte_len() as u64;
            self.bandwidth.record(size);
            self.stats.bytes_encoded += size;

            match self.packet_tx.try_send(packet) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    self.stats.packets_dropped += 1;
                }
                // No consumer attached; capture continues for display.
                Err(mpsc::error::TrySendError::Closed(_)) => {}
            }
        }

        let _ = self.frame_tx.send(Some(frame));
        self.stats.frames_captured += 1;
        self.publish_stats();
        Ok(())
    }

    fn publish_stats(&self) {
        let mut snapshot = self.stats.clone();
        snapshot.bandwidth_bps = self.bandwidth.bytes_per_sec();
        let _ = self.stats_tx.send(snapshot);
    }
}

impl Drop for CaptureService {
    fn drop(&mut self) {
        self.device.close();
    }
}

// ── Tests ────────────────────────────────────────────────────────
