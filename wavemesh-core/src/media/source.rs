//! Capture device abstraction.
//!
//! Real camera backends (V4L2, AVFoundation, ...) live behind the
//! [`CaptureDevice`] trait; the pipeline itself never talks to driver
//! APIs. The built-in [`TestPatternDevice`] generates synthetic frames
//! for demos and tests.

use std::time::Instant;

use crate::error::MeshError;
use crate::media::types::{PixelFormat, VideoFrame};

// ── CaptureDevice ────────────────────────────────────────────────

/// A source of raw video frames.
///
/// # Lifecycle
///
/// The device is a scoped resource: [`open`](Self::open) acquires it,
/// [`grab`](Self::grab) pulls exactly one frame per call, and
/// [`close`](Self::close) releases it. `close` must be idempotent;
/// the service calls it both on loop exit and on drop. `open` after
/// `close` re-acquires the device.
pub trait CaptureDevice: Send {
    /// Acquire the underlying device.
    fn open(&mut self) -> Result<(), MeshError>;

    /// Pull a single frame in the device's native pixel layout.
    ///
    /// Returns [`MeshError::DeviceUnavailable`] if the device is closed
    /// or stopped producing frames.
    fn grab(&mut self) -> Result<VideoFrame, MeshError>;

    /// Release the device. Safe to call repeatedly.
    fn close(&mut self);
}

// ── TestPatternDevice ────────────────────────────────────────────

/// Synthetic frame source producing a moving BGR gradient.
///
/// Stands in for a real camera wherever one is unavailable: the node
/// binary's default source, demos, and the pipeline tests.
pub struct TestPatternDevice {
    width: u32,
    height: u32,
    /// Frames produced since `open`; drives the pattern animation.
    frame_index: u64,
    open: bool,
}

impl TestPatternDevice {
    /// Create a pattern source with the given frame dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame_index: 0,
            open: false,
        }
    }

    /// Frames produced since the device was last opened.
    pub fn frames_produced(&self) -> u64 {
        self.frame_index
    }
}

impl CaptureDevice for TestPatternDevice {
    fn open(&mut self) -> Result<(), MeshError> {
        self.open = true;
        self.frame_index = 0;
        Ok(())
    }

    fn grab(&mut self) -> Result<VideoFrame, MeshError> {
        if !self.open {
            return Err(MeshError::DeviceUnavailable);
        }

        let shift = (self.frame_index % 256) as u8;
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for y in 0..self.height {
            for x in 0..self.width {
                data.push((x as u8).wrapping_add(shift)); // B
                data.push((y as u8).wrapping_add(shift)); // G
                data.push(shift); // R
            }
        }
        self.frame_index += 1;

        Ok(VideoFrame {
            width: self.width,
            height: self.height,
            format: PixelFormat::Bgr8,
            data,
            timestamp: Instant::now(),
        })
    }

    fn close(&mut self) {
        self.open = false;
    }
}

// ── Tests ────────────────────────────────────────────────────────
