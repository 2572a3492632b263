//! Smoothed bandwidth estimation for the capture pipeline.
//!
//! Accumulates the encoded byte count of every frame and folds the
//! total into an exponential moving average once per elapsed wall-clock
//! second. Callers read the smoothed rate on demand to drive quality
//! decisions and status readouts.

use std::time::Instant;

/// Weight of the newest per-window sample in the moving average.
const SMOOTHING: f64 = 0.25;

/// Exponentially-smoothed throughput estimator.
///
/// Bytes recorded within the same whole second only accumulate. The
/// smoothed rate changes exactly once per closed window:
///
/// ```text
/// rate' = 0.75 * rate + 0.25 * (window_bytes / elapsed_secs)
/// ```
///
/// If no bytes arrive for several seconds, the next window closes over
/// the whole gap, so an idle period dilutes the rate instead of
/// spiking it.
pub struct BandwidthEstimator {
    /// Smoothed rate in bytes/second.
    rate: f64,
    /// Bytes accumulated since the window last closed.
    window_bytes: u64,
    /// Whole-second timestamp of the last window close.
    last_close: u64,
    /// Anchor for the wall-clock entry point.
    origin: Instant,
}

impl BandwidthEstimator {
    /// Create an estimator with its clock anchored at the current instant.
    pub fn new() -> Self {
        Self {
            rate: 0.0,
            window_bytes: 0,
            last_close: 0,
            origin: Instant::now(),
        }
    }

    /// Record that `bytes` were produced at the current wall-clock second.
    pub fn record(&mut self, bytes: u64) {
        let now = self.origin.elapsed().as_secs();
        self.record_at(bytes, now);
    }

    /// Record with an explicit whole-second timestamp (useful for testing).
    ///
    /// Timestamps are expected to be non-decreasing. A timestamp that is
    /// not strictly greater than the last window close never closes a
    /// window, so the division below cannot see a zero elapsed time; a
    /// backward clock jump therefore only accumulates.
    pub fn record_at(&mut self, bytes: u64, now_secs: u64) {
        self.window_bytes = self.window_bytes.saturating_add(bytes);

        if now_secs > self.last_close {
            let elapsed = now_secs - self.last_close;
            self.rate = (1.0 - SMOOTHING) * self.rate
                + SMOOTHING * (self.window_bytes as f64 / elapsed as f64);
            self.window_bytes = 0;
            self.last_close = now_secs;
        }
    }

    /// Smoothed throughput in bytes/second.
    pub fn bytes_per_sec(&self) -> f64 {
        self.rate
    }
}

impl Default for BandwidthEstimator {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ────────────────────────────────────────────────────────
