//! # Media capture pipeline
//!
//! Timer-driven webcam capture feeding a voice/video-chat session:
//!
//! ```text
//! CaptureDevice ──► canonical RGB ──► EncoderSink ──► packet queue
//!      (tick)            │                 │
//!                        ▼                 ▼
//!                  display sink     BandwidthEstimator
//! ```
//!
//! ## Sub-modules
//!
//! | Module      | Purpose                                           |
//! |-------------|---------------------------------------------------|
//! | `types`     | Frame and pixel-format types shared by all stages |
//! | `source`    | Capture device trait + synthetic test source      |
//! | `encoder`   | Encoder sink trait + intra-frame zstd packer      |
//! | `bandwidth` | Smoothed throughput estimation                    |
//! | `service`   | The tick loop orchestrating the pipeline          |

pub mod bandwidth;
pub mod encoder;
pub mod service;
pub mod source;
pub mod types;

// ── Re-exports ───────────────────────────────────────────────────

pub use bandwidth::BandwidthEstimator;
pub use encoder::{EncodedPacket, EncoderSink, ZstdEncoder};
pub use service::{CaptureConfig, CaptureService, CaptureStats};
pub use source::{CaptureDevice, TestPatternDevice};
pub use types::{PixelFormat, VideoFrame};
