//! # wavemesh-core
//!
//! Core library for the wavemesh peer-to-peer chat node.
//!
//! This crate contains:
//! - **Media pipeline**: tick-driven webcam capture, canonical frame
//!   conversion, pluggable encoder sink, and smoothed bandwidth
//!   estimation for the voice/video-chat session
//! - **Share registry**: the locally shared directories, their
//!   visibility flags and friend-group restrictions, with staged edits
//!   and persistent storage
//! - **Error**: `MeshError` — typed, `thiserror`-based error hierarchy

pub mod error;
pub mod media;
pub mod share;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use error::MeshError;
pub use media::{
    BandwidthEstimator, CaptureConfig, CaptureDevice, CaptureService, CaptureStats, EncodedPacket,
    EncoderSink, PixelFormat, TestPatternDevice, VideoFrame, ZstdEncoder,
};
pub use share::{
    GroupId, GroupRegistry, JsonShareStore, ShareBackend, ShareFlags, ShareManager,
    SharedDirectory,
};
