//! Encoder sink for captured frames.
//!
//! The capture service hands every canonical frame to an attached
//! [`EncoderSink`] and records the size of the packet it produces;
//! that per-frame byte count is what feeds the bandwidth estimator.
//! The default [`ZstdEncoder`] compresses each frame independently;
//! codecs with inter-frame state implement the same trait.

use bytes::Bytes;

use crate::error::MeshError;
use crate::media::types::VideoFrame;

// ── EncodedPacket ────────────────────────────────────────────────

/// A compressed frame ready for the network layer.
#[derive(Debug, Clone)]
pub struct EncodedPacket {
    /// Sequential packet number, starting at 0.
    pub sequence: u64,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Compressed payload.
    pub payload: Bytes,
}

impl EncodedPacket {
    /// Size in bytes of the encoded payload.
    pub fn byte_len(&self) -> usize {
        self.payload.len()
    }
}

// ── EncoderSink ──────────────────────────────────────────────────

/// Consumes one frame per tick and produces one packet for it.
pub trait EncoderSink: Send {
    /// Encode a single canonical (RGB) frame.
    fn encode(&mut self, frame: &VideoFrame) -> Result<EncodedPacket, MeshError>;
}

// ── ZstdEncoder ──────────────────────────────────────────────────

/// Intra-frame zstd packer.
///
/// Every frame is compressed on its own, so packets are independently
/// decodable and loss of one never corrupts the next.
pub struct ZstdEncoder {
    /// zstd compression level (1 = fast, 19 = max compression).
    level: i32,
    sequence: u64,
}

impl ZstdEncoder {
    /// Create an encoder with the given compression level.
    pub fn new(level: i32) -> Self {
        Self { level, sequence: 0 }
    }

    /// Number of packets produced so far.
    pub fn packet_count(&self) -> u64 {
        self.sequence
    }
}

impl EncoderSink for ZstdEncoder {
    fn encode(&mut self, frame: &VideoFrame) -> Result<EncodedPacket, MeshError> {
        let compressed = zstd::encode_all(frame.data.as_slice(), self.level)
            .map_err(|e| MeshError::Encoding(format!("zstd encode failed: {e}")))?;

        let sequence = self.sequence;
        self.sequence += 1;

        Ok(EncodedPacket {
            sequence,
            width: frame.width,
            height: frame.height,
            payload: Bytes::from(compressed),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::types::PixelFormat;
    use std::time::Instant;

    fn test_frame(w: u32, h: u32) -> VideoFrame {
        VideoFrame {
            width: w,
            height: h,
            format: PixelFormat::Rgb8,
            data: vec![0xAB; (w * h * 3) as usize],
            timestamp: Instant::now(),
        }
    }

    #[test]
    fn encode_compresses_repetitive_frames() {
        let mut enc = ZstdEncoder::new(1);
        let frame = test_frame(64, 64);
        let pkt = enc.encode(&frame).unwrap();

        assert!(pkt.byte_len() < frame.byte_len());
        assert_eq!(pkt.width, 64);
        assert_eq!(pkt.height, 64);
    }

    #[test]
    fn sequence_numbers_are_consecutive() {
        let mut enc = ZstdEncoder::new(1);
        let frame = test_frame(8, 8);
        let a = enc.encode(&frame).unwrap();
        let b = enc.encode(&frame).unwrap();
        assert_eq!(a.sequence, 0);
        assert_eq!(b.sequence, 1);
        assert_eq!(enc.packet_count(), 2);
    }
}
