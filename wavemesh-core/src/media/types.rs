//! Shared types for the capture/encode pipeline.
//!
//! These are **internal** frame representations passed between pipeline
//! stages. A frame is created once per timer tick, handed to the sinks,
//! and discarded; nothing in the pipeline holds frames across ticks.

use std::time::Instant;

// ── PixelFormat ──────────────────────────────────────────────────

/// Pixel layout for captured frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 3 bytes per pixel: Blue, Green, Red (typical camera output).
    Bgr8,
    /// 3 bytes per pixel: Red, Green, Blue. The canonical layout the
    /// display and encoder sinks consume.
    Rgb8,
    /// 1 byte per pixel, single luminance channel.
    Gray8,
}

impl PixelFormat {
    /// Number of colour channels per pixel.
    pub const fn channels(self) -> usize {
        match self {
            PixelFormat::Bgr8 | PixelFormat::Rgb8 => 3,
            PixelFormat::Gray8 => 1,
        }
    }

    /// Bytes consumed by a single pixel in this format.
    pub const fn bytes_per_pixel(self) -> usize {
        self.channels()
    }
}

// ── VideoFrame ───────────────────────────────────────────────────

/// One uncompressed image sample obtained from a capture device.
///
/// The `data` buffer holds `height` rows of `width * bytes_per_pixel`
/// bytes each, tightly packed.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel layout.
    pub format: PixelFormat,
    /// Raw pixel data — `width * height * bytes_per_pixel` bytes.
    pub data: Vec<u8>,
    /// Monotonic capture timestamp.
    pub timestamp: Instant,
}

impl VideoFrame {
    /// Number of colour channels in this frame.
    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Total byte size of the pixel buffer.
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }

    /// Convert to the canonical RGB layout.
    ///
    /// Capture devices deliver whatever the driver produces (commonly
    /// BGR); the rest of the pipeline only ever sees RGB. Grayscale is
    /// expanded by replicating the luminance channel.
    pub fn to_rgb(&self) -> VideoFrame {
        let data = match self.format {
            PixelFormat::Rgb8 => self.data.clone(),
            PixelFormat::Bgr8 => {
                let mut out = self.data.clone();
                for px in out.chunks_exact_mut(3) {
                    px.swap(0, 2);
                }
                out
            }
            PixelFormat::Gray8 => {
                let mut out = Vec::with_capacity(self.data.len() * 3);
                for &y in &self.data {
                    out.extend_from_slice(&[y, y, y]);
                }
                out
            }
        };

        VideoFrame {
            width: self.width,
            height: self.height,
            format: PixelFormat::Rgb8,
            data,
            timestamp: self.timestamp,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(format: PixelFormat, data: Vec<u8>) -> VideoFrame {
        VideoFrame {
            width: 2,
            height: 1,
            format,
            data,
            timestamp: Instant::now(),
        }
    }

    #[test]
    fn bgr_to_rgb_swaps_channels() {
        let f = frame(PixelFormat::Bgr8, vec![1, 2, 3, 4, 5, 6]);
        let rgb = f.to_rgb();
        assert_eq!(rgb.format, PixelFormat::Rgb8);
        assert_eq!(rgb.data, vec![3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn rgb_passthrough() {
        let f = frame(PixelFormat::Rgb8, vec![9, 8, 7, 6, 5, 4]);
        let rgb = f.to_rgb();
        assert_eq!(rgb.data, f.data);
    }

    #[test]
    fn gray_expands_to_three_channels() {
        let f = frame(PixelFormat::Gray8, vec![10, 200]);
        let rgb = f.to_rgb();
        assert_eq!(rgb.data, vec![10, 10, 10, 200, 200, 200]);
        assert_eq!(rgb.byte_len(), 6);
    }

    #[test]
    fn byte_len_matches_dimensions() {
        let f = frame(PixelFormat::Bgr8, vec![0; 6]);
        assert_eq!(f.byte_len(), 6);
        assert_eq!(f.channels(), 3);
    }
}
