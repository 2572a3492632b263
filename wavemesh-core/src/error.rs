//! Domain-specific error types for the wavemesh node.
//!
//! All fallible operations return `Result<T, MeshError>`.
//! No panics on invalid input — every error is typed and recoverable.

use std::path::PathBuf;
use thiserror::Error;

/// The canonical error type for wavemesh services.
#[derive(Debug, Error)]
pub enum MeshError {
    // ── Capture Errors ───────────────────────────────────────────
    /// The capture device is missing or could not produce a frame.
    #[error("capture device unavailable")]
    DeviceUnavailable,

    /// A captured frame did not have the channel layout the pipeline
    /// was configured for.
    #[error("unexpected frame format: expected {expected} channels, got {actual}")]
    UnexpectedFormat { expected: usize, actual: usize },

    // ── Encoding Errors ──────────────────────────────────────────
    /// The encoder sink failed to produce a packet for a frame.
    #[error("encoding error: {0}")]
    Encoding(String),

    // ── Share Registry Errors ────────────────────────────────────
    /// The directory is already present in the share list.
    #[error("directory is already shared: {}", .0.display())]
    DuplicateShare(PathBuf),

    /// A row index did not resolve to a shared directory.
    #[error("no shared directory at row {0}")]
    UnknownShare(usize),

    // ── Storage Errors ───────────────────────────────────────────
    /// The share store or another I/O layer reported an error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted share list could not be read or written.
    #[error("share store error: {0}")]
    Store(#[from] serde_json::Error),
}
