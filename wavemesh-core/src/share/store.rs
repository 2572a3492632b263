//! Persistent storage for the share list.
//!
//! The [`ShareBackend`] trait is the seam toward whatever service owns
//! the authoritative share list. [`JsonShareStore`] is the node's
//! file-backed implementation; [`MemoryShareStore`] backs tests and
//! embedded use.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::MeshError;
use crate::share::dirs::SharedDirectory;

// ── ShareBackend ─────────────────────────────────────────────────

/// Loads and stores the full share list.
///
/// The manager always commits the complete list in one call, so a
/// backend never observes partial edits.
#[async_trait]
pub trait ShareBackend: Send + Sync {
    /// Read the current share list.
    async fn load(&self) -> Result<Vec<SharedDirectory>, MeshError>;

    /// Replace the share list.
    async fn store(&self, dirs: &[SharedDirectory]) -> Result<(), MeshError>;
}

// ── JsonShareStore ───────────────────────────────────────────────

/// Share list persisted as pretty-printed JSON on disk.
pub struct JsonShareStore {
    path: PathBuf,
}

impl JsonShareStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ShareBackend for JsonShareStore {
    async fn load(&self) -> Result<Vec<SharedDirectory>, MeshError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            // A node that never shared anything has no file yet.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, dirs: &[SharedDirectory]) -> Result<(), MeshError> {
        let text = serde_json::to_vec_pretty(dirs)?;
        tokio::fs::write(&self.path, text).await?;
        Ok(())
    }
}

// ── MemoryShareStore ─────────────────────────────────────────────

/// In-memory backend for tests and embedding.
#[derive(Default)]
pub struct MemoryShareStore {
    dirs: Mutex<Vec<SharedDirectory>>,
}

impl MemoryShareStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShareBackend for MemoryShareStore {
    async fn load(&self) -> Result<Vec<SharedDirectory>, MeshError> {
        Ok(self.dirs.lock().map(|d| d.clone()).unwrap_or_default())
    }

    async fn store(&self, dirs: &[SharedDirectory]) -> Result<(), MeshError> {
        if let Ok(mut slot) = self.dirs.lock() {
            *slot = dirs.to_vec();
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────
