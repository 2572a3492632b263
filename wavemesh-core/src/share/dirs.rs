//! Shared-directory model.

use std::path::PathBuf;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::share::groups::GroupId;

// ── ShareFlags ───────────────────────────────────────────────────

bitflags! {
    /// Per-directory visibility flags.
    ///
    /// `BROWSABLE` and `NETWORK_WIDE` are additionally restricted by
    /// the directory's parent groups when any are set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ShareFlags: u32 {
        /// Files can be found by anonymous search.
        const ANONYMOUS_SEARCH   = 0b0001;
        /// Files can be downloaded through anonymous tunnels.
        const ANONYMOUS_DOWNLOAD = 0b0010;
        /// Directory listing is visible to direct friends.
        const BROWSABLE          = 0b0100;
        /// Directory is reachable beyond direct friends.
        const NETWORK_WIDE       = 0b1000;
    }
}

impl Default for ShareFlags {
    /// Flags applied to a freshly added share.
    fn default() -> Self {
        ShareFlags::ANONYMOUS_DOWNLOAD | ShareFlags::ANONYMOUS_SEARCH
    }
}

// ── SharedDirectory ──────────────────────────────────────────────

/// One locally shared directory and its visibility settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedDirectory {
    /// Filesystem path of the shared directory.
    pub path: PathBuf,
    /// Name shown to peers instead of the real path. Empty means
    /// "derive from the path".
    #[serde(default)]
    pub virtual_name: String,
    /// Visibility flags.
    #[serde(default)]
    pub flags: ShareFlags,
    /// Friend groups allowed to see this share. Empty means no group
    /// restriction.
    #[serde(default)]
    pub parent_groups: Vec<GroupId>,
}

impl SharedDirectory {
    /// Create a share with default flags, no virtual name and no
    /// group restriction.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            virtual_name: String::new(),
            flags: ShareFlags::default(),
            parent_groups: Vec::new(),
        }
    }

    /// Name presented to peers: the virtual name if set, otherwise
    /// the last component of the path.
    pub fn display_name(&self) -> String {
        if !self.virtual_name.is_empty() {
            return self.virtual_name.clone();
        }
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

// ── Tests ────────────────────────────────────────────────────────
