//! Share registry manager.
//!
//! Owns a staged working copy of the shared-directory list. Edits only
//! touch the copy; [`apply`](ShareManager::apply) commits the whole
//! list to the backend in one call, and [`reload`](ShareManager::reload)
//! discards the copy and re-pulls the authoritative list.
//!
//! Every successful mutation bumps a revision counter published on a
//! `watch` channel, so a dependent view reloads exactly once per state
//! change. The manager is owned by whoever drives the UI lifecycle;
//! there is no process-wide instance.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::MeshError;
use crate::share::dirs::{ShareFlags, SharedDirectory};
use crate::share::groups::GroupId;
use crate::share::store::ShareBackend;

// ── AddReport ────────────────────────────────────────────────────

/// Outcome of a bulk add (e.g. paths dropped onto the share view).
#[derive(Debug, Default, PartialEq)]
pub struct AddReport {
    /// Paths added to the staged list.
    pub added: usize,
    /// Paths refused because they are not directories.
    pub rejected: Vec<PathBuf>,
}

// ── ShareManager ─────────────────────────────────────────────────

/// Staged CRUD over the shared-directory list.
pub struct ShareManager {
    backend: Arc<dyn ShareBackend>,
    dirs: Vec<SharedDirectory>,
    revision_tx: watch::Sender<u64>,
}

impl ShareManager {
    /// Create a manager with an empty staged list.
    ///
    /// Call [`reload`](Self::reload) to populate it from the backend.
    pub fn new(backend: Arc<dyn ShareBackend>) -> Self {
        let (revision_tx, _) = watch::channel(0);
        Self {
            backend,
            dirs: Vec::new(),
            revision_tx,
        }
    }

    // ── Observation ──────────────────────────────────────────────

    /// The staged share list, in row order.
    pub fn entries(&self) -> &[SharedDirectory] {
        &self.dirs
    }

    /// The staged entry at `row`.
    pub fn entry(&self, row: usize) -> Result<&SharedDirectory, MeshError> {
        self.dirs.get(row).ok_or(MeshError::UnknownShare(row))
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Current revision of the staged list.
    pub fn revision(&self) -> u64 {
        *self.revision_tx.borrow()
    }

    /// Subscribe to revision bumps. Each state change produces exactly
    /// one bump; a view that reloads per observed change therefore
    /// reloads exactly once per change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    // ── Backend round-trips ──────────────────────────────────────

    /// Discard staged edits and re-pull the share list from the backend.
    pub async fn reload(&mut self) -> Result<(), MeshError> {
        self.dirs = self.backend.load().await?;
        self.bump();
        Ok(())
    }

    /// Commit the staged list to the backend.
    ///
    /// This is the only place where shares become visible to peers.
    pub async fn apply(&self) -> Result<(), MeshError> {
        self.backend.store(&self.dirs).await
    }

    // ── Mutations (staged) ───────────────────────────────────────

    /// Stage a new share with default flags.
    ///
    /// Fails with [`MeshError::DuplicateShare`] if the path is already
    /// shared.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> Result<(), MeshError> {
        let path = path.into();
        self.ensure_not_shared(&path)?;
        self.dirs.push(SharedDirectory::new(path));
        self.bump();
        Ok(())
    }

    /// Stage several dropped paths at once.
    ///
    /// Only existing directories are accepted; files and dangling
    /// paths are reported back. Paths already shared are silently
    /// skipped. The revision is bumped once when anything was added.
    pub fn add_paths<I>(&mut self, paths: I) -> AddReport
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut report = AddReport::default();
        for path in paths {
            if !path.is_dir() {
                report.rejected.push(path);
                continue;
            }
            if self.ensure_not_shared(&path).is_err() {
                continue;
            }
            self.dirs.push(SharedDirectory::new(path));
            report.added += 1;
        }
        if report.added > 0 {
            self.bump();
        }
        report
    }

    /// Remove the share at `row`, returning it.
    pub fn remove(&mut self, row: usize) -> Result<SharedDirectory, MeshError> {
        if row >= self.dirs.len() {
            return Err(MeshError::UnknownShare(row));
        }
        let removed = self.dirs.remove(row);
        self.bump();
        Ok(removed)
    }

    /// Re-point the share at `row` to a different directory.
    ///
    /// Fails with [`MeshError::DuplicateShare`] if another row already
    /// shares `path`.
    pub fn set_path(&mut self, row: usize, path: impl Into<PathBuf>) -> Result<(), MeshError> {
        let path = path.into();
        if self
            .dirs
            .iter()
            .enumerate()
            .any(|(i, d)| i != row && d.path == path)
        {
            return Err(MeshError::DuplicateShare(path));
        }
        self.entry_mut(row)?.path = path;
        self.bump();
        Ok(())
    }

    /// Change the name shown to peers for the share at `row`.
    pub fn set_virtual_name(
        &mut self,
        row: usize,
        name: impl Into<String>,
    ) -> Result<(), MeshError> {
        self.entry_mut(row)?.virtual_name = name.into();
        self.bump();
        Ok(())
    }

    /// Replace the visibility flags of the share at `row`.
    pub fn set_flags(&mut self, row: usize, flags: ShareFlags) -> Result<(), MeshError> {
        self.entry_mut(row)?.flags = flags;
        self.bump();
        Ok(())
    }

    /// Replace the friend groups allowed to see the share at `row`.
    pub fn set_groups(&mut self, row: usize, groups: Vec<GroupId>) -> Result<(), MeshError> {
        self.entry_mut(row)?.parent_groups = groups;
        self.bump();
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────

    fn entry_mut(&mut self, row: usize) -> Result<&mut SharedDirectory, MeshError> {
        self.dirs.get_mut(row).ok_or(MeshError::UnknownShare(row))
    }

    fn ensure_not_shared(&self, path: &PathBuf) -> Result<(), MeshError> {
        if self.dirs.iter().any(|d| &d.path == path) {
            return Err(MeshError::DuplicateShare(path.clone()));
        }
        Ok(())
    }

    fn bump(&self) {
        self.revision_tx.send_modify(|r| *r += 1);
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::store::MemoryShareStore;

    fn manager() -> ShareManager {
        ShareManager::new(Arc::new(MemoryShareStore::new()))
    }

    #[test]
    fn add_rejects_duplicates() {
        let mut mgr = manager();
        mgr.add("/srv/music").unwrap();
        assert!(matches!(
            mgr.add("/srv/music"),
            Err(MeshError::DuplicateShare(_))
        ));
        assert_eq!(mgr.len(), 1);
    }

    #[test]
    fn remove_shifts_rows() {
        let mut mgr = manager();
        mgr.add("/a").unwrap();
        mgr.add("/b").unwrap();
        mgr.add("/c").unwrap();

        let removed = mgr.remove(1).unwrap();
        assert_eq!(removed.path, PathBuf::from("/b"));
        assert_eq!(mgr.entry(1).unwrap().path, PathBuf::from("/c"));
        assert!(matches!(mgr.remove(2), Err(MeshError::UnknownShare(2))));
    }

    #[test]
    fn set_path_enforces_dedup_across_rows() {
        let mut mgr = manager();
        mgr.add("/a").unwrap();
        mgr.add("/b").unwrap();

        assert!(matches!(
            mgr.set_path(1, "/a"),
            Err(MeshError::DuplicateShare(_))
        ));
        // Re-setting a row to its own path is not a duplicate.
        mgr.set_path(1, "/b").unwrap();
    }

    #[test]
    fn every_mutation_bumps_revision_once() {
        let mut mgr = manager();
        let rx = mgr.subscribe();
        assert_eq!(*rx.borrow(), 0);

        mgr.add("/a").unwrap();
        assert_eq!(mgr.revision(), 1);

        mgr.set_flags(0, ShareFlags::BROWSABLE).unwrap();
        assert_eq!(mgr.revision(), 2);

        mgr.set_virtual_name(0, "stuff").unwrap();
        mgr.set_groups(0, vec![GroupId::new("g1")]).unwrap();
        mgr.remove(0).unwrap();
        assert_eq!(mgr.revision(), 5);
    }

    #[test]
    fn failed_mutation_does_not_bump() {
        let mut mgr = manager();
        mgr.add("/a").unwrap();
        let before = mgr.revision();

        let _ = mgr.add("/a");
        let _ = mgr.set_flags(9, ShareFlags::empty());
        assert_eq!(mgr.revision(), before);
    }

    #[test]
    fn add_paths_accepts_only_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir_a = tmp.path().join("a");
        let dir_b = tmp.path().join("b");
        std::fs::create_dir(&dir_a).unwrap();
        std::fs::create_dir(&dir_b).unwrap();
        let file = tmp.path().join("notes.txt");
        std::fs::write(&file, b"x").unwrap();

        let mut mgr = manager();
        let report = mgr.add_paths(vec![
            dir_a.clone(),
            dir_b,
            file.clone(),
            tmp.path().join("missing"),
            dir_a, // duplicate of the first
        ]);

        assert_eq!(report.added, 2);
        assert_eq!(report.rejected.len(), 2);
        assert!(report.rejected.contains(&file));
        assert_eq!(mgr.len(), 2);
        assert_eq!(mgr.revision(), 1);
    }

    #[tokio::test]
    async fn apply_then_reload_roundtrips() {
        let backend = Arc::new(MemoryShareStore::new());
        let mut mgr = ShareManager::new(Arc::clone(&backend) as Arc<dyn ShareBackend>);
        mgr.add("/srv/music").unwrap();
        mgr.set_virtual_name(0, "tunes").unwrap();
        mgr.apply().await.unwrap();

        let mut other = ShareManager::new(backend);
        other.reload().await.unwrap();
        assert_eq!(other.len(), 1);
        assert_eq!(other.entry(0).unwrap().virtual_name, "tunes");
    }

    #[tokio::test]
    async fn reload_discards_staged_edits() {
        let backend = Arc::new(MemoryShareStore::new());
        let mut mgr = ShareManager::new(backend);
        mgr.add("/srv/music").unwrap();
        mgr.apply().await.unwrap();

        mgr.add("/srv/uncommitted").unwrap();
        mgr.reload().await.unwrap();
        assert_eq!(mgr.len(), 1);
        assert_eq!(mgr.entry(0).unwrap().path, PathBuf::from("/srv/music"));
    }
}
