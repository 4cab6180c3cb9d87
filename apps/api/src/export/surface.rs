//! The document surface: the set of visual trees currently attached to a
//! preview session (the live preview plus any temporary export or print copies).
//!
//! Temporary copies are attached through `attach_scoped`, whose guard detaches
//! the copy when dropped, on success and error paths alike.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::render::VisualTree;

pub type MountId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountRole {
    Preview,
    ExportClone,
    PrintOverlay,
}

#[derive(Debug)]
struct Mounted {
    role: MountRole,
    tree: VisualTree,
}

#[derive(Debug, Default)]
struct SurfaceInner {
    next_id: MountId,
    mounts: BTreeMap<MountId, Mounted>,
}

#[derive(Debug, Default)]
pub struct DocumentSurface {
    inner: Mutex<SurfaceInner>,
}

impl DocumentSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mount(&self, role: MountRole, tree: VisualTree) -> MountId {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.mounts.insert(id, Mounted { role, tree });
        id
    }

    /// Swaps the tree behind `id`. Returns false when nothing is mounted there.
    pub fn replace(&self, id: MountId, tree: VisualTree) -> bool {
        match self.lock().mounts.get_mut(&id) {
            Some(mounted) => {
                mounted.tree = tree;
                true
            }
            None => false,
        }
    }

    pub fn unmount(&self, id: MountId) -> Option<VisualTree> {
        self.lock().mounts.remove(&id).map(|m| m.tree)
    }

    /// Deep copy of the tree behind `id`.
    pub fn snapshot(&self, id: MountId) -> Option<VisualTree> {
        self.lock().mounts.get(&id).map(|m| m.tree.clone())
    }

    pub fn modify(&self, id: MountId, f: impl FnOnce(&mut VisualTree)) -> bool {
        match self.lock().mounts.get_mut(&id) {
            Some(mounted) => {
                f(&mut mounted.tree);
                true
            }
            None => false,
        }
    }

    pub fn read<T>(&self, id: MountId, f: impl FnOnce(&VisualTree) -> T) -> Option<T> {
        self.lock().mounts.get(&id).map(|m| f(&m.tree))
    }

    #[cfg(test)]
    pub fn count(&self, role: MountRole) -> usize {
        self.lock()
            .mounts
            .values()
            .filter(|m| m.role == role)
            .count()
    }

    #[cfg(test)]
    pub fn is_mounted(&self, id: MountId) -> bool {
        self.lock().mounts.contains_key(&id)
    }

    /// Attaches a temporary tree that is detached when the guard drops.
    pub fn attach_scoped(&self, role: MountRole, tree: VisualTree) -> ScopedMount<'_> {
        let id = self.mount(role, tree);
        debug!("Attached temporary {:?} mount {}", role, id);
        ScopedMount { surface: self, id }
    }
}

/// Guard for a temporary mount.
#[derive(Debug)]
pub struct ScopedMount<'a> {
    surface: &'a DocumentSurface,
    id: MountId,
}

impl ScopedMount<'_> {
    #[cfg(test)]
    pub fn id(&self) -> MountId {
        self.id
    }

    pub fn modify(&self, f: impl FnOnce(&mut VisualTree)) {
        self.surface.modify(self.id, f);
    }

    pub fn html_document(&self) -> Option<String> {
        self.surface.read(self.id, VisualTree::to_html_document)
    }
}

impl Drop for ScopedMount<'_> {
    fn drop(&mut self) {
        self.surface.unmount(self.id);
        debug!("Detached temporary mount {}", self.id);
    }
}
