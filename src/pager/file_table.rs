use std::fs::File;
use std::sync::Arc;

use super::header::Header;
use crate::page::FileId;

/// One slot of the PF open-file table. `inode` is tracked even though
/// nothing in BF/PF reads it itself — it's there for a higher layer that
/// wants to recognize two names resolving to the same file.
pub(super) struct OpenFile {
    pub inode: u64,
    pub name: String,
    pub file: Arc<File>,
    pub header: Header,
    pub header_changed: bool,
}

/// Fixed-size open-file table, indexed by PF file descriptor. A slot's
/// `None`-ness doubles as its `valid` flag.
pub(super) struct FileTable {
    slots: Vec<Option<OpenFile>>,
}

impl FileTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
        }
    }

    pub fn valid_fd(&self, fd: FileId) -> bool {
        fd < self.slots.len()
    }

    pub fn is_open(&self, name: &str) -> bool {
        self.slots
            .iter()
            .flatten()
            .any(|entry| entry.name == name)
    }

    /// Claims the first free slot and installs `entry`. `None` if the
    /// table is full.
    pub fn install(&mut self, entry: OpenFile) -> Option<FileId> {
        let slot = self.slots.iter_mut().position(|s| s.is_none())?;
        self.slots[slot] = Some(entry);
        Some(slot)
    }

    pub fn get(&self, fd: FileId) -> Option<&OpenFile> {
        self.slots.get(fd).and_then(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, fd: FileId) -> Option<&mut OpenFile> {
        self.slots.get_mut(fd).and_then(|s| s.as_mut())
    }

    /// Invalidates the slot and hands back the entry so the caller can
    /// finish closing it (rewrite the header, let the `Arc<File>` drop).
    pub fn take(&mut self, fd: FileId) -> Option<OpenFile> {
        self.slots.get_mut(fd).and_then(|s| s.take())
    }
}
