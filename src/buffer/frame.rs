use std::fs::File;
use std::sync::Arc;

use crate::page::{self, FileId, PageBuf, PageNo};

use super::FrameId;

/// One slot in the buffer pool. Frames live in a single arena
/// (`BufferManager::frames`); the free list, the LRU list and the hash
/// index never own a frame, they only hold its index and the intrusive
/// links below.
pub(super) struct Frame {
    pub file_id: FileId,
    pub page_no: PageNo,
    /// Cached handle for writeback, so evicting a page never has to go
    /// back through the PF file table to find its descriptor.
    pub file: Option<Arc<File>>,
    pub buf: PageBuf,
    pub pin_count: u32,
    pub dirty: bool,

    /// Doubly-linked LRU membership. `None` while the frame is free.
    pub lru_prev: Option<FrameId>,
    pub lru_next: Option<FrameId>,
    /// Singly-linked free-list membership. `None` while the frame is
    /// resident (or it's the last link in the free list).
    pub free_next: Option<FrameId>,
    /// Next frame in this hash bucket's collision chain.
    pub hash_next: Option<FrameId>,
}

impl Frame {
    pub fn empty() -> Self {
        Self {
            file_id: 0,
            page_no: 0,
            file: None,
            buf: page::zeroed(),
            pin_count: 0,
            dirty: false,
            lru_prev: None,
            lru_next: None,
            free_next: None,
            hash_next: None,
        }
    }

    /// Re-initializes a frame pulled from the free list or reclaimed from
    /// a victim: pin count 1, clean, identity set from the request.
    pub fn reinit(&mut self, file_id: FileId, page_no: PageNo, file: Arc<File>) {
        self.file_id = file_id;
        self.page_no = page_no;
        self.file = Some(file);
        self.pin_count = 1;
        self.dirty = false;
    }
}
