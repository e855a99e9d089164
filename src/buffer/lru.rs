use crate::printdbg;

use super::frame::Frame;
use super::FrameId;

/// Doubly-linked intrusive list over resident frames. Head is
/// most-recently-touched, tail is least-recently-touched. Unpinned and
/// pinned frames coexist here; [`Lru::find_victim`] is what filters by
/// pin count.
pub(super) struct Lru {
    head: Option<FrameId>,
    tail: Option<FrameId>,
}

impl Lru {
    pub fn new() -> Self {
        Self {
            head: None,
            tail: None,
        }
    }

    /// Insert at head. Precondition: `id` is not currently in the list.
    pub fn add_page(&mut self, frames: &mut [Frame], id: FrameId) {
        frames[id].lru_prev = None;
        frames[id].lru_next = self.head;
        if let Some(old_head) = self.head {
            frames[old_head].lru_prev = Some(id);
        }
        self.head = Some(id);
        if self.tail.is_none() {
            self.tail = Some(id);
        }
    }

    /// Detach, wherever it is, and reinsert at head. Precondition: `id` is
    /// currently in the list.
    pub fn make_head(&mut self, frames: &mut [Frame], id: FrameId) {
        if self.head == Some(id) {
            return;
        }
        self.detach_page(frames, id);
        self.add_page(frames, id);
    }

    /// Remove `id` from the list. No-op on membership bookkeeping beyond
    /// unlinking; caller decides where the frame goes next.
    pub fn detach_page(&mut self, frames: &mut [Frame], id: FrameId) {
        let prev = frames[id].lru_prev.take();
        let next = frames[id].lru_next.take();

        match prev {
            Some(p) => frames[p].lru_next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => frames[n].lru_prev = prev,
            None => self.tail = prev,
        }
    }

    /// Scan from tail toward head; return the first unpinned frame: the
    /// strict least-recently-touched-and-unpinned tie-break — a pinned
    /// frame anywhere in the list is skipped without disturbing its
    /// position.
    pub fn find_victim(&self, frames: &[Frame]) -> Option<FrameId> {
        let mut cursor = self.tail;
        while let Some(id) = cursor {
            if frames[id].pin_count == 0 {
                return Some(id);
            }
            cursor = frames[id].lru_prev;
        }
        None
    }

    /// Every resident frame with `file_id == file_id`, tail to head. Used
    /// by `FlushBuf`, which must collect before it detaches — mutating the
    /// list while walking it would unlink nodes out from under the cursor.
    pub fn collect_for_file(&self, frames: &[Frame], file_id: crate::page::FileId) -> Vec<FrameId> {
        let mut out = Vec::new();
        let mut cursor = self.tail;
        while let Some(id) = cursor {
            if frames[id].file_id == file_id {
                out.push(id);
            }
            cursor = frames[id].lru_prev;
        }
        out
    }

    /// Debug dump of the LRU order, head to tail.
    pub fn show(&self, frames: &[Frame]) {
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let f = &frames[id];
            printdbg!(
                "frame {id}: file={} page={} pins={} dirty={}",
                f.file_id,
                f.page_no,
                f.pin_count,
                f.dirty
            );
            cursor = f.lru_next;
        }
    }
}
