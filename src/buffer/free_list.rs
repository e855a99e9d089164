use super::frame::Frame;
use super::FrameId;

/// Singly-linked intrusive list over frames that are not resident. Every
/// frame is in exactly one of {free list, LRU list} — `BufferManager`
/// arranges the transitions so that invariant never breaks.
pub(super) struct FreeList {
    head: Option<FrameId>,
}

impl FreeList {
    /// Links every frame `0..size` into the list, in order, so the first
    /// `pop` returns frame 0.
    pub fn new(frames: &mut [Frame], size: usize) -> Self {
        for i in 0..size {
            frames[i].free_next = if i + 1 < size { Some(i + 1) } else { None };
        }
        Self {
            head: if size > 0 { Some(0) } else { None },
        }
    }

    pub fn pop(&mut self, frames: &mut [Frame]) -> Option<FrameId> {
        let id = self.head?;
        self.head = frames[id].free_next.take();
        Some(id)
    }

    pub fn push(&mut self, frames: &mut [Frame], id: FrameId) {
        frames[id].free_next = self.head;
        self.head = Some(id);
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}
