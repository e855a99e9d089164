use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::page::{FileId, PageNo};

use super::frame::Frame;
use super::FrameId;

/// Open-hash table over `(file_id, page_no) -> frame`, fixed bucket
/// count, chaining on collision via each frame's `hash_next` link. A
/// frame is reachable from here iff it is resident in the LRU list.
pub(super) struct HashIndex {
    buckets: Vec<Option<FrameId>>,
}

impl HashIndex {
    pub fn new(bucket_count: usize) -> Self {
        Self {
            buckets: vec![None; bucket_count.max(1)],
        }
    }

    fn bucket_of(&self, file_id: FileId, page_no: PageNo) -> usize {
        let mut hasher = DefaultHasher::new();
        (file_id, page_no).hash(&mut hasher);
        (hasher.finish() as usize) % self.buckets.len()
    }

    pub fn get(&self, frames: &[Frame], file_id: FileId, page_no: PageNo) -> Option<FrameId> {
        let mut cursor = self.buckets[self.bucket_of(file_id, page_no)];
        while let Some(id) = cursor {
            let f = &frames[id];
            if f.file_id == file_id && f.page_no == page_no {
                return Some(id);
            }
            cursor = f.hash_next;
        }
        None
    }

    /// Insert `id`, keyed on its current `file_id`/`page_no`. Returns
    /// `false` without mutating anything if the key is already present, so
    /// a double-insert leaves every structure untouched.
    pub fn insert(&mut self, frames: &mut [Frame], id: FrameId) -> bool {
        let (file_id, page_no) = (frames[id].file_id, frames[id].page_no);
        if self.get(frames, file_id, page_no).is_some() {
            return false;
        }
        let bucket = self.bucket_of(file_id, page_no);
        frames[id].hash_next = self.buckets[bucket];
        self.buckets[bucket] = Some(id);
        true
    }

    pub fn remove(&mut self, frames: &mut [Frame], file_id: FileId, page_no: PageNo) {
        let bucket = self.bucket_of(file_id, page_no);
        let mut cursor = self.buckets[bucket];
        let mut prev: Option<FrameId> = None;

        while let Some(id) = cursor {
            let next = frames[id].hash_next;
            if frames[id].file_id == file_id && frames[id].page_no == page_no {
                match prev {
                    Some(p) => frames[p].hash_next = next,
                    None => self.buckets[bucket] = next,
                }
                frames[id].hash_next = None;
                return;
            }
            prev = Some(id);
            cursor = next;
        }
    }
}
