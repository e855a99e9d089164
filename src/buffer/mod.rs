//! BF — the fixed-capacity page cache. Owns every in-memory frame, admits
//! pages on demand, evicts under approximate LRU with pin-awareness, and
//! enforces at-most-one resident copy of any `(file, page)` pair.
//!
//! There is no global singleton behind a mutex here: a [`BufferManager`] is
//! a plain owned value, constructed with a [`Config`] and threaded through
//! by `&mut` by whoever drives it (normally
//! [`crate::pager::PagedFileManager`]) rather than exposed as global mutable
//! state.

mod frame;
mod free_list;
mod hash_index;
mod lru;

use std::fs::File;
use std::sync::Arc;

use anyhow::{bail, Result};

use crate::config::Config;
use crate::errors::Error;
use crate::page::{self, FileId, PageBuf, PageNo};
use crate::{get_caller_name, printdbg};

use frame::Frame;
use free_list::FreeList;
use hash_index::HashIndex;
use lru::Lru;

pub(crate) type FrameId = usize;

/// The request shape BF's public operations take: the frame's would-be
/// identity plus the OS handle to use for I/O. `dirty` is carried for
/// documentation only — BF itself never reads it, only PF sets it; the
/// actual dirty bit is only ever set by [`BufferManager::touch_buf`].
pub struct BufRequest {
    pub file_id: FileId,
    pub file: Arc<File>,
    pub page_no: PageNo,
    pub dirty: bool,
}

pub struct BufferManager {
    frames: Vec<Frame>,
    free_list: FreeList,
    lru: Lru,
    hash: HashIndex,
}

impl BufferManager {
    pub fn new(config: Config) -> Self {
        let mut frames: Vec<Frame> = (0..config.max_frames).map(|_| Frame::empty()).collect();
        let free_list = FreeList::new(&mut frames, config.max_frames);

        Self {
            frames,
            free_list,
            lru: Lru::new(),
            hash: HashIndex::new(config.hash_buckets),
        }
    }

    /// Pull a frame from the free list, or evict the LRU victim and write
    /// it back if it's dirty.
    fn find_free_frame(&mut self) -> Result<FrameId> {
        if let Some(id) = self.free_list.pop(&mut self.frames) {
            return Ok(id);
        }

        let victim = self
            .lru
            .find_victim(&self.frames)
            .ok_or(Error::NoBuf)?;

        if self.frames[victim].dirty {
            self.writeback(victim)?;
        }

        let (file_id, page_no) = (self.frames[victim].file_id, self.frames[victim].page_no);
        self.hash.remove(&mut self.frames, file_id, page_no);
        self.lru.detach_page(&mut self.frames, victim);

        printdbg!("evicted frame {victim} (file {file_id}, page {page_no}) for reuse");

        Ok(victim)
    }

    fn writeback(&mut self, id: FrameId) -> Result<()> {
        let frame = &self.frames[id];
        debug_assert!(frame.dirty, "writeback called on a clean frame");
        let file = frame
            .file
            .clone()
            .expect("resident frame must have a file handle");

        crate::disk::write_page(&file, frame.page_no, &frame.buf)?;
        self.frames[id].dirty = false;
        Ok(())
    }

    /// `GetBuf`. Hash hit re-heads and pins; hash miss admits a frame and
    /// reads the page from disk.
    pub fn get_buf(&mut self, req: BufRequest) -> Result<&mut PageBuf> {
        if let Some(id) = self.hash.get(&self.frames, req.file_id, req.page_no) {
            self.frames[id].pin_count += 1;
            self.lru.make_head(&mut self.frames, id);
            printdbg!(
                "{} hit: file {} page {} (frame {id}), pins={}",
                get_caller_name!(),
                req.file_id,
                req.page_no,
                self.frames[id].pin_count
            );
            return Ok(&mut self.frames[id].buf);
        }

        let id = self.find_free_frame()?;
        self.frames[id].reinit(req.file_id, req.page_no, req.file.clone());
        self.lru.add_page(&mut self.frames, id);

        let inserted = self.hash.insert(&mut self.frames, id);
        debug_assert!(inserted, "frame {id} already keyed in the hash index right after the absence check above");

        if let Err(e) = crate::disk::read_page(&req.file, req.page_no, &mut self.frames[id].buf) {
            self.hash.remove(&mut self.frames, req.file_id, req.page_no);
            self.lru.detach_page(&mut self.frames, id);
            self.free_list.push(&mut self.frames, id);
            return Err(e.into());
        }

        printdbg!(
            "{} miss: file {} page {} installed in frame {id}",
            get_caller_name!(),
            req.file_id,
            req.page_no
        );

        Ok(&mut self.frames[id].buf)
    }

    /// `AllocBuf`. As `get_buf`, but a hash hit is an error (the caller
    /// asserts the page doesn't exist yet) and no disk read happens — the
    /// caller is about to populate the page itself, so it's zeroed instead
    /// of left as whatever the evicted occupant left behind.
    pub fn alloc_buf(&mut self, req: BufRequest) -> Result<&mut PageBuf> {
        if self
            .hash
            .get(&self.frames, req.file_id, req.page_no)
            .is_some()
        {
            bail!(Error::PageInBuf);
        }

        let id = self.find_free_frame()?;
        self.frames[id].reinit(req.file_id, req.page_no, req.file.clone());
        self.frames[id].buf = page::zeroed();
        self.lru.add_page(&mut self.frames, id);

        let inserted = self.hash.insert(&mut self.frames, id);
        debug_assert!(inserted, "frame {id} already keyed in the hash index right after the absence check above");

        printdbg!(
            "{} allocated file {} page {} in frame {id}",
            get_caller_name!(),
            req.file_id,
            req.page_no
        );

        Ok(&mut self.frames[id].buf)
    }

    /// `UnpinBuf`. Never re-heads the LRU and never touches `dirty` —
    /// recency and dirtiness only move on an explicit `touch_buf`.
    pub fn unpin_buf(&mut self, file_id: FileId, page_no: PageNo) -> Result<()> {
        let id = self
            .hash
            .get(&self.frames, file_id, page_no)
            .ok_or(Error::PageNotInBuf)?;

        if self.frames[id].pin_count == 0 {
            bail!(Error::PageUnpinned);
        }
        self.frames[id].pin_count -= 1;

        printdbg!(
            "{} unpinned file {file_id} page {page_no} (frame {id}), pins={}",
            get_caller_name!(),
            self.frames[id].pin_count
        );

        Ok(())
    }

    /// `TouchBuf`. Marks dirty and promotes recency. Does NOT change the
    /// pin count: touch is purely a dirty-and-recency marker, never a
    /// second pin.
    pub fn touch_buf(&mut self, file_id: FileId, page_no: PageNo) -> Result<()> {
        let id = self
            .hash
            .get(&self.frames, file_id, page_no)
            .ok_or(Error::PageNotInBuf)?;

        if self.frames[id].pin_count == 0 {
            bail!(Error::PageUnpinned);
        }

        self.frames[id].dirty = true;
        self.lru.make_head(&mut self.frames, id);
        Ok(())
    }

    /// `FlushBuf`. Every resident frame belonging to `file_id` is written
    /// back if dirty and returned to the free list. Strict: any pinned
    /// frame among them fails the whole call with `PAGES_PINNED` before
    /// anything is mutated (a two-pass collect-then-act, since mutating the
    /// list while walking it is unsound).
    pub fn flush_buf(&mut self, file_id: FileId) -> Result<()> {
        let victims = self.lru.collect_for_file(&self.frames, file_id);

        if victims.iter().any(|&id| self.frames[id].pin_count > 0) {
            bail!(Error::PagesPinned);
        }

        for id in victims {
            if self.frames[id].dirty {
                self.writeback(id)?;
            }
            let (fid, page_no) = (self.frames[id].file_id, self.frames[id].page_no);
            self.hash.remove(&mut self.frames, fid, page_no);
            self.lru.detach_page(&mut self.frames, id);
            self.free_list.push(&mut self.frames, id);
        }

        printdbg!("flushed all resident pages for file {file_id}");

        Ok(())
    }

    /// Dump LRU order for manual inspection.
    pub(crate) fn debug_dump(&self) {
        self.lru.show(&self.frames);
    }

    /// Looks up an already-resident page without touching pin count or
    /// recency. Not part of BF's public contract; PF needs it to hand back
    /// a buffer reference after `alloc_buf` + `touch_buf` have already done
    /// their bookkeeping, since a Rust method can't return a borrow that
    /// outlives the two calls that set the frame up.
    pub(crate) fn buf_mut(&mut self, file_id: FileId, page_no: PageNo) -> Result<&mut PageBuf> {
        let id = self
            .hash
            .get(&self.frames, file_id, page_no)
            .ok_or(Error::PageNotInBuf)?;
        Ok(&mut self.frames[id].buf)
    }
}
