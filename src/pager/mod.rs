//! PF — a thin file abstraction layered on BF: a file header, append-only
//! page allocation, and per-file iteration, with its own open-file table
//! translating file-relative requests into BF calls.

mod file_table;
mod header;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};

use crate::buffer::{BufRequest, BufferManager};
use crate::config::Config;
use crate::errors::Error;
use crate::page::{FileId, PageBuf, PageNo};
use crate::printdbg;

use file_table::{FileTable, OpenFile};
use header::Header;

/// In/out cursor for `get_first_page`/`get_next_page`. Signed and
/// starting one below the first valid page (`-1`) so `get_first_page` is
/// exactly `get_next_page` from `-1`.
pub type PageCursor = i64;

pub struct PagedFileManager {
    config: Config,
    buffer: BufferManager,
    file_table: FileTable,
}

impl PagedFileManager {
    /// `PF_Init`: builds the open-file table and, internally, the shared
    /// buffer manager every open file draws frames from.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            buffer: BufferManager::new(config),
            file_table: FileTable::new(config.max_open_files),
        }
    }

    fn entry(&self, fd: FileId) -> Result<&OpenFile> {
        if !self.file_table.valid_fd(fd) {
            bail!(Error::Fd);
        }
        self.file_table.get(fd).ok_or(Error::FileNotOpen.into())
    }

    /// `Create`: fails if the name already exists; otherwise creates the
    /// file and writes a fresh zero-page header directly (bypassing BF —
    /// the header is never cached as a buffer frame, only ever read/
    /// written once per open/close).
    pub fn create(&mut self, name: &str) -> Result<()> {
        let path = Path::new(name);
        if crate::disk::exists(path) {
            bail!(Error::FileExists);
        }

        let file = crate::disk::create(path, self.config.create_mode)?;
        crate::disk::write_page(&file, 0, &Header::default().to_page())?;

        printdbg!("created paged file {name}");
        Ok(())
    }

    /// `Destroy`: refuses while any table slot still has the name open.
    pub fn destroy(&mut self, name: &str) -> Result<()> {
        if self.file_table.is_open(name) {
            bail!(Error::FileOpen);
        }
        crate::disk::remove(Path::new(name))?;
        printdbg!("destroyed paged file {name}");
        Ok(())
    }

    /// `Open`: claims a file-table slot, reads the header eagerly, and
    /// hands back the slot index as the PF file descriptor.
    pub fn open(&mut self, name: &str) -> Result<FileId> {
        let path = Path::new(name);
        let file = crate::disk::open(path)?;
        let inode = crate::disk::inode(&file)?;

        let mut header_page = crate::page::zeroed();
        crate::disk::read_page(&file, 0, &mut header_page)?;
        let header = Header::from_page(&header_page);

        let entry = OpenFile {
            inode,
            name: name.to_string(),
            file: Arc::new(file),
            header,
            header_changed: false,
        };

        let fd = self
            .file_table
            .install(entry)
            .ok_or(Error::FtabFull)?;

        printdbg!("opened {name} as fd {fd} ({} pages)", header.num_pages);
        Ok(fd)
    }

    /// `Close`: flushes every resident page of this file, conditionally
    /// rewrites the header, then lets the OS handle close as the entry's
    /// `Arc<File>` drops. A failed flush (e.g. a caller forgot to unpin
    /// something) leaves the slot open and surfaces the error — the file
    /// never gets into a "closed but some of its pages are still cached
    /// and pinned" state.
    pub fn close(&mut self, fd: FileId) -> Result<()> {
        if !self.file_table.valid_fd(fd) {
            bail!(Error::Fd);
        }
        if self.file_table.get(fd).is_none() {
            bail!(Error::FileNotOpen);
        }

        self.buffer.flush_buf(fd)?;

        let entry = self.file_table.take(fd).expect("checked above");
        if entry.header_changed {
            crate::disk::write_page(&entry.file, 0, &entry.header.to_page())?;
        }

        printdbg!("closed fd {fd} ({})", entry.name);
        Ok(())
    }

    /// `AllocPage`: appends a new page at the end of the file, marks it
    /// dirty (a freshly allocated page always needs writing back), and
    /// bumps `num_pages`. Returns pin count 1.
    pub fn alloc_page(&mut self, fd: FileId) -> Result<(PageNo, &mut PageBuf)> {
        let file = self.entry(fd)?.file.clone();
        let page_no = self.entry(fd)?.header.num_pages;
        let bf_page_no = page_no + 1; // page 0 on disk is always the header

        self.buffer.alloc_buf(BufRequest {
            file_id: fd,
            file,
            page_no: bf_page_no,
            dirty: false,
        })?;
        self.buffer.touch_buf(fd, bf_page_no)?;

        let entry = self
            .file_table
            .get_mut(fd)
            .expect("fd validated by entry() above");
        entry.header.num_pages += 1;
        entry.header_changed = true;

        printdbg!("allocated page {page_no} on fd {fd}");

        let buf = self.buffer.buf_mut(fd, bf_page_no)?;
        Ok((page_no, buf))
    }

    /// `GetFirstPage`: equivalent to `get_next_page` starting one below
    /// page 0.
    pub fn get_first_page(&mut self, fd: FileId) -> Result<(PageNo, &mut PageBuf)> {
        self.get_next_page(fd, -1)
    }

    /// `GetNextPage`: advances the cursor and delegates to `get_this_page`,
    /// failing with `EOF` once the advanced cursor reaches `num_pages`.
    pub fn get_next_page(&mut self, fd: FileId, page_no: PageCursor) -> Result<(PageNo, &mut PageBuf)> {
        let num_pages = self.entry(fd)?.header.num_pages;
        let next = page_no + 1;

        if next < 0 || next as u64 >= num_pages as u64 {
            bail!(Error::Eof);
        }

        let next_page_no = next as u32;
        let buf = self.get_this_page(fd, next_page_no)?;
        Ok((next_page_no, buf))
    }

    /// `GetThisPage`: validates the page is in range, then asks BF for it.
    pub fn get_this_page(&mut self, fd: FileId, page_no: PageNo) -> Result<&mut PageBuf> {
        let entry = self.entry(fd)?;
        if page_no >= entry.header.num_pages {
            bail!(Error::InvalidPage);
        }
        let file = entry.file.clone();

        self.buffer.get_buf(BufRequest {
            file_id: fd,
            file,
            page_no: page_no + 1,
            dirty: false,
        })
    }

    /// `DirtyPage`: requires the page to already be pinned.
    pub fn dirty_page(&mut self, fd: FileId, page_no: PageNo) -> Result<()> {
        let entry = self.entry(fd)?;
        if page_no >= entry.header.num_pages {
            bail!(Error::InvalidPage);
        }
        self.buffer.touch_buf(fd, page_no + 1)
    }

    /// `UnpinPage`: touches first if the caller says the page is dirty,
    /// then unpins.
    pub fn unpin_page(&mut self, fd: FileId, page_no: PageNo, dirty: bool) -> Result<()> {
        let entry = self.entry(fd)?;
        if page_no >= entry.header.num_pages {
            bail!(Error::InvalidPage);
        }
        if dirty {
            self.buffer.touch_buf(fd, page_no + 1)?;
        }
        self.buffer.unpin_buf(fd, page_no + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_path() -> String {
        std::env::temp_dir()
            .join(format!("pagestore-pf-{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned()
    }

    fn pf(max_frames: usize) -> PagedFileManager {
        PagedFileManager::new(Config::small(max_frames))
    }

    /// Basic alloc/read-back across a close/reopen cycle.
    #[test]
    fn basic_alloc_and_read_back() {
        let path = test_path();
        let mut mgr = pf(8);

        mgr.create(&path).unwrap();
        let fd = mgr.open(&path).unwrap();

        let (page_no, buf) = mgr.alloc_page(fd).unwrap();
        assert_eq!(page_no, 0);
        buf[0..4].copy_from_slice(b"ABCD");
        mgr.unpin_page(fd, 0, true).unwrap();
        mgr.close(fd).unwrap();

        let fd2 = mgr.open(&path).unwrap();
        let buf2 = mgr.get_this_page(fd2, 0).unwrap();
        assert_eq!(&buf2[0..4], b"ABCD");
        mgr.unpin_page(fd2, 0, false).unwrap();
        mgr.close(fd2).unwrap();
    }

    /// Eviction under a tight pool still preserves every page's
    /// last-written signature.
    #[test]
    fn eviction_preserves_signatures() {
        let path = test_path();
        let mut mgr = pf(3);
        mgr.create(&path).unwrap();
        let fd = mgr.open(&path).unwrap();

        for i in 0u8..5 {
            let (page_no, buf) = mgr.alloc_page(fd).unwrap();
            assert_eq!(page_no, i as u32);
            buf[0] = i + 1;
            mgr.unpin_page(fd, page_no, true).unwrap();
        }

        for i in 0u8..5 {
            let buf = mgr.get_this_page(fd, i as u32).unwrap();
            assert_eq!(buf[0], i + 1);
            mgr.unpin_page(fd, i as u32, false).unwrap();
        }

        mgr.close(fd).unwrap();
    }

    /// With a 2-frame pool, pinning two distinct pages and leaving both
    /// pinned exhausts the pool for a third distinct page.
    #[test]
    fn pin_exhaustion_fails_with_no_buf() {
        let path = test_path();
        let mut mgr = pf(2);
        mgr.create(&path).unwrap();
        let fd = mgr.open(&path).unwrap();

        mgr.alloc_page(fd).unwrap();
        mgr.unpin_page(fd, 0, true).unwrap();
        mgr.alloc_page(fd).unwrap();
        mgr.unpin_page(fd, 1, true).unwrap();
        mgr.alloc_page(fd).unwrap();
        mgr.unpin_page(fd, 2, true).unwrap();

        // Pin both frames in the pool on pages 0 and 1, without unpinning.
        mgr.get_this_page(fd, 0).unwrap();
        mgr.get_this_page(fd, 1).unwrap();

        // A third, distinct page has nowhere to go: no free frame, and no
        // unpinned victim to evict.
        let err = mgr.get_this_page(fd, 2).unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::NoBuf));
    }

    /// Double alloc rejection.
    #[test]
    fn double_alloc_without_eviction_is_rejected() {
        let path = test_path();
        let mut mgr = pf(4);
        mgr.create(&path).unwrap();
        let fd = mgr.open(&path).unwrap();

        mgr.alloc_page(fd).unwrap();
        // Page 0 is still pinned, so BF's hash lookup for the same
        // (fd, page) key during a second alloc attempt must reject it.
        let file = mgr.entry(fd).unwrap().file.clone();
        let err = mgr
            .buffer
            .alloc_buf(BufRequest {
                file_id: fd,
                file,
                page_no: 1,
                dirty: false,
            })
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::PageInBuf)
        );
    }

    /// Unpin underflow.
    #[test]
    fn unpin_underflow_is_rejected() {
        let path = test_path();
        let mut mgr = pf(4);
        mgr.create(&path).unwrap();
        let fd = mgr.open(&path).unwrap();

        mgr.alloc_page(fd).unwrap();
        mgr.unpin_page(fd, 0, false).unwrap();
        let err = mgr.unpin_page(fd, 0, false).unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::PageUnpinned)
        );
    }

    /// Flush excludes other files.
    #[test]
    fn flush_is_scoped_per_file() {
        let path_a = test_path();
        let path_b = test_path();
        let mut mgr = pf(8);

        mgr.create(&path_a).unwrap();
        mgr.create(&path_b).unwrap();
        let fd_a = mgr.open(&path_a).unwrap();
        let fd_b = mgr.open(&path_b).unwrap();

        mgr.alloc_page(fd_a).unwrap();
        mgr.unpin_page(fd_a, 0, true).unwrap();
        mgr.alloc_page(fd_b).unwrap();
        mgr.unpin_page(fd_b, 0, true).unwrap();

        mgr.close(fd_a).unwrap();

        // file B's page is untouched by A's flush/close.
        let buf = mgr.get_this_page(fd_b, 0).unwrap();
        assert_eq!(buf.len(), crate::config::PAGE_SIZE);
        mgr.unpin_page(fd_b, 0, false).unwrap();
        mgr.close(fd_b).unwrap();
    }

    #[test]
    fn header_integrity_across_close() {
        let path = test_path();
        let mut mgr = pf(4);
        mgr.create(&path).unwrap();
        let fd = mgr.open(&path).unwrap();

        for _ in 0..3 {
            let (page_no, _buf) = mgr.alloc_page(fd).unwrap();
            mgr.unpin_page(fd, page_no, true).unwrap();
        }
        mgr.close(fd).unwrap();

        let fd2 = mgr.open(&path).unwrap();
        assert_eq!(mgr.entry(fd2).unwrap().header.num_pages, 3);
        mgr.close(fd2).unwrap();
    }

    #[test]
    fn create_on_existing_name_fails() {
        let path = test_path();
        let mut mgr = pf(4);
        mgr.create(&path).unwrap();
        let err = mgr.create(&path).unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::FileExists));
    }

    #[test]
    fn destroy_while_open_fails() {
        let path = test_path();
        let mut mgr = pf(4);
        mgr.create(&path).unwrap();
        let fd = mgr.open(&path).unwrap();
        let err = mgr.destroy(&path).unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::FileOpen));
        mgr.close(fd).unwrap();
        mgr.destroy(&path).unwrap();
    }

    #[test]
    fn iteration_covers_every_page_once() {
        let path = test_path();
        let mut mgr = pf(8);
        mgr.create(&path).unwrap();
        let fd = mgr.open(&path).unwrap();

        for i in 0u8..4 {
            let (page_no, buf) = mgr.alloc_page(fd).unwrap();
            buf[0] = i;
            mgr.unpin_page(fd, page_no, true).unwrap();
        }

        let mut seen = Vec::new();
        let (mut page_no, buf) = mgr.get_first_page(fd).unwrap();
        seen.push(buf[0]);
        mgr.unpin_page(fd, page_no, false).unwrap();

        loop {
            match mgr.get_next_page(fd, page_no as PageCursor) {
                Ok((next, buf)) => {
                    seen.push(buf[0]);
                    mgr.unpin_page(fd, next, false).unwrap();
                    page_no = next;
                }
                Err(e) => {
                    assert_eq!(e.downcast_ref::<Error>(), Some(&Error::Eof));
                    break;
                }
            }
        }

        assert_eq!(seen, vec![0, 1, 2, 3]);
        mgr.close(fd).unwrap();
    }
}
