use crate::config::PAGE_SIZE;

/// A small integer identifying an open PF file. Indexes the PF file table
/// and is passed through to BF as an opaque tag; BF only ever compares it
/// for equality as half of a hash key, never interprets it.
pub type FileId = usize;

/// A non-negative logical page number. Page 0 is the PF header page; PF
/// exposes user-visible pages starting at 1. BF itself is oblivious to
/// that convention and treats page numbers as flat offsets into the file.
pub type PageNo = u32;

/// The raw bytes of one page. Opaque to BF/PF except for the header page,
/// whose layout is interpreted by [`crate::pager::header`].
pub type PageBuf = [u8; PAGE_SIZE];

/// A zeroed page buffer, the contents new frames are reset to before a
/// caller fills them in (`AllocBuf`) or a disk read overwrites them
/// (`GetBuf`).
pub fn zeroed() -> PageBuf {
    [0u8; PAGE_SIZE]
}
