//! The OS surface BF/PF are layered on: `open`/`pread`/`pwrite`/`fstat`/
//! `unlink`, expressed through `std::fs` and the Unix file-descriptor
//! extension traits rather than a raw `libc` binding. `File::read_at`/
//! `write_at` are exactly `pread`/`pwrite` — they take an explicit offset
//! and don't move the file's cursor, which is what lets BF write back a
//! victim page without caring what PF's own read/write position is.

use std::fs::{File, OpenOptions};
use std::os::unix::fs::{MetadataExt, OpenOptionsExt};
use std::path::Path;

use crate::config::PAGE_SIZE;
use crate::errors::Error;
use crate::page::{PageBuf, PageNo};

/// `open(O_RDWR|O_CREAT, FILE_CREATE_MASK)`, failing if the file already
/// exists. Callers check existence with [`exists`] first so they can
/// report `FILE_EXISTS` instead of a generic OS failure.
pub fn create(path: &Path, mode: u32) -> Result<File, Error> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .mode(mode)
        .open(path)
        .map_err(|e| Error::FileOpenFail(e.to_string()))
}

/// `open(O_RDWR)` on an existing file.
pub fn open(path: &Path) -> Result<File, Error> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|e| Error::FileOpenFail(e.to_string()))
}

pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// `unlink`.
pub fn remove(path: &Path) -> Result<(), Error> {
    std::fs::remove_file(path).map_err(Error::from)
}

/// `fstat`, projected down to the inode number — the only field of the
/// stat struct the PF open-file entry cares about.
pub fn inode(file: &File) -> Result<u64, Error> {
    Ok(file.metadata().map_err(Error::from)?.ino())
}

/// `pread` of exactly one page at `page_no * PAGE_SIZE`. A short read fails
/// with `INCOMPLETE_READ` rather than handing back a partially populated
/// frame.
pub fn read_page(file: &File, page_no: PageNo, buf: &mut PageBuf) -> Result<(), Error> {
    use std::os::unix::fs::FileExt;
    let offset = page_no as u64 * PAGE_SIZE as u64;
    match file.read_at(buf, offset) {
        Ok(n) if n == PAGE_SIZE => Ok(()),
        Ok(_) => Err(Error::IncompleteRead),
        Err(_) => Err(Error::IncompleteRead),
    }
}

/// `pwrite` of exactly one page at `page_no * PAGE_SIZE`. A short write is
/// `INCOMPLETE_WRITE`.
pub fn write_page(file: &File, page_no: PageNo, buf: &PageBuf) -> Result<(), Error> {
    use std::os::unix::fs::FileExt;
    let offset = page_no as u64 * PAGE_SIZE as u64;
    match file.write_at(buf, offset) {
        Ok(n) if n == PAGE_SIZE => Ok(()),
        Ok(_) => Err(Error::IncompleteWrite),
        Err(_) => Err(Error::IncompleteWrite),
    }
}
