use std::fmt;

/// Stable error taxonomy for the BF/PF core. Every fallible operation in
/// this crate fails with one of these kinds, wrapped in `anyhow::Error` so
/// callers that just want to propagate use `?` and callers that want to
/// branch on the kind use `error.downcast_ref::<Error>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid PF file descriptor (out of range or never opened).
    Fd,
    /// `Create` on a name that already exists.
    FileExists,
    /// `Destroy` on a name that is still open in the file table.
    FileOpen,
    /// Operation on a file table slot that isn't open.
    FileNotOpen,
    /// The OS refused to open/create the file.
    FileOpenFail(String),
    /// The PF file table has no free slot.
    FtabFull,
    /// Iteration moved past the last page.
    Eof,
    /// Page number out of range for the file.
    InvalidPage,
    /// `AllocBuf` on a page that is already resident.
    PageInBuf,
    /// Lookup for a page that is not resident.
    PageNotInBuf,
    /// Unpin/touch on a page whose pin count is already zero.
    PageUnpinned,
    /// `FlushBuf` encountered a frame that is still pinned.
    PagesPinned,
    /// Every frame is pinned; no victim is available.
    NoBuf,
    /// Read from disk returned fewer than `PAGE_SIZE` bytes.
    IncompleteRead,
    /// Write to disk wrote fewer than `PAGE_SIZE` bytes.
    IncompleteWrite,
    /// Any other OS-level failure, with the formatted `io::Error`.
    Unix(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Fd => write!(f, "invalid file descriptor"),
            Error::FileExists => write!(f, "file already exists"),
            Error::FileOpen => write!(f, "file is still open"),
            Error::FileNotOpen => write!(f, "file is not open"),
            Error::FileOpenFail(reason) => write!(f, "failed to open file: {reason}"),
            Error::FtabFull => write!(f, "file table is full"),
            Error::Eof => write!(f, "end of file"),
            Error::InvalidPage => write!(f, "invalid page number"),
            Error::PageInBuf => write!(f, "page is already in the buffer pool"),
            Error::PageNotInBuf => write!(f, "page is not in the buffer pool"),
            Error::PageUnpinned => write!(f, "page is already unpinned"),
            Error::PagesPinned => write!(f, "flush found pinned pages"),
            Error::NoBuf => write!(f, "no free buffer: all frames pinned"),
            Error::IncompleteRead => write!(f, "incomplete page read"),
            Error::IncompleteWrite => write!(f, "incomplete page write"),
            Error::Unix(reason) => write!(f, "OS error: {reason}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Unix(err.to_string())
    }
}

/// Renders an [`Error`] the way a host binary's `PrintError` would. This
/// crate does not terminate the process itself; that belongs to whatever
/// CLI surface links against it.
pub fn describe(err: &Error) -> String {
    format!("{err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_human_readable() {
        assert_eq!(describe(&Error::NoBuf), "no free buffer: all frames pinned");
        assert_eq!(describe(&Error::Fd), "invalid file descriptor");
    }

    #[test]
    fn composes_with_anyhow() {
        let err: anyhow::Error = Error::PageInBuf.into();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::PageInBuf));
    }
}
