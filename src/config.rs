/// On-disk and in-memory page size, in bytes. Fixed at compile time: every
/// frame, every header, every `pread`/`pwrite` call is sized against this.
pub const PAGE_SIZE: usize = 4096;

/// Runtime-tunable knobs for a [`crate::buffer::BufferManager`] /
/// [`crate::pager::PagedFileManager`] pair. `PAGE_SIZE` stays a `const`
/// above since frame buffers are fixed-size arrays; everything else here
/// can vary per instantiation (tests use small pools to exercise eviction).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of frames in the buffer pool (`BF_MAX_BUFS`).
    pub max_frames: usize,
    /// Number of hash buckets backing the `(file_id, page_no)` index
    /// (`BF_HASH_TBL_SIZE`). Should be prime and at least `max_frames`.
    pub hash_buckets: usize,
    /// Maximum number of concurrently open PF files (`PF_FTAB_SIZE`).
    pub max_open_files: usize,
    /// Mode bits passed to the OS on file creation (`FILE_CREATE_MASK`).
    pub create_mode: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_frames: 4096,
            hash_buckets: 4099, // smallest prime >= 4096
            max_open_files: 64,
            create_mode: 0o600,
        }
    }
}

impl Config {
    /// Config sized for eviction-heavy tests: a handful of frames so the
    /// LRU/free-list interplay actually gets exercised.
    #[cfg(test)]
    pub fn small(max_frames: usize) -> Self {
        Self {
            max_frames,
            hash_buckets: next_prime_at_least(max_frames.max(1)),
            ..Self::default()
        }
    }
}

#[cfg(test)]
fn next_prime_at_least(n: usize) -> usize {
    fn is_prime(n: usize) -> bool {
        if n < 2 {
            return false;
        }
        let mut i = 2;
        while i * i <= n {
            if n % i == 0 {
                return false;
            }
            i += 1;
        }
        true
    }
    let mut candidate = n;
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}
