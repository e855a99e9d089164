//! A two-layer paged storage substrate: BF, a fixed-capacity page cache
//! with pin-aware approximate-LRU eviction, and PF, a thin paged-file
//! abstraction layered on top of it. See `buffer` and `pager`.
//!
//! There is no global state here — `buffer::BufferManager` and
//! `pager::PagedFileManager` are owned values a caller constructs and
//! drives directly, single-threaded-cooperative.

pub mod buffer;
pub mod config;
mod disk;
pub mod errors;
pub mod page;
pub mod pager;

/// Debug-only trace line, compiled out entirely in release builds. Stands
/// in for a logging framework: no `log`/`tracing` dependency, just
/// `println!` gated on `debug_assertions`.
#[macro_export]
macro_rules! printdbg {
    ($val: expr $(, $args: expr)*) => {
        #[cfg(debug_assertions)]
        println!($val $(, $args)*)
    };
}

/// Tags a `printdbg!` line with the caller's symbol name, resolved from
/// the current backtrace. Cheap enough for debug builds, never compiled
/// into release ones since it's only ever used inside `printdbg!`.
#[macro_export]
macro_rules! get_caller_name {
    () => {{
        let mut bt = backtrace::Backtrace::new_unresolved();
        bt.resolve();
        let frames = bt.frames();
        if frames.len() > 1 {
            let caller_frame = &frames[1];
            if let Some(symbol) = caller_frame.symbols().first() {
                if let Some(name) = symbol.name() {
                    name.to_string()
                } else {
                    "Unknown Caller".to_string()
                }
            } else {
                "Unknown Caller".to_string()
            }
        } else {
            "No Caller Found".to_string()
        }
    }};
}
