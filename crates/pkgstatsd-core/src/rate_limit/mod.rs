//! Rate limiter backends that need no external storage.
//!
//! The persistent backend lives in the stats sqlite adapter; the
//! always-allow backend lives next to the adapter trait in
//! `pkgstatsd-types`.

mod memory;

pub use memory::MemoryRateLimiter;

// vim: ts=4
