//! # CLI Module
//!
//! Command-line entry points for the photo frame binary. `serve` runs the
//! web server; the `cache` commands are operator tooling over the
//! per-user cache namespaces on disk.

mod cache;
mod serve;

pub use cache::cache_clear;
pub use cache::cache_stats;
pub use serve::serve;
