//! Dependency fetching.
//!
//! - `swift-build --fetch` clones every dependency named in `Package.toml`
//! - builds fetch first, then rewrite the lockfile

mod fetch;

pub use fetch::fetch;
