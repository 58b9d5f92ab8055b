// src/crawl/mod.rs
// =============================================================================
// This module walks the registry's search results.
//
// Submodules:
// - fetch: HTTP access behind the PageFetcher trait
// - search: parsing of a results page (entries + pagination)
// - driver: the page-by-page crawl loop
//
// Politeness:
// - One request at a time
// - A configurable delay after every result entry
// =============================================================================

mod driver;
mod fetch;
mod search;

pub use driver::{Crawler, StopReason};
pub use fetch::HttpFetcher;
