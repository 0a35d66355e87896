// src/crawler/mod.rs
// =============================================================================
// This module contains the crawl engine and the state it shares across
// concurrent tasks.
//
// Submodules:
// - engine: work-queue dispatch loop, scheduler, per-URL task pipeline
// - visited: concurrency-safe set of URLs already scheduled
// - sink: thread-safe append-only log of verified resource URLs
// =============================================================================

mod engine;
mod sink;
mod visited;

// Re-export the public API so callers write `crawler::Crawler` instead of
// `crawler::engine::Crawler`
pub use engine::{Crawler, RunConfig};
pub use sink::{ResourceKind, ResourceRecord};
pub use visited::VisitedSet;
