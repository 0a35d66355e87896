// src/crawler/visited.rs
// =============================================================================
// Concurrency-safe set of URLs already scheduled for crawling.
//
// The whole point of this type is the atomic check-and-insert: two tasks
// racing on the same URL must never both be told "you claimed it". That is
// what keeps a cyclic link graph from being crawled forever.
//
// URLs are never removed; the set is monotonic for the lifetime of one run.
// Each Crawler owns its own instance, so independent concurrent crawls in
// one process don't see each other.
// =============================================================================

use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    // Records `url` and returns true iff it was not already present.
    //
    // The test and the insert happen under one lock acquisition, so exactly
    // one caller wins a race. The lock never outlives this call and nothing
    // blocking happens inside it.
    pub fn try_claim(&self, url: &str) -> bool {
        let mut set = self.inner.lock().expect("visited set lock poisoned");
        set.insert(url.to_string())
    }
}
