// src/crawler/engine.rs
// =============================================================================
// The crawl engine: recursive traversal over a work queue.
//
// How it works:
// 1. Seed URLs are submitted as jobs on an unbounded channel
// 2. The dispatch loop receives jobs, claims each URL against the visited
//    set, acquires a scheduler permit, and spawns one task per claimed URL
// 3. A task fetches its page, extracts resources and links, verifies every
//    .js/.json URL with an independent fetch, records the survivors, and
//    submits in-prefix links back onto the channel as child jobs
// 4. The channel closes once every task has finished and nothing more can
//    be submitted; the dispatch loop ends and the crawl is done
//
// Scheduling:
// - The semaphore caps simultaneously active tasks at the configured limit;
//   seed-level and recursive jobs count identically
// - The dispatcher blocks on permit acquisition without polling, and holds
//   no lock and no permit of its own while waiting, so recursive submission
//   cannot deadlock the scheduler
//
// Scope:
// - A discovered link is followed iff its string starts with the URL of the
//   page it was found on, so the effective prefix narrows as the crawl
//   descends (the current page, not the original seed, is the baseline)
// =============================================================================

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::Semaphore;

use super::sink::{ResourceKind, ResourceRecord, ResultSink};
use super::visited::VisitedSet;
use crate::analyzer::{self, PageResources};
use crate::fetcher;

// How many verification fetches a single page's task may run at once.
const VERIFY_CONCURRENCY: usize = 8;

// Immutable per-run settings, shared read-only by every task.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Timeout applied to each individual fetch
    pub timeout: Duration,
    /// Maximum number of simultaneously active crawl tasks
    pub concurrency: usize,
    /// Echo progress and per-URL errors to stderr
    pub verbose: bool,
}

// One queued unit of traversal work.
//
// The job carries a sender for the work queue so the task processing it can
// submit children. The queue closes exactly when the last live job is
// dropped, which is what lets the dispatch loop detect completion without
// any bookkeeping.
struct CrawlJob {
    url: String,
    queue: UnboundedSender<CrawlJob>,
}

impl CrawlJob {
    fn submit_child(&self, url: String) {
        let job = CrawlJob {
            url,
            queue: self.queue.clone(),
        };
        // Fails only if the receiver is gone, which cannot happen while a
        // job is still being processed
        let _ = self.queue.send(job);
    }
}

pub struct Crawler {
    client: Client,
    visited: VisitedSet,
    sink: ResultSink,
    slots: Arc<Semaphore>,
}

impl Crawler {
    // The config is consumed here: its timeout lives on in the client, its
    // concurrency limit in the semaphore, its verbosity in the sink.
    pub fn new(config: RunConfig, output: Option<PathBuf>) -> Result<Self> {
        let client = fetcher::build_client(config.timeout)?;
        let slots = Arc::new(Semaphore::new(config.concurrency.max(1)));
        let sink = ResultSink::new(output, config.verbose)?;

        Ok(Self {
            client,
            visited: VisitedSet::new(),
            sink,
            slots,
        })
    }

    // Runs the crawl to exhaustion of the reachable, in-prefix URL graph.
    //
    // Transport errors never propagate out of their task; the only way this
    // returns is the work queue draining completely.
    pub async fn run(self: Arc<Self>, seeds: Vec<String>) {
        let (tx, mut rx) = mpsc::unbounded_channel();

        for url in seeds {
            let job = CrawlJob {
                url,
                queue: tx.clone(),
            };
            let _ = tx.send(job);
        }
        // Drop the dispatcher's own sender: from here on the queue stays
        // open only while jobs are alive inside it or inside tasks
        drop(tx);

        while let Some(job) = rx.recv().await {
            // Claiming: duplicates are silently skipped before they cost a
            // scheduler slot
            if !self.visited.try_claim(&job.url) {
                continue;
            }

            let permit = Arc::clone(&self.slots)
                .acquire_owned()
                .await
                .expect("scheduler semaphore closed");

            let crawler = Arc::clone(&self);
            tokio::spawn(async move {
                crawler.crawl_page(job).await;
                drop(permit);
            });
        }
    }

    // Everything recorded so far (used for the summary and the JSON view).
    pub fn records(&self) -> Vec<ResourceRecord> {
        self.sink.records()
    }

    // One claimed URL: fetch, analyze, verify, recurse.
    async fn crawl_page(&self, job: CrawlJob) {
        self.sink.progress(&format!("Crawling: {}", job.url));

        let html = match fetcher::fetch_page(&self.client, &job.url).await {
            Ok(body) => body,
            Err(err) => {
                self.sink
                    .report_error(&format!("Error crawling {}: {}", job.url, err));
                return;
            }
        };

        let resources = analyzer::extract_resources(&html, &job.url);

        self.verify_and_record(&resources).await;

        for link in resources.links {
            if link.starts_with(&job.url) {
                job.submit_child(link);
            }
        }
    }

    // Confirms reachability of every .js/.json URL and records the ones
    // that answer 2xx. A failed verification drops that single URL; it does
    // not abort the task. There is no cross-type or cross-page dedup of
    // records -- only traversal targets are deduplicated.
    async fn verify_and_record(&self, resources: &PageResources) {
        let candidates: Vec<(String, ResourceKind)> = resources
            .scripts
            .iter()
            .map(|url| (url.clone(), ResourceKind::Js))
            .chain(
                resources
                    .json_links
                    .iter()
                    .map(|url| (url.clone(), ResourceKind::Json)),
            )
            .collect();

        let mut checks = stream::iter(candidates.into_iter().map(|(url, kind)| {
            let client = self.client.clone();
            async move {
                let outcome = fetcher::verify_resource(&client, &url).await;
                (url, kind, outcome)
            }
        }))
        .buffer_unordered(VERIFY_CONCURRENCY);

        while let Some((url, kind, outcome)) = checks.next().await {
            match outcome {
                Ok(()) => self.sink.record(&url, kind),
                Err(err) => self
                    .sink
                    .report_error(&format!("Error downloading {}: {}", url, err)),
            }
        }
    }
}
