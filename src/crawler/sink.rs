// src/crawler/sink.rs
// =============================================================================
// Append-only log of discovered resource URLs, shared by all crawl tasks.
//
// Where records go:
// - With an output file configured: one URL per line, appended to the file.
//   The file is opened, written and closed per record, so an interrupted
//   crawl still leaves a valid partial file. A pre-existing file at the
//   path is deleted when the sink is built, so every run starts fresh.
// - Without: one URL per line on standard output.
//
// Verbose mode additionally echoes every record, and every error
// diagnostic, to the progress stream (stderr) regardless of sink target.
// Without verbose, errors are silently dropped and the crawl continues.
//
// Records are also kept in memory for the end-of-run summary and the
// optional JSON view.
// =============================================================================

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::Serialize;

// Which extraction rule matched the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Js,
    Json,
}

// A discovered resource URL whose verification fetch succeeded.
// Created once by a crawl task, appended once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRecord {
    pub url: String,
    pub kind: ResourceKind,
}

pub struct ResultSink {
    output: Option<PathBuf>,
    verbose: bool,
    // One lock serializes both the append and the in-memory push, so a
    // record is a single atomic event to concurrent observers.
    records: Mutex<Vec<ResourceRecord>>,
}

impl ResultSink {
    // Builds the sink, removing any stale output file from a prior run.
    pub fn new(output: Option<PathBuf>, verbose: bool) -> Result<Self> {
        if let Some(path) = &output {
            if path.exists() {
                fs::remove_file(path).with_context(|| {
                    format!("failed to remove old output file {}", path.display())
                })?;
            }
        }

        Ok(Self {
            output,
            verbose,
            records: Mutex::new(Vec::new()),
        })
    }

    // Thread-safe append of one verified resource URL.
    pub fn record(&self, url: &str, kind: ResourceKind) {
        let mut records = self.records.lock().expect("result sink lock poisoned");

        match &self.output {
            Some(path) => {
                if let Err(err) = append_line(path, url) {
                    eprintln!("Warning: failed to write {}: {}", path.display(), err);
                }
            }
            None => println!("{}", url),
        }

        if self.verbose {
            eprintln!("{}", url);
        }

        records.push(ResourceRecord {
            url: url.to_string(),
            kind,
        });
    }

    // Verbose-only diagnostic line on the progress stream.
    pub fn report_error(&self, message: &str) {
        if self.verbose {
            eprintln!("{}", message);
        }
    }

    // Verbose-only progress line.
    pub fn progress(&self, message: &str) {
        if self.verbose {
            eprintln!("{}", message);
        }
    }

    // Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<ResourceRecord> {
        self.records
            .lock()
            .expect("result sink lock poisoned")
            .clone()
    }
}

fn append_line(path: &Path, url: &str) -> std::io::Result<()> {
    let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", url)
}
