// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI surface is a struct, clap generates the
// parsing code, and the doc comments below become the --help text.
//
// Seed URLs come from --url, from an input file, or both; clap's ArgGroup
// enforces that at least one source is given, so an invocation with no
// seeds exits non-zero with a usage message before any crawling.
// =============================================================================

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "js-harvest",
    version,
    about = "Crawl websites and collect reachable JavaScript and JSON resource URLs",
    long_about = "js-harvest recursively crawls pages under a seed URL's prefix, verifies every \
                  .js and .json resource it discovers with an independent fetch, and records the \
                  reachable ones to a file or to standard output."
)]
#[command(group(
    ArgGroup::new("seeds")
        .required(true)
        .multiple(true)
        .args(["urls", "input"])
))]
pub struct Cli {
    /// Seed URL(s) to crawl
    #[arg(short = 'u', long = "url", value_name = "URL", num_args = 1..)]
    pub urls: Vec<String>,

    /// File containing seed URLs, one per line
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// File to save discovered resource URLs (defaults to standard output)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Maximum number of pages crawled concurrently
    #[arg(
        short = 'c',
        long = "concurrency",
        value_name = "N",
        default_value_t = 2,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub concurrency: u64,

    /// Request timeout in seconds (5-15)
    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(5..=15)
    )]
    pub timeout: u64,

    /// Print all recorded resources as a JSON array when the crawl ends
    #[arg(long)]
    pub json: bool,

    /// Print progress and per-URL error diagnostics
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    // Collects seed URLs from --url values and, if given, the input file.
    //
    // File lines are trimmed of surrounding whitespace; blank lines are
    // skipped. No other validation happens here -- a malformed seed simply
    // fails its fetch later, non-fatally.
    pub fn resolve_seeds(&self) -> Result<Vec<String>> {
        let mut seeds = self.urls.clone();

        if let Some(path) = &self.input {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read seed file {}", path.display()))?;
            seeds.extend(
                contents
                    .lines()
                    .map(|line| line.trim().to_string())
                    .filter(|line| !line.is_empty()),
            );
        }

        Ok(seeds)
    }
}
