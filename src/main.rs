// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Resolve seed URLs from flags and/or the input file
// 3. Build the crawler and run it to exhaustion
// 4. Print the optional JSON view and the verbose summary
// 5. Exit with proper code (0 = crawl completed, 2 = usage/setup error)
//
// Failed fetches never affect the exit code: a crawl that reaches the end
// of its URL graph exits 0 no matter how many URLs errored along the way.
// =============================================================================

mod analyzer;
mod cli;
mod crawler;
mod fetcher;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use crawler::{Crawler, RunConfig};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    // clap itself exits with a usage message when no seed source is given;
    // this path handles everything that parses
    let cli = Cli::parse();

    let seeds = cli.resolve_seeds()?;
    if seeds.is_empty() {
        eprintln!("Error: no seed URLs found; provide -u/--url or a non-empty -i/--input file");
        return Ok(2);
    }

    let config = RunConfig {
        timeout: Duration::from_secs(cli.timeout),
        concurrency: cli.concurrency as usize,
        verbose: cli.verbose,
    };

    let crawler = Arc::new(Crawler::new(config, cli.output.clone())?);

    if cli.verbose {
        eprintln!(
            "🕷️  Crawling {} seed URL(s), up to {} page(s) at a time",
            seeds.len(),
            cli.concurrency
        );
    }

    Arc::clone(&crawler).run(seeds).await;

    let records = crawler.records();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    if cli.verbose {
        eprintln!("✅ Done: {} resource URL(s) recorded", records.len());
    }

    Ok(0)
}
