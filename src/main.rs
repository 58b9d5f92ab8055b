// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Load .env and parse command-line arguments
// 2. Set up logging (stderr, plus a log file per crawl run)
// 3. Dispatch to the subcommand handler
// 4. Exit with proper code (0 = records exported, 1 = nothing found, 2 = error)
//
// Rust concepts used:
// - async/await: reqwest is async, so the crawl runs on a tokio runtime
// - Result<T, E>: errors bubble up with ? and are reported once, here
// - match: one branch per subcommand
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - site and run settings
mod crawl; // src/crawl/ - search pages, detail fetches, crawl loop
mod error; // src/error.rs - typed errors
mod export; // src/export.rs - CSV output
mod extract; // src/extract/ - detail page field extraction
mod logging; // src/logging.rs - tracing subscriber setup
mod record; // src/record.rs - GuideRecord

// anyhow::Result lets us return any error type with ?; Context adds a
// human-readable "while doing X" to errors
use anyhow::{Context, Result};
// Local time for output and log file names (guias_turismo_20260101_120000.csv)
use chrono::Local;
// Parser trait enables the parse() method on our Cli struct
use clap::Parser;
use cli::{Cli, CrawlArgs, Commands};
use config::SiteConfig;
use crawl::{Crawler, HttpFetcher, StopReason};
use record::GuideRecord;
use std::path::Path;
// Logging macros; where the output goes is set up in logging.rs
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // The subscriber may not be installed yet, so print directly
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    // A missing .env file is fine
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();

    // The offline extract helper logs to stderr only
    let log_file = cli
        .command
        .writes_log_file()
        .then(|| logging::log_file_path(&cli.log_dir, &timestamp));
    logging::init(log_file.as_deref())?;
    if let Some(path) = &log_file {
        info!("Logging to {}", path.display());
    }

    let site = cli.site.to_config()?;

    match cli.command {
        Commands::Crawl(args) => handle_crawl(site, &args, &timestamp).await,
        Commands::Extract { file, url } => handle_extract(&file, &url),
    }
}

// Handles the 'crawl' subcommand
async fn handle_crawl(site: SiteConfig, args: &CrawlArgs, timestamp: &str) -> Result<i32> {
    let options = args.to_options();
    info!(
        "Crawling service type {} in region {} (delay {:?}, max pages {:?}, max results {:?})",
        options.service_type, options.region, options.page_delay, options.max_pages, options.max_results
    );

    // One HTTP client (and cookie session) for the whole run
    let fetcher = HttpFetcher::new(&site).context("building HTTP client")?;
    let crawler = Crawler::new(fetcher, site);

    // Never fails: a network error ends the crawl early with partial results
    let report = crawler.crawl(&options).await;

    if let StopReason::Aborted(reason) = &report.stop {
        warn!("Crawl stopped early, results are partial: {}", reason);
    }

    // No records means no file at all, not an empty CSV
    if report.records.is_empty() {
        warn!("No guides found");
        return Ok(1);
    }

    let path = args
        .output_dir
        .join(format!("guias_turismo_{}.csv", timestamp));
    export::save_csv(&report.records, &path)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.records)?);
    } else {
        print_table(&report.records);
    }

    info!(
        "Scraping complete. Found {} guides on {} page(s), saved to {}",
        report.records.len(),
        report.pages_visited,
        path.display()
    );
    Ok(0)
}

// Handles the 'extract' subcommand
fn handle_extract(file: &Path, url: &str) -> Result<i32> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;

    let record = extract::extract(&html, url);
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(0)
}

// Prints a short human-readable table of the collected guides
fn print_table(records: &[GuideRecord]) {
    println!("{:<35} {:<20} {:<18} {:<10}", "NAME", "COMUNA", "PHONE", "STATUS");
    println!("{}", "=".repeat(86));

    for record in records {
        let name = record.personal_info.name.as_deref().unwrap_or("-");
        let comuna = record.location.comuna.as_deref().unwrap_or("-");
        let phone = record.personal_info.phone.as_deref().unwrap_or("-");
        let status = record.registration.status.as_deref().unwrap_or("-");

        println!(
            "{:<35} {:<20} {:<18} {:<10}",
            truncate(name, 34),
            truncate(comuna, 19),
            phone,
            status
        );
    }

    println!();

    let with_email = records
        .iter()
        .filter(|r| r.personal_info.email.is_some())
        .count();
    let with_phone = records
        .iter()
        .filter(|r| r.personal_info.phone.is_some())
        .count();

    println!("📊 Summary:");
    println!("   📋 Guides: {}", records.len());
    println!("   📧 With email: {}", with_email);
    println!("   📞 With phone: {}", with_phone);
}

// Shortens text for display, counting characters (names carry accents)
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does main() not return Result?
//    - We want our own exit codes (0/1/2), not Rust's default of 1 on error
//    - run() returns Result<i32>; main turns it into a process exit code
//
// 2. What does bool::then do?
//    - `cond.then(|| value)` is Some(value) when cond is true, else None
//    - Here: a log file path for crawl runs, nothing for extract
//
// 3. Why {:#} when printing the error?
//    - anyhow's alternate format prints the whole context chain on one line
//    - e.g. "reading page.html: No such file or directory (os error 2)"
//
// 4. Why chars().count() in truncate()?
//    - len() counts bytes; "Ñ" is two bytes in UTF-8
//    - Slicing a String in the middle of a character would panic
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("Ñuñoa", 10), "Ñuñoa");
        assert_eq!(truncate("María José Fernández", 10), "María J...");
    }
}
