// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - crawl:   scrape the registry and export a CSV
// - extract: run the field extractor on a saved detail page (debugging aid)
//
// Site settings (URLs, user agent, timeout) are global flags that can also
// come from SERNATUR_* environment variables or a .env file.
// =============================================================================

use crate::config::{
    CrawlOptions, SiteConfig, DEFAULT_DETAIL_BASE_URL, DEFAULT_SEARCH_URL, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, GUIDE_SERVICE_TYPE, METROPOLITAN_REGION,
};
use crate::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "sernatur-scraper",
    version,
    about = "Export the SERNATUR tourism-guide registry to CSV",
    long_about = "sernatur-scraper walks the public SERNATUR search results, visits every \
                  guide's detail page and exports name, contact, location and registration \
                  data as a CSV file."
)]
pub struct Cli {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Directory for run log files
    #[arg(long, global = true, default_value = "logs")]
    pub log_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct SiteArgs {
    /// Search results endpoint
    #[arg(long, global = true, env = "SERNATUR_BASE_URL", default_value = DEFAULT_SEARCH_URL)]
    pub base_url: String,

    /// Base URL that detail links are resolved against
    #[arg(long, global = true, env = "SERNATUR_DETAIL_BASE_URL", default_value = DEFAULT_DETAIL_BASE_URL)]
    pub detail_base_url: String,

    /// User-Agent header sent with every request
    #[arg(long, global = true, env = "SERNATUR_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "SERNATUR_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl SiteArgs {
    pub fn to_config(&self) -> Result<SiteConfig> {
        let mut site = SiteConfig::new(&self.base_url, &self.detail_base_url)?;
        site.user_agent = self.user_agent.clone();
        site.timeout = Duration::from_secs(self.timeout);
        Ok(site)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl the registry and export every guide found to CSV
    ///
    /// Example: sernatur-scraper crawl --region 5 --max-results 50
    Crawl(CrawlArgs),

    /// Extract fields from a saved detail page and print them as JSON
    ///
    /// Example: sernatur-scraper extract detalle.html
    Extract {
        /// HTML file of a guide's detail page
        file: PathBuf,

        /// URL to record as the page's origin
        #[arg(long, default_value = "")]
        url: String,
    },
}

impl Commands {
    // Only crawl runs keep a log file; extract is a quick offline check
    pub fn writes_log_file(&self) -> bool {
        matches!(self, Commands::Crawl(_))
    }
}

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Site's service type id (16 = tourism guides)
    #[arg(long, default_value_t = GUIDE_SERVICE_TYPE)]
    pub service_type: u32,

    /// Site's region id (13 = Región Metropolitana)
    #[arg(long, default_value_t = METROPOLITAN_REGION)]
    pub region: u32,

    /// Seconds to wait after each guide
    #[arg(long, default_value = "1", value_parser = parse_delay)]
    pub delay: Duration,

    /// Stop after this many result pages
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Stop after this many guides
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Where the CSV file is written
    #[arg(long, default_value = "data/csv")]
    pub output_dir: PathBuf,

    /// Print records as JSON instead of a summary table
    #[arg(long)]
    pub json: bool,
}

impl CrawlArgs {
    pub fn to_options(&self) -> CrawlOptions {
        CrawlOptions {
            service_type: self.service_type,
            region: self.region,
            page_delay: self.delay,
            max_pages: self.max_pages,
            max_results: self.max_results,
        }
    }
}

// Accepts any non-negative number of seconds that fits in a Duration
//
// Checking here means a value like 1e30 is a CLI error, not a panic later.
fn parse_delay(raw: &str) -> std::result::Result<Duration, String> {
    let secs: f64 = raw.parse().map_err(|_| format!("'{}' is not a number", raw))?;
    Duration::try_from_secs_f64(secs).map_err(|_| {
        format!("delay must be a non-negative number of seconds, got {}", raw)
    })
}
