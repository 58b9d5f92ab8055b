// src/logging.rs
// =============================================================================
// Logging setup for the binary.
//
// Library code only uses the `tracing` macros (info!, warn!, ...). Where the
// events go is decided here, once, at startup:
// - stderr, with colours, for the operator watching the run
// - logs/scraper_<timestamp>.log, plain text, for later inspection
//   (crawl runs only; `extract` is an offline helper and stays on stderr)
//
// RUST_LOG overrides the default level (e.g. RUST_LOG=sernatur_scraper=debug).
//
// Rust concepts:
// - Layers: tracing_subscriber stacks independent outputs on one registry
// - Option<Layer>: a None layer is simply skipped, so the file is optional
// =============================================================================

use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "sernatur_scraper=info";

// Where one run's log file goes: <log_dir>/scraper_<timestamp>.log
pub fn log_file_path(log_dir: &Path, timestamp: &str) -> PathBuf {
    log_dir.join(format!("scraper_{}.log", timestamp))
}

// Installs the global subscriber
//
// Parameters:
//   log_file: Some(path) also writes plain-text logs to that file (its
//             directory is created); None logs to stderr only
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating log directory {}", dir.display()))?;
            }
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("installing log subscriber")?;

    Ok(())
}
