// src/error.rs
// =============================================================================
// Typed errors for fetching pages and writing the export.
//
// The binary edge (main.rs) still uses anyhow::Result; these errors convert
// into anyhow automatically through `?`.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Connection, timeout or body read failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered, but not with a 2xx
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// A configured or scraped URL could not be parsed
    #[error("Invalid URL '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    // Transport failures end a crawl; everything else is local to one guide
    pub fn is_transport(&self) -> bool {
        matches!(self, ScrapeError::Http(_) | ScrapeError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
