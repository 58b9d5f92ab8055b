// src/crawl/fetch.rs
// =============================================================================
// Fetching pages over HTTP.
//
// The crawl driver only needs "give me the HTML behind this URL", so that is
// all the PageFetcher trait asks for. HttpFetcher is the real implementation;
// the driver tests plug in an in-memory one.
//
// HttpFetcher keeps one reqwest::Client for the whole run:
// - connections are reused between requests
// - cookies set by the site are sent back (like a browser session)
// - every request carries the same User-Agent
// =============================================================================

// SiteConfig carries the user agent and timeout for the client
use crate::config::SiteConfig;
use crate::error::{Result, ScrapeError};
// async fn in traits needs boxing to be object-safe; async_trait does it for us
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the body of `url`, or a transport error
    async fn fetch(&self, url: &Url) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(site: &SiteConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(site.user_agent.as_str())
            .cookie_store(true)
            .timeout(site.timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        debug!("GET {}", url);
        // `?` turns reqwest::Error into ScrapeError::Http (see error.rs)
        let response = self.client.get(url.clone()).send().await?;

        // A 404 or 500 still "succeeds" at the HTTP level, so check the status
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        debug!("Fetched {} bytes from {}", html.len(), url);
        Ok(html)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait for something this small?
//    - The crawl driver only depends on PageFetcher, not on reqwest
//    - Tests hand it canned HTML without any network access
//
// 2. Why Send + Sync on the trait?
//    - async_trait futures are Send by default, which needs &self: Send,
//      i.e. Self: Sync
//
// 3. What does cookie_store(true) do?
//    - reqwest remembers cookies the site sets and sends them back
//    - Like a browser session: every request after the first one carries them
//
// 4. Why clone the Url for get()?
//    - get() takes anything convertible into a Url by value
//    - Cloning a Url is a cheap string copy, and we still need `url` for logs
// -----------------------------------------------------------------------------
