// src/config.rs
// =============================================================================
// Site and run configuration.
//
// SiteConfig describes WHERE we scrape (search endpoint, detail pages, how we
// present ourselves to the server). CrawlOptions describes WHAT one run asks
// for (service type, region, politeness delay, limits).
//
// Defaults match the live SERNATUR site; the CLI can override every value,
// either by flag or by SERNATUR_* environment variables (see cli.rs).
// =============================================================================

use crate::error::{Result, ScrapeError};
use std::time::Duration;
use url::Url;

pub const DEFAULT_SEARCH_URL: &str = "https://serviciosturisticos.sernatur.cl/nueva_busqueda.php";
pub const DEFAULT_DETAIL_BASE_URL: &str = "https://serviciosturisticos.sernatur.cl";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Service type id for tourism guides
pub const GUIDE_SERVICE_TYPE: u32 = 16;
/// Region id for Región Metropolitana
pub const METROPOLITAN_REGION: u32 = 13;

#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub search_url: Url,
    pub detail_base_url: Url,
    pub user_agent: String,
    pub timeout: Duration,
}

impl SiteConfig {
    // Builds a config from raw URL strings, keeping the default user agent and timeout
    pub fn new(search_url: &str, detail_base_url: &str) -> Result<Self> {
        Ok(Self {
            search_url: parse_url(search_url)?,
            detail_base_url: parse_url(detail_base_url)?,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    // URL of search results page `page` for the given run
    //
    // Example (page 2, guides in RM):
    //   .../nueva_busqueda.php?page=2&tipo_servicio=16&clase_servicio=0&region=13&comuna=0&nombre=&...
    pub fn search_page_url(&self, page: u32, options: &CrawlOptions) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("page", &page.to_string())
            .append_pair("tipo_servicio", &options.service_type.to_string())
            .append_pair("clase_servicio", "0")
            .append_pair("region", &options.region.to_string())
            .append_pair("comuna", "0")
            .append_pair("nombre", "")
            .append_pair("selloq", "")
            .append_pair("sellos", "")
            .append_pair("sellop", "")
            .append_pair("sellobp", "");
        url
    }

    // Resolves a detail link from a search result ("/detalle.php?id=1") into an absolute URL
    pub fn detail_url(&self, href: &str) -> Result<Url> {
        self.detail_base_url.join(href).map_err(|source| ScrapeError::Url {
            url: href.to_string(),
            source,
        })
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        // Both constants are valid absolute URLs
        Self::new(DEFAULT_SEARCH_URL, DEFAULT_DETAIL_BASE_URL).unwrap()
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|source| ScrapeError::Url {
        url: raw.to_string(),
        source,
    })
}

/// Parameters of one crawl.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Site's `tipo_servicio` query parameter
    pub service_type: u32,
    /// Site's `region` query parameter
    pub region: u32,
    /// Pause after every result entry
    pub page_delay: Duration,
    /// Stop before fetching search page `max_pages + 1`
    pub max_pages: Option<u32>,
    /// Stop once this many records were collected
    pub max_results: Option<usize>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            service_type: GUIDE_SERVICE_TYPE,
            region: METROPOLITAN_REGION,
            page_delay: Duration::from_secs(1),
            max_pages: None,
            max_results: None,
        }
    }
}
