// src/crawl/driver.rs
// =============================================================================
// The crawl loop.
//
// How it works:
// 1. Fetch search results page N (starting at 1)
// 2. For every result entry, in page order:
//    - stop if we already have max_results records
//    - skip entries without a detail link
//    - fetch the detail page, extract a GuideRecord, keep it
//    - wait page_delay before the next entry
// 3. If the pagination block links to page N + 1, go to 1 with N + 1
//
// The crawl stops when:
// - page N would exceed max_pages
// - a results page has no entries
// - there is no link to the next page
// - max_results is reached (even in the middle of a page)
// - a request fails (we keep whatever we collected so far)
//
// Everything runs one request at a time. The delay is the only pause besides
// waiting for the network.
// =============================================================================

use super::fetch::PageFetcher;
use super::search::{ResultEntry, SearchPage};
use crate::config::{CrawlOptions, SiteConfig};
use crate::error::Result;
use crate::extract;
use crate::record::GuideRecord;
use tracing::{error, info, warn};

/// Why a crawl ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The next page number exceeds max_pages
    PageLimit,
    /// max_results records were collected
    ResultLimit,
    /// A results page had no entries
    EmptyPage,
    /// No link to the next page
    LastPage,
    /// A request failed; records collected before the failure are kept
    Aborted(String),
}

#[derive(Debug)]
pub struct CrawlReport {
    /// Records in page-then-entry order
    pub records: Vec<GuideRecord>,
    pub stop: StopReason,
    /// Search pages fetched successfully
    pub pages_visited: u32,
}

pub struct Crawler<F> {
    fetcher: F,
    site: SiteConfig,
}

// Mutable state of one crawl call
#[derive(Default)]
struct Progress {
    records: Vec<GuideRecord>,
    pages_visited: u32,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F, site: SiteConfig) -> Self {
        Self { fetcher, site }
    }

    // Crawls every search page for the given options
    //
    // Never fails: a transport error ends the crawl with StopReason::Aborted
    // and the records collected up to that point.
    pub async fn crawl(&self, options: &CrawlOptions) -> CrawlReport {
        let mut progress = Progress::default();

        let stop = match self.run(options, &mut progress).await {
            Ok(stop) => stop,
            Err(e) => {
                error!(
                    "Crawl aborted after {} record(s): {}",
                    progress.records.len(),
                    e
                );
                StopReason::Aborted(e.to_string())
            }
        };

        info!(
            "Crawl finished ({:?}): {} record(s) from {} page(s)",
            stop,
            progress.records.len(),
            progress.pages_visited
        );

        CrawlReport {
            records: progress.records,
            stop,
            pages_visited: progress.pages_visited,
        }
    }

    async fn run(&self, options: &CrawlOptions, progress: &mut Progress) -> Result<StopReason> {
        let mut page_number: u32 = 1;

        loop {
            if let Some(max_pages) = options.max_pages {
                if page_number > max_pages {
                    info!("Reached page limit: {}", max_pages);
                    return Ok(StopReason::PageLimit);
                }
            }

            info!("Fetching results page {}...", page_number);
            let url = self.site.search_page_url(page_number, options);
            let html = self.fetcher.fetch(&url).await?;
            let page = SearchPage::parse(&html);
            progress.pages_visited += 1;

            if page.entries.is_empty() {
                info!("No more results on page {}", page_number);
                return Ok(StopReason::EmptyPage);
            }

            for entry in &page.entries {
                if let Some(max_results) = options.max_results {
                    if progress.records.len() >= max_results {
                        info!("Reached result limit: {}", max_results);
                        return Ok(StopReason::ResultLimit);
                    }
                }

                match self.process_entry(entry).await {
                    Ok(Some(record)) => {
                        progress.records.push(record);
                        if progress.records.len() % 10 == 0 {
                            info!("Processed {} guides...", progress.records.len());
                        }
                    }
                    Ok(None) => {}
                    Err(e) if e.is_transport() => return Err(e),
                    Err(e) => error!("Dropping guide after unexpected error: {}", e),
                }

                tokio::time::sleep(options.page_delay).await;
            }

            if !page.has_next_page(page_number) {
                info!("Page {} is the last page", page_number);
                return Ok(StopReason::LastPage);
            }

            page_number += 1;
        }
    }

    // Fetches and extracts one result entry
    //
    // Returns Ok(None) when the entry has no usable detail link.
    async fn process_entry(&self, entry: &ResultEntry) -> Result<Option<GuideRecord>> {
        let Some(href) = entry.detail_href.as_deref() else {
            return Ok(None);
        };

        let detail_url = match self.site.detail_url(href) {
            Ok(url) => url,
            Err(e) => {
                warn!("Skipping result entry: {}", e);
                return Ok(None);
            }
        };

        info!("Processing guide at: {}", detail_url);
        let html = self.fetcher.fetch(&detail_url).await?;

        Ok(Some(extract::extract(&html, detail_url.as_str())))
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is Crawler generic over F?
//    - F is "some type that implements PageFetcher"
//    - In production it is HttpFetcher, in tests an in-memory FixtureFetcher
//    - The compiler generates a copy of the code for each F (no runtime cost)
//
// 2. Why does crawl() return a report instead of Result?
//    - A failed request should not throw away the guides we already have
//    - The error becomes StopReason::Aborted, the records are still returned
//
// 3. What is `Err(e) if e.is_transport()`?
//    - A match guard: the arm only matches when the condition is true
//    - Transport errors end the crawl, anything else only drops one guide
//
// 4. What is `let ... else`?
//    - `let Some(href) = x else { return ... };` binds href or leaves early
//    - Keeps the happy path unindented
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use url::Url;

    const SEARCH_URL: &str = "https://sernatur.test/nueva_busqueda.php";
    const BASE_URL: &str = "https://sernatur.test";

    // Serves canned pages and remembers every URL it was asked for.
    // Unknown URLs answer like a server returning 404.
    #[derive(Default)]
    struct FixtureFetcher {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PageFetcher for FixtureFetcher {
        async fn fetch(&self, url: &Url) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| ScrapeError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    fn site() -> SiteConfig {
        SiteConfig::new(SEARCH_URL, BASE_URL).unwrap()
    }

    fn options() -> CrawlOptions {
        CrawlOptions {
            page_delay: Duration::ZERO,
            ..CrawlOptions::default()
        }
    }

    fn search_url(page: u32) -> String {
        site().search_page_url(page, &options()).to_string()
    }

    fn detail_url(id: u32) -> String {
        format!("{}/detalle.php?id={}", BASE_URL, id)
    }

    // A results page with one entry per id and, optionally, a link to `next`
    fn results_page(ids: &[u32], next: Option<u32>) -> String {
        let mut html = String::from("<html><body>");
        for id in ids {
            html.push_str(&format!(
                r#"<div class="main_caja"><h3>Guía {id}</h3><a class="sig" href="/detalle.php?id={id}">Ver más</a></div>"#
            ));
        }
        if let Some(next) = next {
            html.push_str(&format!(
                r##"<div id="paginacion"><a href="#">{}</a><a href="?page={next}">{next}</a></div>"##,
                next - 1
            ));
        }
        html.push_str("</body></html>");
        html
    }

    fn detail_page(id: u32) -> String {
        format!(
            r#"<h4 class="nombre tituloperfil">Guía {id}</h4><p>Comuna: Comuna {id}</p>"#
        )
    }

    // Builds a fixture from (page number, ids, next page) triples plus all detail pages
    fn fixture(pages: &[(u32, Vec<u32>, Option<u32>)]) -> FixtureFetcher {
        let mut fetcher = FixtureFetcher::default();
        for (page, ids, next) in pages {
            fetcher.pages.insert(search_url(*page), results_page(ids, *next));
            for id in ids {
                fetcher.pages.insert(detail_url(*id), detail_page(*id));
            }
        }
        fetcher
    }

    fn names(report: &CrawlReport) -> Vec<String> {
        report
            .records
            .iter()
            .map(|r| r.personal_info.name.clone().unwrap_or_default())
            .collect()
    }

    #[tokio::test]
    async fn test_two_pages_in_order() {
        let fetcher = fixture(&[(1, vec![1, 2, 3], Some(2)), (2, vec![4], None)]);
        let crawler = Crawler::new(fetcher, site());

        let report = crawler.crawl(&options()).await;

        assert_eq!(names(&report), vec!["Guía 1", "Guía 2", "Guía 3", "Guía 4"]);
        assert_eq!(report.records[3].detail_url, detail_url(4));
        assert_eq!(report.records[3].location.comuna.as_deref(), Some("Comuna 4"));
        assert_eq!(report.stop, StopReason::LastPage);
        assert_eq!(report.pages_visited, 2);
    }

    #[tokio::test]
    async fn test_max_results_truncates_mid_page() {
        let fetcher = fixture(&[(1, vec![1, 2, 3], Some(2)), (2, vec![4], None)]);
        let crawler = Crawler::new(fetcher, site());
        let opts = CrawlOptions {
            max_results: Some(2),
            ..options()
        };

        let report = crawler.crawl(&opts).await;

        assert_eq!(names(&report), vec!["Guía 1", "Guía 2"]);
        assert_eq!(report.stop, StopReason::ResultLimit);
        let requests = crawler.fetcher.requests.lock().unwrap();
        assert!(!requests.contains(&detail_url(3)));
    }

    #[tokio::test]
    async fn test_max_results_across_pages() {
        let fetcher = fixture(&[(1, vec![1, 2, 3], Some(2)), (2, vec![4, 5, 6], None)]);
        let crawler = Crawler::new(fetcher, site());
        let opts = CrawlOptions {
            max_results: Some(4),
            ..options()
        };

        let report = crawler.crawl(&opts).await;

        assert_eq!(report.records.len(), 4);
        assert_eq!(report.stop, StopReason::ResultLimit);
    }

    #[tokio::test]
    async fn test_empty_page_stops_without_next_page() {
        let fetcher = fixture(&[(1, vec![], Some(2)), (2, vec![4], None)]);
        let crawler = Crawler::new(fetcher, site());

        let report = crawler.crawl(&options()).await;

        assert!(report.records.is_empty());
        assert_eq!(report.stop, StopReason::EmptyPage);
        assert_eq!(*crawler.fetcher.requests.lock().unwrap(), vec![search_url(1)]);
    }

    #[tokio::test]
    async fn test_max_pages_stops_before_next_page() {
        let fetcher = fixture(&[(1, vec![1, 2], Some(2)), (2, vec![3], None)]);
        let crawler = Crawler::new(fetcher, site());
        let opts = CrawlOptions {
            max_pages: Some(1),
            ..options()
        };

        let report = crawler.crawl(&opts).await;

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.stop, StopReason::PageLimit);
        assert!(!crawler.fetcher.requests.lock().unwrap().contains(&search_url(2)));
    }

    #[tokio::test]
    async fn test_entries_without_detail_link_are_skipped() {
        let mut fetcher = fixture(&[]);
        let html = r#"<div class="main_caja"><a class="sig" href="/detalle.php?id=1">Ver</a></div>
               <div class="main_caja"><p>Sin enlace</p></div>
               <div class="main_caja"><a class="sig" href="http://[roto">Ver</a></div>
               <div class="main_caja"><a class="sig" href="/detalle.php?id=2">Ver</a></div>"#
            .to_string();
        fetcher.pages.insert(search_url(1), html);
        fetcher.pages.insert(detail_url(1), detail_page(1));
        fetcher.pages.insert(detail_url(2), detail_page(2));
        let crawler = Crawler::new(fetcher, site());

        let report = crawler.crawl(&options()).await;

        assert_eq!(names(&report), vec!["Guía 1", "Guía 2"]);
        assert_eq!(report.stop, StopReason::LastPage);
    }

    #[tokio::test]
    async fn test_failed_detail_fetch_aborts_with_partial_results() {
        let mut fetcher = fixture(&[(1, vec![1, 2, 3], None)]);
        fetcher.pages.remove(&detail_url(2));
        let crawler = Crawler::new(fetcher, site());

        let report = crawler.crawl(&options()).await;

        assert_eq!(names(&report), vec!["Guía 1"]);
        assert!(matches!(report.stop, StopReason::Aborted(_)));
        assert!(!crawler.fetcher.requests.lock().unwrap().contains(&detail_url(3)));
    }

    // With the clock paused, tokio jumps straight to each sleep's deadline,
    // so elapsed time counts the delays and nothing else.
    #[tokio::test(start_paused = true)]
    async fn test_delay_follows_every_entry_including_skipped_ones() {
        let mut fetcher = fixture(&[]);
        let html = r#"<div class="main_caja"><a class="sig" href="/detalle.php?id=1">Ver</a></div>
               <div class="main_caja"><p>Sin enlace</p></div>"#
            .to_string();
        fetcher.pages.insert(search_url(1), html);
        fetcher.pages.insert(detail_url(1), detail_page(1));
        let crawler = Crawler::new(fetcher, site());
        let delay = Duration::from_millis(200);
        let opts = CrawlOptions {
            page_delay: delay,
            ..options()
        };

        let start = tokio::time::Instant::now();
        let report = crawler.crawl(&opts).await;
        let elapsed = start.elapsed();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.stop, StopReason::LastPage);
        // Timer deadlines round up to the next millisecond tick
        assert!(elapsed >= delay * 2, "elapsed {:?}", elapsed);
        assert!(elapsed < delay * 2 + Duration::from_millis(5), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_after_abort() {
        let mut fetcher = fixture(&[(1, vec![1, 2], None)]);
        fetcher.pages.remove(&detail_url(1));
        let crawler = Crawler::new(fetcher, site());
        let opts = CrawlOptions {
            page_delay: Duration::from_secs(1),
            ..options()
        };

        let start = tokio::time::Instant::now();
        let report = crawler.crawl(&opts).await;

        assert!(matches!(report.stop, StopReason::Aborted(_)));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_failed_search_page_keeps_earlier_pages() {
        let mut fetcher = fixture(&[(1, vec![1, 2], Some(2))]);
        fetcher.pages.remove(&search_url(2));
        let crawler = Crawler::new(fetcher, site());

        let report = crawler.crawl(&options()).await;

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.pages_visited, 1);
        match report.stop {
            StopReason::Aborted(msg) => assert!(msg.contains("404")),
            other => panic!("expected abort, got {:?}", other),
        }
    }
}
