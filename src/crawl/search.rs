// src/crawl/search.rs
// =============================================================================
// Reading a search results page.
//
// A results page looks roughly like this:
//
//   <div class="main_caja"> ... <a class="sig" href="/detalle.php?id=1">Ver</a></div>
//   <div class="main_caja"> ... </div>
//   <div id="paginacion"><a href="...">1</a><a href="...">2</a> ...</div>
//
// We keep only what the driver needs: each result entry's detail link (if it
// has one) and the labels of the pagination links.
// =============================================================================

use scraper::{Html, Selector};

/// One `.main_caja` result entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    /// Raw `href` of the entry's `a.sig` link
    pub detail_href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub entries: Vec<ResultEntry>,
    pagination_labels: Vec<String>,
}

impl SearchPage {
    // Parses a search results page
    //
    // Our selectors are constants and known to be valid, so unwrap() is fine
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let entry_selector = Selector::parse(".main_caja").unwrap();
        let link_selector = Selector::parse("a.sig").unwrap();
        let pagination_selector = Selector::parse("#paginacion").unwrap();
        let page_link_selector = Selector::parse("a[href]").unwrap();

        let entries = document
            .select(&entry_selector)
            .map(|entry| ResultEntry {
                // Only the first a.sig counts; without an href it is no link at all
                detail_href: entry
                    .select(&link_selector)
                    .next()
                    .and_then(|link| link.value().attr("href"))
                    .map(str::to_string),
            })
            .collect();

        let pagination_labels = match document.select(&pagination_selector).next() {
            Some(pagination) => pagination
                .select(&page_link_selector)
                .map(|link| link.text().collect::<String>().trim().to_string())
                .collect(),
            None => Vec::new(),
        };

        Self {
            entries,
            pagination_labels,
        }
    }

    // True when the pagination block links to page `current + 1`
    //
    // The site only offers numeric page links, so we look for the label
    // "current + 1". Icon-only "next" links would not be detected.
    pub fn has_next_page(&self, current: u32) -> bool {
        let next = (current + 1).to_string();
        self.pagination_labels.iter().any(|label| *label == next)
    }
}
