// src/extract/page.rs
// =============================================================================
// Turns a detail page's HTML into the two things the extractor reads:
// - the profile name heading (h4.nombre.tituloperfil)
// - the text of every <p> element, in document order
//
// We use the `scraper` crate, same as for the search pages in crawl::search.
// =============================================================================

use scraper::{ElementRef, Html, Selector};

/// The parts of a detail page the field extractor works on.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DetailPage {
    pub name: Option<String>,
    /// Trimmed text of each paragraph (may contain newlines)
    pub paragraphs: Vec<String>,
}

impl DetailPage {
    // Parses detail page HTML
    //
    // Our selectors are constants and known to be valid, so unwrap() is fine
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let name_selector = Selector::parse("h4.nombre.tituloperfil").unwrap();
        let paragraph_selector = Selector::parse("p").unwrap();

        let name = document
            .select(&name_selector)
            .next()
            .map(stripped_text)
            .filter(|name| !name.is_empty());

        let paragraphs = document
            .select(&paragraph_selector)
            .map(|p| p.text().collect::<String>().trim().to_string())
            .collect();

        Self { name, paragraphs }
    }
}

// Joins an element's text nodes, each trimmed ("<h4> Ana <b>Pérez</b></h4>" -> "AnaPérez")
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}
