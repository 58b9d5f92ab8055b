// src/extract/mod.rs
// =============================================================================
// The field extractor: one detail page in, one GuideRecord out.
//
// Submodules:
// - page: HTML -> name heading + paragraph texts
// - fields: ordered line classification rules
// - phone: phone number cleanup
//
// Extraction never fails. Anything we cannot recognise is simply left as None
// in the record.
// =============================================================================

mod fields;
mod page;
mod phone;

use crate::record::{GuideRecord, GuideRecordBuilder};
use page::DetailPage;
use tracing::debug;

// Extracts a record from detail page HTML
pub fn extract(html: &str, detail_url: &str) -> GuideRecord {
    extract_page(&DetailPage::parse(html), detail_url)
}

// Extracts a record from an already parsed detail page
fn extract_page(page: &DetailPage, detail_url: &str) -> GuideRecord {
    let mut builder = GuideRecordBuilder::new();

    if let Some(name) = &page.name {
        builder.name(name.clone());
    }

    for paragraph in page.paragraphs.iter().filter(|p| !p.is_empty()) {
        for line in fields::paragraph_lines(paragraph) {
            if let Some(rule) = fields::classify_line(line, &mut builder) {
                debug!("{}: line matched '{}' rule", detail_url, rule);
            }
        }
    }

    builder.build(detail_url)
}
