// src/analyzer.rs
// =============================================================================
// This module extracts resource and link URLs from page HTML.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// The analyzer is a pure function of the HTML text and the page's base URL.
// Malformed HTML never raises; html5ever recovers whatever well-formed tags
// it can, and the rest contributes nothing to the output.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

// Everything the crawler wants from one page, in document order:
// script sources ending in `.js`, anchor targets ending in `.json`,
// and every anchor target (the traversal frontier).
//
// `json_links` is a subset of `links`; the engine verifies the first two
// sequences and recurses over the third.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PageResources {
    pub scripts: Vec<String>,
    pub json_links: Vec<String>,
    pub links: Vec<String>,
}

// Extracts resource and link URLs from HTML content.
//
// Parameters:
//   html: the HTML content to parse
//   base_url: the URL of the page, used to resolve relative references
//
// Every href/src is resolved against base_url per standard URL-resolution
// rules (relative paths, protocol-relative, query and fragment preserved).
// Classification is a case-sensitive suffix match on the path component --
// no content-type sniffing, a link is what its trailing characters say.
//
// An unparseable base URL means relative references cannot be resolved, so
// the result is empty.
pub fn extract_resources(html: &str, base_url: &str) -> PageResources {
    let mut resources = PageResources::default();

    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(_) => return resources,
    };

    let document = Html::parse_document(html);

    // Both selectors are constants and known to be valid
    let script_selector = Selector::parse("script[src]").expect("valid selector");
    let anchor_selector = Selector::parse("a[href]").expect("valid selector");

    for element in document.select(&script_selector) {
        if let Some(src) = element.value().attr("src") {
            if let Ok(url) = base.join(src) {
                if url.path().ends_with(".js") {
                    resources.scripts.push(url.to_string());
                }
            }
        }
    }

    for element in document.select(&anchor_selector) {
        if let Some(href) = element.value().attr("href") {
            if let Ok(url) = base.join(href) {
                // Path component only, so `data.json?v=2` still counts
                // while `page?format=json` does not
                let is_json = url.path().ends_with(".json");
                let url = url.to_string();
                if is_json {
                    resources.json_links.push(url.clone());
                }
                resources.links.push(url);
            }
        }
    }

    resources
}
