//! HTML-to-text content extraction.
//!
//! Strips non-content elements first, then resolves text in priority
//! order: an explicit user selector, ranked main-content heuristics, and
//! finally the full body. Keeping the output signal-dense matters because
//! everything extracted here is sent to the analysis model.

use scraper::{Html, Selector};

/// Elements removed before any text extraction.
const NON_CONTENT_SELECTORS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "svg",
    "img",
    "iframe",
    "nav",
    "header",
    "footer",
    "aside",
    "form",
    "button",
    "input",
    "select",
    "textarea",
    ".nav",
    ".navbar",
    ".menu",
    ".sidebar",
    ".footer",
    ".header",
    ".advertisement",
    ".ads",
    ".ad",
    ".social",
    ".share",
    ".cookie-banner",
    "#nav",
    "#header",
    "#footer",
    "#sidebar",
];

/// Ranked main-content containers, tried in order.
const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role='main']",
    "#content",
    "#main",
    ".content",
    ".main",
    ".post-content",
    ".entry-content",
    ".article-body",
];

/// Extract clean plain text from raw HTML.
///
/// When `selector` parses and matches at least one element with non-empty
/// rendered text, those elements' texts are returned joined by blank
/// lines - explicit user intent overrides the heuristics. An invalid or
/// non-matching selector falls through to the ranked main-content
/// containers, and those fall through to the full body text. Returns an
/// empty string only when nothing anywhere renders text; the caller is
/// responsible for treating short output as an unusable scrape.
pub fn extract_text(html: &str, selector: Option<&str>) -> String {
    let document = Html::parse_document(&strip_non_content(html));

    if let Some(raw_selector) = selector {
        if let Ok(parsed) = Selector::parse(raw_selector) {
            let matched: Vec<String> = document
                .select(&parsed)
                .map(|el| collapse_whitespace(&el.text().collect::<String>()))
                .filter(|text| !text.is_empty())
                .collect();
            if !matched.is_empty() {
                return matched.join("\n\n");
            }
        }
    }

    for candidate in MAIN_CONTENT_SELECTORS {
        let Ok(parsed) = Selector::parse(candidate) else {
            continue;
        };
        if let Some(el) = document.select(&parsed).next() {
            let text = collapse_whitespace(&el.text().collect::<String>());
            if !text.is_empty() {
                return text;
            }
        }
    }

    body_text(&document)
}

/// Remove non-content elements from an HTML string.
///
/// `scraper` documents are immutable, so removal works by locating each
/// unwanted element's serialized form and deleting it from the source
/// before the final parse.
fn strip_non_content(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut result = html.to_string();

    for selector_str in NON_CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            let element_html = element.html();
            if !element_html.is_empty() {
                result = result.replace(&element_html, "");
            }
        }
    }

    result
}

/// Full visible text of the document body (or the whole document when
/// there is no body element).
fn body_text(document: &Html) -> String {
    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            return collapse_whitespace(&body.text().collect::<String>());
        }
    }
    collapse_whitespace(&document.root_element().text().collect::<String>())
}

/// Collapse runs of whitespace into single spaces, preserving paragraph
/// breaks as single newlines.
fn collapse_whitespace(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            lines.push(collapsed);
        }
    }
    lines.join("\n")
}
