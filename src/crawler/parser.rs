//! HTML parser for extracting links and page metadata
//!
//! This module handles parsing HTML content to extract:
//! - Links to follow (from `<a href>` tags)
//! - Image URLs (from `<img src>` tags)
//! - The first `<h1>` and the first body paragraph, for reporting

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    /// The URL the page was fetched from
    pub url: String,

    /// Text of the first `<h1>`, or empty
    pub heading: String,

    /// Text of the first `<p>` inside `<main>` (or anywhere, without `<main>`)
    pub first_paragraph: String,

    /// Absolute URLs of `<a href>` targets, in document order
    pub outgoing_links: Vec<String>,

    /// Absolute URLs of `<img src>` targets, in document order
    pub image_urls: Vec<String>,
}

/// Parses HTML content and extracts links, images and summary text
///
/// # Extraction Rules
///
/// - Relative references are resolved against `base_url`, not `page_url`
/// - Empty `href`/`src` attributes are skipped
/// - A reference that fails to resolve is skipped with a warning
/// - Only `http`/`https` targets are kept after resolution
/// - Fragment-only links are kept; they resolve to the base page
///
/// Parsing never fails: broken markup yields whatever the HTML5 parser
/// recovers, and missing elements yield empty strings.
///
/// # Example
///
/// ```
/// use ripple_scout::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><body><h1>Hi</h1><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let page = parse_html(html, "https://example.com/", &base_url);
/// assert_eq!(page.heading, "Hi");
/// assert_eq!(page.outgoing_links, vec!["https://example.com/page"]);
/// ```
pub fn parse_html(html: &str, page_url: &str, base_url: &Url) -> PageRecord {
    let document = Html::parse_document(html);

    PageRecord {
        url: page_url.to_string(),
        heading: extract_heading(&document),
        first_paragraph: extract_first_paragraph(&document),
        outgoing_links: extract_attribute_urls(&document, "a[href]", "href", base_url),
        image_urls: extract_attribute_urls(&document, "img[src]", "src", base_url),
    }
}

/// Convenience function for extracting just the links from HTML
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    extract_attribute_urls(&document, "a[href]", "href", base_url)
}

/// Convenience function for extracting just the image URLs from HTML
pub fn extract_images(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    extract_attribute_urls(&document, "img[src]", "src", base_url)
}

/// Extracts the text of the first `<h1>` in the document
fn extract_heading(document: &Html) -> String {
    first_text(document, "h1")
}

/// Extracts the first paragraph, preferring one inside `<main>`
///
/// When a `<main>` element exists only its paragraphs are considered, even if
/// it has none.
fn extract_first_paragraph(document: &Html) -> String {
    let has_main = Selector::parse("main")
        .map(|selector| document.select(&selector).next().is_some())
        .unwrap_or(false);

    if has_main {
        first_text(document, "main p")
    } else {
        first_text(document, "p")
    }
}

fn first_text(document: &Html, selector: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolves every `attribute` of the elements matching `selector`
fn extract_attribute_urls(
    document: &Html,
    selector: &str,
    attribute: &str,
    base_url: &Url,
) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attribute))
        .filter_map(|reference| resolve_reference(reference, base_url))
        .collect()
}

/// Resolves a reference to an absolute URL and validates it
///
/// Returns None if the reference should be excluded:
/// - empty references
/// - references that fail to resolve (logged)
/// - non-HTTP(S) URLs after resolution
fn resolve_reference(reference: &str, base_url: &Url) -> Option<String> {
    let reference = reference.trim();

    if reference.is_empty() {
        return None;
    }

    match base_url.join(reference) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(e) => {
            tracing::warn!("{}: {}", e, reference);
            None
        }
    }
}
