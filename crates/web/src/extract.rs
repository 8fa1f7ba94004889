//! Readable text from HTML pages.
//!
//! Text is taken from the first container that yields any, in this order:
//! `article`, a main-content container, the first paragraphs, the body.
//! Boilerplate elements are skipped together with everything inside them.

use contextor_core::text::truncate_chars;
use scraper::{ElementRef, Html, Node, Selector};

const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "noscript",
];

const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "main",
    "[role=main]",
    "#content",
    ".content",
    "#main-content",
    ".main-content",
];

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(el) if SKIPPED_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, out);
                }
            }
            _ => {}
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    collapse_whitespace(&raw)
}

fn first_match_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn paragraphs_text(document: &Html, limit: usize) -> Option<String> {
    let selector = Selector::parse("p").ok()?;
    let text = document
        .select(&selector)
        .take(limit)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

/// The main readable text of `html`, at most `max_chars` characters plus
/// an ellipsis. `None` when the page has no text at all.
pub fn extract_text(html: &str, max_chars: usize, paragraph_limit: usize) -> Option<String> {
    let document = Html::parse_document(html);

    let text = first_match_text(&document, "article")
        .or_else(|| {
            MAIN_CONTENT_SELECTORS
                .iter()
                .find_map(|css| first_match_text(&document, css))
        })
        .or_else(|| paragraphs_text(&document, paragraph_limit))
        .or_else(|| first_match_text(&document, "body"))?;

    Some(truncate_chars(&text, max_chars))
}
