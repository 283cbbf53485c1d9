//! Rule-based structural fallback parser.
//!
//! When the readability pass declines a page, this parser re-reads the same
//! markup with blunt structural rules: drop boilerplate subtrees, then prefer
//! prose-bearing blocks, then named content containers, then the whole body.
//! It systematically favors prose over chrome without needing any scoring.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::normalize::normalize;

/// Configuration for the structural fallback parser.
#[derive(Debug, Clone)]
pub struct StructuralConfig {
    /// A step's normalized output must exceed this many characters to be
    /// accepted; shorter output falls through to the next step.
    pub min_chars: usize,
}

impl Default for StructuralConfig {
    fn default() -> Self {
        Self { min_chars: 100 }
    }
}

/// Tags that never contribute visible article text.
const BOILERPLATE_TAGS: &[&str] =
    &["script", "style", "nav", "footer", "header", "iframe", "noscript", "template"];

/// Class/id tokens marking navigation, ads, and other chrome.
///
/// Anchored per token with optional `-`/`_` compounds, so `site-nav` and
/// `ad-banner` match while `madrid` and `gradient` do not.
static CHROME_HINTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:\w+[-_])?(nav\w*|menu\w*|footer\w*|header\w*|sidebar|sidenav|banner\w*|ads?|advert\w*|promo\w*|sponsor\w*|cookie\w*|consent|popup|modal|overlay|social|share\w*|breadcrumbs?|paginat\w*|pager)(?:[-_]\w+)*$",
    )
    .expect("chrome hint pattern")
});

static BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, h1, h2, h3, h4, h5, h6, li").expect("block selector"));

static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").expect("body selector"));

/// Main-content container selectors, probed in priority order.
static CONTAINERS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["article", "main", ".content", ".article", ".post", "#content", "#main"]
        .iter()
        .map(|s| Selector::parse(s).expect("container selector"))
        .collect()
});

/// True when an element is boilerplate by tag, hint, or `aria-hidden`.
fn is_boilerplate(element: ElementRef<'_>) -> bool {
    let value = element.value();

    if BOILERPLATE_TAGS.contains(&value.name()) {
        return true;
    }

    if value.attr("aria-hidden") == Some("true") {
        return true;
    }

    if let Some(id) = value.attr("id") {
        if CHROME_HINTS.is_match(id) {
            return true;
        }
    }

    if let Some(class) = value.attr("class") {
        if class.split_whitespace().any(|token| CHROME_HINTS.is_match(token)) {
            return true;
        }
    }

    false
}

/// True when any ancestor of the element is boilerplate.
fn under_boilerplate(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(is_boilerplate)
}

/// Subtree text with boilerplate subtrees excluded.
fn clean_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    out
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    if is_boilerplate(element) {
        return;
    }

    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_el) = ElementRef::wrap(child) {
            collect_text(child_el, out);
        }
    }
}

/// Extracts page text with structural rules, falling through three stages.
///
/// 1. Every `p`/`h1`–`h6`/`li` outside boilerplate, in document order.
/// 2. The first matching main-content container (`article`, `main`, then
///    common class/id conventions).
/// 3. All remaining `body` text as a last resort.
///
/// A stage's output is kept only if its normalized form exceeds
/// [`StructuralConfig::min_chars`]; otherwise the longest non-empty candidate
/// seen so far is returned as best effort for the caller's single
/// sufficiency check. Returns `None` only when every stage is empty.
pub fn extract_blocks(doc: &Html, config: &StructuralConfig) -> Option<String> {
    let mut best: Option<String> = None;

    let consider = |candidate: String, best: &mut Option<String>| -> Option<String> {
        let text = normalize(&candidate);
        if text.is_empty() {
            return None;
        }
        if text.chars().count() > config.min_chars {
            return Some(text);
        }
        if best.as_ref().is_none_or(|b| b.chars().count() < text.chars().count()) {
            *best = Some(text);
        }
        None
    };

    // Stage 1: prose-bearing blocks.
    let mut blocks = String::new();
    for element in doc.select(&BLOCKS) {
        if is_boilerplate(element) || under_boilerplate(element) {
            continue;
        }
        blocks.push_str(&clean_text(element));
        blocks.push(' ');
    }
    if let Some(text) = consider(blocks, &mut best) {
        return Some(text);
    }

    // Stage 2: named content containers, in priority order.
    for selector in CONTAINERS.iter() {
        if let Some(container) = doc.select(selector).next() {
            if let Some(text) = consider(clean_text(container), &mut best) {
                return Some(text);
            }
        }
    }

    // Stage 3: whole body.
    if let Some(body) = doc.select(&BODY).next() {
        if let Some(text) = consider(clean_text(body), &mut best) {
            return Some(text);
        }
    }

    best
}
