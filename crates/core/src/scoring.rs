//! Content scoring for the readability pass.
//!
//! Candidate containers are scored by tag semantics, class/id naming hints,
//! text density, and link density. The highest-scoring container above the
//! acceptance threshold wins; everything here is pure and deterministic for
//! a given DOM.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

/// Tuning knobs for the scoring heuristic.
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Weight added when class/id naming suggests main content.
    pub positive_weight: f64,
    /// Weight added when class/id naming suggests chrome.
    pub negative_weight: f64,
    /// Cap on the text-length portion of the density score.
    pub max_char_density_score: f64,
    /// Cap on the comma-count portion of the density score.
    pub max_comma_density_score: f64,
    /// Characters of text per density point.
    pub chars_per_point: usize,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            positive_weight: 25.0,
            negative_weight: -25.0,
            max_char_density_score: 3.0,
            max_comma_density_score: 3.0,
            chars_per_point: 100,
        }
    }
}

/// Class/id hints that suggest an element holds main content.
static POSITIVE_HINTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|main|page|post|text|blog|story)")
        .expect("positive hint pattern")
});

/// Class/id hints that suggest chrome rather than content.
static NEGATIVE_HINTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(banner|breadcrumbs?|comment|disqus|extra|foot|header|menu|nav|related|rss|share|sidebar|sponsor|ad-break|pagination|pager|popup|promo|widget)",
    )
    .expect("negative hint pattern")
});

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("a selector"));

/// Concatenated text content of an element's subtree.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Base score from the tag name alone.
///
/// Semantic content containers score high, generic containers in the middle,
/// navigation and heading chrome below zero.
pub fn base_tag_score(element: ElementRef<'_>) -> f64 {
    match element.value().name() {
        "article" => 10.0,
        "main" => 10.0,
        "section" => 8.0,
        "div" => 5.0,
        "td" | "blockquote" => 3.0,
        "pre" => 0.0,
        "form" | "ol" | "ul" | "li" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "header" | "footer" | "nav" => -5.0,
        _ => 0.0,
    }
}

/// Weight adjustment from class/id naming.
///
/// A positive hint wins over a negative one when both appear, matching how
/// real pages name things like `article-footer`.
pub fn class_id_weight(element: ElementRef<'_>, config: &ScoreConfig) -> f64 {
    if let Some(id) = element.value().attr("id") {
        if POSITIVE_HINTS.is_match(id) {
            return config.positive_weight;
        }
        if NEGATIVE_HINTS.is_match(id) {
            return config.negative_weight;
        }
    }

    if let Some(class) = element.value().attr("class") {
        for token in class.split_whitespace() {
            if POSITIVE_HINTS.is_match(token) {
                return config.positive_weight;
            }
            if NEGATIVE_HINTS.is_match(token) {
                return config.negative_weight;
            }
        }
    }

    0.0
}

/// Density score from text length and comma count, both capped.
///
/// Commas are a crude but effective prose signal: navigation link farms
/// rarely contain any.
pub fn content_density_score(element: ElementRef<'_>, config: &ScoreConfig) -> f64 {
    let text = element_text(element);
    let char_score =
        ((text.chars().count() / config.chars_per_point) as f64).min(config.max_char_density_score);
    let comma_score = (text.matches(',').count() as f64).min(config.max_comma_density_score);

    char_score + comma_score
}

/// Ratio of link text to total text, 0.0 (no links) to 1.0 (all links).
pub fn link_density(element: ElementRef<'_>) -> f64 {
    let total = element_text(element).chars().count();
    if total == 0 {
        return 0.0;
    }

    let linked: usize = element
        .select(&ANCHOR)
        .map(|a| element_text(a).chars().count())
        .sum();

    linked as f64 / total as f64
}

/// Combined score for one candidate container.
///
/// Link density multiplies the raw score down; the penalty is halved for
/// elements that carry a positive naming hint or large amounts of text,
/// since legitimate articles cite and cross-link.
pub fn score_element(element: ElementRef<'_>, config: &ScoreConfig) -> f64 {
    let raw = base_tag_score(element)
        + class_id_weight(element, config)
        + content_density_score(element, config);

    let ld = link_density(element);
    let content_rich = element_text(element).chars().count() > 500;
    let has_positive_hint = class_id_weight(element, config) > 0.0;
    let link_penalty = if has_positive_hint || content_rich { 1.0 - ld * 0.5 } else { 1.0 - ld };

    raw * link_penalty
}
