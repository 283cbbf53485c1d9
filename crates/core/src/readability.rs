//! Readability pass: isolate the main article body.
//!
//! Scores every candidate container in the document and returns the text of
//! the single best one, or nothing when no container looks like an article.
//! This is the first static strategy the orchestrator tries; the structural
//! fallback in [`crate::structural`] picks up when this declines.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::scoring::{ScoreConfig, element_text, score_element};

/// Configuration for the readability pass.
#[derive(Debug, Clone)]
pub struct ReadabilityConfig {
    /// Minimum score a candidate must reach to be accepted.
    pub min_score: f64,
    /// Candidates with less text than this are not scored at all.
    pub min_candidate_chars: usize,
    /// Scoring weights.
    pub scoring: ScoreConfig,
}

impl Default for ReadabilityConfig {
    fn default() -> Self {
        Self { min_score: 20.0, min_candidate_chars: 25, scoring: ScoreConfig::default() }
    }
}

/// Tags considered as potential article containers.
static CANDIDATES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("article, main, section, div, td, blockquote, pre")
        .expect("candidate selector")
});

/// Extracts the main article text from a parsed document.
///
/// Pure and deterministic: identical HTML always yields identical output.
/// Returns `None` when no candidate scores at or above
/// [`ReadabilityConfig::min_score`], which typically means the page is a
/// navigation hub, a login wall, or an empty JavaScript shell.
pub fn extract_article(doc: &Html, config: &ReadabilityConfig) -> Option<String> {
    let mut best: Option<(f64, ElementRef<'_>)> = None;

    for element in doc.select(&CANDIDATES) {
        let text_len = element_text(element).chars().count();
        if text_len < config.min_candidate_chars {
            continue;
        }

        let score = score_element(element, &config.scoring);
        match best {
            Some((top, _)) if top >= score => {}
            _ => best = Some((score, element)),
        }
    }

    match best {
        Some((score, element)) if score >= config.min_score => Some(element_text(element)),
        _ => None,
    }
}
