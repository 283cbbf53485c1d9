//! Extraction orchestrator and public API.
//!
//! Composes the static tier (fetch → readability → structural fallback) with
//! the headless-render tier behind a single operation:
//! [`Extractor::extract_content`]. The escalation policy exists because a
//! full browser render costs an order of magnitude more than a static GET —
//! the common case (static HTML sites) never pays for it.
//!
//! # Example
//!
//! ```no_run
//! use excerpo_core::extract_content;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let text = extract_content("https://example.com/article").await?;
//!     println!("{} chars extracted", text.char_count());
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use scraper::Html;
use serde::Serialize;
use url::Url;

#[cfg(feature = "render")]
use crate::fetch::HttpFetcher;
use crate::fetch::{FetchConfig, PageFetcher, RawPage};
use crate::normalize::normalize;
use crate::readability::{self, ReadabilityConfig};
use crate::render::{PageRenderer, RenderConfig};
use crate::structural::{self, StructuralConfig};
use crate::{ExtractError, Result};

/// Final output of a successful extraction.
///
/// Invariant: the inner string is normalized (whitespace-collapsed, no blank
/// lines, trimmed) and contains only text that was visibly rendered content.
/// Construction is crate-internal so the invariant cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub(crate) fn new(normalized: String) -> Self {
        Self(normalized)
    }

    /// The extracted text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Number of characters in the extracted text.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// True when nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ExtractedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Configuration for the extraction pipeline.
///
/// # Example
///
/// ```rust
/// use excerpo_core::ExtractorConfig;
///
/// let config = ExtractorConfig::builder()
///     .sufficiency_threshold(200)
///     .min_article_score(25.0)
///     .build();
/// assert_eq!(config.sufficiency_threshold, 200);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Static-tier output must exceed this many characters or the call
    /// escalates to the headless renderer (default: 100).
    pub sufficiency_threshold: usize,
    /// Readability pass settings.
    pub readability: ReadabilityConfig,
    /// Structural fallback settings.
    pub structural: StructuralConfig,
    /// Static fetch settings.
    pub fetch: FetchConfig,
    /// Headless renderer settings.
    pub render: RenderConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            sufficiency_threshold: 100,
            readability: ReadabilityConfig::default(),
            structural: StructuralConfig::default(),
            fetch: FetchConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl ExtractorConfig {
    /// Creates a new builder with default values.
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::new()
    }
}

/// Builder for [`ExtractorConfig`].
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    /// Creates a builder with default values.
    pub fn new() -> Self {
        Self { config: ExtractorConfig::default() }
    }

    /// Sets the static-tier sufficiency threshold, in characters.
    ///
    /// The same constant is used as the structural parser's fall-through
    /// minimum so the whole static tier shares one notion of "too thin".
    pub fn sufficiency_threshold(mut self, value: usize) -> Self {
        self.config.sufficiency_threshold = value;
        self.config.structural.min_chars = value;
        self
    }

    /// Sets the readability acceptance score.
    pub fn min_article_score(mut self, value: f64) -> Self {
        self.config.readability.min_score = value;
        self
    }

    /// Sets the static fetch configuration.
    pub fn fetch(mut self, value: FetchConfig) -> Self {
        self.config.fetch = value;
        self
    }

    /// Sets the headless renderer configuration.
    pub fn render(mut self, value: RenderConfig) -> Self {
        self.config.render = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> ExtractorConfig {
        self.config
    }
}

impl Default for ExtractorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// URL-to-text extraction service.
///
/// Stateless across calls: each extraction owns its fetched page and any
/// spawned browser process exclusively, so one `Extractor` may serve many
/// concurrent calls. Cancellation is cooperative — dropping an in-flight
/// call aborts the HTTP request or kills the spawned browser.
pub struct Extractor {
    fetcher: Arc<dyn PageFetcher>,
    renderer: Arc<dyn PageRenderer>,
    config: ExtractorConfig,
}

impl Extractor {
    /// Builds an extractor with default configuration and the real
    /// fetcher/renderer pair.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::FetchFailed`] if the HTTP client cannot be
    /// constructed.
    #[cfg(feature = "render")]
    pub fn new() -> Result<Self> {
        Self::with_config(ExtractorConfig::default())
    }

    /// Builds an extractor with a custom configuration.
    #[cfg(feature = "render")]
    pub fn with_config(config: ExtractorConfig) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(config.fetch.clone())?);
        let renderer = Arc::new(crate::render::ChromiumRenderer::new(config.render.clone()));
        Ok(Self { fetcher, renderer, config })
    }

    /// Builds an extractor from explicit parts.
    ///
    /// This is the seam for substituting test doubles for the network and
    /// browser tiers.
    pub fn with_parts(
        fetcher: Arc<dyn PageFetcher>, renderer: Arc<dyn PageRenderer>, config: ExtractorConfig,
    ) -> Self {
        Self { fetcher, renderer, config }
    }

    /// Extracts clean, readable text from the page at `url`.
    ///
    /// Tries the static tier first (one GET, readability pass, structural
    /// fallback); escalates to the headless renderer when the static result
    /// does not exceed the sufficiency threshold or the fetch itself fails.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::InvalidUrl`] before any I/O for malformed input
    /// - [`ExtractError::RenderFailed`] when the last-resort render fails
    /// - [`ExtractError::NoContent`] when every strategy ran but nothing
    ///   usable came back
    pub async fn extract_content(&self, url: &str) -> Result<ExtractedText> {
        let parsed = Url::parse(url).map_err(|e| ExtractError::InvalidUrl(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ExtractError::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            )));
        }

        match self.fetcher.fetch(&parsed).await {
            Ok(page) => {
                if let Some(text) = self.parse_static(&page) {
                    if self.is_sufficient(&text) {
                        return Ok(ExtractedText::new(text));
                    }
                    tracing::debug!(
                        url = %parsed,
                        chars = text.chars().count(),
                        "static tier insufficient, escalating to headless render"
                    );
                } else {
                    tracing::debug!(url = %parsed, "static tier empty, escalating to headless render");
                }
            }
            Err(err) => {
                tracing::warn!(url = %parsed, error = %err, "static fetch failed, escalating to headless render");
            }
        }

        self.render(&parsed).await
    }

    /// Static tier: readability first, structural fallback second, on the
    /// same markup. Returns the best normalized candidate; sufficiency is
    /// judged by the caller, except that an already-sufficient readability
    /// result short-circuits the structural pass.
    fn parse_static(&self, page: &RawPage) -> Option<String> {
        let doc = Html::parse_document(&page.html);

        let readable = readability::extract_article(&doc, &self.config.readability)
            .map(|t| normalize(&t))
            .filter(|t| !t.is_empty());
        if let Some(text) = &readable {
            if self.is_sufficient(text) {
                return readable;
            }
        }

        let fallback = structural::extract_blocks(&doc, &self.config.structural);

        match (readable, fallback) {
            (Some(a), Some(b)) => {
                Some(if a.chars().count() >= b.chars().count() { a } else { b })
            }
            (a, b) => a.or(b),
        }
    }

    /// Render tier: the renderer's output is terminal regardless of length;
    /// an empty result is the explicit no-content signal.
    async fn render(&self, url: &Url) -> Result<ExtractedText> {
        let rendered = self.renderer.render(url).await?;
        let text = normalize(&rendered);
        if text.is_empty() {
            return Err(ExtractError::NoContent);
        }
        Ok(ExtractedText::new(text))
    }

    fn is_sufficient(&self, text: &str) -> bool {
        text.chars().count() > self.config.sufficiency_threshold
    }
}

/// Convenience function: extract with a default [`Extractor`].
///
/// Builds the real fetcher/renderer pair per call; prefer holding an
/// [`Extractor`] when extracting many URLs so the HTTP connection pool is
/// reused.
#[cfg(feature = "render")]
pub async fn extract_content(url: &str) -> Result<ExtractedText> {
    Extractor::new()?.extract_content(url).await
}
