//! URL-to-clean-text extraction with a two-tier strategy.
//!
//! Given an arbitrary URL, produce normalized plain text suitable for
//! feeding into an LLM prompt. A cheap static tier (HTTP GET, readability
//! scoring, structural fallback parsing) handles the common case; pages the
//! static tier cannot crack escalate to a headless Chromium render.
//!
//! # Example
//!
//! ```no_run
//! use excerpo_core::{ExtractError, extract_content};
//!
//! #[tokio::main]
//! async fn main() {
//!     match extract_content("https://example.com/article").await {
//!         Ok(text) => println!("{text}"),
//!         Err(ExtractError::NoContent) => println!("[no meaningful content extracted]"),
//!         Err(e) => println!("[failed to fetch content: {e}]"),
//!     }
//! }
//! ```

pub mod error;
pub mod extractor;
pub mod fetch;
pub mod normalize;
pub mod readability;
pub mod render;
pub mod scoring;
pub mod structural;

pub use error::{ExtractError, Result};
#[cfg(feature = "render")]
pub use extractor::extract_content;
pub use extractor::{ExtractedText, Extractor, ExtractorConfig, ExtractorConfigBuilder};
pub use fetch::{FetchConfig, HttpFetcher, PageFetcher, RawPage};
pub use normalize::normalize;
pub use readability::{ReadabilityConfig, extract_article};
#[cfg(feature = "render")]
pub use render::ChromiumRenderer;
pub use render::{PageRenderer, RenderConfig};
#[doc(hidden)]
pub use scoring::{ScoreConfig, base_tag_score, class_id_weight, content_density_score, link_density, score_element};
pub use structural::{StructuralConfig, extract_blocks};
