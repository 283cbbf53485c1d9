//! Error types for extraction operations.
//!
//! This module defines the main error type [`ExtractError`] which represents
//! every way a single URL-to-text extraction call can fail, across both the
//! static tier and the headless-render tier.
//!
//! # Example
//!
//! ```rust
//! use excerpo_core::{ExtractError, Result};
//!
//! fn check(text: &str) -> Result<&str> {
//!     if text.is_empty() {
//!         return Err(ExtractError::NoContent);
//!     }
//!     Ok(text)
//! }
//! ```

use thiserror::Error;

/// Main error type for URL-to-text extraction.
///
/// The variants form the complete failure taxonomy of one extraction call.
/// `FetchFailed` is recovered internally by escalating to the headless
/// renderer; it only reaches callers through logs. `RenderFailed` is terminal
/// because the renderer is the last fallback.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Input is not a parseable absolute http(s) URL.
    ///
    /// Returned before any network I/O is attempted.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Static HTTP GET errored, timed out, or returned a non-2xx status.
    ///
    /// The orchestrator treats all three uniformly: the cheap path is not
    /// retried, the call escalates to the headless renderer instead.
    #[error("Static fetch failed: {0}")]
    FetchFailed(String),

    /// Headless navigation, selector wait, or browser launch failed.
    ///
    /// Terminal: no further fallback exists past the renderer.
    #[error("Headless render failed: {0}")]
    RenderFailed(String),

    /// Every strategy ran but produced no usable text.
    ///
    /// A valid, non-exceptional outcome: callers can show "no meaningful
    /// content extracted" instead of treating the source as broken.
    #[error("No content could be extracted from the page")]
    NoContent,
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
