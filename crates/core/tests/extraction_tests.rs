//! Pipeline integration tests driving the orchestrator through mock fetch
//! and render tiers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use excerpo_core::{
    ExtractError, Extractor, ExtractorConfig, PageFetcher, PageRenderer, RawPage, Result,
};
use url::Url;

/// Fetcher double: serves fixed HTML or fails, counting calls either way.
struct MockFetcher {
    calls: Arc<AtomicUsize>,
    html: Option<String>,
}

impl MockFetcher {
    fn serving(html: &str) -> (Arc<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Arc::new(Self { calls: Arc::clone(&calls), html: Some(html.to_string()) }), calls)
    }

    fn failing() -> (Arc<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Arc::new(Self { calls: Arc::clone(&calls), html: None }), calls)
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> Result<RawPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.html {
            Some(html) => Ok(RawPage {
                html: html.clone(),
                final_url: url.clone(),
                status: 200,
                content_type: Some("text/html".to_string()),
            }),
            None => Err(ExtractError::FetchFailed("simulated timeout".to_string())),
        }
    }
}

/// Renderer double: returns fixed text or fails, counting calls either way.
struct MockRenderer {
    calls: Arc<AtomicUsize>,
    text: Option<String>,
}

impl MockRenderer {
    fn returning(text: &str) -> (Arc<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Arc::new(Self { calls: Arc::clone(&calls), text: Some(text.to_string()) }), calls)
    }

    fn failing() -> (Arc<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Arc::new(Self { calls: Arc::clone(&calls), text: None }), calls)
    }
}

#[async_trait]
impl PageRenderer for MockRenderer {
    async fn render(&self, _url: &Url) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.text {
            Some(text) => Ok(text.clone()),
            None => Err(ExtractError::RenderFailed("simulated crash after launch".to_string())),
        }
    }
}

fn extractor(fetcher: Arc<MockFetcher>, renderer: Arc<MockRenderer>) -> Extractor {
    Extractor::with_parts(fetcher, renderer, ExtractorConfig::default())
}

const ARTICLE_WITH_NAV: &str = r#"
    <html>
    <head><title>Quarterly Report</title></head>
    <body>
        <nav class="site-nav">
            <a href="/home">Home page and latest headlines</a>
            <a href="/archive">Archive of every past edition sorted by year</a>
            <a href="/subscribe">Subscribe to the weekly newsletter digest</a>
            <a href="/contact">Contact the editorial team directly</a>
        </nav>
        <article>
            <p>The company reported quarterly results well ahead of analyst
            expectations, with revenue climbing for the sixth consecutive quarter
            and operating margins widening despite continued investment in the
            new logistics network.</p>
            <p>Management attributed the performance to stronger retention in the
            subscription segment, noting that churn fell to its lowest level since
            the product relaunch, while average contract value rose modestly
            across every regional market the company serves.</p>
        </article>
        <footer>All rights reserved. Terms of use. Privacy policy.</footer>
    </body>
    </html>
"#;

#[tokio::test]
async fn malformed_url_rejected_without_io() {
    let (fetcher, fetch_calls) = MockFetcher::serving(ARTICLE_WITH_NAV);
    let (renderer, render_calls) = MockRenderer::returning("unused");

    let result = extractor(fetcher, renderer).extract_content("not a url").await;

    assert!(matches!(result, Err(ExtractError::InvalidUrl(_))));
    assert_eq!(fetch_calls.load(Ordering::SeqCst), 0);
    assert_eq!(render_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_http_scheme_rejected_without_io() {
    let (fetcher, fetch_calls) = MockFetcher::serving(ARTICLE_WITH_NAV);
    let (renderer, _) = MockRenderer::returning("unused");

    let result = extractor(fetcher, renderer).extract_content("file:///etc/passwd").await;

    assert!(matches!(result, Err(ExtractError::InvalidUrl(_))));
    assert_eq!(fetch_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn static_article_extracted_without_render() {
    let (fetcher, fetch_calls) = MockFetcher::serving(ARTICLE_WITH_NAV);
    let (renderer, render_calls) = MockRenderer::returning("unused");

    let text = extractor(fetcher, renderer)
        .extract_content("https://example.test/article")
        .await
        .unwrap();

    assert!(text.as_str().contains("quarterly results"));
    assert!(text.as_str().contains("subscription segment"));
    // Nothing that lived only inside nav/footer may survive.
    assert!(!text.as_str().contains("Archive"));
    assert!(!text.as_str().contains("Subscribe"));
    assert!(!text.as_str().contains("rights reserved"));
    // Normalized: no runs of spaces, no blank lines.
    assert!(!text.as_str().contains("  "));
    assert!(!text.as_str().contains("\n\n"));

    assert_eq!(fetch_calls.load(Ordering::SeqCst), 1);
    assert_eq!(render_calls.load(Ordering::SeqCst), 0);
}

fn page_with_exact_chars(n: usize) -> String {
    format!("<html><body><article><p>{}</p></article></body></html>", "x".repeat(n))
}

#[tokio::test]
async fn exactly_threshold_chars_is_insufficient() {
    let (fetcher, _) = MockFetcher::serving(&page_with_exact_chars(100));
    let (renderer, render_calls) = MockRenderer::returning(
        "Rendered fallback content produced by the headless tier for this page.",
    );

    let text = extractor(fetcher, renderer)
        .extract_content("https://example.test/thin")
        .await
        .unwrap();

    assert_eq!(render_calls.load(Ordering::SeqCst), 1);
    assert!(text.as_str().starts_with("Rendered fallback content"));
}

#[tokio::test]
async fn one_char_over_threshold_is_sufficient() {
    let (fetcher, _) = MockFetcher::serving(&page_with_exact_chars(101));
    let (renderer, render_calls) = MockRenderer::returning("unused");

    let text = extractor(fetcher, renderer)
        .extract_content("https://example.test/just-enough")
        .await
        .unwrap();

    assert_eq!(render_calls.load(Ordering::SeqCst), 0);
    assert_eq!(text.char_count(), 101);
}

#[tokio::test]
async fn fetch_failure_escalates_to_render() {
    let (fetcher, fetch_calls) = MockFetcher::failing();
    let (renderer, render_calls) =
        MockRenderer::returning("Content only the browser could see on this page.");

    let text = extractor(fetcher, renderer)
        .extract_content("https://example.test/spa")
        .await
        .unwrap();

    assert_eq!(fetch_calls.load(Ordering::SeqCst), 1);
    assert_eq!(render_calls.load(Ordering::SeqCst), 1);
    assert!(text.as_str().contains("only the browser could see"));
}

#[tokio::test]
async fn render_result_terminal_regardless_of_length() {
    let (fetcher, _) = MockFetcher::failing();
    let (renderer, _) = MockRenderer::returning("JS app.");

    let text = extractor(fetcher, renderer)
        .extract_content("https://example.test/tiny-spa")
        .await
        .unwrap();

    assert_eq!(text.as_str(), "JS app.");
}

#[tokio::test]
async fn render_failure_is_terminal_and_not_retried() {
    let (fetcher, _) = MockFetcher::failing();
    let (renderer, render_calls) = MockRenderer::failing();

    let result = extractor(fetcher, renderer)
        .extract_content("https://example.test/down")
        .await;

    assert!(matches!(result, Err(ExtractError::RenderFailed(_))));
    assert_eq!(render_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_render_is_no_content() {
    let (fetcher, _) = MockFetcher::failing();
    let (renderer, _) = MockRenderer::returning("  \t \n  ");

    let result = extractor(fetcher, renderer)
        .extract_content("https://example.test/blank")
        .await;

    assert!(matches!(result, Err(ExtractError::NoContent)));
}

#[tokio::test]
async fn concurrent_calls_share_no_state() {
    let (fetcher, fetch_calls) = MockFetcher::serving(ARTICLE_WITH_NAV);
    let (renderer, render_calls) = MockRenderer::returning("unused");
    let extractor = Arc::new(extractor(fetcher, renderer));

    let (a, b, c) = tokio::join!(
        extractor.extract_content("https://example.test/one"),
        extractor.extract_content("https://example.test/two"),
        extractor.extract_content("https://example.test/three"),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(fetch_calls.load(Ordering::SeqCst), 3);
    assert_eq!(render_calls.load(Ordering::SeqCst), 0);
}
