//! Headless Chromium rendering tier.
//!
//! The expensive last resort: spawn a real browser, let the page's scripts
//! run, then apply the same boilerplate-exclusion and extraction-priority
//! rules as [`crate::structural`] against the live DOM. Only this path can
//! see JavaScript-rendered content, so the orchestrator reaches for it only
//! after the static tier has come up short.
//!
//! [`RenderConfig`] and the [`PageRenderer`] trait are always available; the
//! Chromium-backed [`ChromiumRenderer`] requires the `render` feature.

use async_trait::async_trait;
use url::Url;

use crate::Result;

/// Launch and navigation configuration for the headless renderer.
///
/// All Chromium launch state is explicit per-instance configuration; nothing
/// here touches process-wide settings, so a fake [`PageRenderer`] can stand
/// in during tests without side effects.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// User-Agent override applied to the rendered page.
    pub user_agent: String,
    /// Hard cap on navigation plus load-event wait, in seconds.
    pub nav_timeout: u64,
    /// How long to wait for the `body` element to exist, in seconds.
    pub body_timeout: u64,
    /// Whether to keep the Chromium sandbox enabled. Containerized
    /// deployments generally need `false`.
    pub sandbox: bool,
    /// Additional Chromium command-line flags.
    pub extra_args: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            user_agent: crate::fetch::FetchConfig::default().user_agent,
            nav_timeout: 30,
            body_timeout: 5,
            sandbox: false,
            extra_args: vec![
                "--disable-gpu".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--disable-background-networking".to_string(),
                "--mute-audio".to_string(),
            ],
        }
    }
}

/// Renders a page in a real browser engine and extracts its visible text.
///
/// Object trait so the orchestrator and its tests never depend on a Chromium
/// binary being present.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Navigates to `url`, waits for readiness, and returns the extracted
    /// (not yet normalized) page text.
    async fn render(&self, url: &Url) -> Result<String>;
}

#[cfg(feature = "render")]
pub use chromium::ChromiumRenderer;

#[cfg(feature = "render")]
mod chromium {
    use std::time::Duration;

    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser, BrowserConfig};
    use futures::StreamExt;
    use url::Url;

    use super::{PageRenderer, RenderConfig};
    use crate::{ExtractError, Result};

    /// In-page extraction script: the structural rules of
    /// [`crate::structural`] evaluated against the live, script-populated
    /// DOM.
    const EXTRACTION_JS: &str = r#"
(() => {
    const hint = /^(?:\w+[-_])?(nav\w*|menu\w*|footer\w*|header\w*|sidebar|sidenav|banner\w*|ads?|advert\w*|promo\w*|sponsor\w*|cookie\w*|consent|popup|modal|overlay|social|share\w*|breadcrumbs?|paginat\w*|pager)(?:[-_]\w+)*$/i;
    document
        .querySelectorAll('script,style,nav,footer,header,iframe,noscript,template,[aria-hidden="true"]')
        .forEach((el) => el.remove());
    document.querySelectorAll('[class],[id]').forEach((el) => {
        const tokens = ((el.getAttribute('class') || '') + ' ' + (el.getAttribute('id') || ''))
            .split(/\s+/)
            .filter((t) => t.length > 0);
        if (tokens.some((t) => hint.test(t))) el.remove();
    });
    const blocks = Array.from(document.querySelectorAll('p,h1,h2,h3,h4,h5,h6,li'))
        .map((el) => el.innerText.trim())
        .filter((t) => t.length > 0);
    if (blocks.length > 0) return blocks.join(' ');
    for (const sel of ['article', 'main', '.content', '.article', '.post', '#content', '#main']) {
        const el = document.querySelector(sel);
        if (el && el.innerText.trim().length > 0) return el.innerText.trim();
    }
    return document.body ? document.body.innerText : '';
})()
"#;

    /// [`PageRenderer`] backed by a spawned headless Chromium process.
    #[derive(Debug, Clone)]
    pub struct ChromiumRenderer {
        config: RenderConfig,
    }

    impl ChromiumRenderer {
        /// Builds a renderer; the browser itself is launched per
        /// [`PageRenderer::render`] call so concurrent extractions never
        /// share a process.
        pub fn new(config: RenderConfig) -> Self {
            Self { config }
        }

        fn launch_args(&self) -> Vec<String> {
            let mut args = self.config.extra_args.clone();
            if !self.config.sandbox {
                args.push("--no-sandbox".to_string());
            }
            args.push(format!("--user-agent={}", self.config.user_agent));
            args
        }

        fn browser_config(&self) -> Result<BrowserConfig> {
            BrowserConfig::builder()
                .args(self.launch_args())
                .build()
                .map_err(ExtractError::RenderFailed)
        }

        /// Navigation and extraction, separated from launch/teardown so that
        /// every early return in here still passes through the teardown in
        /// [`PageRenderer::render`].
        async fn drive(&self, browser: &Browser, url: &Url) -> Result<String> {
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| ExtractError::RenderFailed(format!("failed to open page: {e}")))?;

            page.set_user_agent(self.config.user_agent.as_str()).await.map_err(|e| {
                ExtractError::RenderFailed(format!("failed to set user agent: {e}"))
            })?;

            let navigation = async {
                page.goto(url.as_str())
                    .await
                    .map_err(|e| ExtractError::RenderFailed(format!("navigation failed: {e}")))?;
                page.wait_for_navigation()
                    .await
                    .map_err(|e| ExtractError::RenderFailed(format!("load wait failed: {e}")))?;
                Ok::<(), ExtractError>(())
            };
            tokio::time::timeout(Duration::from_secs(self.config.nav_timeout), navigation)
                .await
                .map_err(|_| {
                    ExtractError::RenderFailed(format!(
                        "navigation timed out after {} seconds",
                        self.config.nav_timeout
                    ))
                })??;

            let body_wait = async {
                loop {
                    if page.find_element("body").await.is_ok() {
                        return;
                    }
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            };
            tokio::time::timeout(Duration::from_secs(self.config.body_timeout), body_wait)
                .await
                .map_err(|_| {
                    ExtractError::RenderFailed(format!(
                        "body element missing after {} seconds",
                        self.config.body_timeout
                    ))
                })?;

            page.evaluate(EXTRACTION_JS)
                .await
                .map_err(|e| ExtractError::RenderFailed(format!("extraction script failed: {e}")))?
                .into_value::<String>()
                .map_err(|e| ExtractError::RenderFailed(format!("extraction result invalid: {e}")))
        }
    }

    #[async_trait]
    impl PageRenderer for ChromiumRenderer {
        /// Launches a browser, drives the page, and tears the browser down
        /// on every exit path. If the caller drops the returned future
        /// mid-flight, the `Browser` handle's drop kills the child process.
        async fn render(&self, url: &Url) -> Result<String> {
            let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
                .await
                .map_err(|e| {
                    ExtractError::RenderFailed(format!("failed to launch browser: {e}"))
                })?;

            let handler_task =
                tokio::spawn(async move { while handler.next().await.is_some() {} });

            let result = self.drive(&browser, url).await;

            if let Err(e) = browser.close().await {
                tracing::debug!(error = %e, "browser close reported an error");
            }
            let _ = browser.wait().await;
            handler_task.abort();

            result
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_sandbox_flag_controls_args() {
            let relaxed = ChromiumRenderer::new(RenderConfig::default());
            assert!(relaxed.launch_args().iter().any(|a| a == "--no-sandbox"));

            let sandboxed =
                ChromiumRenderer::new(RenderConfig { sandbox: true, ..Default::default() });
            assert!(!sandboxed.launch_args().iter().any(|a| a == "--no-sandbox"));
        }

        #[test]
        fn test_extra_args_propagate() {
            let renderer = ChromiumRenderer::new(RenderConfig {
                extra_args: vec!["--lang=en-US".to_string()],
                ..Default::default()
            });
            assert!(renderer.launch_args().iter().any(|a| a == "--lang=en-US"));
        }

        #[test]
        fn test_extraction_script_mirrors_structural_rules() {
            assert!(EXTRACTION_JS.contains("p,h1,h2,h3,h4,h5,h6,li"));
            assert!(EXTRACTION_JS.contains("'article', 'main', '.content'"));
            assert!(EXTRACTION_JS.contains("aria-hidden"));
        }
    }
}
