//! Chromium backend over the DevTools protocol.
//!
//! Compiled with the `browser` feature. Elements are resolved by evaluating
//! the locator's JavaScript query in the page, so CSS, test-id and text
//! selectors behave the same way they do on the simulator. Actions wait for
//! a single visible, enabled match before dispatching.

use crate::config::{Target, Viewport};
use crate::driver::{single, ElementSnapshot, PageDriver};
use crate::locator::Locator;
use crate::result::{SwagError, SwagResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// How to start Chromium
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Run without a window
    pub headless: bool,
    /// Window size
    pub viewport: Viewport,
    /// Explicit executable; auto-detected when unset
    pub chromium_path: Option<PathBuf>,
    /// Keep the Chromium sandbox (off in containers)
    pub sandbox: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport::default(),
            chromium_path: None,
            sandbox: false,
        }
    }
}

impl LaunchOptions {
    /// Options for a configured target
    #[must_use]
    pub fn from_target(target: &Target) -> Self {
        Self {
            headless: target.headless,
            viewport: target.viewport,
            chromium_path: target.chromium_path.clone(),
            ..Self::default()
        }
    }
}

/// One Chromium instance driving a single tab
#[derive(Debug)]
pub struct CdpDriver {
    browser: Mutex<Option<Browser>>,
    page: CdpPage,
    handler: JoinHandle<()>,
}

impl CdpDriver {
    /// Launch Chromium and open a blank tab
    ///
    /// # Errors
    ///
    /// Returns `BrowserLaunchError` if Chromium cannot be started
    pub async fn launch(options: &LaunchOptions) -> SwagResult<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(options.viewport.width, options.viewport.height);
        if !options.headless {
            builder = builder.with_head();
        }
        if !options.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = options.chromium_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|message| SwagError::BrowserLaunchError { message })?;

        let (browser, mut handler) =
            Browser::launch(config)
                .await
                .map_err(|e| SwagError::BrowserLaunchError {
                    message: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| SwagError::BrowserLaunchError {
                message: e.to_string(),
            })?;

        tracing::debug!(headless = options.headless, "chromium launched");
        Ok(Self {
            browser: Mutex::new(Some(browser)),
            page,
            handler,
        })
    }

    async fn evaluate<T: DeserializeOwned>(&self, js: String) -> SwagResult<T> {
        let result = self
            .page
            .evaluate(js)
            .await
            .map_err(|e| SwagError::PageError {
                message: e.to_string(),
            })?;
        result.into_value().map_err(|e| SwagError::PageError {
            message: e.to_string(),
        })
    }

    /// Wait for exactly one visible, enabled match
    async fn actionable(&self, locator: &Locator) -> SwagResult<()> {
        let deadline = Instant::now() + locator.options().timeout;
        loop {
            let matches = self.snapshot(locator).await?;
            if single(locator, &matches)?.is_some_and(|e| e.visible && e.enabled) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(SwagError::timeout(
                    format!("{locator} to be actionable"),
                    locator.timeout_ms(),
                ));
            }
            tokio::time::sleep(locator.options().poll_interval).await;
        }
    }

    /// Run `body` with `el` bound to the single match; `body` returns a boolean
    async fn with_element(&self, locator: &Locator, body: &str) -> SwagResult<bool> {
        self.actionable(locator).await?;
        let js = format!(
            "(() => {{ const el = {}[0]; if (!el) return false; {body} }})()",
            locator.to_query()
        );
        self.evaluate(js).await
    }
}

const SNAPSHOT_MAP: &str = ".map(e => { \
    const style = window.getComputedStyle(e); \
    const rendered = !!(e.offsetWidth || e.offsetHeight || e.getClientRects().length); \
    return { \
        text: e.textContent || '', \
        visible: rendered && style.visibility !== 'hidden' && e.getAttribute('aria-hidden') !== 'true', \
        enabled: !e.disabled, \
        value: (e.tagName === 'INPUT' || e.tagName === 'SELECT' || e.tagName === 'TEXTAREA') ? String(e.value) : null \
    }; })";

#[async_trait]
impl PageDriver for CdpDriver {
    fn backend(&self) -> &'static str {
        "chromium"
    }

    async fn goto(&self, url: &str, timeout: Duration) -> SwagResult<()> {
        let navigation = self.page.goto(url);
        match tokio::time::timeout(timeout, navigation).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(SwagError::NavigationError {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(SwagError::timeout(
                format!("navigation to {url}"),
                u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }

    async fn current_url(&self) -> SwagResult<String> {
        let url = self.page.url().await.map_err(|e| SwagError::PageError {
            message: e.to_string(),
        })?;
        Ok(url.unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn snapshot(&self, locator: &Locator) -> SwagResult<Vec<ElementSnapshot>> {
        self.evaluate(format!("{}{SNAPSHOT_MAP}", locator.to_query()))
            .await
    }

    async fn click(&self, locator: &Locator) -> SwagResult<()> {
        tracing::debug!(%locator, "click");
        self.with_element(locator, "el.scrollIntoView({ block: 'center' }); el.click(); return true;")
            .await?;
        Ok(())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> SwagResult<()> {
        tracing::debug!(%locator, "fill");
        // React tracks the value through the prototype setter
        let body = format!(
            "const setter = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(el), 'value').set; \
             el.focus(); setter.call(el, {}); \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true;",
            crate::locator::js_string(value)
        );
        self.with_element(locator, &body).await?;
        Ok(())
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> SwagResult<()> {
        tracing::debug!(%locator, value, "select");
        let wanted = crate::locator::js_string(value);
        let body = format!(
            "if (!Array.from(el.options || []).some(o => o.value === {wanted})) return false; \
             el.value = {wanted}; \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); return true;"
        );
        if self.with_element(locator, &body).await? {
            Ok(())
        } else {
            Err(SwagError::PageError {
                message: format!("{locator} has no option {value:?}"),
            })
        }
    }

    async fn screenshot(&self) -> SwagResult<Vec<u8>> {
        use base64::Engine;

        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let shot = self
            .page
            .execute(params)
            .await
            .map_err(|e| SwagError::ScreenshotError {
                message: e.to_string(),
            })?;
        base64::engine::general_purpose::STANDARD
            .decode(&shot.data)
            .map_err(|e| SwagError::ScreenshotError {
                message: e.to_string(),
            })
    }

    async fn close(&self) -> SwagResult<()> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };
        let closed = browser.close().await.map_err(|e| SwagError::PageError {
            message: e.to_string(),
        });
        let _ = browser.wait().await;
        self.handler.abort();
        closed.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendKind;

    #[test]
    fn test_launch_options_follow_target() {
        let mut target = Target::chromium();
        target.headless = false;
        target.viewport = Viewport {
            width: 800,
            height: 600,
        };
        target.chromium_path = Some(PathBuf::from("/usr/bin/chromium"));
        let options = LaunchOptions::from_target(&target);
        assert!(!options.headless);
        assert_eq!(options.viewport.width, 800);
        assert_eq!(options.chromium_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert!(!options.sandbox);
        assert_eq!(target.backend, BackendKind::Chromium);
    }

    #[test]
    fn test_snapshot_script_wraps_query() {
        let locator = Locator::from_selector(crate::locator::Selector::test_id("title"));
        let js = format!("{}{SNAPSHOT_MAP}", locator.to_query());
        assert!(js.starts_with("(() => { let nodes = [document];"));
        assert!(js.contains("visible: rendered"));
    }
}
