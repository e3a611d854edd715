//! `PageDriver` over the in-memory storefront.

use super::dom::{self, Match};
use super::paint;
use super::store::{Rejection, Storefront};
use crate::driver::{Condition, ElementSnapshot, PageDriver};
use crate::locator::Locator;
use crate::result::{SwagError, SwagResult};
use crate::url_pattern::UrlPattern;
use async_trait::async_trait;
use image::RgbaImage;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

/// Simulated Swag Labs session.
///
/// Every session starts signed out on a fresh storefront, so two drivers
/// never share a cart. The storefront changes only in response to driver
/// calls, which lets waits answer immediately instead of polling.
#[derive(Debug)]
pub struct SimDriver {
    origin: Url,
    state: Mutex<SimState>,
}

#[derive(Debug)]
struct SimState {
    store: Storefront,
    loaded: bool,
    closed: bool,
}

impl SimDriver {
    /// Create a session serving the storefront at `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL
    pub fn new(base_url: &str) -> SwagResult<Self> {
        let origin = Url::parse(base_url)?;
        Ok(Self {
            origin,
            state: Mutex::new(SimState {
                store: Storefront::default(),
                loaded: false,
                closed: false,
            }),
        })
    }

    fn same_site(&self, url: &Url) -> bool {
        url.scheme() == self.origin.scheme()
            && url.host_str() == self.origin.host_str()
            && url.port_or_known_default() == self.origin.port_or_known_default()
    }

    /// Resolve the single actionable element and hand it to `act`
    async fn with_target<T>(
        &self,
        locator: &Locator,
        act: impl FnOnce(&mut Storefront, Match<'_>) -> SwagResult<T> + Send,
    ) -> SwagResult<T> {
        let mut state = self.state.lock().await;
        let state = &mut *state;
        state.ensure_open()?;
        let root = state.store.render();
        let matches = dom::resolve(&root, locator);
        let target = match crate::driver::single(locator, &matches)? {
            Some(m) if m.visible && m.element.enabled => *m,
            _ => {
                return Err(SwagError::timeout(
                    format!("{locator} to be visible and enabled"),
                    locator.timeout_ms(),
                ))
            }
        };
        act(&mut state.store, target)
    }
}

impl SimState {
    fn ensure_open(&self) -> SwagResult<()> {
        if self.closed {
            return Err(SwagError::PageError {
                message: "session is closed".to_string(),
            });
        }
        Ok(())
    }
}

fn rejected(locator: &Locator, rejection: Rejection) -> SwagError {
    let message = match rejection {
        Rejection::NotEditable => format!("{locator} is not an editable form control"),
        Rejection::NoSuchOption(value) => format!("{locator} has no option {value:?}"),
    };
    SwagError::PageError { message }
}

#[async_trait]
impl PageDriver for SimDriver {
    fn backend(&self) -> &'static str {
        "simulated"
    }

    async fn goto(&self, url: &str, _timeout: Duration) -> SwagResult<()> {
        let parsed = Url::parse(url).map_err(|e| SwagError::NavigationError {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        if !self.same_site(&parsed) {
            return Err(SwagError::NavigationError {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        let mut state = self.state.lock().await;
        state.ensure_open()?;
        state.store.visit(parsed.path());
        state.loaded = true;
        tracing::debug!(url, route = ?state.store.route(), "sim navigation");
        Ok(())
    }

    async fn current_url(&self) -> SwagResult<String> {
        let state = self.state.lock().await;
        if !state.loaded {
            return Ok("about:blank".to_string());
        }
        Ok(self.origin.join(state.store.route().path())?.to_string())
    }

    async fn snapshot(&self, locator: &Locator) -> SwagResult<Vec<ElementSnapshot>> {
        let state = self.state.lock().await;
        state.ensure_open()?;
        if !state.loaded {
            return Ok(Vec::new());
        }
        let root = state.store.render();
        Ok(dom::resolve(&root, locator)
            .iter()
            .map(Match::snapshot)
            .collect())
    }

    async fn click(&self, locator: &Locator) -> SwagResult<()> {
        self.with_target(locator, |store, target| {
            if let Some(action) = &target.element.on_click {
                store.click(action);
            }
            Ok(())
        })
        .await
    }

    async fn fill(&self, locator: &Locator, value: &str) -> SwagResult<()> {
        self.with_target(locator, |store, target| {
            let field = target
                .element
                .field
                .ok_or_else(|| rejected(locator, Rejection::NotEditable))?;
            store.fill(field, value).map_err(|r| rejected(locator, r))
        })
        .await
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> SwagResult<()> {
        self.with_target(locator, |store, target| {
            let field = target
                .element
                .field
                .ok_or_else(|| rejected(locator, Rejection::NotEditable))?;
            store.select(field, value).map_err(|r| rejected(locator, r))
        })
        .await
    }

    async fn screenshot(&self) -> SwagResult<Vec<u8>> {
        let state = self.state.lock().await;
        state.ensure_open()?;
        let mut out = String::new();
        state.store.render().outline(0, &mut out);
        Ok(out.into_bytes())
    }

    fn screenshot_extension(&self) -> &'static str {
        "txt"
    }

    async fn frame(&self) -> SwagResult<RgbaImage> {
        let state = self.state.lock().await;
        state.ensure_open()?;
        Ok(paint::paint(&state.store.render()))
    }

    async fn close(&self) -> SwagResult<()> {
        self.state.lock().await.closed = true;
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, condition: &Condition) -> SwagResult<()> {
        let matches = self.snapshot(locator).await?;
        if condition.evaluate(locator, &matches)? {
            return Ok(());
        }
        Err(SwagError::timeout(
            format!("{locator} {condition}"),
            locator.timeout_ms(),
        ))
    }

    async fn wait_for_url(&self, pattern: &UrlPattern, timeout: Duration) -> SwagResult<()> {
        if pattern.matches(&self.current_url().await?) {
            return Ok(());
        }
        Err(SwagError::timeout(
            format!("url matching {pattern}"),
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::locator::Selector;

    const BASE: &str = "https://www.saucedemo.com";

    fn by_id(id: &str) -> Locator {
        Locator::from_selector(Selector::id(id))
    }

    async fn signed_in() -> SimDriver {
        let driver = SimDriver::new(BASE).unwrap();
        driver.goto(BASE, Duration::from_secs(1)).await.unwrap();
        driver.fill(&by_id("user-name"), "standard_user").await.unwrap();
        driver.fill(&by_id("password"), "secret_sauce").await.unwrap();
        driver.click(&by_id("login-button")).await.unwrap();
        driver
    }

    #[tokio::test]
    async fn test_blank_before_navigation() {
        let driver = SimDriver::new(BASE).unwrap();
        assert_eq!(driver.current_url().await.unwrap(), "about:blank");
        assert_eq!(driver.count(&by_id("login-button")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_login_navigates() {
        let driver = signed_in().await;
        assert_eq!(
            driver.current_url().await.unwrap(),
            "https://www.saucedemo.com/inventory.html"
        );
        let rows = Locator::from_selector(Selector::class("inventory_item"));
        assert_eq!(driver.count(&rows).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_foreign_host_is_navigation_error() {
        let driver = SimDriver::new(BASE).unwrap();
        let err = driver
            .goto("https://unreachable.invalid/", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SwagError::NavigationError { .. }));
    }

    #[tokio::test]
    async fn test_click_on_ambiguous_locator_is_strict() {
        let driver = signed_in().await;
        let buttons = Locator::from_selector(Selector::class("btn_inventory"));
        let err = driver.click(&buttons).await.unwrap_err();
        assert!(matches!(err, SwagError::StrictModeViolation { count: 6, .. }));
    }

    #[tokio::test]
    async fn test_click_on_missing_element_times_out() {
        let driver = signed_in().await;
        let err = driver.click(&by_id("finish")).await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_hidden_menu_item_is_not_clickable() {
        let driver = signed_in().await;
        assert!(driver.click(&by_id("logout_sidebar_link")).await.unwrap_err().is_timeout());
        driver.click(&by_id("react-burger-menu-btn")).await.unwrap();
        driver.click(&by_id("logout_sidebar_link")).await.unwrap();
        assert_eq!(driver.current_url().await.unwrap(), "https://www.saucedemo.com/");
    }

    #[tokio::test]
    async fn test_fill_rejects_buttons() {
        let driver = signed_in().await;
        let err = driver
            .fill(&Locator::from_selector(Selector::test_id("shopping-cart-link")), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, SwagError::PageError { .. }));
    }

    #[tokio::test]
    async fn test_wait_for_fails_fast() {
        let driver = signed_in().await;
        let badge = Locator::from_selector(Selector::class("shopping_cart_badge"))
            .with_timeout(Duration::from_secs(30));
        let started = std::time::Instant::now();
        let err = driver.wait_for(&badge, &Condition::Visible).await.unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(matches!(err, SwagError::Timeout { ms: 30_000, .. }));
        driver.wait_for(&badge, &Condition::Hidden).await.unwrap();
    }

    #[tokio::test]
    async fn test_screenshot_outline() {
        let driver = signed_in().await;
        let shot = String::from_utf8(driver.screenshot().await.unwrap()).unwrap();
        assert!(shot.contains("Products"));
        assert_eq!(driver.screenshot_extension(), "txt");
    }

    #[tokio::test]
    async fn test_frame_is_a_wireframe_of_the_screen() {
        let driver = signed_in().await;
        let frame = driver.frame().await.unwrap();
        assert_eq!(frame.dimensions(), (paint::FRAME_WIDTH, paint::FRAME_HEIGHT));
        assert!(frame.pixels().any(|p| p.0 != [255, 255, 255, 255]));
    }

    #[tokio::test]
    async fn test_closed_session_rejects_calls() {
        let driver = signed_in().await;
        driver.close().await.unwrap();
        assert!(driver.count(&by_id("checkout")).await.is_err());
    }
}
