//! Shared page-object plumbing.

use crate::driver::Condition;
use crate::expect::{expect, Expect};
use crate::locator::{Locator, Selector};
use crate::result::SwagResult;
use crate::session::Page;
use crate::url_pattern::UrlPattern;
use async_trait::async_trait;

/// Trait for page objects representing one storefront screen.
///
/// Implementors hold a [`BasePage`] and build their locators on every call.
#[async_trait]
pub trait PageObject: Send + Sync {
    /// The wrapped base page
    fn base(&self) -> &BasePage;

    /// Address pattern of this screen
    fn url_pattern(&self) -> UrlPattern;

    /// Page name for logging/debugging
    fn page_name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Wait until the browser shows this screen
    ///
    /// # Errors
    ///
    /// `Timeout` if the address never matches within the navigation timeout
    async fn wait_until_loaded(&self) -> SwagResult<()> {
        self.base().wait_for_url(&self.url_pattern()).await
    }
}

/// Navigation and locator helpers common to every page
#[derive(Debug, Clone)]
pub struct BasePage {
    page: Page,
}

impl BasePage {
    /// Wrap a page handle
    #[must_use]
    pub fn new(page: &Page) -> Self {
        Self { page: page.clone() }
    }

    /// The wrapped page handle
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Locator bounded by the action timeout
    #[must_use]
    pub fn locator(&self, selector: Selector) -> Locator {
        self.page.locator(selector)
    }

    /// Start a web-first assertion on `locator`
    #[must_use]
    pub fn expect(&self, locator: Locator) -> Expect<'_> {
        expect(&self.page, locator)
    }

    /// Load `path` relative to the configured base URL
    ///
    /// # Errors
    ///
    /// `NavigationError` if the host is unreachable
    pub async fn navigate(&self, path: &str) -> SwagResult<()> {
        self.page.goto(path).await
    }

    /// Current page address
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot report the address
    pub async fn current_url(&self) -> SwagResult<String> {
        self.page.driver().current_url().await
    }

    /// Suspend until the address matches `pattern`
    ///
    /// # Errors
    ///
    /// `Timeout` after the navigation timeout
    pub async fn wait_for_url(&self, pattern: &UrlPattern) -> SwagResult<()> {
        self.page
            .driver()
            .wait_for_url(pattern, self.page.timeouts().navigation)
            .await
    }

    /// Screen title from the secondary header, `""` on screens without one
    ///
    /// # Errors
    ///
    /// Returns an error if the engine query fails
    pub async fn title(&self) -> SwagResult<String> {
        self.text_or_empty(&self.locator(Selector::test_id("title"))).await
    }

    pub(crate) async fn click(&self, locator: &Locator) -> SwagResult<()> {
        self.page.driver().click(locator).await
    }

    pub(crate) async fn fill(&self, locator: &Locator, value: &str) -> SwagResult<()> {
        self.page.driver().fill(locator, value).await
    }

    pub(crate) async fn select_option(&self, locator: &Locator, value: &str) -> SwagResult<()> {
        self.page.driver().select_option(locator, value).await
    }

    /// Trimmed text of the single match, `""` when nothing matches; never waits
    pub(crate) async fn text_or_empty(&self, locator: &Locator) -> SwagResult<String> {
        Ok(self
            .page
            .driver()
            .text_content(locator)
            .await?
            .map(|t| t.trim().to_string())
            .unwrap_or_default())
    }

    /// Trimmed text of the single match once it is visible
    pub(crate) async fn text_of(&self, locator: &Locator) -> SwagResult<String> {
        let driver = self.page.driver();
        driver.wait_for(locator, &Condition::Visible).await?;
        Ok(driver
            .text_content(locator)
            .await?
            .map(|t| t.trim().to_string())
            .unwrap_or_default())
    }

    /// Trimmed texts of every match, once `ready` is visible
    pub(crate) async fn texts_within(&self, ready: &Locator, items: &Locator) -> SwagResult<Vec<String>> {
        let driver = self.page.driver();
        driver.wait_for(ready, &Condition::Visible).await?;
        Ok(driver
            .all_text_contents(items)
            .await?
            .into_iter()
            .map(|t| t.trim().to_string())
            .collect())
    }

    /// Number of matches for `items`, once `ready` is visible
    pub(crate) async fn count_within(&self, ready: &Locator, items: &Locator) -> SwagResult<usize> {
        let driver = self.page.driver();
        driver.wait_for(ready, &Condition::Visible).await?;
        driver.count(items).await
    }

    pub(crate) async fn is_visible(&self, locator: &Locator) -> SwagResult<bool> {
        self.page.driver().is_visible(locator).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::result::SwagError;
    use crate::session::Session;

    struct Bare(BasePage);

    impl PageObject for Bare {
        fn base(&self) -> &BasePage {
            &self.0
        }

        fn url_pattern(&self) -> UrlPattern {
            UrlPattern::glob("*/cart.html")
        }
    }

    #[tokio::test]
    async fn test_navigate_and_current_url() {
        let session = Session::simulated().unwrap();
        let base = BasePage::new(session.page());
        base.navigate("/").await.unwrap();
        assert_eq!(base.current_url().await.unwrap(), "https://www.saucedemo.com/");
        base.wait_for_url(&UrlPattern::exact("https://www.saucedemo.com/"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_for_url_times_out_with_navigation_budget() {
        let session = Session::simulated().unwrap();
        let base = BasePage::new(session.page());
        base.navigate("/").await.unwrap();
        let err = base
            .wait_for_url(&UrlPattern::regex("inventory").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SwagError::Timeout { ms: 30_000, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_not_swallowed() {
        let session = Session::simulated().unwrap();
        let base = BasePage::new(session.page());
        let err = base.navigate("https://offline.invalid/").await.unwrap_err();
        assert_eq!(err.kind(), "navigation");
    }

    #[tokio::test]
    async fn test_title_absent_on_login() {
        let session = Session::simulated().unwrap();
        let base = BasePage::new(session.page());
        base.navigate("/").await.unwrap();
        assert_eq!(base.title().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_page_object_defaults() {
        let session = Session::simulated().unwrap();
        let bare = Bare(BasePage::new(session.page()));
        assert_eq!(bare.page_name(), "Bare");
        assert!(bare.wait_until_loaded().await.is_err());
    }
}
