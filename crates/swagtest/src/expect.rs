//! Web-first assertions.
//!
//! `expect(page, locator)` waits, up to the expect timeout, for the locator to
//! reach a state. If it never does, the driver's `Timeout` becomes an
//! `AssertionFailed` that reports what was observed instead.
//!
//! ```no_run
//! # use swagtest::{expect, Page, Selector, SwagResult};
//! # async fn demo(page: &Page) -> SwagResult<()> {
//! expect(page, page.locator(Selector::class("shopping_cart_badge")))
//!     .to_have_text("2")
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::driver::Condition;
use crate::locator::Locator;
use crate::result::{SwagError, SwagResult};
use crate::session::Page;
use crate::url_pattern::UrlPattern;

/// Pending assertion on a locator
#[derive(Debug)]
pub struct Expect<'a> {
    page: &'a Page,
    locator: Locator,
}

/// Start an assertion on `locator`
#[must_use]
pub fn expect(page: &Page, locator: Locator) -> Expect<'_> {
    let locator = locator.with_timeout(page.timeouts().expect);
    Expect { page, locator }
}

impl Expect<'_> {
    /// Exactly one element matches and it is rendered
    ///
    /// # Errors
    ///
    /// `AssertionFailed` if the element stays absent or hidden
    pub async fn to_be_visible(self) -> SwagResult<()> {
        self.check(Condition::Visible).await
    }

    /// No element matches, or the one match is not rendered
    ///
    /// # Errors
    ///
    /// `AssertionFailed` if the element stays visible
    pub async fn to_be_hidden(self) -> SwagResult<()> {
        self.check(Condition::Hidden).await
    }

    /// Exactly `count` elements match
    ///
    /// # Errors
    ///
    /// `AssertionFailed` if the count never settles on `count`
    pub async fn to_have_count(self, count: usize) -> SwagResult<()> {
        self.check(Condition::Count(count)).await
    }

    /// The single match's trimmed text equals `text`
    ///
    /// # Errors
    ///
    /// `AssertionFailed` if the text never matches
    pub async fn to_have_text(self, text: &str) -> SwagResult<()> {
        self.check(Condition::HasText(text.to_string())).await
    }

    /// The single match's text contains `text` (case-sensitive)
    ///
    /// # Errors
    ///
    /// `AssertionFailed` if the text never contains `text`
    pub async fn to_contain_text(self, text: &str) -> SwagResult<()> {
        self.check(Condition::ContainsText(text.to_string())).await
    }

    async fn check(self, condition: Condition) -> SwagResult<()> {
        let driver = self.page.driver();
        match driver.wait_for(&self.locator, &condition).await {
            Err(SwagError::Timeout { ms, .. }) => {
                let observed = driver.snapshot(&self.locator).await?;
                Err(SwagError::AssertionFailed {
                    message: format!(
                        "expected {} {condition}, got {} (after {ms}ms)",
                        self.locator,
                        condition.describe_actual(&observed)
                    ),
                })
            }
            other => other,
        }
    }
}

/// Assert the page address matches `pattern` within the expect timeout
///
/// # Errors
///
/// `AssertionFailed` carrying the last observed URL
pub async fn expect_url(page: &Page, pattern: &UrlPattern) -> SwagResult<()> {
    let driver = page.driver();
    match driver.wait_for_url(pattern, page.timeouts().expect).await {
        Err(SwagError::Timeout { ms, .. }) => {
            let actual = driver.current_url().await?;
            Err(SwagError::AssertionFailed {
                message: format!("expected url matching {pattern}, got {actual:?} (after {ms}ms)"),
            })
        }
        other => other,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::locator::Selector;
    use crate::session::Session;

    async fn at_login() -> Session {
        let session = Session::simulated().unwrap();
        session.page().goto("/").await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_passing_expectations() {
        let session = at_login().await;
        let page = session.page();
        expect(page, page.locator(Selector::id("login-button"))).to_be_visible().await.unwrap();
        expect(page, page.locator(Selector::test_id("error"))).to_be_hidden().await.unwrap();
        expect(page, page.locator(Selector::class("login_logo")))
            .to_have_text("Swag Labs")
            .await
            .unwrap();
        expect(page, page.locator(Selector::class("form_input")))
            .to_have_count(2)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failure_reports_actual_state() {
        let session = at_login().await;
        let page = session.page();
        let err = expect(page, page.locator(Selector::test_id("error")))
            .to_be_visible()
            .await
            .unwrap_err();
        assert!(err.is_assertion());
        let text = err.to_string();
        assert!(text.contains("no matching element"), "{text}");
        assert!(text.contains("5000ms"), "{text}");
    }

    #[tokio::test]
    async fn test_text_mismatch_reports_text() {
        let session = at_login().await;
        let page = session.page();
        let err = expect(page, page.locator(Selector::class("login_logo")))
            .to_contain_text("Sauce")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("text \"Swag Labs\""));
    }

    #[tokio::test]
    async fn test_strict_violation_is_not_masked() {
        let session = at_login().await;
        let page = session.page();
        let err = expect(page, page.locator(Selector::class("form_input")))
            .to_be_visible()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "strict-mode");
    }

    #[tokio::test]
    async fn test_expect_url() {
        let session = at_login().await;
        let page = session.page();
        expect_url(page, &UrlPattern::glob("https://www.saucedemo.com/*")).await.unwrap();
        let err = expect_url(page, &UrlPattern::regex("inventory").unwrap())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("https://www.saucedemo.com/"));
    }
}
