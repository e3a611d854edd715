//! Login screen.

use super::base::{BasePage, PageObject};
use crate::fixtures::{paths, Credential};
use crate::locator::{Locator, Selector};
use crate::result::SwagResult;
use crate::session::Page;
use crate::url_pattern::UrlPattern;

/// The login form at `/`
#[derive(Debug, Clone)]
pub struct LoginPage {
    base: BasePage,
}

impl LoginPage {
    /// Login screen on `page`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        Self {
            base: BasePage::new(page),
        }
    }

    fn username_input(&self) -> Locator {
        self.base.locator(Selector::test_id("username"))
    }

    fn password_input(&self) -> Locator {
        self.base.locator(Selector::test_id("password"))
    }

    fn login_button(&self) -> Locator {
        self.base.locator(Selector::test_id("login-button"))
    }

    fn error_banner(&self) -> Locator {
        self.base.locator(Selector::test_id("error"))
    }

    /// Load the login screen
    ///
    /// # Errors
    ///
    /// `NavigationError` if the storefront is unreachable
    pub async fn open(&self) -> SwagResult<()> {
        self.base.navigate(paths::LOGIN).await
    }

    /// Fill both fields and submit. Success or failure is left to the caller.
    ///
    /// # Errors
    ///
    /// Propagates engine failures, e.g. `Timeout` when the form is not shown
    pub async fn login(&self, username: &str, password: &str) -> SwagResult<()> {
        tracing::debug!(username, "login");
        self.base.fill(&self.username_input(), username).await?;
        self.base.fill(&self.password_input(), password).await?;
        self.base.click(&self.login_button()).await
    }

    /// [`LoginPage::login`] with a fixture credential
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn login_as(&self, credential: &Credential) -> SwagResult<()> {
        self.login(credential.username, credential.password).await
    }

    /// Fails unless the error banner is visible
    ///
    /// # Errors
    ///
    /// `AssertionFailed` if no banner appears within the expect timeout
    pub async fn assert_login_error(&self) -> SwagResult<()> {
        self.base.expect(self.error_banner()).to_be_visible().await
    }

    /// Banner text, or `""` when no banner is rendered
    ///
    /// # Errors
    ///
    /// Only engine failures; absence is not an error
    pub async fn error_message(&self) -> SwagResult<String> {
        self.base.text_or_empty(&self.error_banner()).await
    }

    /// The banner contains `expected` (case-sensitive)
    ///
    /// # Errors
    ///
    /// `AssertionFailed` with the banner's actual text
    pub async fn assert_error_message(&self, expected: &str) -> SwagResult<()> {
        self.base
            .expect(self.error_banner())
            .to_contain_text(expected)
            .await
    }

    /// Whether the login button is currently shown
    ///
    /// # Errors
    ///
    /// Only engine failures
    pub async fn is_on_login_page(&self) -> SwagResult<bool> {
        self.base.is_visible(&self.login_button()).await
    }

    /// Close the error banner
    ///
    /// # Errors
    ///
    /// `Timeout` if no banner is shown
    pub async fn dismiss_error(&self) -> SwagResult<()> {
        self.base
            .click(&self.base.locator(Selector::test_id("error-button")))
            .await
    }
}

impl PageObject for LoginPage {
    fn base(&self) -> &BasePage {
        &self.base
    }

    fn url_pattern(&self) -> UrlPattern {
        UrlPattern::glob("*://*/")
    }
}
