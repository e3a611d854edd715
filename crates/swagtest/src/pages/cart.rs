//! Cart screen.

use super::base::{BasePage, PageObject};
use super::header::Header;
use crate::fixtures::paths;
use crate::locator::{Locator, Selector};
use crate::result::SwagResult;
use crate::session::Page;
use crate::url_pattern::UrlPattern;

/// The cart at `/cart.html`
#[derive(Debug, Clone)]
pub struct CartPage {
    base: BasePage,
    header: Header,
}

impl CartPage {
    /// Cart screen on `page`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        let base = BasePage::new(page);
        Self {
            header: Header::new(base.clone()),
            base,
        }
    }

    fn list(&self) -> Locator {
        self.base.locator(Selector::test_id("cart-list"))
    }

    fn rows(&self) -> Locator {
        self.base.locator(Selector::class("cart_item"))
    }

    fn row(&self, name: &str) -> Locator {
        self.rows().with_text(name)
    }

    /// Load the cart directly
    ///
    /// # Errors
    ///
    /// `NavigationError` if the storefront is unreachable
    pub async fn open(&self) -> SwagResult<()> {
        self.base.navigate(paths::CART).await
    }

    /// Click "Checkout"
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn begin_checkout(&self) -> SwagResult<()> {
        self.base
            .click(&self.base.locator(Selector::test_id("checkout")))
            .await
    }

    /// Click "Remove" on the row for `name`
    ///
    /// # Errors
    ///
    /// `StrictModeViolation` if ambiguous; `Timeout` if no such row
    pub async fn remove_item(&self, name: &str) -> SwagResult<()> {
        tracing::debug!(item = name, "remove from cart page");
        let button = self.row(name).locator(Selector::css("button")).with_text("Remove");
        self.base.click(&button).await
    }

    /// Click "Continue Shopping"
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn continue_shopping(&self) -> SwagResult<()> {
        self.base
            .click(&self.base.locator(Selector::test_id("continue-shopping")))
            .await
    }

    /// Number of cart rows
    ///
    /// # Errors
    ///
    /// `Timeout` if the cart list never renders
    pub async fn cart_item_count(&self) -> SwagResult<usize> {
        self.base.count_within(&self.list(), &self.rows()).await
    }

    /// Header badge value, read independently of the rows
    ///
    /// # Errors
    ///
    /// `PageError` if the badge is not numeric
    pub async fn cart_badge_count(&self) -> SwagResult<usize> {
        self.header.badge_count().await
    }

    /// A row for `name` is shown
    ///
    /// # Errors
    ///
    /// `AssertionFailed` if it never appears
    pub async fn assert_item_in_cart(&self, name: &str) -> SwagResult<()> {
        self.base.expect(self.row(name)).to_be_visible().await
    }

    /// No row for `name` is shown
    ///
    /// # Errors
    ///
    /// `AssertionFailed` if it stays
    pub async fn assert_item_not_in_cart(&self, name: &str) -> SwagResult<()> {
        self.base.expect(self.row(name)).to_be_hidden().await
    }

    /// Exactly `count` rows
    ///
    /// # Errors
    ///
    /// `AssertionFailed` with the observed row count
    pub async fn assert_cart_item_count(&self, count: usize) -> SwagResult<()> {
        self.base.expect(self.rows()).to_have_count(count).await
    }

    /// Badge shows `count`; for `0` the badge must be absent
    ///
    /// # Errors
    ///
    /// `AssertionFailed` with the observed badge state
    pub async fn assert_cart_badge_count(&self, count: usize) -> SwagResult<()> {
        self.header.assert_badge_count(count).await
    }

    /// No rows in the cart
    ///
    /// # Errors
    ///
    /// `Timeout` if the cart list never renders
    pub async fn is_cart_empty(&self) -> SwagResult<bool> {
        Ok(self.cart_item_count().await? == 0)
    }

    /// Product names of the rows, in display order
    ///
    /// # Errors
    ///
    /// `Timeout` if the cart list never renders
    pub async fn cart_item_names(&self) -> SwagResult<Vec<String>> {
        let names = self.rows().locator(Selector::test_id("inventory-item-name"));
        self.base.texts_within(&self.list(), &names).await
    }
}

impl PageObject for CartPage {
    fn base(&self) -> &BasePage {
        &self.base
    }

    fn url_pattern(&self) -> UrlPattern {
        UrlPattern::glob("*/cart.html")
    }
}
