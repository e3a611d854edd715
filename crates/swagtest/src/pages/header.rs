//! Header shared by every signed-in screen: cart link, badge and burger menu.

use super::base::BasePage;
use crate::locator::{Locator, Selector};
use crate::result::{SwagError, SwagResult};

/// The primary header component
#[derive(Debug, Clone)]
pub struct Header {
    base: BasePage,
}

impl Header {
    /// Header of the screen `base` is on
    #[must_use]
    pub const fn new(base: BasePage) -> Self {
        Self { base }
    }

    fn badge(&self) -> Locator {
        self.base.locator(Selector::test_id("shopping-cart-badge"))
    }

    fn cart_link(&self) -> Locator {
        self.base.locator(Selector::test_id("shopping-cart-link"))
    }

    /// Click the cart icon
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn open_cart(&self) -> SwagResult<()> {
        self.base.click(&self.cart_link()).await
    }

    /// Badge value, `0` when the badge is not rendered
    ///
    /// # Errors
    ///
    /// `PageError` if the badge holds something other than a number
    pub async fn badge_count(&self) -> SwagResult<usize> {
        let text = self.base.text_or_empty(&self.badge()).await?;
        if text.is_empty() {
            return Ok(0);
        }
        text.parse().map_err(|_| SwagError::PageError {
            message: format!("cart badge shows {text:?}, not a count"),
        })
    }

    /// Assert the badge shows `count`; for `0` the badge must be absent
    ///
    /// # Errors
    ///
    /// `AssertionFailed` with the observed badge state
    pub async fn assert_badge_count(&self, count: usize) -> SwagResult<()> {
        let badge = self.base.expect(self.badge());
        if count == 0 {
            badge.to_be_hidden().await
        } else {
            badge.to_have_text(&count.to_string()).await
        }
    }

    async fn menu_item(&self, id: &str) -> SwagResult<()> {
        self.base
            .click(&self.base.locator(Selector::id("react-burger-menu-btn")))
            .await?;
        self.base.click(&self.base.locator(Selector::id(id))).await
    }

    /// Menu → Logout
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn logout(&self) -> SwagResult<()> {
        self.menu_item("logout_sidebar_link").await
    }

    /// Menu → Reset App State, then close the menu
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn reset_app_state(&self) -> SwagResult<()> {
        self.menu_item("reset_sidebar_link").await?;
        self.base
            .click(&self.base.locator(Selector::id("react-burger-cross-btn")))
            .await
    }

    /// Menu → All Items
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn all_items(&self) -> SwagResult<()> {
        self.menu_item("inventory_sidebar_link").await
    }
}
