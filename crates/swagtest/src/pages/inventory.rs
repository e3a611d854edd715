//! Product catalog screen.

use super::base::{BasePage, PageObject};
use super::checkout::parse_amount;
use super::header::Header;
use crate::fixtures::paths;
use crate::locator::{Locator, Selector};
use crate::result::{SwagError, SwagResult};
use crate::session::Page;
use crate::url_pattern::UrlPattern;
use std::fmt;
use std::str::FromStr;

/// Orderings offered by the sort dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Name (A to Z)
    NameAsc,
    /// Name (Z to A)
    NameDesc,
    /// Price (low to high)
    PriceAsc,
    /// Price (high to low)
    PriceDesc,
}

impl SortOrder {
    /// Every ordering
    pub const ALL: [Self; 4] = [Self::NameAsc, Self::NameDesc, Self::PriceAsc, Self::PriceDesc];

    /// `<option value>` in the dropdown
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::NameAsc => "az",
            Self::NameDesc => "za",
            Self::PriceAsc => "lohi",
            Self::PriceDesc => "hilo",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for SortOrder {
    type Err = SwagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.value() == s)
            .ok_or_else(|| SwagError::config(format!("unknown sort order {s:?}")))
    }
}

/// The catalog at `/inventory.html`
#[derive(Debug, Clone)]
pub struct InventoryPage {
    base: BasePage,
    header: Header,
}

impl InventoryPage {
    /// Catalog screen on `page`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        let base = BasePage::new(page);
        Self {
            header: Header::new(base.clone()),
            base,
        }
    }

    fn list(&self) -> Locator {
        self.base.locator(Selector::test_id("inventory-list"))
    }

    fn rows(&self) -> Locator {
        self.base.locator(Selector::test_id("inventory-item"))
    }

    /// Catalog row whose text contains `name`
    fn row(&self, name: &str) -> Locator {
        self.rows().with_text(name)
    }

    fn row_button(&self, name: &str) -> Locator {
        self.row(name).locator(Selector::css("button"))
    }

    /// The shared header
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Load the catalog directly
    ///
    /// # Errors
    ///
    /// `NavigationError` if the storefront is unreachable
    pub async fn open(&self) -> SwagResult<()> {
        self.base.navigate(paths::INVENTORY).await
    }

    /// Click "Add to cart" on the row for `name`
    ///
    /// # Errors
    ///
    /// `StrictModeViolation` if `name` matches several rows; `Timeout` if no
    /// row offers "Add to cart"
    pub async fn add_item(&self, name: &str) -> SwagResult<()> {
        tracing::debug!(item = name, "add to cart");
        self.base
            .click(&self.row_button(name).with_text("Add to cart"))
            .await
    }

    /// Click "Remove" on the row for `name`
    ///
    /// # Errors
    ///
    /// `StrictModeViolation` if `name` matches several rows; `Timeout` if no
    /// row offers "Remove"
    pub async fn remove_item(&self, name: &str) -> SwagResult<()> {
        tracing::debug!(item = name, "remove from cart");
        self.base.click(&self.row_button(name).with_text("Remove")).await
    }

    /// Click the cart icon
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn go_to_cart(&self) -> SwagResult<()> {
        self.header.open_cart().await
    }

    /// Badge value, `0` when absent
    ///
    /// # Errors
    ///
    /// `PageError` if the badge is not numeric
    pub async fn cart_count(&self) -> SwagResult<usize> {
        self.header.badge_count().await
    }

    /// Badge shows `count`; for `0` the badge must be absent
    ///
    /// # Errors
    ///
    /// `AssertionFailed` with the observed badge state
    pub async fn assert_cart_count(&self, count: usize) -> SwagResult<()> {
        self.header.assert_badge_count(count).await
    }

    /// Whether the row's control reads "Remove"
    ///
    /// # Errors
    ///
    /// `Timeout` if the row never shows; `StrictModeViolation` if ambiguous
    pub async fn is_item_in_cart(&self, name: &str) -> SwagResult<bool> {
        Ok(self.base.text_of(&self.row_button(name)).await? == "Remove")
    }

    /// The row's control reads "Add to cart"
    ///
    /// # Errors
    ///
    /// `AssertionFailed` with the control's actual text
    pub async fn assert_item_can_be_added(&self, name: &str) -> SwagResult<()> {
        self.base
            .expect(self.row_button(name))
            .to_have_text("Add to cart")
            .await
    }

    /// Number of catalog rows
    ///
    /// # Errors
    ///
    /// `Timeout` if the catalog never renders
    pub async fn inventory_item_count(&self) -> SwagResult<usize> {
        self.base.count_within(&self.list(), &self.rows()).await
    }

    /// Number of rows whose button currently reads "Remove"
    ///
    /// # Errors
    ///
    /// `Timeout` if the catalog never renders
    pub async fn remove_button_count(&self) -> SwagResult<usize> {
        let buttons = self.rows().locator(Selector::css("button")).with_text("Remove");
        self.base.count_within(&self.list(), &buttons).await
    }

    /// Product names in display order
    ///
    /// # Errors
    ///
    /// `Timeout` if the catalog never renders
    pub async fn item_names(&self) -> SwagResult<Vec<String>> {
        let names = self.rows().locator(Selector::test_id("inventory-item-name"));
        self.base.texts_within(&self.list(), &names).await
    }

    /// Listed prices in cents, in display order
    ///
    /// # Errors
    ///
    /// `Timeout` if the catalog never renders; `AssertionFailed` on a price
    /// that is not a dollar amount
    pub async fn item_prices(&self) -> SwagResult<Vec<u32>> {
        let prices = self.rows().locator(Selector::test_id("inventory-item-price"));
        self.base
            .texts_within(&self.list(), &prices)
            .await?
            .iter()
            .map(|label| parse_amount(label))
            .collect()
    }

    /// Pick an ordering in the sort dropdown
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn sort_by(&self, order: SortOrder) -> SwagResult<()> {
        self.base
            .select_option(
                &self.base.locator(Selector::test_id("product-sort-container")),
                order.value(),
            )
            .await
    }

    /// Log out through the burger menu
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn logout(&self) -> SwagResult<()> {
        self.header.logout().await
    }

    /// Reset App State through the burger menu
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn reset_app_state(&self) -> SwagResult<()> {
        self.header.reset_app_state().await
    }
}

impl PageObject for InventoryPage {
    fn base(&self) -> &BasePage {
        &self.base
    }

    fn url_pattern(&self) -> UrlPattern {
        UrlPattern::glob("*/inventory.html")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::{PRODUCTS, USERS};
    use crate::pages::LoginPage;
    use crate::session::Session;

    async fn signed_in() -> (Session, InventoryPage) {
        let session = Session::simulated().unwrap();
        let login = LoginPage::new(session.page());
        login.open().await.unwrap();
        login.login_as(&USERS.standard).await.unwrap();
        let inventory = InventoryPage::new(session.page());
        (session, inventory)
    }

    #[test]
    fn test_sort_order_values() {
        assert_eq!("hilo".parse::<SortOrder>().unwrap(), SortOrder::PriceDesc);
        assert!("random".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::NameAsc.to_string(), "az");
    }

    #[tokio::test]
    async fn test_add_twice_times_out_second_time() {
        let (_session, inventory) = signed_in().await;
        inventory.add_item(PRODUCTS.onesie.name).await.unwrap();
        let err = inventory.add_item(PRODUCTS.onesie.name).await.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(inventory.cart_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ambiguous_name_is_strict_violation() {
        let (_session, inventory) = signed_in().await;
        let err = inventory.add_item("T-Shirt").await.unwrap_err();
        assert!(matches!(err, SwagError::StrictModeViolation { count: 2, .. }));
    }

    #[tokio::test]
    async fn test_remove_buttons_follow_cart() {
        let (_session, inventory) = signed_in().await;
        assert_eq!(inventory.remove_button_count().await.unwrap(), 0);
        inventory.add_item(PRODUCTS.backpack.name).await.unwrap();
        inventory.add_item(PRODUCTS.onesie.name).await.unwrap();
        assert_eq!(inventory.remove_button_count().await.unwrap(), 2);
        inventory.remove_item(PRODUCTS.backpack.name).await.unwrap();
        assert_eq!(inventory.remove_button_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_item_prices_default_order() {
        let (_session, inventory) = signed_in().await;
        let expected: Vec<u32> = PRODUCTS.all().iter().map(|p| p.price_cents).collect();
        assert_eq!(inventory.item_prices().await.unwrap(), expected);
        assert_eq!(inventory.inventory_item_count().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_page_name() {
        let (_session, inventory) = signed_in().await;
        assert_eq!(inventory.page_name(), "InventoryPage");
        inventory.wait_until_loaded().await.unwrap();
    }
}
