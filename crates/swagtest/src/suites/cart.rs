//! Cart suite: contents, removal and navigation out of the cart.

use super::{case, check, check_eq, inventory_url, sign_in, TestSuite};
use crate::fixtures::PRODUCTS;
use crate::pages::{CartPage, PageObject};
use crate::result::SwagResult;
use crate::session::Page;
use std::collections::BTreeSet;

/// The cart suite
#[must_use]
pub fn suite() -> TestSuite {
    TestSuite::new("cart")
        .with_test(case!(added_items_appear_in_cart))
        .with_test(case!(cart_lists_exactly_what_was_added))
        .with_test(case!(remove_from_cart_page))
        .with_test(case!(continue_shopping_returns_to_inventory))
        .with_test(case!(cart_survives_direct_navigation))
}

/// Items added on the catalog are listed in the cart
pub async fn added_items_appear_in_cart(page: &Page) -> SwagResult<()> {
    let inventory = sign_in(page).await?;
    inventory.add_item(PRODUCTS.backpack.name).await?;
    inventory.add_item(PRODUCTS.bike_light.name).await?;
    inventory.assert_cart_count(2).await?;

    inventory.go_to_cart().await?;
    let cart = CartPage::new(page);
    cart.wait_until_loaded().await?;
    cart.assert_item_in_cart(PRODUCTS.backpack.name).await?;
    cart.assert_item_in_cart(PRODUCTS.bike_light.name).await?;
    cart.assert_cart_item_count(2).await?;
    cart.assert_cart_badge_count(2).await
}

/// Cart rows are the added set, nothing more
pub async fn cart_lists_exactly_what_was_added(page: &Page) -> SwagResult<()> {
    let inventory = sign_in(page).await?;
    let picked = [PRODUCTS.bolt_t_shirt, PRODUCTS.onesie, PRODUCTS.red_t_shirt];
    for product in &picked {
        inventory.add_item(product.name).await?;
    }

    inventory.go_to_cart().await?;
    let cart = CartPage::new(page);
    let expected: BTreeSet<String> = picked.iter().map(|p| p.name.to_string()).collect();
    let actual: BTreeSet<String> = cart.cart_item_names().await?.into_iter().collect();
    check_eq("cart contents", expected, actual)?;
    cart.assert_item_not_in_cart(PRODUCTS.backpack.name).await
}

/// Removing a row updates rows and badge together
pub async fn remove_from_cart_page(page: &Page) -> SwagResult<()> {
    let inventory = sign_in(page).await?;
    inventory.add_item(PRODUCTS.backpack.name).await?;
    inventory.add_item(PRODUCTS.fleece_jacket.name).await?;
    inventory.go_to_cart().await?;

    let cart = CartPage::new(page);
    cart.remove_item(PRODUCTS.backpack.name).await?;
    cart.assert_item_not_in_cart(PRODUCTS.backpack.name).await?;
    cart.assert_cart_item_count(1).await?;
    cart.assert_cart_badge_count(1).await?;

    cart.remove_item(PRODUCTS.fleece_jacket.name).await?;
    check(cart.is_cart_empty().await?, "cart not empty after removing everything")?;
    cart.assert_cart_badge_count(0).await
}

/// Continue Shopping goes back to the catalog, cart intact
pub async fn continue_shopping_returns_to_inventory(page: &Page) -> SwagResult<()> {
    let inventory = sign_in(page).await?;
    inventory.add_item(PRODUCTS.onesie.name).await?;
    inventory.go_to_cart().await?;

    let cart = CartPage::new(page);
    cart.continue_shopping().await?;
    cart.base().wait_for_url(&inventory_url()?).await?;
    check(
        inventory.is_item_in_cart(PRODUCTS.onesie.name).await?,
        "item lost after continue shopping",
    )
}

/// Cart contents persist across direct page loads
pub async fn cart_survives_direct_navigation(page: &Page) -> SwagResult<()> {
    let inventory = sign_in(page).await?;
    inventory.add_item(PRODUCTS.bike_light.name).await?;

    let cart = CartPage::new(page);
    cart.open().await?;
    check_eq(
        "cart names",
        vec![PRODUCTS.bike_light.name.to_string()],
        cart.cart_item_names().await?,
    )?;
    check_eq("badge", 1, cart.cart_badge_count().await?)
}
