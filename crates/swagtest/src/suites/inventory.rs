//! Inventory suite: catalog listing, cart buttons, sorting and the menu.

use super::{case, check, check_eq, sign_in, TestSuite};
use crate::fixtures::PRODUCTS;
use crate::pages::{CartPage, SortOrder};
use crate::result::SwagResult;
use crate::session::Page;

/// The inventory suite
#[must_use]
pub fn suite() -> TestSuite {
    TestSuite::new("inventory")
        .with_test(case!(lists_every_product))
        .with_test(case!(add_and_remove_every_product))
        .with_test(case!(badge_tracks_cart_size))
        .with_test(case!(buttons_reflect_cart_state))
        .with_test(case!(sort_orders_are_applied))
        .with_test(case!(reset_app_state_empties_cart))
}

/// The catalog lists all six products
pub async fn lists_every_product(page: &Page) -> SwagResult<()> {
    let inventory = sign_in(page).await?;
    let expected: Vec<String> = PRODUCTS.all().iter().map(|p| p.name.to_string()).collect();
    check_eq("catalog rows", expected.len(), inventory.inventory_item_count().await?)?;
    check_eq("catalog names", expected, inventory.item_names().await?)?;
    let prices: Vec<u32> = PRODUCTS.all().iter().map(|p| p.price_cents).collect();
    check_eq("catalog prices", prices, inventory.item_prices().await?)
}

/// Each product can be added and removed again
pub async fn add_and_remove_every_product(page: &Page) -> SwagResult<()> {
    let inventory = sign_in(page).await?;
    for product in PRODUCTS.all() {
        inventory.add_item(product.name).await?;
        check(
            inventory.is_item_in_cart(product.name).await?,
            format!("{} not marked as in cart after add", product.name),
        )?;
        inventory.assert_cart_count(1).await?;

        inventory.remove_item(product.name).await?;
        inventory.assert_item_can_be_added(product.name).await?;
        inventory.assert_cart_count(0).await?;
    }
    Ok(())
}

/// Badge count follows every add and remove; hidden at zero
pub async fn badge_tracks_cart_size(page: &Page) -> SwagResult<()> {
    let inventory = sign_in(page).await?;
    check_eq("badge before adding", 0, inventory.cart_count().await?)?;
    inventory.assert_cart_count(0).await?;

    let products = PRODUCTS.all();
    for (i, product) in products.iter().enumerate() {
        inventory.add_item(product.name).await?;
        check_eq("badge", i + 1, inventory.cart_count().await?)?;
    }
    for (i, product) in products.iter().enumerate() {
        inventory.remove_item(product.name).await?;
        inventory.assert_cart_count(products.len() - i - 1).await?;
    }
    check_eq("badge after emptying", 0, inventory.cart_count().await?)
}

/// Row buttons read Remove exactly for the items in the cart
pub async fn buttons_reflect_cart_state(page: &Page) -> SwagResult<()> {
    let inventory = sign_in(page).await?;
    inventory.add_item(PRODUCTS.fleece_jacket.name).await?;
    inventory.add_item(PRODUCTS.onesie.name).await?;

    let mut in_cart = 0;
    for product in PRODUCTS.all() {
        if inventory.is_item_in_cart(product.name).await? {
            in_cart += 1;
        } else {
            inventory.assert_item_can_be_added(product.name).await?;
        }
    }
    check_eq("rows reading Remove", 2, in_cart)?;

    // Badge, cart rows and Remove buttons agree
    inventory.go_to_cart().await?;
    let cart = CartPage::new(page);
    check_eq("cart rows", in_cart, cart.cart_item_count().await?)?;
    check_eq("badge", in_cart, cart.cart_badge_count().await?)
}

/// Every sort order reorders names or prices as labelled
pub async fn sort_orders_are_applied(page: &Page) -> SwagResult<()> {
    let inventory = sign_in(page).await?;

    inventory.sort_by(SortOrder::NameDesc).await?;
    let names = inventory.item_names().await?;
    let mut sorted = names.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    check_eq("names Z to A", sorted, names)?;

    inventory.sort_by(SortOrder::PriceAsc).await?;
    let prices = inventory.item_prices().await?;
    check(prices.windows(2).all(|w| w[0] <= w[1]), format!("prices not ascending: {prices:?}"))?;
    check_eq("cheapest", Some(PRODUCTS.onesie.price_cents), prices.first().copied())?;

    inventory.sort_by(SortOrder::PriceDesc).await?;
    let prices = inventory.item_prices().await?;
    check(prices.windows(2).all(|w| w[0] >= w[1]), format!("prices not descending: {prices:?}"))?;
    check_eq("dearest", Some(PRODUCTS.fleece_jacket.price_cents), prices.first().copied())?;

    inventory.sort_by(SortOrder::NameAsc).await?;
    check_eq(
        "first by name",
        PRODUCTS.backpack.name.to_string(),
        inventory.item_names().await?.into_iter().next().unwrap_or_default(),
    )
}

/// Reset App State clears the cart and the badge
pub async fn reset_app_state_empties_cart(page: &Page) -> SwagResult<()> {
    let inventory = sign_in(page).await?;
    inventory.add_item(PRODUCTS.backpack.name).await?;
    inventory.add_item(PRODUCTS.bike_light.name).await?;
    inventory.assert_cart_count(2).await?;

    inventory.reset_app_state().await?;
    inventory.assert_cart_count(0).await?;

    inventory.go_to_cart().await?;
    check(CartPage::new(page).is_cart_empty().await?, "cart not empty after reset")
}
