//! Checkout suite: validation, totals, cancellation and order completion.

use super::{case, check, check_eq, inventory_url, sign_in, TestSuite};
use crate::fixtures::{messages, Product, CUSTOMERS, PRODUCTS};
use crate::pages::{parse_amount, CartPage, CheckoutPage, InventoryPage, PageObject};
use crate::result::SwagResult;
use crate::session::Page;

/// The checkout suite
#[must_use]
pub fn suite() -> TestSuite {
    TestSuite::new("checkout")
        .with_test(case!(complete_purchase))
        .with_test(case!(missing_first_name_is_reported))
        .with_test(case!(empty_form_reports_first_name_first))
        .with_test(case!(missing_last_name_is_reported))
        .with_test(case!(missing_postal_code_is_reported))
        .with_test(case!(overview_totals_add_up))
        .with_test(case!(international_customer_is_accepted))
        .with_test(case!(cancel_information_returns_to_cart))
        .with_test(case!(cancel_overview_returns_to_inventory))
}

/// Sign in, add `products`, open the cart and start checkout
async fn start_checkout(page: &Page, products: &[Product]) -> SwagResult<CheckoutPage> {
    let inventory = sign_in(page).await?;
    for product in products {
        inventory.add_item(product.name).await?;
    }
    inventory.go_to_cart().await?;
    CartPage::new(page).begin_checkout().await?;
    let checkout = CheckoutPage::new(page);
    checkout.wait_until_loaded().await?;
    Ok(checkout)
}

/// Full purchase: cart, information, overview, confirmation, empty cart after
pub async fn complete_purchase(page: &Page) -> SwagResult<()> {
    let checkout = start_checkout(page, &[PRODUCTS.backpack, PRODUCTS.bike_light]).await?;
    let customer = CUSTOMERS.valid;
    checkout
        .fill_customer_info(customer.first_name, customer.last_name, customer.postal_code)
        .await?;
    checkout.finish_order().await?;

    checkout.assert_on_complete_page().await?;
    let header = checkout.confirmation_header().await?;
    check(
        header.contains(messages::ORDER_COMPLETE_HEADER),
        format!("confirmation header reads {header:?}"),
    )?;
    check_eq(
        "confirmation text",
        messages::ORDER_COMPLETE_TEXT.to_string(),
        checkout.confirmation_message().await?,
    )?;

    checkout.back_to_home().await?;
    checkout.base().wait_for_url(&inventory_url()?).await?;
    InventoryPage::new(page).assert_cart_count(0).await
}

/// Last name and postal code alone are not enough
pub async fn missing_first_name_is_reported(page: &Page) -> SwagResult<()> {
    let checkout = start_checkout(page, &[PRODUCTS.backpack]).await?;
    checkout.fill_last_name(CUSTOMERS.valid.last_name).await?;
    checkout.fill_postal_code(CUSTOMERS.valid.postal_code).await?;
    checkout.click_continue().await?;

    checkout.assert_error_visible().await?;
    checkout.assert_error_message(messages::FIRST_NAME_REQUIRED).await
}

/// An empty form reports the first name, not the others
pub async fn empty_form_reports_first_name_first(page: &Page) -> SwagResult<()> {
    let checkout = start_checkout(page, &[PRODUCTS.onesie]).await?;
    checkout.click_continue().await?;
    check_eq(
        "first error",
        messages::FIRST_NAME_REQUIRED.to_string(),
        checkout.error_message().await?,
    )
}

/// First name given, last name missing
pub async fn missing_last_name_is_reported(page: &Page) -> SwagResult<()> {
    let checkout = start_checkout(page, &[PRODUCTS.onesie]).await?;
    checkout.fill_first_name(CUSTOMERS.valid.first_name).await?;
    checkout.fill_postal_code(CUSTOMERS.valid.postal_code).await?;
    checkout.click_continue().await?;
    checkout.assert_error_message(messages::LAST_NAME_REQUIRED).await
}

/// Both names given, postal code missing
pub async fn missing_postal_code_is_reported(page: &Page) -> SwagResult<()> {
    let checkout = start_checkout(page, &[PRODUCTS.onesie]).await?;
    checkout.fill_first_name(CUSTOMERS.valid.first_name).await?;
    checkout.fill_last_name(CUSTOMERS.valid.last_name).await?;
    checkout.click_continue().await?;
    checkout.assert_error_message(messages::POSTAL_CODE_REQUIRED).await
}

/// Item total, 8% tax and total agree with the catalog prices
pub async fn overview_totals_add_up(page: &Page) -> SwagResult<()> {
    let picked = [PRODUCTS.backpack, PRODUCTS.bike_light, PRODUCTS.red_t_shirt];
    let checkout = start_checkout(page, &picked).await?;
    checkout.fill_customer(&CUSTOMERS.valid).await?;

    let mut names = checkout.overview_item_names().await?;
    names.sort();
    let mut expected: Vec<String> = picked.iter().map(|p| p.name.to_string()).collect();
    expected.sort();
    check_eq("overview items", expected, names)?;

    let item_total = checkout.item_total().await?;
    let tax = checkout.tax().await?;
    let total = checkout.total().await?;
    check(item_total.starts_with("Item total: $"), format!("item total label {item_total:?}"))?;
    check(tax.starts_with("Tax: $"), format!("tax label {tax:?}"))?;
    check(total.starts_with("Total: $"), format!("total label {total:?}"))?;

    let subtotal: u32 = picked.iter().map(|p| p.price_cents).sum();
    check_eq("item total", subtotal, parse_amount(&item_total)?)?;
    check_eq("tax", (subtotal * 8 + 50) / 100, parse_amount(&tax)?)?;
    check_eq("total", parse_amount(&item_total)? + parse_amount(&tax)?, parse_amount(&total)?)
}

/// Accented names and a UK postcode pass validation
pub async fn international_customer_is_accepted(page: &Page) -> SwagResult<()> {
    let checkout = start_checkout(page, &[PRODUCTS.fleece_jacket]).await?;
    checkout.fill_customer(&CUSTOMERS.international).await?;
    check_eq("error banner", String::new(), checkout.error_message().await?)?;
    check_eq("overview total", "Total: $53.99".to_string(), checkout.total().await?)?;
    checkout.finish_order().await?;
    checkout.assert_on_complete_page().await
}

/// Cancel on step one goes back to the cart
pub async fn cancel_information_returns_to_cart(page: &Page) -> SwagResult<()> {
    let checkout = start_checkout(page, &[PRODUCTS.bolt_t_shirt]).await?;
    checkout.click_cancel().await?;

    let cart = CartPage::new(page);
    cart.wait_until_loaded().await?;
    cart.assert_item_in_cart(PRODUCTS.bolt_t_shirt.name).await
}

/// Cancel on the overview goes back to the catalog
pub async fn cancel_overview_returns_to_inventory(page: &Page) -> SwagResult<()> {
    let checkout = start_checkout(page, &[PRODUCTS.bolt_t_shirt]).await?;
    checkout.fill_customer(&CUSTOMERS.valid).await?;
    checkout.click_cancel().await?;

    checkout.base().wait_for_url(&inventory_url()?).await?;
    InventoryPage::new(page).assert_cart_count(1).await
}
