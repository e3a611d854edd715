//! Property-based tests for cart behaviour.
//!
//! Uses proptest to pick arbitrary product subsets and checks that the
//! badge, the inventory "Remove" buttons and the cart rows always agree.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use std::collections::BTreeSet;
use swagtest::fixtures::{Product, PRODUCTS, USERS};
use swagtest::pages::{parse_amount, CartPage, CheckoutPage, InventoryPage, LoginPage, PageObject};
use swagtest::{Selector, Session};

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

async fn signed_in() -> (Session, InventoryPage) {
    let session = Session::simulated().unwrap();
    let login = LoginPage::new(session.page());
    login.open().await.unwrap();
    login.login_as(&USERS.standard).await.unwrap();
    let inventory = InventoryPage::new(session.page());
    inventory.wait_until_loaded().await.unwrap();
    (session, inventory)
}

fn subset() -> impl Strategy<Value = Vec<Product>> {
    proptest::sample::subsequence(PRODUCTS.all().to_vec(), 0..=6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Badge is shown exactly when the cart is non-empty and reads the count.
    #[test]
    fn prop_badge_matches_cart_size(picked in subset()) {
        block_on(async {
            let (session, inventory) = signed_in().await;
            for product in &picked {
                inventory.add_item(product.name).await.unwrap();
            }
            let badge = session.page().locator(Selector::class("shopping_cart_badge"));
            let driver = session.page().driver();
            let shown = driver.count(&badge).await.unwrap() == 1;
            prop_assert_eq!(shown, !picked.is_empty());
            if shown {
                let text = driver.text_content(&badge).await.unwrap().unwrap();
                prop_assert_eq!(text, picked.len().to_string());
            }
            prop_assert_eq!(inventory.cart_count().await.unwrap(), picked.len());
            prop_assert_eq!(inventory.remove_button_count().await.unwrap(), picked.len());
            Ok(())
        })?;
    }

    /// Badge, inventory "Remove" buttons and cart rows are three reads of one count.
    #[test]
    fn prop_badge_buttons_and_rows_agree(picked in subset()) {
        block_on(async {
            let (session, inventory) = signed_in().await;
            for product in &picked {
                inventory.add_item(product.name).await.unwrap();
            }
            let badge = inventory.cart_count().await.unwrap();
            let buttons = inventory.remove_button_count().await.unwrap();

            inventory.go_to_cart().await.unwrap();
            let cart = CartPage::new(session.page());
            let rows = cart.cart_item_count().await.unwrap();
            prop_assert_eq!(badge, buttons);
            prop_assert_eq!(buttons, rows);
            prop_assert_eq!(rows, picked.len());
            prop_assert_eq!(cart.cart_badge_count().await.unwrap(), rows);
            Ok(())
        })?;
    }

    /// Cart names after adding a subset equal that subset as a set.
    #[test]
    fn prop_cart_round_trip(picked in subset()) {
        block_on(async {
            let (session, inventory) = signed_in().await;
            for product in &picked {
                inventory.add_item(product.name).await.unwrap();
            }
            inventory.go_to_cart().await.unwrap();
            let cart = CartPage::new(session.page());
            let expected: BTreeSet<String> = picked.iter().map(|p| p.name.to_string()).collect();
            let actual: BTreeSet<String> = cart.cart_item_names().await.unwrap().into_iter().collect();
            prop_assert_eq!(expected, actual);
            prop_assert_eq!(cart.is_cart_empty().await.unwrap(), picked.is_empty());
            Ok(())
        })?;
    }

    /// Adding then removing any subset, in any order, leaves an empty cart.
    #[test]
    fn prop_add_remove_symmetry(picked in subset().prop_shuffle()) {
        block_on(async {
            let (_session, inventory) = signed_in().await;
            for product in &picked {
                inventory.add_item(product.name).await.unwrap();
            }
            for product in picked.iter().rev() {
                prop_assert!(inventory.is_item_in_cart(product.name).await.unwrap());
                inventory.remove_item(product.name).await.unwrap();
                inventory.assert_item_can_be_added(product.name).await.unwrap();
                let left = inventory.cart_count().await.unwrap();
                prop_assert_eq!(inventory.remove_button_count().await.unwrap(), left);
            }
            prop_assert_eq!(inventory.cart_count().await.unwrap(), 0);
            Ok(())
        })?;
    }

    /// Overview item total is the sum of prices and total adds tax on top.
    #[test]
    fn prop_overview_totals(picked in proptest::sample::subsequence(PRODUCTS.all().to_vec(), 1..=6)) {
        block_on(async {
            let (session, inventory) = signed_in().await;
            for product in &picked {
                inventory.add_item(product.name).await.unwrap();
            }
            inventory.go_to_cart().await.unwrap();
            CartPage::new(session.page()).begin_checkout().await.unwrap();
            let checkout = CheckoutPage::new(session.page());
            checkout.fill_customer_info("Ada", "Lovelace", "12345").await.unwrap();

            let subtotal: u32 = picked.iter().map(|p| p.price_cents).sum();
            let item_total = parse_amount(&checkout.item_total().await.unwrap()).unwrap();
            let tax = parse_amount(&checkout.tax().await.unwrap()).unwrap();
            let total = parse_amount(&checkout.total().await.unwrap()).unwrap();
            prop_assert_eq!(item_total, subtotal);
            prop_assert_eq!(tax, (subtotal * 8 + 50) / 100);
            prop_assert_eq!(total, item_total + tax);
            Ok(())
        })?;
    }
}
