//! Checkout flow: information, overview and completion screens.

use super::base::{BasePage, PageObject};
use crate::fixtures::Customer;
use crate::locator::{Locator, Selector};
use crate::result::{SwagError, SwagResult};
use crate::session::Page;
use crate::url_pattern::UrlPattern;

/// Parse the dollar amount in a label such as `"Tax: $3.20"` into cents.
///
/// Accepts thousands separators and zero to two decimals.
///
/// # Errors
///
/// `AssertionFailed` if the label holds no well-formed amount
pub fn parse_amount(label: &str) -> SwagResult<u32> {
    let invalid = || SwagError::AssertionFailed {
        message: format!("{label:?} does not contain a dollar amount"),
    };
    let (_, amount) = label.split_once('$').ok_or_else(invalid)?;
    let amount: String = amount.trim().chars().filter(|c| *c != ',').collect();
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount.as_str(), ""));
    if whole.is_empty()
        || fraction.len() > 2
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }
    let dollars: u32 = whole.parse().map_err(|_| invalid())?;
    let cents: u32 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<u32>().map_err(|_| invalid())? * 10,
        _ => fraction.parse().map_err(|_| invalid())?,
    };
    dollars
        .checked_mul(100)
        .and_then(|d| d.checked_add(cents))
        .ok_or_else(invalid)
}

/// The three checkout screens
#[derive(Debug, Clone)]
pub struct CheckoutPage {
    base: BasePage,
}

impl CheckoutPage {
    /// Checkout screens on `page`
    #[must_use]
    pub fn new(page: &Page) -> Self {
        Self {
            base: BasePage::new(page),
        }
    }

    fn by_test_id(&self, id: &str) -> Locator {
        self.base.locator(Selector::test_id(id))
    }

    fn error_banner(&self) -> Locator {
        self.by_test_id("error")
    }

    // Information step

    /// Type the first name (no submit)
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn fill_first_name(&self, value: &str) -> SwagResult<()> {
        self.base.fill(&self.by_test_id("firstName"), value).await
    }

    /// Type the last name (no submit)
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn fill_last_name(&self, value: &str) -> SwagResult<()> {
        self.base.fill(&self.by_test_id("lastName"), value).await
    }

    /// Type the postal code (no submit)
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn fill_postal_code(&self, value: &str) -> SwagResult<()> {
        self.base.fill(&self.by_test_id("postalCode"), value).await
    }

    /// Fill all three fields and press Continue
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn fill_customer_info(&self, first: &str, last: &str, postal: &str) -> SwagResult<()> {
        self.fill_first_name(first).await?;
        self.fill_last_name(last).await?;
        self.fill_postal_code(postal).await?;
        self.click_continue().await
    }

    /// [`CheckoutPage::fill_customer_info`] with a fixture customer
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn fill_customer(&self, customer: &Customer) -> SwagResult<()> {
        self.fill_customer_info(customer.first_name, customer.last_name, customer.postal_code)
            .await
    }

    /// Press Continue
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn click_continue(&self) -> SwagResult<()> {
        self.base.click(&self.by_test_id("continue")).await
    }

    /// Press Cancel: back to the cart from step one, to the catalog from step two
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn click_cancel(&self) -> SwagResult<()> {
        self.base.click(&self.by_test_id("cancel")).await
    }

    // Overview step

    /// `"Item total: $<amount>"`
    ///
    /// # Errors
    ///
    /// `Timeout` if the overview is not shown
    pub async fn item_total(&self) -> SwagResult<String> {
        self.base.text_of(&self.by_test_id("subtotal-label")).await
    }

    /// `"Tax: $<amount>"`
    ///
    /// # Errors
    ///
    /// `Timeout` if the overview is not shown
    pub async fn tax(&self) -> SwagResult<String> {
        self.base.text_of(&self.by_test_id("tax-label")).await
    }

    /// `"Total: $<amount>"`
    ///
    /// # Errors
    ///
    /// `Timeout` if the overview is not shown
    pub async fn total(&self) -> SwagResult<String> {
        self.base.text_of(&self.by_test_id("total-label")).await
    }

    /// Product names listed on the overview
    ///
    /// # Errors
    ///
    /// `Timeout` if the overview is not shown
    pub async fn overview_item_names(&self) -> SwagResult<Vec<String>> {
        let names = self
            .base
            .locator(Selector::class("cart_item"))
            .locator(Selector::test_id("inventory-item-name"));
        self.base
            .texts_within(&self.by_test_id("cart-list"), &names)
            .await
    }

    /// Press Finish
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn finish_order(&self) -> SwagResult<()> {
        tracing::debug!("finish order");
        self.base.click(&self.by_test_id("finish")).await
    }

    /// See [`parse_amount`]
    ///
    /// # Errors
    ///
    /// `AssertionFailed` if the label holds no amount
    pub fn parse_amount(label: &str) -> SwagResult<u32> {
        parse_amount(label)
    }

    // Complete step

    /// Confirmation heading, `""` when absent
    ///
    /// # Errors
    ///
    /// Only engine failures
    pub async fn confirmation_header(&self) -> SwagResult<String> {
        self.base.text_or_empty(&self.by_test_id("complete-header")).await
    }

    /// Confirmation body text, `""` when absent
    ///
    /// # Errors
    ///
    /// Only engine failures
    pub async fn confirmation_message(&self) -> SwagResult<String> {
        self.base.text_or_empty(&self.by_test_id("complete-text")).await
    }

    /// Heading and "Back Home" button are both shown
    ///
    /// # Errors
    ///
    /// `AssertionFailed` naming whichever is missing
    pub async fn assert_on_complete_page(&self) -> SwagResult<()> {
        self.base
            .expect(self.by_test_id("complete-header"))
            .to_be_visible()
            .await?;
        self.base
            .expect(self.by_test_id("back-to-products"))
            .to_be_visible()
            .await
    }

    /// Press "Back Home"
    ///
    /// # Errors
    ///
    /// Propagates engine failures
    pub async fn back_to_home(&self) -> SwagResult<()> {
        self.base.click(&self.by_test_id("back-to-products")).await
    }

    // Errors

    /// Validation banner text, `""` when absent
    ///
    /// # Errors
    ///
    /// Only engine failures
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

    /// A validation banner is shown
    ///
    /// # Errors
    ///
    /// `AssertionFailed` if none appears
    pub async fn assert_error_visible(&self) -> SwagResult<()> {
        self.base.expect(self.error_banner()).to_be_visible().await
    }
}

impl PageObject for CheckoutPage {
    fn base(&self) -> &BasePage {
        &self.base
    }

    fn url_pattern(&self) -> UrlPattern {
        UrlPattern::contains("/checkout-")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod parse_amount_tests {
        use super::*;

        #[test]
        fn test_labels() {
            assert_eq!(parse_amount("Item total: $39.98").unwrap(), 3998);
            assert_eq!(parse_amount("Tax: $3.20").unwrap(), 320);
            assert_eq!(parse_amount("$7").unwrap(), 700);
            assert_eq!(parse_amount("$3.2").unwrap(), 320);
            assert_eq!(parse_amount("Total: $1,043.18").unwrap(), 104_318);
            assert_eq!(CheckoutPage::parse_amount("$0.05").unwrap(), 5);
        }

        #[test]
        fn test_rejects_malformed() {
            for label in ["Total: 43.18", "$", "$.50", "$1.234", "$4x.00", ""] {
                let err = parse_amount(label).unwrap_err();
                assert!(err.is_assertion(), "{label}");
            }
        }

        proptest! {
            #[test]
            fn prop_formatted_cents_parse_back(cents in 0u32..10_000_000) {
                let label = format!("Total: ${}.{:02}", cents / 100, cents % 100);
                prop_assert_eq!(parse_amount(&label).unwrap(), cents);
            }

            #[test]
            fn prop_never_panics(label in "\\PC{0,20}") {
                let _ = parse_amount(&label);
            }
        }
    }
}
