//! Registered test suites, one per storefront feature.
//!
//! Every test is an `async fn(&Page) -> SwagResult<()>` that builds page
//! objects on the page it is handed, drives a scripted flow with fixture data
//! and returns the first failed expectation. Tests never share state: the
//! runner hands each attempt a fresh session.

pub mod cart;
pub mod checkout;
pub mod inventory;
pub mod login;

use crate::fixtures::USERS;
use crate::pages::{InventoryPage, LoginPage, PageObject};
use crate::result::{SwagError, SwagResult};
use crate::session::Page;
use crate::url_pattern::UrlPattern;
use futures::future::BoxFuture;
use std::fmt;

/// Entry point of a registered test
pub type TestFn = for<'a> fn(&'a Page) -> BoxFuture<'a, SwagResult<()>>;

/// A single registered test
#[derive(Clone, Copy)]
pub struct TestCase {
    /// Test name, unique within its suite
    pub name: &'static str,
    /// Test body
    pub run: TestFn,
    /// Per-test budget overriding the run's `test_timeout_ms`
    pub timeout_ms: Option<u64>,
}

impl TestCase {
    /// Register `run` under `name`
    #[must_use]
    pub const fn new(name: &'static str, run: TestFn) -> Self {
        Self {
            name,
            run,
            timeout_ms: None,
        }
    }

    /// Set timeout
    #[must_use]
    pub const fn with_timeout(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

/// A test suite containing multiple tests
#[derive(Debug, Clone)]
pub struct TestSuite {
    /// Suite name
    pub name: &'static str,
    /// Tests in this suite
    pub tests: Vec<TestCase>,
}

impl TestSuite {
    /// Create an empty suite
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            tests: Vec::new(),
        }
    }

    /// Add a test case
    #[must_use]
    pub fn with_test(mut self, test: TestCase) -> Self {
        self.tests.push(test);
        self
    }

    /// Get the number of tests
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.tests.len()
    }

    /// Keep only tests whose `suite::name` id contains `filter`
    #[must_use]
    pub fn filtered(mut self, filter: &str) -> Self {
        let name = self.name;
        self.tests
            .retain(|t| format!("{name}::{}", t.name).contains(filter));
        self
    }
}

/// Wrap an `async fn(&Page) -> SwagResult<()>` as a [`TestCase`]
macro_rules! case {
    ($test:ident) => {{
        fn run(page: &$crate::session::Page) -> ::futures::future::BoxFuture<'_, $crate::result::SwagResult<()>> {
            Box::pin($test(page))
        }
        $crate::suites::TestCase::new(stringify!($test), run)
    }};
}
pub(crate) use case;

/// Every registered suite
#[must_use]
pub fn all() -> Vec<TestSuite> {
    vec![login::suite(), inventory::suite(), cart::suite(), checkout::suite()]
}

/// Suites narrowed by an optional `suite::test` substring filter, empty ones dropped
#[must_use]
pub fn select(filter: Option<&str>) -> Vec<TestSuite> {
    all()
        .into_iter()
        .map(|suite| match filter {
            Some(f) => suite.filtered(f),
            None => suite,
        })
        .filter(|suite| suite.test_count() > 0)
        .collect()
}

/// Fail with expected/actual unless they are equal
pub(crate) fn check_eq<T: PartialEq + fmt::Debug>(what: &str, expected: T, actual: T) -> SwagResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(SwagError::assertion(what, expected, actual))
    }
}

/// Fail with `message` unless `condition` holds
pub(crate) fn check(condition: bool, message: impl Into<String>) -> SwagResult<()> {
    if condition {
        Ok(())
    } else {
        Err(SwagError::AssertionFailed {
            message: message.into(),
        })
    }
}

/// Pattern for the catalog address
pub(crate) fn inventory_url() -> SwagResult<UrlPattern> {
    UrlPattern::regex("/inventory")
}

/// Sign in as `standard_user` and wait for the catalog
pub(crate) async fn sign_in(page: &Page) -> SwagResult<InventoryPage> {
    let login = LoginPage::new(page);
    login.open().await?;
    login.login_as(&USERS.standard).await?;
    let inventory = InventoryPage::new(page);
    inventory.wait_until_loaded().await?;
    Ok(inventory)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique_within_suites() {
        for suite in all() {
            for (i, test) in suite.tests.iter().enumerate() {
                assert!(
                    suite.tests[i + 1..].iter().all(|t| t.name != test.name),
                    "{}::{} registered twice",
                    suite.name,
                    test.name
                );
            }
        }
    }

    #[test]
    fn test_every_feature_has_a_suite() {
        let names: Vec<&str> = all().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["login", "inventory", "cart", "checkout"]);
        assert!(all().iter().all(|s| s.test_count() > 0));
    }

    #[test]
    fn test_select_filters_by_id() {
        let selected = select(Some("checkout::"));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "checkout");
        assert!(select(Some("no_such_test")).is_empty());
        assert_eq!(select(None).len(), 4);
    }

    #[test]
    fn test_check_helpers() {
        check_eq("badge", 2, 2).unwrap();
        assert!(check_eq("badge", 2, 3).unwrap_err().to_string().contains("expected 2"));
        assert!(check(false, "nope").unwrap_err().is_assertion());
    }
}
