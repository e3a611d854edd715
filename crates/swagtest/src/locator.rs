//! Locator abstraction for element selection.
//!
//! A [`Locator`] is an immutable chain of selector steps. Page objects build a
//! fresh one on every call; nothing is cached, because the storefront rebuilds
//! its DOM on every navigation.
//!
//! # Design Philosophy
//!
//! - **Auto-Waiting**: the driver waits for located elements to be actionable
//! - **Strict Selection**: single-element operations fail if several elements match
//! - **Scoping**: `.locator()` narrows to descendants, `.with_text()` filters by text
//! - **Fluent API**: chainable methods, each returning a new locator

use std::fmt;
use std::time::Duration;

/// Default timeout for auto-waiting actions (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval for auto-waiting (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Selector type for locating elements.
///
/// Ordered by stability: `TestId` > `Id` > `Class` > `Text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Compound CSS selector (e.g. `button.btn_inventory`)
    Css(String),
    /// `data-test` attribute selector
    TestId(String),
    /// Element id
    Id(String),
    /// Class name
    Class(String),
    /// Leaf element whose trimmed text equals the value
    Text(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a `data-test` selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Create an id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Create a class selector
    #[must_use]
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// CSS form of the selector, `None` for text selectors
    #[must_use]
    pub fn to_css(&self) -> Option<String> {
        match self {
            Self::Css(s) => Some(s.clone()),
            Self::TestId(id) => Some(format!("[data-test={}]", js_string(id))),
            Self::Id(id) => Some(format!("#{id}")),
            Self::Class(class) => Some(format!(".{class}")),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => write!(f, "text={t:?}"),
            other => write!(f, "{}", other.to_css().unwrap_or_default()),
        }
    }
}

/// One step of a locator chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Selector evaluated against the descendants of the previous step
    pub selector: Selector,
    /// Keep only matches whose text content contains every one of these values
    pub has_text: Vec<String>,
}

/// Locator options for customizing behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Timeout for auto-waiting
    pub timeout: Duration,
    /// Polling interval for auto-waiting
    pub poll_interval: Duration,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// A locator for finding and interacting with elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    steps: Vec<Step>,
    options: LocatorOptions,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(selector.into()))
    }

    /// Create a locator from a selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            steps: vec![Step {
                selector,
                has_text: Vec::new(),
            }],
            options: LocatorOptions::default(),
        }
    }

    /// Narrow to descendants matching `selector`
    #[must_use]
    pub fn locator(mut self, selector: Selector) -> Self {
        self.steps.push(Step {
            selector,
            has_text: Vec::new(),
        });
        self
    }

    /// Keep only elements whose text content contains `text` (case-sensitive).
    ///
    /// Repeated calls on the same step stack: a match has to contain all of them.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        if let Some(last) = self.steps.last_mut() {
            last.has_text.push(text.into());
        }
        self
    }

    /// Set a custom timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Set a custom polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.options.poll_interval = interval;
        self
    }

    /// Get the selector steps
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Get the options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// Timeout in whole milliseconds, for error messages
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.options.timeout.as_millis() as u64
    }

    /// JavaScript expression evaluating to the array of matched elements
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut js = String::from("(() => { let nodes = [document];");
        for step in &self.steps {
            match &step.selector {
                Selector::Text(text) => js.push_str(&format!(
                    " nodes = nodes.flatMap(n => Array.from(n.querySelectorAll('*')).filter(e => e.children.length === 0 && e.textContent.trim() === {}));",
                    js_string(text)
                )),
                other => js.push_str(&format!(
                    " nodes = nodes.flatMap(n => Array.from(n.querySelectorAll({})));",
                    js_string(&other.to_css().unwrap_or_default())
                )),
            }
            for text in &step.has_text {
                js.push_str(&format!(
                    " nodes = nodes.filter(e => (e.textContent || '').includes({}));",
                    js_string(text)
                ));
            }
            js.push_str(" nodes = Array.from(new Set(nodes));");
        }
        js.push_str(" return nodes; })()");
        js
    }

    /// JavaScript expression counting matched elements
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("{}.length", self.to_query())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " >> ")?;
            }
            write!(f, "{}", step.selector)?;
            for text in &step.has_text {
                write!(f, ":has-text({text:?})")?;
            }
        }
        Ok(())
    }
}

/// Quote a value as a JavaScript string literal
pub(crate) fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_test_id_css() {
            let selector = Selector::test_id("login-button");
            assert_eq!(
                selector.to_css().as_deref(),
                Some("[data-test=\"login-button\"]")
            );
        }

        #[test]
        fn test_id_and_class_css() {
            assert_eq!(Selector::id("user-name").to_css().as_deref(), Some("#user-name"));
            assert_eq!(
                Selector::class("shopping_cart_badge").to_css().as_deref(),
                Some(".shopping_cart_badge")
            );
        }

        #[test]
        fn test_text_has_no_css() {
            assert!(Selector::text("Remove").to_css().is_none());
            assert_eq!(Selector::text("Remove").to_string(), "text=\"Remove\"");
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_locator_chain_display() {
            let locator = Locator::from_selector(Selector::class("inventory_item"))
                .with_text("Sauce Labs Backpack")
                .locator(Selector::css("button"));
            assert_eq!(
                locator.to_string(),
                ".inventory_item:has-text(\"Sauce Labs Backpack\") >> button"
            );
            assert_eq!(locator.steps().len(), 2);
        }

        #[test]
        fn test_repeated_text_filters_stack() {
            let locator = Locator::from_selector(Selector::class("inventory_item"))
                .with_text("T-Shirt")
                .with_text("Bolt");
            assert_eq!(locator.steps()[0].has_text, vec!["T-Shirt", "Bolt"]);
            assert_eq!(
                locator.to_string(),
                ".inventory_item:has-text(\"T-Shirt\"):has-text(\"Bolt\")"
            );
            let query = locator.to_query();
            assert!(query.contains("includes(\"T-Shirt\")"));
            assert!(query.contains("includes(\"Bolt\")"));
        }

        #[test]
        fn test_locator_timeout() {
            let locator = Locator::new("button").with_timeout(Duration::from_secs(3));
            assert_eq!(locator.options().timeout, Duration::from_secs(3));
            assert_eq!(locator.timeout_ms(), 3000);
        }

        #[test]
        fn test_default_options() {
            let opts = LocatorOptions::default();
            assert_eq!(opts.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
            assert_eq!(opts.poll_interval, Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));
        }

        #[test]
        fn test_locators_are_values() {
            let a = Locator::from_selector(Selector::test_id("title"));
            let b = Locator::from_selector(Selector::test_id("title"));
            assert_eq!(a, b);
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_query_escapes_text() {
            let locator = Locator::new(".inventory_item").with_text("Test.allTheThings() T-Shirt (Red)");
            let query = locator.to_query();
            assert!(query.contains("includes(\"Test.allTheThings() T-Shirt (Red)\")"));
            assert!(query.contains("querySelectorAll(\".inventory_item\")"));
        }

        #[test]
        fn test_query_quotes_are_escaped() {
            let locator = Locator::from_selector(Selector::text("say \"hi\""));
            assert!(locator.to_query().contains(r#""say \"hi\"""#));
        }

        #[test]
        fn test_count_query() {
            let query = Locator::new("li").to_count_query();
            assert!(query.ends_with(".length"));
        }
    }
}
