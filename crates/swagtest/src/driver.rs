//! PageDriver - abstract browser automation trait.
//!
//! Every page object talks to the storefront through this trait. The driver
//! is the only layer that waits or polls; page objects issue one call per
//! action and propagate whatever the driver returns.
//!
//! # Implementations
//!
//! - `SimDriver` - in-memory Swag Labs storefront (default, hermetic)
//! - `CdpDriver` - Chromium over CDP via chromiumoxide (feature `browser`)

use crate::locator::Locator;
use crate::result::{SwagError, SwagResult};
use crate::url_pattern::UrlPattern;
use async_trait::async_trait;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// What the driver observed about one matched element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Text content (untrimmed)
    pub text: String,
    /// Whether the element is rendered visibly
    pub visible: bool,
    /// Whether the element accepts input
    pub enabled: bool,
    /// Current value for form controls
    pub value: Option<String>,
}

impl ElementSnapshot {
    /// Snapshot of a visible, enabled element with the given text
    #[must_use]
    pub fn visible(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: true,
            enabled: true,
            value: None,
        }
    }
}

/// A state a locator can be waited into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Exactly one match, rendered
    Visible,
    /// No match, or one match that is not rendered
    Hidden,
    /// Exactly `n` matches
    Count(usize),
    /// Single match whose trimmed text equals the value
    HasText(String),
    /// Single match whose text contains the value
    ContainsText(String),
}

impl Condition {
    /// Evaluate against the current matches.
    ///
    /// # Errors
    ///
    /// Single-element conditions fail with `StrictModeViolation` when more
    /// than one element matches.
    pub fn evaluate(&self, locator: &Locator, matches: &[ElementSnapshot]) -> SwagResult<bool> {
        match self {
            Self::Count(n) => Ok(matches.len() == *n),
            Self::Visible => Ok(single(locator, matches)?.is_some_and(|e| e.visible)),
            Self::Hidden => Ok(single(locator, matches)?.map_or(true, |e| !e.visible)),
            Self::HasText(expected) => {
                Ok(single(locator, matches)?.is_some_and(|e| e.text.trim() == expected))
            }
            Self::ContainsText(expected) => Ok(single(locator, matches)?
                .is_some_and(|e| e.text.contains(expected.as_str()))),
        }
    }

    /// Describe what was actually observed, for assertion messages
    #[must_use]
    pub fn describe_actual(&self, matches: &[ElementSnapshot]) -> String {
        match (self, matches) {
            (Self::Count(_), m) => format!("{} element(s)", m.len()),
            (_, []) => "no matching element".to_string(),
            (Self::Visible | Self::Hidden, [e]) => {
                if e.visible { "visible" } else { "hidden" }.to_string()
            }
            (Self::HasText(_) | Self::ContainsText(_), [e]) => format!("text {:?}", e.text.trim()),
            (_, m) => format!("{} elements", m.len()),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visible => write!(f, "to be visible"),
            Self::Hidden => write!(f, "to be hidden"),
            Self::Count(n) => write!(f, "to have count {n}"),
            Self::HasText(t) => write!(f, "to have text {t:?}"),
            Self::ContainsText(t) => write!(f, "to contain text {t:?}"),
        }
    }
}

/// Resolve a strict single match: `None` when absent, error when ambiguous
pub fn single<'a, T>(locator: &Locator, matches: &'a [T]) -> SwagResult<Option<&'a T>> {
    match matches {
        [] => Ok(None),
        [one] => Ok(Some(one)),
        many => Err(SwagError::StrictModeViolation {
            locator: locator.to_string(),
            count: many.len(),
        }),
    }
}

/// Abstract driver trait for browser automation
#[async_trait]
pub trait PageDriver: Send + Sync + fmt::Debug {
    /// Backend name for logs and reports
    fn backend(&self) -> &'static str;

    /// Navigate to an absolute URL
    async fn goto(&self, url: &str, timeout: Duration) -> SwagResult<()>;

    /// Get current URL
    async fn current_url(&self) -> SwagResult<String>;

    /// Snapshot every element the locator currently resolves to, in DOM order
    async fn snapshot(&self, locator: &Locator) -> SwagResult<Vec<ElementSnapshot>>;

    /// Click the single matching element once it is visible and enabled
    async fn click(&self, locator: &Locator) -> SwagResult<()>;

    /// Replace the value of the single matching form control
    async fn fill(&self, locator: &Locator, value: &str) -> SwagResult<()>;

    /// Select an option by value in the single matching `<select>`
    async fn select_option(&self, locator: &Locator, value: &str) -> SwagResult<()>;

    /// Capture a screenshot of the viewport
    async fn screenshot(&self) -> SwagResult<Vec<u8>>;

    /// File extension for [`PageDriver::screenshot`] bytes
    fn screenshot_extension(&self) -> &'static str {
        "png"
    }

    /// Current viewport as RGBA pixels, one frame of a failure video.
    ///
    /// Decodes [`PageDriver::screenshot`]; backends whose screenshots are not
    /// images override it.
    async fn frame(&self) -> SwagResult<RgbaImage> {
        let bytes = self.screenshot().await?;
        let image = image::load_from_memory(&bytes).map_err(|e| SwagError::VideoRecording {
            message: format!("screenshot is not a decodable image: {e}"),
        })?;
        Ok(image.to_rgba8())
    }

    /// Close the session
    async fn close(&self) -> SwagResult<()>;

    /// Number of matching elements (never waits, never strict)
    async fn count(&self, locator: &Locator) -> SwagResult<usize> {
        Ok(self.snapshot(locator).await?.len())
    }

    /// Whether the single matching element is visible (never waits)
    async fn is_visible(&self, locator: &Locator) -> SwagResult<bool> {
        let matches = self.snapshot(locator).await?;
        Ok(single(locator, &matches)?.is_some_and(|e| e.visible))
    }

    /// Text of the single matching element, `None` when absent (never waits)
    async fn text_content(&self, locator: &Locator) -> SwagResult<Option<String>> {
        let matches = self.snapshot(locator).await?;
        Ok(single(locator, &matches)?.map(|e| e.text.clone()))
    }

    /// Text of every matching element in DOM order (never waits, never strict)
    async fn all_text_contents(&self, locator: &Locator) -> SwagResult<Vec<String>> {
        Ok(self
            .snapshot(locator)
            .await?
            .into_iter()
            .map(|e| e.text)
            .collect())
    }

    /// Wait until `condition` holds for `locator`, polling at the locator's interval
    async fn wait_for(&self, locator: &Locator, condition: &Condition) -> SwagResult<()> {
        let deadline = Instant::now() + locator.options().timeout;
        loop {
            let matches = self.snapshot(locator).await?;
            if condition.evaluate(locator, &matches)? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(SwagError::timeout(
                    format!("{locator} {condition}"),
                    locator.timeout_ms(),
                ));
            }
            tokio::time::sleep(locator.options().poll_interval).await;
        }
    }

    /// Wait until the current URL matches `pattern`
    async fn wait_for_url(&self, pattern: &UrlPattern, timeout: Duration) -> SwagResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if pattern.matches(&self.current_url().await?) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(SwagError::timeout(
                    format!("url matching {pattern}"),
                    timeout.as_millis() as u64,
                ));
            }
            tokio::time::sleep(Duration::from_millis(crate::locator::DEFAULT_POLL_INTERVAL_MS))
                .await;
        }
    }
}
