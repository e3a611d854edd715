//! Result and error types for swagtest.

use thiserror::Error;

/// Result type for swagtest operations
pub type SwagResult<T> = Result<T, SwagError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum SwagError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunchError {
        /// Error message
        message: String,
    },

    /// Page error (the engine rejected an evaluation or command)
    #[error("Page error: {message}")]
    PageError {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("Timed out after {ms}ms waiting for {what}")]
    Timeout {
        /// What was being waited for
        what: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// A locator used for a single-element operation matched several elements
    #[error("Strict mode violation: {locator} resolved to {count} elements")]
    StrictModeViolation {
        /// Locator description
        locator: String,
        /// Number of matching elements
        count: usize,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    ScreenshotError {
        /// Error message
        message: String,
    },

    /// Video recording error
    #[error("Video recording failed: {message}")]
    VideoRecording {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// URL parse error
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl SwagError {
    /// Create an assertion failure from an expected/actual pair
    #[must_use]
    pub fn assertion(
        what: impl std::fmt::Display,
        expected: impl std::fmt::Debug,
        actual: impl std::fmt::Debug,
    ) -> Self {
        Self::AssertionFailed {
            message: format!("{what}: expected {expected:?}, got {actual:?}"),
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(what: impl Into<String>, ms: u64) -> Self {
        Self::Timeout {
            what: what.into(),
            ms,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this is a timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether this is an assertion failure
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::AssertionFailed { .. })
    }

    /// Short category name used in reports
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AssertionFailed { .. } => "assertion",
            Self::Timeout { .. } => "timeout",
            Self::NavigationError { .. } => "navigation",
            Self::StrictModeViolation { .. } => "strict-mode",
            Self::BrowserLaunchError { .. } | Self::PageError { .. } => "engine",
            Self::ScreenshotError { .. } | Self::VideoRecording { .. } => "artifact",
            Self::Config { .. } => "config",
            Self::Io(_) | Self::Json(_) | Self::Yaml(_) | Self::Url(_) => "io",
        }
    }
}
