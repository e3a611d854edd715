//! URL matching for navigation waits.

use crate::result::{SwagError, SwagResult};
use regex::Regex;
use std::fmt;

/// Pattern a page address is matched against
#[derive(Debug, Clone)]
pub enum UrlPattern {
    /// Exact URL match
    Exact(String),
    /// Contains substring
    Contains(String),
    /// Regex match (unanchored, like `/inventory/`)
    Regex(Regex),
    /// Glob pattern (e.g., "**/inventory.html")
    Glob(String),
}

impl UrlPattern {
    /// Exact match
    #[must_use]
    pub fn exact(url: impl Into<String>) -> Self {
        Self::Exact(url.into())
    }

    /// Substring match
    #[must_use]
    pub fn contains(fragment: impl Into<String>) -> Self {
        Self::Contains(fragment.into())
    }

    /// Glob match, `*` spans any run of characters
    #[must_use]
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::Glob(pattern.into())
    }

    /// Regex match
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the expression does not compile
    pub fn regex(pattern: &str) -> SwagResult<Self> {
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| SwagError::config(format!("invalid url regex {pattern:?}: {e}")))
    }

    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(pattern) => url == pattern,
            Self::Contains(pattern) => url.contains(pattern.as_str()),
            Self::Regex(re) => re.is_match(url),
            Self::Glob(pattern) => glob_matches(pattern, url),
        }
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(s) => write!(f, "{s}"),
            Self::Contains(s) => write!(f, "*{s}*"),
            Self::Regex(re) => write!(f, "/{}/", re.as_str()),
            Self::Glob(s) => write!(f, "{s}"),
        }
    }
}

/// `*` spans any run of characters; the literals around the stars anchor to
/// the start and end of the URL and may not overlap
fn glob_matches(pattern: &str, url: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    let (first, last) = match parts.as_slice() {
        [only] => return *only == url,
        [first, .., last] => (*first, *last),
        [] => return false,
    };
    let Some(rest) = url.strip_prefix(first) else {
        return false;
    };
    let Some(mut middle) = rest.strip_suffix(last) else {
        return false;
    };
    for part in &parts[1..parts.len() - 1] {
        match middle.find(part) {
            Some(found) => middle = &middle[found + part.len()..],
            None => return false,
        }
    }
    true
}
