//! Run configuration.
//!
//! Resolution order, later wins: built-in defaults, YAML file, `SWAGTEST_*`
//! environment variables, CLI flags (applied by the binary through the
//! builder methods).

use crate::result::{SwagError, SwagResult};
use crate::session::{Timeouts, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which [`PageDriver`](crate::driver::PageDriver) a target runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-memory storefront
    #[default]
    Simulated,
    /// Chromium over CDP
    Chromium,
}

impl BackendKind {
    /// Parse a backend name
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown names
    pub fn parse(name: &str) -> SwagResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "simulated" | "sim" => Ok(Self::Simulated),
            "chromium" | "chrome" => Ok(Self::Chromium),
            other => Err(SwagError::config(format!(
                "unknown backend {other:?} (expected simulated or chromium)"
            ))),
        }
    }

    /// Name as written in config files
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::Chromium => "chromium",
        }
    }
}

/// Browser viewport size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// A named backend configuration suites are executed on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Target {
    /// Name used in reports and artifact paths
    pub name: String,
    /// Engine driving the pages
    pub backend: BackendKind,
    /// Run the browser without a window
    pub headless: bool,
    /// Browser window size, also the video frame aspect
    pub viewport: Viewport,
    /// Chromium executable; auto-detected when unset
    pub chromium_path: Option<PathBuf>,
}

impl Default for Target {
    fn default() -> Self {
        Self::simulated()
    }
}

impl Target {
    /// The simulated storefront target
    #[must_use]
    pub fn simulated() -> Self {
        Self::for_backend(BackendKind::Simulated)
    }

    /// Headless Chromium target
    #[must_use]
    pub fn chromium() -> Self {
        Self::for_backend(BackendKind::Chromium)
    }

    /// Default target for `backend`, named after it
    #[must_use]
    pub fn for_backend(backend: BackendKind) -> Self {
        Self {
            name: backend.as_str().to_string(),
            backend,
            headless: true,
            viewport: Viewport::default(),
            chromium_path: None,
        }
    }
}

/// When an artifact is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapturePolicy {
    /// Never recorded
    Off,
    /// Kept only for failed attempts
    #[default]
    OnFailure,
    /// Kept for every attempt
    Always,
}

impl CapturePolicy {
    /// Whether to keep the artifact for an attempt with this outcome
    #[must_use]
    pub const fn should_capture(self, failed: bool) -> bool {
        match self {
            Self::Off => false,
            Self::OnFailure => failed,
            Self::Always => true,
        }
    }

    /// Whether recording has to happen at all
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// Failure artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Artifacts {
    /// Screenshot of the page when the attempt ended
    pub screenshot: CapturePolicy,
    /// JSON log of every driver call
    pub trace: CapturePolicy,
    /// Animated GIF of the attempt, one frame per page-changing call
    pub video: CapturePolicy,
}

/// Configuration for a test run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Storefront address page paths are joined onto
    pub base_url: String,
    /// Budget for clicks, fills and single-element reads
    pub action_timeout_ms: u64,
    /// Budget for page loads and URL waits
    pub navigation_timeout_ms: u64,
    /// Budget for `expect(...)` assertions
    pub expect_timeout_ms: u64,
    /// Budget for a whole test attempt
    pub test_timeout_ms: u64,
    /// Whole-test retries; defaults to 0, or 2 under CI
    pub retries: Option<u32>,
    /// Parallel workers; defaults to the CPU count, or 1 under CI
    pub workers: Option<usize>,
    /// Running under continuous integration
    pub ci: bool,
    /// Every test runs once per target
    pub targets: Vec<Target>,
    /// What is kept per attempt
    pub artifacts: Artifacts,
    /// Root of reports and artifacts
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            action_timeout_ms: 10_000,
            navigation_timeout_ms: 30_000,
            expect_timeout_ms: 5_000,
            test_timeout_ms: 60_000,
            retries: None,
            workers: None,
            ci: false,
            targets: vec![Target::simulated()],
            artifacts: Artifacts::default(),
            output_dir: PathBuf::from("target/swagtest"),
        }
    }
}

impl RunConfig {
    /// Parse from YAML
    ///
    /// # Errors
    ///
    /// Returns an error on malformed YAML or unknown keys
    pub fn from_yaml_str(yaml: &str) -> SwagResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> SwagResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Render as YAML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_yaml(&self) -> SwagResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Apply `CI` and `SWAGTEST_*` overrides from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error when a variable holds an unparsable value
    pub fn apply_env(&mut self) -> SwagResult<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Returns an error when a variable holds an unparsable value
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> SwagResult<()> {
        if let Some(ci) = lookup("CI") {
            self.ci = !matches!(ci.trim(), "" | "0" | "false");
        }
        if let Some(url) = lookup("SWAGTEST_BASE_URL") {
            self.base_url = url;
        }
        if let Some(workers) = lookup("SWAGTEST_WORKERS") {
            self.workers = Some(parse_number("SWAGTEST_WORKERS", &workers)?);
        }
        if let Some(retries) = lookup("SWAGTEST_RETRIES") {
            self.retries = Some(parse_number("SWAGTEST_RETRIES", &retries)?);
        }
        if let Some(backend) = lookup("SWAGTEST_BACKEND") {
            let backend = BackendKind::parse(&backend)?;
            self.targets = vec![Target::for_backend(backend)];
        }
        Ok(())
    }

    /// Check the configuration is runnable
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first problem found
    pub fn validate(&self) -> SwagResult<()> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| SwagError::config(format!("base_url {:?}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SwagError::config(format!(
                "base_url must be http or https, got {:?}",
                url.scheme()
            )));
        }
        for (name, value) in [
            ("action_timeout_ms", self.action_timeout_ms),
            ("navigation_timeout_ms", self.navigation_timeout_ms),
            ("expect_timeout_ms", self.expect_timeout_ms),
            ("test_timeout_ms", self.test_timeout_ms),
        ] {
            if value == 0 {
                return Err(SwagError::config(format!("{name} must be greater than 0")));
            }
        }
        if self.workers == Some(0) {
            return Err(SwagError::config("workers must be at least 1"));
        }
        if self.targets.is_empty() {
            return Err(SwagError::config("at least one target is required"));
        }
        for (i, target) in self.targets.iter().enumerate() {
            if target.name.trim().is_empty() {
                return Err(SwagError::config(format!("target #{i} has no name")));
            }
            if self.targets[..i].iter().any(|t| t.name == target.name) {
                return Err(SwagError::config(format!(
                    "duplicate target name {:?}",
                    target.name
                )));
            }
        }
        Ok(())
    }

    /// Effective retry count
    #[must_use]
    pub fn retries(&self) -> u32 {
        self.retries.unwrap_or(if self.ci { 2 } else { 0 })
    }

    /// Effective worker count
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            if self.ci {
                1
            } else {
                std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
            }
        })
    }

    /// Engine time budgets
    #[must_use]
    pub const fn timeouts(&self) -> Timeouts {
        Timeouts {
            action: Duration::from_millis(self.action_timeout_ms),
            navigation: Duration::from_millis(self.navigation_timeout_ms),
            expect: Duration::from_millis(self.expect_timeout_ms),
        }
    }

    /// Per-test budget
    #[must_use]
    pub const fn test_timeout(&self) -> Duration {
        Duration::from_millis(self.test_timeout_ms)
    }

    /// Set the storefront address
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the worker count
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Set the retry count
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Set the per-test timeout
    #[must_use]
    pub const fn with_test_timeout_ms(mut self, ms: u64) -> Self {
        self.test_timeout_ms = ms;
        self
    }

    /// Replace the targets
    #[must_use]
    pub fn with_targets(mut self, targets: Vec<Target>) -> Self {
        self.targets = targets;
        self
    }

    /// Set the artifact directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the artifact policy
    #[must_use]
    pub const fn with_artifacts(mut self, artifacts: Artifacts) -> Self {
        self.artifacts = artifacts;
        self
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> SwagResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| SwagError::config(format!("{key} must be a non-negative integer, got {value:?}")))
}
