//! Browser sessions and the page handle page objects wrap.
//!
//! A [`Session`] is one isolated browser context: fresh cookies, fresh
//! storage, fresh cart. The runner opens one per test attempt and closes it
//! afterwards. A [`Page`] is the cheap, clonable handle page objects hold.

use crate::config::{BackendKind, RunConfig, Target};
use crate::driver::PageDriver;
use crate::locator::{Locator, Selector};
use crate::result::SwagResult;
use crate::sim::SimDriver;
use crate::trace::{ActionTrace, TracedDriver};
use crate::video::{VideoConfig, VideoRecorder};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// Storefront served when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com";

/// Time budgets applied to engine calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Clicks, fills and single-element reads
    pub action: Duration,
    /// Page loads and URL waits
    pub navigation: Duration,
    /// `expect(...)` assertions
    pub expect: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            action: Duration::from_millis(10_000),
            navigation: Duration::from_millis(30_000),
            expect: Duration::from_millis(5_000),
        }
    }
}

/// Handle to one browser page
#[derive(Debug, Clone)]
pub struct Page {
    driver: Arc<dyn PageDriver>,
    base_url: Url,
    timeouts: Timeouts,
}

impl Page {
    /// Wrap a driver serving `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL
    pub fn new(driver: Arc<dyn PageDriver>, base_url: &str, timeouts: Timeouts) -> SwagResult<Self> {
        Ok(Self {
            driver,
            base_url: Url::parse(base_url)?,
            timeouts,
        })
    }

    /// The underlying driver
    #[must_use]
    pub fn driver(&self) -> &dyn PageDriver {
        self.driver.as_ref()
    }

    /// Configured storefront address
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Configured time budgets
    #[must_use]
    pub const fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Locator for `selector`, bounded by the action timeout
    #[must_use]
    pub fn locator(&self, selector: Selector) -> Locator {
        Locator::from_selector(selector).with_timeout(self.timeouts.action)
    }

    /// Absolute URL for a storefront path
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid
    pub fn url_for(&self, path: &str) -> SwagResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Load a storefront path
    ///
    /// # Errors
    ///
    /// Returns `NavigationError` when the page cannot be loaded
    pub async fn goto(&self, path: &str) -> SwagResult<()> {
        let url = self.url_for(path)?;
        tracing::debug!(%url, "navigate");
        self.driver.goto(url.as_str(), self.timeouts.navigation).await
    }
}

/// An isolated browser session
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    target: String,
    page: Page,
    trace: Option<Arc<ActionTrace>>,
    video: Option<Arc<VideoRecorder>>,
}

/// What a session records while it runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recording {
    /// Keep an action trace
    pub trace: bool,
    /// Record a failure video with these settings
    pub video: Option<VideoConfig>,
}

impl Recording {
    /// Whether driver calls need to be intercepted at all
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.trace || self.video.is_some()
    }
}

impl Session {
    /// Open a session on `target` with the run's timeouts and artifact policy
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot start
    pub async fn open(target: &Target, config: &RunConfig) -> SwagResult<Self> {
        let driver: Arc<dyn PageDriver> = match target.backend {
            BackendKind::Simulated => Arc::new(SimDriver::new(&config.base_url)?),
            BackendKind::Chromium => launch_chromium(target).await?,
        };
        let recording = Recording {
            trace: config.artifacts.trace.is_enabled(),
            video: config
                .artifacts
                .video
                .is_enabled()
                .then(|| VideoConfig::for_viewport(&target.viewport)),
        };
        let session = Self::from_driver(&target.name, driver, &config.base_url, config.timeouts(), recording)?;
        tracing::debug!(
            session = %session.id,
            target = %target.name,
            traced = recording.trace,
            video = recording.video.is_some(),
            "session opened"
        );
        Ok(session)
    }

    /// Fresh simulated session against the default storefront address
    ///
    /// # Errors
    ///
    /// Never fails for the built-in address; kept fallible like [`Session::open`]
    pub fn simulated() -> SwagResult<Self> {
        Self::simulated_with(Timeouts::default())
    }

    /// Fresh simulated session with custom timeouts
    ///
    /// # Errors
    ///
    /// Never fails for the built-in address
    pub fn simulated_with(timeouts: Timeouts) -> SwagResult<Self> {
        let driver = Arc::new(SimDriver::new(DEFAULT_BASE_URL)?);
        Self::from_driver("simulated", driver, DEFAULT_BASE_URL, timeouts, Recording::default())
    }

    /// Build a session around an existing driver
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is invalid
    pub fn from_driver(
        target: &str,
        driver: Arc<dyn PageDriver>,
        base_url: &str,
        timeouts: Timeouts,
        recording: Recording,
    ) -> SwagResult<Self> {
        let video = recording.video.map(|config| Arc::new(VideoRecorder::new(config)));
        let (driver, trace) = if recording.is_active() {
            let trace = Arc::new(ActionTrace::new());
            let mut traced = TracedDriver::new(driver, Arc::clone(&trace));
            if let Some(video) = &video {
                traced = traced.with_video(Arc::clone(video));
            }
            let wrapped: Arc<dyn PageDriver> = Arc::new(traced);
            (wrapped, recording.trace.then_some(trace))
        } else {
            (driver, None)
        };
        Ok(Self {
            id: Uuid::new_v4(),
            target: target.to_string(),
            page: Page::new(driver, base_url, timeouts)?,
            trace,
            video,
        })
    }

    /// Session id
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Target name
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The session's page
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// The action trace, when tracing is enabled
    #[must_use]
    pub fn trace(&self) -> Option<&Arc<ActionTrace>> {
        self.trace.as_ref()
    }

    /// The video recorder, when video is enabled
    #[must_use]
    pub fn video(&self) -> Option<&Arc<VideoRecorder>> {
        self.video.as_ref()
    }

    /// Close the session and its browser
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to shut down
    pub async fn close(self) -> SwagResult<()> {
        tracing::debug!(session = %self.id, "session closed");
        self.page.driver.close().await
    }
}

#[cfg(feature = "browser")]
async fn launch_chromium(target: &Target) -> SwagResult<Arc<dyn PageDriver>> {
    let driver = crate::browser::CdpDriver::launch(&crate::browser::LaunchOptions::from_target(target)).await?;
    Ok(Arc::new(driver))
}

#[cfg(not(feature = "browser"))]
#[allow(clippy::unused_async)]
async fn launch_chromium(target: &Target) -> SwagResult<Arc<dyn PageDriver>> {
    Err(crate::result::SwagError::BrowserLaunchError {
        message: format!(
            "target {:?} needs the chromium backend; rebuild with `--features browser`",
            target.name
        ),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::Target;

    #[test]
    fn test_default_timeouts() {
        let t = Timeouts::default();
        assert_eq!(t.action, Duration::from_secs(10));
        assert_eq!(t.navigation, Duration::from_secs(30));
        assert_eq!(t.expect, Duration::from_secs(5));
    }

    #[test]
    fn test_locator_carries_action_timeout() {
        let timeouts = Timeouts {
            action: Duration::from_millis(1234),
            ..Timeouts::default()
        };
        let session = Session::simulated_with(timeouts).unwrap();
        let loc = session.page().locator(Selector::id("checkout"));
        assert_eq!(loc.timeout_ms(), 1234);
    }

    #[test]
    fn test_url_for_joins_paths() {
        let session = Session::simulated().unwrap();
        assert_eq!(
            session.page().url_for("/cart.html").unwrap().as_str(),
            "https://www.saucedemo.com/cart.html"
        );
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let a = Session::simulated().unwrap();
        let b = Session::simulated().unwrap();
        assert_ne!(a.id(), b.id());
        a.page().goto("/").await.unwrap();
        assert_eq!(b.page().driver().current_url().await.unwrap(), "about:blank");
    }

    #[tokio::test]
    async fn test_open_with_trace() {
        let mut config = RunConfig::default();
        config.artifacts.trace = crate::config::CapturePolicy::Always;
        let session = Session::open(&Target::simulated(), &config).await.unwrap();
        session.page().goto("/").await.unwrap();
        assert_eq!(session.trace().unwrap().events().await.len(), 1);
        assert!(session.video().is_none());
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_open_with_video_only() {
        let mut config = RunConfig::default();
        config.artifacts.trace = crate::config::CapturePolicy::Off;
        config.artifacts.video = crate::config::CapturePolicy::OnFailure;
        let session = Session::open(&Target::simulated(), &config).await.unwrap();
        session.page().goto("/").await.unwrap();
        assert!(session.trace().is_none());
        assert_eq!(session.video().unwrap().frame_count().await, 1);
        session.close().await.unwrap();
    }

    #[test]
    fn test_plain_session_records_nothing() {
        let session = Session::simulated().unwrap();
        assert!(session.trace().is_none());
        assert!(session.video().is_none());
        assert!(!Recording::default().is_active());
    }

    #[cfg(not(feature = "browser"))]
    #[tokio::test]
    async fn test_chromium_requires_feature() {
        let target = Target {
            backend: BackendKind::Chromium,
            ..Target::simulated()
        };
        let err = Session::open(&target, &RunConfig::default()).await.unwrap_err();
        assert_eq!(err.kind(), "engine");
    }
}
