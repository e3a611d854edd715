//! Action tracing.
//!
//! [`TracedDriver`] wraps any backend and records each driver call with its
//! timing and outcome. The runner writes the recording next to the failure
//! screenshot so a failed attempt can be replayed step by step. With a
//! [`VideoRecorder`] attached, every page-changing call also grabs a frame.

use crate::driver::{Condition, ElementSnapshot, PageDriver};
use crate::locator::Locator;
use crate::result::SwagResult;
use crate::url_pattern::UrlPattern;
use crate::video::VideoRecorder;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Outcome of a traced call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceStatus {
    /// The call succeeded
    Ok,
    /// The call returned an error
    Error,
}

/// One recorded driver call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Position in the trace, from 0
    pub seq: usize,
    /// Wall-clock start
    pub at: DateTime<Utc>,
    /// Driver operation (`click`, `fill`, `goto`, ...)
    pub action: String,
    /// Locator or URL the call targeted
    pub target: Option<String>,
    /// Extra argument, e.g. the filled value or the awaited condition
    pub detail: Option<String>,
    /// Call duration
    pub duration_ms: u64,
    /// Outcome
    pub status: TraceStatus,
    /// Error text when the call failed
    pub error: Option<String>,
}

/// A recorded action trace
#[derive(Debug)]
pub struct ActionTrace {
    id: Uuid,
    events: Mutex<Vec<TraceEvent>>,
}

/// Serialized form of an [`ActionTrace`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceFile {
    /// Id of the recorded trace
    pub trace_id: Uuid,
    /// Events in call order
    pub events: Vec<TraceEvent>,
}

impl ActionTrace {
    /// Create an empty trace
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Trace id
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    async fn record<T>(
        &self,
        action: &str,
        target: Option<String>,
        detail: Option<String>,
        started: (DateTime<Utc>, Instant),
        result: &SwagResult<T>,
    ) {
        let duration_ms = u64::try_from(started.1.elapsed().as_millis()).unwrap_or(u64::MAX);
        let (status, error) = match result {
            Ok(_) => (TraceStatus::Ok, None),
            Err(e) => (TraceStatus::Error, Some(e.to_string())),
        };
        tracing::debug!(
            action,
            target = target.as_deref().unwrap_or(""),
            duration_ms,
            ok = error.is_none(),
            "driver call"
        );
        let mut events = self.events.lock().await;
        let seq = events.len();
        events.push(TraceEvent {
            seq,
            at: started.0,
            action: action.to_string(),
            target,
            detail,
            duration_ms,
            status,
            error,
        });
    }

    /// Copy of the recorded events
    pub async fn events(&self) -> Vec<TraceEvent> {
        self.events.lock().await.clone()
    }

    /// Write the trace as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub async fn save(&self, path: &Path) -> SwagResult<()> {
        let file = TraceFile {
            trace_id: self.id,
            events: self.events().await,
        };
        let json = serde_json::to_vec_pretty(&file)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

impl Default for ActionTrace {
    fn default() -> Self {
        Self::new()
    }
}

fn now() -> (DateTime<Utc>, Instant) {
    (Utc::now(), Instant::now())
}

/// Driver decorator that records every call into an [`ActionTrace`]
#[derive(Debug)]
pub struct TracedDriver {
    inner: Arc<dyn PageDriver>,
    trace: Arc<ActionTrace>,
    video: Option<Arc<VideoRecorder>>,
}

impl TracedDriver {
    /// Wrap `inner`, recording into `trace`
    #[must_use]
    pub fn new(inner: Arc<dyn PageDriver>, trace: Arc<ActionTrace>) -> Self {
        Self {
            inner,
            trace,
            video: None,
        }
    }

    /// Also grab a video frame after every page-changing call
    #[must_use]
    pub fn with_video(mut self, video: Arc<VideoRecorder>) -> Self {
        self.video = Some(video);
        self
    }

    async fn record_frame(&self, action: &str) {
        if let Some(video) = &self.video {
            if let Err(e) = video.capture(self.inner.as_ref(), action).await {
                tracing::debug!(action, error = %e, "video frame skipped");
            }
        }
    }
}

#[async_trait]
impl PageDriver for TracedDriver {
    fn backend(&self) -> &'static str {
        self.inner.backend()
    }

    async fn goto(&self, url: &str, timeout: Duration) -> SwagResult<()> {
        let started = now();
        let result = self.inner.goto(url, timeout).await;
        self.trace
            .record("goto", Some(url.to_string()), None, started, &result)
            .await;
        self.record_frame("goto").await;
        result
    }

    async fn current_url(&self) -> SwagResult<String> {
        self.inner.current_url().await
    }

    async fn snapshot(&self, locator: &Locator) -> SwagResult<Vec<ElementSnapshot>> {
        let started = now();
        let result = self.inner.snapshot(locator).await;
        let detail = result.as_ref().ok().map(|m| format!("{} match(es)", m.len()));
        self.trace
            .record("query", Some(locator.to_string()), detail, started, &result)
            .await;
        result
    }

    async fn click(&self, locator: &Locator) -> SwagResult<()> {
        let started = now();
        let result = self.inner.click(locator).await;
        self.trace
            .record("click", Some(locator.to_string()), None, started, &result)
            .await;
        self.record_frame("click").await;
        result
    }

    async fn fill(&self, locator: &Locator, value: &str) -> SwagResult<()> {
        let started = now();
        let result = self.inner.fill(locator, value).await;
        self.trace
            .record(
                "fill",
                Some(locator.to_string()),
                Some(value.to_string()),
                started,
                &result,
            )
            .await;
        self.record_frame("fill").await;
        result
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> SwagResult<()> {
        let started = now();
        let result = self.inner.select_option(locator, value).await;
        self.trace
            .record(
                "select_option",
                Some(locator.to_string()),
                Some(value.to_string()),
                started,
                &result,
            )
            .await;
        self.record_frame("select_option").await;
        result
    }

    async fn screenshot(&self) -> SwagResult<Vec<u8>> {
        self.inner.screenshot().await
    }

    fn screenshot_extension(&self) -> &'static str {
        self.inner.screenshot_extension()
    }

    async fn frame(&self) -> SwagResult<image::RgbaImage> {
        self.inner.frame().await
    }

    async fn close(&self) -> SwagResult<()> {
        self.inner.close().await
    }

    async fn wait_for(&self, locator: &Locator, condition: &Condition) -> SwagResult<()> {
        let started = now();
        let result = self.inner.wait_for(locator, condition).await;
        self.trace
            .record(
                "wait_for",
                Some(locator.to_string()),
                Some(condition.to_string()),
                started,
                &result,
            )
            .await;
        result
    }

    async fn wait_for_url(&self, pattern: &UrlPattern, timeout: Duration) -> SwagResult<()> {
        let started = now();
        let result = self.inner.wait_for_url(pattern, timeout).await;
        self.trace
            .record("wait_for_url", Some(pattern.to_string()), None, started, &result)
            .await;
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::locator::Selector;
    use crate::sim::SimDriver;

    async fn traced() -> (TracedDriver, Arc<ActionTrace>) {
        let trace = Arc::new(ActionTrace::new());
        let inner = Arc::new(SimDriver::new("https://www.saucedemo.com").unwrap());
        (TracedDriver::new(inner, Arc::clone(&trace)), trace)
    }

    #[tokio::test]
    async fn test_records_actions_in_order() {
        let (driver, trace) = traced().await;
        driver
            .goto("https://www.saucedemo.com/", Duration::from_secs(1))
            .await
            .unwrap();
        let user = Locator::from_selector(Selector::id("user-name"));
        driver.fill(&user, "standard_user").await.unwrap();
        let _ = driver.click(&Locator::from_selector(Selector::id("nope"))).await;

        let events = trace.events().await;
        let actions: Vec<&str> = events.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["goto", "fill", "click"]);
        assert_eq!(events[1].detail.as_deref(), Some("standard_user"));
        assert_eq!(events[2].status, TraceStatus::Error);
        assert!(events.iter().enumerate().all(|(i, e)| e.seq == i));
    }

    #[tokio::test]
    async fn test_save_writes_json() {
        let (driver, trace) = traced().await;
        driver
            .goto("https://www.saucedemo.com/", Duration::from_secs(1))
            .await
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        trace.save(&path).await.unwrap();

        let file: TraceFile = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(file.trace_id, trace.id());
        assert_eq!(file.events.len(), 1);
    }

    #[tokio::test]
    async fn test_page_changing_calls_grab_frames() {
        let trace = Arc::new(ActionTrace::new());
        let video = Arc::new(VideoRecorder::new(crate::video::VideoConfig::default()));
        let inner = Arc::new(SimDriver::new("https://www.saucedemo.com").unwrap());
        let driver = TracedDriver::new(inner, trace).with_video(Arc::clone(&video));

        driver
            .goto("https://www.saucedemo.com/", Duration::from_secs(1))
            .await
            .unwrap();
        let user = Locator::from_selector(Selector::id("user-name"));
        driver.fill(&user, "standard_user").await.unwrap();
        driver.count(&user).await.unwrap();

        let actions: Vec<String> = video.frames().await.into_iter().map(|f| f.action).collect();
        assert_eq!(actions, vec!["goto", "fill"]);
    }
}
