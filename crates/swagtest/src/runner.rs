//! Parallel suite runner.
//!
//! Every registered test runs once per configured target. Tests are spawned
//! as tokio tasks bounded by a semaphore of `workers` permits. Each attempt
//! gets its own [`Session`], so a retry never sees state left by the attempt
//! before it. An attempt that outlives its budget is dropped mid-flight and
//! reported as a `Timeout`.
//!
//! Artifacts land under `output_dir/<target>/<suite>__<test>/attempt-N/`:
//! `screenshot.<ext>`, `video.gif` and `trace.json`.

use crate::config::{RunConfig, Target};
use crate::reporter::{AttemptRecord, RunReport, TestOutcome};
use crate::result::{SwagError, SwagResult};
use crate::session::Session;
use crate::suites::{self, TestCase, TestSuite};
use crate::video::{VideoRecorder, VIDEO_FILE};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

/// Executes suites against every target of a [`RunConfig`]
#[derive(Debug)]
pub struct Runner {
    config: Arc<RunConfig>,
    suites: Vec<TestSuite>,
}

/// A test scheduled on a target
#[derive(Debug, Clone)]
pub struct PlannedTest {
    /// Target name
    pub target: String,
    /// Suite name
    pub suite: &'static str,
    /// Test name
    pub name: &'static str,
}

impl Runner {
    /// Runner over every registered suite
    ///
    /// # Errors
    ///
    /// Returns `Config` if `config` fails validation
    pub fn new(config: RunConfig) -> SwagResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            suites: suites::all(),
        })
    }

    /// Keep only tests whose `suite::name` contains `filter`
    #[must_use]
    pub fn with_filter(mut self, filter: Option<&str>) -> Self {
        if let Some(filter) = filter {
            self.suites = self
                .suites
                .into_iter()
                .map(|s| s.filtered(filter))
                .filter(|s| s.test_count() > 0)
                .collect();
        }
        self
    }

    /// Replace the suites to run
    #[must_use]
    pub fn with_suites(mut self, suites: Vec<TestSuite>) -> Self {
        self.suites = suites;
        self
    }

    /// The run configuration
    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Every (target, test) pair in execution order
    #[must_use]
    pub fn plan(&self) -> Vec<PlannedTest> {
        let mut plan = Vec::new();
        for target in &self.config.targets {
            for suite in &self.suites {
                for test in &suite.tests {
                    plan.push(PlannedTest {
                        target: target.name.clone(),
                        suite: suite.name,
                        name: test.name,
                    });
                }
            }
        }
        plan
    }

    /// Run the plan and write nothing; see [`Runner::run_and_report`]
    pub async fn run(&self) -> RunReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let clock = Instant::now();
        let workers = self.config.workers().max(1);
        let permits = Arc::new(Semaphore::new(workers));

        info!(
            %run_id,
            tests = self.plan().len(),
            workers,
            retries = self.config.retries(),
            "run started"
        );

        let mut handles: Vec<(PlannedTest, JoinHandle<TestOutcome>)> = Vec::new();
        for target in &self.config.targets {
            for suite in &self.suites {
                for test in &suite.tests {
                    let planned = PlannedTest {
                        target: target.name.clone(),
                        suite: suite.name,
                        name: test.name,
                    };
                    let config = Arc::clone(&self.config);
                    let permits = Arc::clone(&permits);
                    let target = target.clone();
                    let suite_name = suite.name;
                    let test = *test;
                    let handle = tokio::spawn(async move {
                        // The semaphore is never closed
                        let _permit = permits.acquire_owned().await.ok();
                        run_test(&config, &target, suite_name, test).await
                    });
                    handles.push((planned, handle));
                }
            }
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (planned, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(suite = planned.suite, test = planned.name, error = %e, "test task aborted");
                    let error = SwagError::PageError {
                        message: format!("test task aborted: {e}"),
                    };
                    TestOutcome::from_attempts(
                        planned.suite,
                        planned.name,
                        planned.target,
                        vec![AttemptRecord::failed(1, Duration::ZERO, &error)],
                    )
                }
            };
            outcomes.push(outcome);
        }

        let report = RunReport {
            run_id,
            started_at,
            duration_ms: u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX),
            base_url: self.config.base_url.clone(),
            workers,
            retries: self.config.retries(),
            outcomes,
        };
        info!(%run_id, summary = %report.summary(), "run finished");
        report
    }

    /// Run the plan, then write `report.json` and `junit.xml` to the output directory
    ///
    /// # Errors
    ///
    /// Returns error if the reports cannot be written
    pub async fn run_and_report(&self) -> SwagResult<RunReport> {
        let report = self.run().await;
        report.write_json(&self.config.output_dir).await?;
        report.write_junit(&self.config.output_dir).await?;
        Ok(report)
    }
}

/// Run one test, retrying on fresh sessions until it passes or the budget is spent
async fn run_test(config: &RunConfig, target: &Target, suite: &str, test: TestCase) -> TestOutcome {
    let id = format!("{suite}::{}", test.name);
    let max_attempts = config.retries().saturating_add(1);
    let test_dir = config
        .output_dir
        .join(path_segment(&target.name))
        .join(format!("{suite}__{}", test.name));

    let mut attempts = Vec::new();
    for attempt in 1..=max_attempts {
        info!(test = %id, target = %target.name, attempt, "test started");
        let dir = test_dir.join(format!("attempt-{attempt}"));
        let record = run_attempt(config, target, &test, attempt, &dir).await;
        let passed = record.status.is_passed();
        let status = if passed { "passed" } else { "failed" };
        info!(
            test = %id,
            target = %target.name,
            attempt,
            status,
            duration_ms = record.duration_ms,
            "test finished"
        );
        if !passed && attempt < max_attempts {
            warn!(
                test = %id,
                target = %target.name,
                attempt,
                error = record.error.as_deref().unwrap_or_default(),
                "retrying on a fresh session"
            );
        }
        attempts.push(record);
        if passed {
            break;
        }
    }
    TestOutcome::from_attempts(suite, test.name, &target.name, attempts)
}

async fn run_attempt(
    config: &RunConfig,
    target: &Target,
    test: &TestCase,
    attempt: u32,
    dir: &Path,
) -> AttemptRecord {
    let started = Instant::now();
    let session = match Session::open(target, config).await {
        Ok(session) => session,
        Err(e) => return AttemptRecord::failed(attempt, started.elapsed(), &e),
    };

    let budget = test
        .timeout_ms
        .map_or_else(|| config.test_timeout(), Duration::from_millis);
    let result = match tokio::time::timeout(budget, (test.run)(session.page())).await {
        Ok(result) => result,
        Err(_) => Err(SwagError::timeout(
            format!("test {} to finish", test.name),
            u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
        )),
    };
    let elapsed = started.elapsed();

    let failed = result.is_err();
    let mut record = match &result {
        Ok(()) => AttemptRecord::passed(attempt, elapsed),
        Err(e) => AttemptRecord::failed(attempt, elapsed, e),
    };

    if config.artifacts.screenshot.should_capture(failed) {
        match save_screenshot(&session, dir).await {
            Ok(path) => record.screenshot = Some(path),
            Err(e) => warn!(test = test.name, error = %e, "screenshot not captured"),
        }
    }
    if config.artifacts.trace.should_capture(failed) {
        if let Some(trace) = session.trace() {
            let path = dir.join("trace.json");
            let saved = match tokio::fs::create_dir_all(dir).await {
                Ok(()) => trace.save(&path).await,
                Err(e) => Err(e.into()),
            };
            match saved {
                Ok(()) => record.trace = Some(path),
                Err(e) => warn!(test = test.name, error = %e, "trace not saved"),
            }
        }
    }
    if config.artifacts.video.should_capture(failed) {
        if let Some(video) = session.video() {
            match save_video(&session, video, failed, dir).await {
                Ok(path) => record.video = Some(path),
                Err(e) => warn!(test = test.name, error = %e, "video not saved"),
            }
        }
    }

    if let Err(e) = session.close().await {
        warn!(test = test.name, error = %e, "session did not close cleanly");
    }
    record
}

async fn save_screenshot(session: &Session, dir: &Path) -> SwagResult<PathBuf> {
    let driver = session.page().driver();
    let bytes = driver.screenshot().await?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("screenshot.{}", driver.screenshot_extension()));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

async fn save_video(
    session: &Session,
    video: &VideoRecorder,
    failed: bool,
    dir: &Path,
) -> SwagResult<PathBuf> {
    if failed {
        // the page as it was when the test gave up
        video.capture(session.page().driver(), "failure").await?;
    }
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(VIDEO_FILE);
    video.save(&path).await?;
    Ok(path)
}

/// Target names become directory names
fn path_segment(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect()
}
