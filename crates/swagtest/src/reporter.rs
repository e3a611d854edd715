//! Run results and report rendering.
//!
//! The runner produces one [`TestOutcome`] per test per target, each holding
//! every attempt it took. A [`RunReport`] aggregates them and renders the
//! console summary line, the JSON report and JUnit XML for CI.

use crate::result::{SwagError, SwagResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

/// File name of the JSON report inside the output directory
pub const JSON_REPORT: &str = "report.json";

/// File name of the JUnit report inside the output directory
pub const JUNIT_REPORT: &str = "junit.xml";

/// Final status of a test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Test passed
    Passed,
    /// Test failed
    Failed,
}

impl TestStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// One execution of a test on a fresh session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// 1-based attempt number
    pub attempt: u32,
    /// Attempt status
    pub status: TestStatus,
    /// Wall time of the attempt
    pub duration_ms: u64,
    /// Error message if failed
    pub error: Option<String>,
    /// Error category, see [`SwagError::kind`]
    pub error_kind: Option<String>,
    /// Screenshot written for this attempt
    pub screenshot: Option<PathBuf>,
    /// Action trace written for this attempt
    pub trace: Option<PathBuf>,
    /// Failure video written for this attempt
    #[serde(default)]
    pub video: Option<PathBuf>,
}

impl AttemptRecord {
    /// A passing attempt
    #[must_use]
    pub fn passed(attempt: u32, duration: Duration) -> Self {
        Self {
            attempt,
            status: TestStatus::Passed,
            duration_ms: millis(duration),
            error: None,
            error_kind: None,
            screenshot: None,
            trace: None,
            video: None,
        }
    }

    /// A failing attempt
    #[must_use]
    pub fn failed(attempt: u32, duration: Duration, error: &SwagError) -> Self {
        Self {
            attempt,
            status: TestStatus::Failed,
            duration_ms: millis(duration),
            error: Some(error.to_string()),
            error_kind: Some(error.kind().to_string()),
            screenshot: None,
            trace: None,
            video: None,
        }
    }
}

/// Result of one test on one target, across all of its attempts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Suite name
    pub suite: String,
    /// Test name
    pub name: String,
    /// Target name
    pub target: String,
    /// Status of the last attempt
    pub status: TestStatus,
    /// Summed wall time of all attempts
    pub duration_ms: u64,
    /// Attempts in execution order
    pub attempts: Vec<AttemptRecord>,
}

impl TestOutcome {
    /// Build an outcome from its attempts
    #[must_use]
    pub fn from_attempts(
        suite: impl Into<String>,
        name: impl Into<String>,
        target: impl Into<String>,
        attempts: Vec<AttemptRecord>,
    ) -> Self {
        let status = attempts
            .last()
            .map_or(TestStatus::Failed, |a| a.status);
        Self {
            suite: suite.into(),
            name: name.into(),
            target: target.into(),
            status,
            duration_ms: attempts.iter().map(|a| a.duration_ms).sum(),
            attempts,
        }
    }

    /// `suite::name`
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}::{}", self.suite, self.name)
    }

    /// Passed only after at least one failed attempt
    #[must_use]
    pub fn is_flaky(&self) -> bool {
        self.status.is_passed() && self.attempts.len() > 1
    }

    /// Error of the last failed attempt
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.attempts.iter().rev().find_map(|a| a.error.as_deref())
    }
}

/// Everything one run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Run id
    pub run_id: Uuid,
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Total wall time
    pub duration_ms: u64,
    /// Storefront address under test
    pub base_url: String,
    /// Worker count used
    pub workers: usize,
    /// Retry budget per test
    pub retries: u32,
    /// Outcomes in registration order (target, suite, test)
    pub outcomes: Vec<TestOutcome>,
}

impl RunReport {
    /// Get total number of tests
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Get number of passed tests
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_passed()).count()
    }

    /// Get number of failed tests
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_failed()).count()
    }

    /// Get number of tests that needed a retry to pass
    #[must_use]
    pub fn flaky_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_flaky()).count()
    }

    /// Check if all tests passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.status.is_passed())
    }

    /// Pass rate in `0.0..=1.0`; an empty run counts as fully passing
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 1.0;
        }
        self.passed_count() as f64 / self.total_count() as f64
    }

    /// Finally failed outcomes
    #[must_use]
    pub fn failures(&self) -> Vec<&TestOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_failed()).collect()
    }

    /// Look up an outcome by target and `suite::name`
    #[must_use]
    pub fn find(&self, target: &str, id: &str) -> Option<&TestOutcome> {
        self.outcomes.iter().find(|o| o.target == target && o.id() == id)
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}/{} passed ({:.1}%), {} failed, {} flaky in {:.2}s",
            self.passed_count(),
            self.total_count(),
            self.pass_rate() * 100.0,
            self.failed_count(),
            self.flaky_count(),
            Duration::from_millis(self.duration_ms).as_secs_f64()
        )
    }

    /// Pretty JSON
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_json(&self) -> SwagResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a report written by [`RunReport::write_json`]
    ///
    /// # Errors
    ///
    /// Returns error if `json` is not a report
    pub fn from_json(json: &str) -> SwagResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write `report.json` into `dir`, returning its path
    ///
    /// # Errors
    ///
    /// Returns error if file writing fails
    pub async fn write_json(&self, dir: &Path) -> SwagResult<PathBuf> {
        let path = dir.join(JSON_REPORT);
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, self.to_json()?).await?;
        Ok(path)
    }

    /// Write `junit.xml` into `dir`, returning its path
    ///
    /// # Errors
    ///
    /// Returns error if file writing fails
    pub async fn write_junit(&self, dir: &Path) -> SwagResult<PathBuf> {
        let path = dir.join(JUNIT_REPORT);
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, self.render_junit()).await?;
        Ok(path)
    }

    /// Render JUnit XML content, one `<testsuite>` per target
    #[must_use]
    pub fn render_junit(&self) -> String {
        let mut targets: Vec<&str> = Vec::new();
        for outcome in &self.outcomes {
            if !targets.contains(&outcome.target.as_str()) {
                targets.push(&outcome.target);
            }
        }

        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<testsuites name="swagtest" tests="{}" failures="{}" time="{:.3}">"#,
            self.total_count(),
            self.failed_count(),
            Duration::from_millis(self.duration_ms).as_secs_f64()
        ));
        xml.push('\n');

        for target in targets {
            let outcomes: Vec<&TestOutcome> =
                self.outcomes.iter().filter(|o| o.target == target).collect();
            let failures = outcomes.iter().filter(|o| o.status.is_failed()).count();
            xml.push_str(&format!(
                r#"  <testsuite name="{}" tests="{}" failures="{}">"#,
                escape_xml(target),
                outcomes.len(),
                failures
            ));
            xml.push('\n');

            for outcome in outcomes {
                xml.push_str(&format!(
                    r#"    <testcase classname="{}" name="{}" time="{:.3}">"#,
                    escape_xml(&outcome.suite),
                    escape_xml(&outcome.name),
                    Duration::from_millis(outcome.duration_ms).as_secs_f64()
                ));
                xml.push('\n');
                if outcome.status.is_failed() {
                    let error = outcome.last_error().unwrap_or("failed");
                    xml.push_str(&format!(
                        r#"      <failure message="{}">{}</failure>"#,
                        escape_xml(error),
                        escape_xml(error)
                    ));
                    xml.push('\n');
                }
                xml.push_str("    </testcase>\n");
            }
            xml.push_str("  </testsuite>\n");
        }

        xml.push_str("</testsuites>\n");
        xml
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn failed_attempt(attempt: u32) -> AttemptRecord {
        AttemptRecord::failed(
            attempt,
            Duration::from_millis(40),
            &SwagError::assertion("cart badge", 2, 1),
        )
    }

    fn report(outcomes: Vec<TestOutcome>) -> RunReport {
        RunReport {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            duration_ms: 1500,
            base_url: "https://www.saucedemo.com".to_string(),
            workers: 2,
            retries: 1,
            outcomes,
        }
    }

    mod outcome_tests {
        use super::*;

        #[test]
        fn test_status_follows_last_attempt() {
            let flaky = TestOutcome::from_attempts(
                "cart",
                "remove_from_cart_page",
                "simulated",
                vec![
                    failed_attempt(1),
                    AttemptRecord::passed(2, Duration::from_millis(60)),
                ],
            );
            assert!(flaky.status.is_passed());
            assert!(flaky.is_flaky());
            assert_eq!(flaky.duration_ms, 100);
            assert_eq!(flaky.id(), "cart::remove_from_cart_page");
            assert!(flaky.last_error().unwrap().contains("cart badge"));
        }

        #[test]
        fn test_no_attempts_is_a_failure() {
            let outcome = TestOutcome::from_attempts("login", "x", "simulated", Vec::new());
            assert!(outcome.status.is_failed());
            assert!(!outcome.is_flaky());
        }

        #[test]
        fn test_failed_attempt_records_kind() {
            let attempt = failed_attempt(1);
            assert_eq!(attempt.error_kind.as_deref(), Some("assertion"));
            assert!(attempt.status.is_failed());
        }
    }

    mod report_tests {
        use super::*;

        fn mixed() -> RunReport {
            report(vec![
                TestOutcome::from_attempts(
                    "login",
                    "valid_login_reaches_inventory",
                    "simulated",
                    vec![AttemptRecord::passed(1, Duration::from_millis(10))],
                ),
                TestOutcome::from_attempts(
                    "cart",
                    "added_items_appear_in_cart",
                    "chromium",
                    vec![failed_attempt(1), failed_attempt(2)],
                ),
            ])
        }

        #[test]
        fn test_counts() {
            let report = mixed();
            assert_eq!(report.total_count(), 2);
            assert_eq!(report.passed_count(), 1);
            assert_eq!(report.failed_count(), 1);
            assert_eq!(report.flaky_count(), 0);
            assert!(!report.all_passed());
            assert!((report.pass_rate() - 0.5).abs() < f64::EPSILON);
            assert_eq!(report.failures()[0].name, "added_items_appear_in_cart");
            assert!(report.find("chromium", "cart::added_items_appear_in_cart").is_some());
            assert!(report.find("simulated", "cart::added_items_appear_in_cart").is_none());
        }

        #[test]
        fn test_empty_report_passes() {
            let report = report(Vec::new());
            assert!(report.all_passed());
            assert!((report.pass_rate() - 1.0).abs() < f64::EPSILON);
        }

        #[test]
        fn test_summary_line() {
            let summary = mixed().summary();
            assert!(summary.starts_with("1/2 passed (50.0%)"));
            assert!(summary.contains("1 failed"));
            assert!(summary.ends_with("in 1.50s"));
        }

        #[test]
        fn test_json_round_trip() {
            let report = mixed();
            let json = report.to_json().unwrap();
            assert!(json.contains("\"status\": \"failed\""));
            let parsed = RunReport::from_json(&json).unwrap();
            assert_eq!(parsed.run_id, report.run_id);
            assert_eq!(parsed.outcomes, report.outcomes);
        }

        #[test]
        fn test_junit_groups_by_target() {
            let xml = mixed().render_junit();
            assert!(xml.contains(r#"<testsuites name="swagtest" tests="2" failures="1""#));
            assert!(xml.contains(r#"<testsuite name="simulated" tests="1" failures="0">"#));
            assert!(xml.contains(r#"<testsuite name="chromium" tests="1" failures="1">"#));
            assert!(xml.contains("<failure message=\"Assertion failed: cart badge: expected 2, got 1\">"));
        }

        #[test]
        fn test_escape_xml() {
            assert_eq!(escape_xml(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&apos;&amp;&apos;&lt;/a&gt;");
        }

        #[tokio::test]
        async fn test_write_reports() {
            let dir = tempfile::tempdir().unwrap();
            let report = mixed();
            let json = report.write_json(dir.path()).await.unwrap();
            let junit = report.write_junit(dir.path()).await.unwrap();
            assert!(json.ends_with(JSON_REPORT));
            assert!(std::fs::read_to_string(junit).unwrap().contains("<testsuites"));
            let parsed = RunReport::from_json(&std::fs::read_to_string(json).unwrap()).unwrap();
            assert_eq!(parsed.total_count(), 2);
        }
    }
}
