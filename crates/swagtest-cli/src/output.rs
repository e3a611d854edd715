//! Console output for runs

use console::{style, Style, Term};
use std::time::Duration;
use swagtest::{RunReport, TestOutcome};

/// Writes run results to the terminal
#[derive(Debug)]
pub struct Printer {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Printer {
    /// Create a printer on stdout
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
            quiet,
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }
        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };
        self.line(&styled);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.line(message);
    }

    /// Print one outcome; failures are printed even in quiet mode
    pub fn outcome(&self, outcome: &TestOutcome) {
        let failed = outcome.status.is_failed();
        if self.quiet && !failed {
            return;
        }
        let (mark, plain) = if failed {
            ("✗", "FAIL")
        } else if outcome.is_flaky() {
            ("~", "FLAKY")
        } else {
            ("✓", "PASS")
        };
        let prefix = if self.use_color {
            let color = if failed {
                Style::new().red().bold()
            } else if outcome.is_flaky() {
                Style::new().yellow().bold()
            } else {
                Style::new().green().bold()
            };
            color.apply_to(mark).to_string()
        } else {
            plain.to_string()
        };

        let timing = format!("({}ms)", outcome.duration_ms);
        let timing = if self.use_color {
            style(timing).dim().to_string()
        } else {
            timing
        };
        self.line(&format!(
            "{prefix} [{}] {} {timing}",
            outcome.target,
            outcome.id()
        ));

        if failed {
            if let Some(error) = outcome.last_error() {
                self.line(&format!("    {error}"));
            }
        }
        if failed || outcome.is_flaky() {
            for attempt in &outcome.attempts {
                for path in attempt
                    .screenshot
                    .iter()
                    .chain(attempt.video.iter())
                    .chain(attempt.trace.iter())
                {
                    self.line(&format!("    attempt {}: {}", attempt.attempt, path.display()));
                }
            }
        }
    }

    /// Print every outcome and then the summary
    pub fn report(&self, report: &RunReport) {
        for outcome in &report.outcomes {
            self.outcome(outcome);
        }
        self.summary(report);
    }

    /// Print run summary; shown in quiet mode only when something failed
    pub fn summary(&self, report: &RunReport) {
        let failed = report.failed_count();
        if self.quiet && failed == 0 {
            return;
        }

        self.line("");
        let passed = report.passed_count();
        let flaky = report.flaky_count();
        let total = report.total_count();
        let secs = Duration::from_millis(report.duration_ms).as_secs_f64();

        if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let flaky_style = Style::new().yellow();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };
            self.line(&format!(
                "{status} {total} tests in {secs:.2}s ({} passed, {} failed, {} flaky)",
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                flaky_style.apply_to(flaky)
            ));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            self.line(&format!(
                "{status} {total} tests in {secs:.2}s ({passed} passed, {failed} failed, {flaky} flaky)"
            ));
        }
    }
}
