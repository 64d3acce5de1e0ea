//! Run reporter: per-test results, HTML summary, JSON persistence.
//!
//! The reporter collects one [`TestResultEntry`] per test case and renders
//! the run summary at `reports/test-report.html`. In fail-fast mode
//! recording a failure stops the run; in collect-all mode (the suite's
//! default, matching its sequential continue-after-failure model) every
//! result is gathered and the summary carries them all.

use crate::result::{IngresoError, IngresoResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Default page title of the HTML report
pub const REPORT_TITLE: &str = "Sauce Demo Test Report";

/// What a recorded failure does to the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Stop on first failure
    FailFast,
    /// Gather all failures and keep going
    #[default]
    CollectAll,
}

/// Outcome of one test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    /// Test passed
    Passed,
    /// Test failed
    Failed,
    /// Test was skipped
    Skipped,
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

/// Result of one test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResultEntry {
    /// Test name
    pub name: String,
    /// Outcome
    pub status: TestStatus,
    /// Wall-clock duration
    pub duration: Duration,
    /// Error message when failed
    pub error: Option<String>,
    /// Screenshot captured for this case, relative to the artifact root
    pub screenshot: Option<String>,
    /// When the case finished
    pub timestamp: SystemTime,
}

impl TestResultEntry {
    /// Create a passing result
    #[must_use]
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            duration,
            error: None,
            screenshot: None,
            timestamp: SystemTime::now(),
        }
    }

    /// Create a failing result
    #[must_use]
    pub fn failed(name: impl Into<String>, duration: Duration, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            duration,
            error: Some(error.into()),
            screenshot: None,
            timestamp: SystemTime::now(),
        }
    }

    /// Create a skipped result
    #[must_use]
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Skipped,
            duration: Duration::ZERO,
            error: None,
            screenshot: None,
            timestamp: SystemTime::now(),
        }
    }

    /// Attach the screenshot path captured for this case
    #[must_use]
    pub fn with_screenshot(mut self, path: impl Into<String>) -> Self {
        self.screenshot = Some(path.into());
        self
    }
}

/// Serialized form of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RunRecord {
    suite_name: String,
    results: Vec<TestResultEntry>,
}

/// Collects test results for one run
#[derive(Debug)]
pub struct Reporter {
    suite_name: String,
    results: Vec<TestResultEntry>,
    failure_mode: FailureMode,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    /// Create a collect-all reporter with the standard report title
    #[must_use]
    pub fn new() -> Self {
        Self {
            suite_name: REPORT_TITLE.to_string(),
            results: Vec::new(),
            failure_mode: FailureMode::CollectAll,
        }
    }

    /// Create a fail-fast reporter
    #[must_use]
    pub fn fail_fast() -> Self {
        Self {
            failure_mode: FailureMode::FailFast,
            ..Self::new()
        }
    }

    /// Set the suite name shown in the summary
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    /// The suite name
    #[must_use]
    pub fn suite_name(&self) -> &str {
        &self.suite_name
    }

    /// Record one result.
    ///
    /// # Errors
    ///
    /// In fail-fast mode, recording a failed result returns `Assertion`.
    pub fn record(&mut self, result: TestResultEntry) -> IngresoResult<()> {
        let failure = result
            .status
            .is_failed()
            .then(|| (result.name.clone(), result.error.clone().unwrap_or_default()));
        self.results.push(result);

        if self.failure_mode == FailureMode::FailFast {
            if let Some((name, error)) = failure {
                return Err(IngresoError::Assertion {
                    message: format!("run stopped: test '{name}' failed: {error}"),
                });
            }
        }
        Ok(())
    }

    /// Recorded results in order
    #[must_use]
    pub fn results(&self) -> &[TestResultEntry] {
        &self.results
    }

    /// Failed results only
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResultEntry> {
        self.results.iter().filter(|r| r.status.is_failed()).collect()
    }

    /// Number of passed tests
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_passed()).count()
    }

    /// Number of failed tests
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_failed()).count()
    }

    /// Total number of recorded tests
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    /// Pass rate in [0.0, 1.0]; an empty run counts as fully passing
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 1.0;
        }
        self.passed_count() as f64 / self.results.len() as f64
    }

    /// Whether no recorded test failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Sum of recorded durations
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }

    /// One-line run summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {}/{} passed ({:.1}%)",
            self.suite_name,
            self.passed_count(),
            self.total_count(),
            self.pass_rate() * 100.0
        )
    }

    /// Write the HTML report.
    ///
    /// # Errors
    ///
    /// Propagates filesystem failures as `Io`.
    pub fn generate_html(&self, output_path: &Path) -> IngresoResult<()> {
        std::fs::write(output_path, self.render_html())?;
        Ok(())
    }

    /// Render the HTML report content
    #[must_use]
    pub fn render_html(&self) -> String {
        let mut html = String::new();

        html.push_str(&format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }}
        .summary {{ background: #f5f5f5; padding: 20px; border-radius: 8px; margin-bottom: 20px; }}
        .progress-bar {{ background: #ddd; height: 20px; border-radius: 10px; overflow: hidden; }}
        .passed {{ background: #4caf50; height: 100%; }}
        .test {{ padding: 10px; margin: 5px 0; border-radius: 4px; }}
        .test.pass {{ background: #e8f5e9; border-left: 4px solid #4caf50; }}
        .test.fail {{ background: #ffebee; border-left: 4px solid #f44336; }}
        .test.skip {{ background: #fff3e0; border-left: 4px solid #ff9800; }}
        .error {{ color: #d32f2f; font-family: monospace; white-space: pre-wrap; }}
        .screenshot {{ font-size: 0.85em; }}
    </style>
</head>
<body>
"#,
            escape_html(&self.suite_name)
        ));

        html.push_str(&format!(
            r#"<div class="summary">
    <h1>{}</h1>
    <h2>Results: {}/{} passed ({:.1}%)</h2>
    <div class="progress-bar">
        <div class="passed" style="width: {:.1}%"></div>
    </div>
    <p>Duration: {:.2}s</p>
</div>
"#,
            escape_html(&self.suite_name),
            self.passed_count(),
            self.total_count(),
            self.pass_rate() * 100.0,
            self.pass_rate() * 100.0,
            self.total_duration().as_secs_f64()
        ));

        html.push_str("<h2>Test Results</h2>\n");
        for result in &self.results {
            let class = match result.status {
                TestStatus::Passed => "pass",
                TestStatus::Failed => "fail",
                TestStatus::Skipped => "skip",
            };

            html.push_str(&format!(
                r#"<div class="test {}">
    <strong>{}</strong> - {:?} ({:.2}ms)
"#,
                class,
                escape_html(&result.name),
                result.status,
                result.duration.as_secs_f64() * 1000.0
            ));

            if let Some(error) = &result.error {
                html.push_str(&format!(
                    r#"    <div class="error">{}</div>"#,
                    escape_html(error)
                ));
            }
            if let Some(screenshot) = &result.screenshot {
                html.push_str(&format!(
                    r#"    <div class="screenshot"><a href="{0}">{0}</a></div>"#,
                    escape_html(screenshot)
                ));
            }

            html.push_str("</div>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    /// Persist the run as JSON so it can be re-rendered later.
    ///
    /// # Errors
    ///
    /// Propagates serialization and filesystem failures.
    pub fn save_json(&self, output_path: &Path) -> IngresoResult<()> {
        let record = RunRecord {
            suite_name: self.suite_name.clone(),
            results: self.results.clone(),
        };
        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(output_path, json)?;
        Ok(())
    }

    /// Load a previously saved run.
    ///
    /// # Errors
    ///
    /// Propagates deserialization and filesystem failures.
    pub fn load_json(input_path: &Path) -> IngresoResult<Self> {
        let json = std::fs::read_to_string(input_path)?;
        let record: RunRecord = serde_json::from_str(&json)?;
        Ok(Self {
            suite_name: record.suite_name,
            results: record.results,
            failure_mode: FailureMode::CollectAll,
        })
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
