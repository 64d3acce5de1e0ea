//! Console output formatting for run summaries

use console::style;
use ingreso::{Reporter, TestStatus};

/// Print a created/existing line for a provisioned directory
pub fn print_provisioned(path: &std::path::Path, created: bool) {
    if created {
        println!("{} {}", style("created").green().bold(), path.display());
    } else {
        println!("{} {}", style("exists ").dim(), path.display());
    }
}

/// Print the per-test lines and the run summary
pub fn print_run(reporter: &Reporter) {
    for result in reporter.results() {
        let (mark, name) = match result.status {
            TestStatus::Passed => (style("✓").green(), style(result.name.as_str())),
            TestStatus::Failed => (style("✗").red().bold(), style(result.name.as_str()).red()),
            TestStatus::Skipped => (style("-").yellow(), style(result.name.as_str()).dim()),
        };
        println!(
            "{mark} {name} ({:.0}ms)",
            result.duration.as_secs_f64() * 1000.0
        );
        if let Some(error) = &result.error {
            println!("    {}", style(error).red());
        }
    }

    let summary = reporter.summary();
    if reporter.all_passed() {
        println!("{}", style(summary).green().bold());
    } else {
        println!("{}", style(summary).red().bold());
        println!(
            "{} failing test(s)",
            style(reporter.failed_count()).red().bold()
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use ingreso::TestResultEntry;
    use std::time::Duration;

    #[test]
    fn test_print_run_handles_mixed_results() {
        let mut reporter = Reporter::new();
        reporter
            .record(TestResultEntry::passed("a", Duration::from_millis(10)))
            .unwrap();
        reporter
            .record(TestResultEntry::failed("b", Duration::ZERO, "boom"))
            .unwrap();
        reporter.record(TestResultEntry::skipped("c")).unwrap();
        // Smoke: must not panic on any status.
        print_run(&reporter);
    }
}
