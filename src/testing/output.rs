//! `go test -v` output classification and colorized printing

use console::style;

/// How a line of `go test -v` output should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Starts with `ok`
    Pass,
    /// Contains `FAIL`
    Fail,
    /// Package without tests; dropped from the output
    NoTestFiles,
    /// Anything else, printed unchanged
    Plain,
}

/// Classify a single output line
pub fn classify_line(line: &str) -> LineKind {
    if line.contains("[no test files]") {
        LineKind::NoTestFiles
    } else if line.starts_with("ok") {
        LineKind::Pass
    } else if line.contains("FAIL") {
        LineKind::Fail
    } else {
        LineKind::Plain
    }
}

/// Render a line with its color, or `None` when it should be dropped
pub fn render_line(line: &str) -> Option<String> {
    match classify_line(line) {
        LineKind::NoTestFiles => None,
        LineKind::Pass => Some(style(line).green().bright().to_string()),
        LineKind::Fail => Some(style(line).red().bright().to_string()),
        LineKind::Plain => Some(line.to_string()),
    }
}

/// Counts gathered from a `go test -v` run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TestSummary {
    /// Packages reported as `ok`
    pub packages_ok: usize,
    /// Packages reported as `FAIL\t<pkg>`
    pub packages_failed: usize,
    /// Packages with no test files
    pub packages_without_tests: usize,
    /// `--- PASS` lines, subtests included
    pub tests_passed: usize,
    /// `--- FAIL` lines, subtests included
    pub tests_failed: usize,
    /// `--- SKIP` lines
    pub tests_skipped: usize,
}

impl TestSummary {
    /// Tally the given output
    pub fn from_output(output: &str) -> Self {
        let mut summary = Self::default();
        for line in output.lines() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("--- PASS") {
                summary.tests_passed += 1;
            } else if trimmed.starts_with("--- FAIL") {
                summary.tests_failed += 1;
            } else if trimmed.starts_with("--- SKIP") {
                summary.tests_skipped += 1;
            } else {
                match classify_line(line) {
                    LineKind::Pass => summary.packages_ok += 1,
                    LineKind::NoTestFiles => summary.packages_without_tests += 1,
                    LineKind::Fail if line.starts_with("FAIL\t") => summary.packages_failed += 1,
                    _ => {}
                }
            }
        }
        summary
    }

    /// One-line summary for the end of a run
    pub fn describe(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped across {} package(s) ({} failed, {} without tests)",
            self.tests_passed,
            self.tests_failed,
            self.tests_skipped,
            self.packages_ok + self.packages_failed,
            self.packages_failed,
            self.packages_without_tests
        )
    }
}

/// Print `output` colorized line by line and return its summary
pub fn print_colorized(output: &str) -> TestSummary {
    for line in output.lines() {
        if let Some(rendered) = render_line(line) {
            println!("{}", rendered);
        }
    }
    TestSummary::from_output(output)
}
