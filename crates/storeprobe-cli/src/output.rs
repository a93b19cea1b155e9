//! Output formatting and progress reporting

use console::{style, Term};
use std::fmt::Write as _;
use storeprobe::{CaseFilter, CaseKind, CaseOutcome, CaseResult, RunSummary, Suite};

/// Per-case and summary lines for a run, written to stderr so stdout stays
/// free for `--json`
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    fn badge(&self, outcome: CaseOutcome) -> String {
        let label = format!("{:<6}", outcome.label());
        if !self.use_color {
            return label;
        }
        let styled = match outcome {
            CaseOutcome::Passed => style(label).green(),
            CaseOutcome::Failed => style(label).red(),
            CaseOutcome::DefectConfirmed => style(label).yellow(),
            CaseOutcome::DefectFixed => style(label).magenta(),
        };
        styled.bold().to_string()
    }

    /// One line for a finished case, plus an indented message if any
    #[must_use]
    pub fn case_line(&self, result: &CaseResult) -> String {
        let mut line = format!(
            "{} {} ({} ms)",
            self.badge(result.outcome),
            result.qualified_id(),
            result.duration_ms
        );
        if let Some(message) = &result.message {
            let message = if self.use_color {
                style(message).dim().to_string()
            } else {
                message.clone()
            };
            let _ = write!(line, "\n       {message}");
        }
        line
    }

    /// Print a finished case; quiet mode still prints failures
    pub fn case_finished(&self, result: &CaseResult) {
        if self.quiet && result.outcome != CaseOutcome::Failed {
            return;
        }
        let _ = self.term.write_line(&self.case_line(result));
    }

    /// Closing summary text
    #[must_use]
    pub fn summary_text(&self, summary: &RunSummary, strict: bool) -> String {
        let mut text = format!(
            "{} cases: {} passed, {} failed, {} known defects confirmed, {} known defects fixed ({} ms)",
            summary.total(),
            summary.passed(),
            summary.failed(),
            summary.defects_confirmed(),
            summary.defects_fixed(),
            summary.duration_ms
        );
        if summary.stopped_early {
            text.push_str("\nstopped early after a failure (--fail-fast)");
        }
        let verdict = if summary.succeeded(strict) { "OK" } else { "FAILED" };
        let verdict = match (self.use_color, summary.succeeded(strict)) {
            (true, true) => style(verdict).green().bold().to_string(),
            (true, false) => style(verdict).red().bold().to_string(),
            (false, _) => verdict.to_string(),
        };
        let _ = write!(text, "\nresult: {verdict}");
        text
    }

    /// Print the closing summary
    pub fn summary(&self, summary: &RunSummary, strict: bool) {
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&self.summary_text(summary, strict));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }
}

/// Catalogue listing: a header per suite, one line per selected case
#[must_use]
pub fn render_listing(suites: &[Suite], filter: &CaseFilter) -> String {
    let mut out = String::new();
    let mut count = 0;
    for suite in suites.iter().filter(|s| filter.selects_suite(s)) {
        let cases: Vec<_> = suite.cases.iter().filter(|c| filter.selects(suite, c)).collect();
        if cases.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}  {}", suite.name, suite.description);
        for case in cases {
            count += 1;
            let _ = writeln!(
                out,
                "  {:<40} {:<12} {}",
                suite.qualified_id(case),
                case.kind.label(),
                case.name
            );
            if let CaseKind::KnownDefect { defect } = &case.kind {
                let _ = writeln!(out, "  {:<40} {:<12} {defect}", "", "");
            }
        }
    }
    let _ = writeln!(out, "{count} case(s)");
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use storeprobe::catalog;

    fn result(outcome: CaseOutcome, message: Option<&str>) -> CaseResult {
        CaseResult {
            suite: "cart".to_string(),
            case: "remove_product".to_string(),
            name: "Removing a row empties the cart".to_string(),
            kind: CaseKind::Verifies,
            outcome,
            message: message.map(ToString::to_string),
            duration_ms: 812,
        }
    }

    #[test]
    fn test_case_line_plain() {
        let reporter = ProgressReporter::new(false, false);
        let line = reporter.case_line(&result(CaseOutcome::Passed, None));
        assert_eq!(line, "PASS   cart::remove_product (812 ms)");
    }

    #[test]
    fn test_case_line_with_message() {
        let reporter = ProgressReporter::new(false, false);
        let line = reporter.case_line(&result(CaseOutcome::Failed, Some("Element not found")));
        assert!(line.starts_with("FAIL   cart::remove_product"));
        assert!(line.ends_with("\n       Element not found"));
    }

    #[test]
    fn test_listing_excludes_known_defects_by_default() {
        let suites = catalog();
        let listing = render_listing(&suites, &CaseFilter::new());
        assert!(listing.contains("login::forms_render"));
        assert!(!listing.contains("known-defect"));

        let listing = render_listing(&suites, &CaseFilter::new().known_defects(true));
        assert!(listing.contains("contact::empty_message_rejected"));
        assert!(listing.contains("known-defect"));
    }

    #[test]
    fn test_listing_suite_filter() {
        let suites = catalog();
        let listing = render_listing(&suites, &CaseFilter::new().suite("api"));
        assert!(listing.starts_with("api  "));
        assert!(!listing.contains("cart::"));
        assert!(listing.ends_with("3 case(s)\n"));
    }
}
