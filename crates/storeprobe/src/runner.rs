//! Sequential case runner.
//!
//! Every case gets its own browser from a [`DriverFactory`], runs under a
//! deadline, and has its session closed afterwards whatever the outcome.
//! Results are classified by [`CaseOutcome::classify`].

use crate::config::ProbeConfig;
use crate::driver::StoreDriver;
use crate::result::{ProbeError, ProbeResult};
use crate::session::Session;
use crate::suite::{CaseFilter, CaseKind, Suite, TestCase};
use crate::wait::WaitOptions;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

/// Default per-case deadline (60 seconds)
pub const DEFAULT_CASE_TIMEOUT_MS: u64 = 60_000;

/// Launches one browser per case
#[async_trait]
pub trait DriverFactory: Send + Sync {
    /// Start a browser with a blank page
    async fn launch(&self) -> ProbeResult<Box<dyn StoreDriver>>;
}

/// How a case ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Verified behaviour holds
    Passed,
    /// Verified behaviour broke, or the case could not run
    Failed,
    /// Known defect still reproduces
    DefectConfirmed,
    /// Known defect no longer reproduces
    DefectFixed,
}

impl CaseOutcome {
    /// Map a case result to an outcome.
    ///
    /// | kind          | `Ok`          | assertion error     | other error |
    /// |---------------|---------------|---------------------|-------------|
    /// | `Verifies`    | `Passed`      | `Failed`            | `Failed`    |
    /// | `KnownDefect` | `DefectFixed` | `DefectConfirmed`   | `Failed`    |
    #[must_use]
    pub fn classify(kind: &CaseKind, result: &ProbeResult<()>) -> Self {
        match (kind, result) {
            (CaseKind::Verifies, Ok(())) => Self::Passed,
            (CaseKind::KnownDefect { .. }, Ok(())) => Self::DefectFixed,
            (CaseKind::KnownDefect { .. }, Err(err)) if err.is_assertion() => Self::DefectConfirmed,
            (_, Err(_)) => Self::Failed,
        }
    }

    /// Whether this outcome makes the run unsuccessful
    #[must_use]
    pub const fn is_failure(self, strict: bool) -> bool {
        match self {
            Self::Failed => true,
            Self::DefectFixed => strict,
            Self::Passed | Self::DefectConfirmed => false,
        }
    }

    /// Short label for console output
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
            Self::DefectConfirmed => "DEFECT",
            Self::DefectFixed => "FIXED",
        }
    }
}

/// Result of running a single case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    /// Suite name
    pub suite: String,
    /// Case id within the suite
    pub case: String,
    /// Case description
    pub name: String,
    /// Case category
    #[serde(flatten)]
    pub kind: CaseKind,
    /// Classified outcome
    pub outcome: CaseOutcome,
    /// Error text, or the defect note for a fixed defect
    pub message: Option<String>,
    /// Wall time including browser start and close
    pub duration_ms: u64,
}

impl CaseResult {
    /// `suite::case`
    #[must_use]
    pub fn qualified_id(&self) -> String {
        format!("{}::{}", self.suite, self.case)
    }
}

/// Results of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique run identifier
    pub run_id: Uuid,
    /// When the run began
    pub started_at: DateTime<Utc>,
    /// Site under test
    pub base_url: String,
    /// Total wall time
    pub duration_ms: u64,
    /// Per-case results in run order
    pub results: Vec<CaseResult>,
    /// Whether fail-fast skipped remaining cases
    pub stopped_early: bool,
}

impl RunSummary {
    /// Number of cases with this outcome
    #[must_use]
    pub fn count(&self, outcome: CaseOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    /// Count passed cases
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(CaseOutcome::Passed)
    }

    /// Count failed cases
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(CaseOutcome::Failed)
    }

    /// Count still-present known defects
    #[must_use]
    pub fn defects_confirmed(&self) -> usize {
        self.count(CaseOutcome::DefectConfirmed)
    }

    /// Count known defects that no longer reproduce
    #[must_use]
    pub fn defects_fixed(&self) -> usize {
        self.count(CaseOutcome::DefectFixed)
    }

    /// Get total case count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Whether the run succeeded; strict mode also rejects fixed defects
    #[must_use]
    pub fn succeeded(&self, strict: bool) -> bool {
        !self.results.iter().any(|r| r.outcome.is_failure(strict))
    }

    /// Results that make the run unsuccessful
    #[must_use]
    pub fn failures(&self, strict: bool) -> Vec<&CaseResult> {
        self.results
            .iter()
            .filter(|r| r.outcome.is_failure(strict))
            .collect()
    }
}

/// Runs selected cases one after another
pub struct SuiteRunner {
    factory: Arc<dyn DriverFactory>,
    base_url: String,
    wait: WaitOptions,
    case_timeout_ms: u64,
    fail_fast: bool,
}

impl std::fmt::Debug for SuiteRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiteRunner")
            .field("base_url", &self.base_url)
            .field("wait", &self.wait)
            .field("case_timeout_ms", &self.case_timeout_ms)
            .field("fail_fast", &self.fail_fast)
            .finish_non_exhaustive()
    }
}

impl SuiteRunner {
    /// Runner with default waits and timeouts
    #[must_use]
    pub fn new(factory: Arc<dyn DriverFactory>, base_url: impl Into<String>) -> Self {
        Self {
            factory,
            base_url: base_url.into(),
            wait: WaitOptions::default(),
            case_timeout_ms: DEFAULT_CASE_TIMEOUT_MS,
            fail_fast: false,
        }
    }

    /// Runner configured from a [`ProbeConfig`]
    #[must_use]
    pub fn from_config(factory: Arc<dyn DriverFactory>, config: &ProbeConfig) -> Self {
        Self::new(factory, config.base_url.clone())
            .with_wait(config.wait)
            .with_case_timeout(config.case_timeout_ms)
            .with_fail_fast(config.fail_fast)
    }

    /// Set session wait options
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Set default case timeout in milliseconds
    #[must_use]
    pub const fn with_case_timeout(mut self, ms: u64) -> Self {
        self.case_timeout_ms = ms;
        self
    }

    /// Stop after the first failure
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Run every case the filter selects
    pub async fn run(&self, suites: &[Suite], filter: &CaseFilter) -> RunSummary {
        self.run_with_progress(suites, filter, |_| {}).await
    }

    /// Run, reporting each result as soon as it is known
    pub async fn run_with_progress<F>(
        &self,
        suites: &[Suite],
        filter: &CaseFilter,
        mut on_result: F,
    ) -> RunSummary
    where
        F: FnMut(&CaseResult),
    {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();
        let selected = filter.apply(suites);
        info!(%run_id, cases = selected.len(), base_url = %self.base_url, "run started");

        let mut results = Vec::with_capacity(selected.len());
        let mut stopped_early = false;
        for (index, (suite, case)) in selected.iter().enumerate() {
            let result = self.run_case(suite, case).await;
            on_result(&result);
            let failed = result.outcome == CaseOutcome::Failed;
            results.push(result);
            if failed && self.fail_fast {
                stopped_early = index + 1 < selected.len();
                if stopped_early {
                    warn!(skipped = selected.len() - index - 1, "fail-fast: stopping run");
                }
                break;
            }
        }

        let summary = RunSummary {
            run_id,
            started_at,
            base_url: self.base_url.clone(),
            duration_ms: elapsed_ms(start),
            results,
            stopped_early,
        };
        info!(
            %run_id,
            total = summary.total(),
            passed = summary.passed(),
            failed = summary.failed(),
            defects_confirmed = summary.defects_confirmed(),
            defects_fixed = summary.defects_fixed(),
            duration_ms = summary.duration_ms,
            "run finished"
        );
        summary
    }

    /// Launch, run under a deadline, close
    pub async fn run_case(&self, suite: &Suite, case: &TestCase) -> CaseResult {
        let id = suite.qualified_id(case);
        info!(case = %id, kind = case.kind.label(), "case started");
        let start = Instant::now();
        let result = self.execute(&id, case).await;
        let outcome = CaseOutcome::classify(&case.kind, &result);
        let message = match (&result, &case.kind) {
            (Err(err), _) => Some(err.to_string()),
            (Ok(()), CaseKind::KnownDefect { defect }) => {
                Some(format!("known defect no longer reproduces: {defect}"))
            }
            (Ok(()), CaseKind::Verifies) => None,
        };
        let duration_ms = elapsed_ms(start);
        match &message {
            Some(message) if outcome == CaseOutcome::Failed => {
                warn!(case = %id, outcome = outcome.label(), duration_ms, error = %message, "case finished");
            }
            _ => info!(case = %id, outcome = outcome.label(), duration_ms, "case finished"),
        }
        CaseResult {
            suite: suite.name.to_string(),
            case: case.id.to_string(),
            name: case.name.to_string(),
            kind: case.kind.clone(),
            outcome,
            message,
            duration_ms,
        }
    }

    async fn execute(&self, id: &str, case: &TestCase) -> ProbeResult<()> {
        let driver = self.factory.launch().await?;
        let mut session = Session::new(driver, self.base_url.clone(), self.wait);
        let limit = case.timeout_ms.unwrap_or(self.case_timeout_ms);
        let body = case.execute(&mut session);
        let result = match tokio::time::timeout(Duration::from_millis(limit), body).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout {
                ms: limit,
                waiting_for: format!("case {id}"),
            }),
        };
        if let Err(err) = session.close().await {
            warn!(case = %id, error = %err, "closing browser failed");
        }
        result
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
