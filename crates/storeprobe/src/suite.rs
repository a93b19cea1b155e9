//! Case registry.
//!
//! A [`TestCase`] is a plain function over a [`Session`]. Cases are grouped in
//! named [`Suite`]s, and [`catalog`] returns every suite the tool ships.
//!
//! Two kinds of case exist. [`CaseKind::Verifies`] checks behaviour the site
//! gets right. [`CaseKind::KnownDefect`] checks the behaviour the site *should*
//! have but currently lacks; its body asserts the correct outcome and the
//! runner, not the case, decides what a failing assertion means.

use crate::result::ProbeResult;
use crate::session::Session;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Signature of a case body
pub type CaseFn = for<'a> fn(&'a mut Session) -> BoxFuture<'a, ProbeResult<()>>;

/// Whether a case verifies working behaviour or tracks a site defect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CaseKind {
    /// Expected to pass
    Verifies,
    /// Expected to fail its assertion until the site is fixed
    KnownDefect {
        /// What the site gets wrong
        defect: String,
    },
}

impl CaseKind {
    /// Whether this is a known-defect case
    #[must_use]
    pub const fn is_known_defect(&self) -> bool {
        matches!(self, Self::KnownDefect { .. })
    }

    /// Short label for listings
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Verifies => "verifies",
            Self::KnownDefect { .. } => "known-defect",
        }
    }
}

/// A single end-to-end case
#[derive(Clone)]
pub struct TestCase {
    /// Identifier, unique within its suite
    pub id: &'static str,
    /// One-line description
    pub name: &'static str,
    /// Case category
    pub kind: CaseKind,
    /// Per-case timeout override in milliseconds
    pub timeout_ms: Option<u64>,
    run: CaseFn,
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl TestCase {
    /// Case that checks working behaviour
    #[must_use]
    pub const fn verifies(id: &'static str, name: &'static str, run: CaseFn) -> Self {
        Self {
            id,
            name,
            kind: CaseKind::Verifies,
            timeout_ms: None,
            run,
        }
    }

    /// Case that asserts correct behaviour the site is known to lack
    #[must_use]
    pub fn known_defect(
        id: &'static str,
        name: &'static str,
        defect: impl Into<String>,
        run: CaseFn,
    ) -> Self {
        Self {
            id,
            name,
            kind: CaseKind::KnownDefect {
                defect: defect.into(),
            },
            timeout_ms: None,
            run,
        }
    }

    /// Set timeout
    #[must_use]
    pub const fn with_timeout(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    /// Run the body against a session
    pub fn execute<'a>(&self, session: &'a mut Session) -> BoxFuture<'a, ProbeResult<()>> {
        (self.run)(session)
    }
}

/// A named group of cases
#[derive(Debug, Clone)]
pub struct Suite {
    /// Suite name
    pub name: &'static str,
    /// What the suite covers
    pub description: &'static str,
    /// Cases in run order
    pub cases: Vec<TestCase>,
}

impl Suite {
    /// Create an empty suite
    #[must_use]
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            cases: Vec::new(),
        }
    }

    /// Append a case
    #[must_use]
    pub fn with_case(mut self, case: TestCase) -> Self {
        self.cases.push(case);
        self
    }

    /// Get the number of cases
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether the suite has no cases
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Look up a case by id
    #[must_use]
    pub fn case(&self, id: &str) -> Option<&TestCase> {
        self.cases.iter().find(|c| c.id == id)
    }

    /// `suite::case` identifier
    #[must_use]
    pub fn qualified_id(&self, case: &TestCase) -> String {
        format!("{}::{}", self.name, case.id)
    }
}

/// Every suite, in run order
#[must_use]
pub fn catalog() -> Vec<Suite> {
    vec![
        crate::cases::home::suite(),
        crate::cases::login::suite(),
        crate::cases::contact::suite(),
        crate::cases::products::suite(),
        crate::cases::cart::suite(),
        crate::cases::api::suite(),
    ]
}

/// Selects which cases to run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
    /// Suite names; empty selects every suite
    pub suites: Vec<String>,
    /// Substring matched against `suite::case` and the description
    pub pattern: Option<String>,
    /// Include known-defect cases
    pub include_known_defects: bool,
}

impl CaseFilter {
    /// Filter that selects everything except known defects
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a suite (repeatable)
    #[must_use]
    pub fn suite(mut self, name: impl Into<String>) -> Self {
        self.suites.push(name.into());
        self
    }

    /// Restrict by substring
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Include or exclude known-defect cases
    #[must_use]
    pub const fn known_defects(mut self, include: bool) -> Self {
        self.include_known_defects = include;
        self
    }

    /// Whether a suite is selected
    #[must_use]
    pub fn selects_suite(&self, suite: &Suite) -> bool {
        self.suites.is_empty() || self.suites.iter().any(|s| s.eq_ignore_ascii_case(suite.name))
    }

    /// Whether a case of a selected suite is selected
    #[must_use]
    pub fn selects(&self, suite: &Suite, case: &TestCase) -> bool {
        if !self.selects_suite(suite) {
            return false;
        }
        if case.kind.is_known_defect() && !self.include_known_defects {
            return false;
        }
        self.pattern.as_deref().map_or(true, |pattern| {
            let pattern = pattern.to_lowercase();
            suite.qualified_id(case).to_lowercase().contains(&pattern)
                || case.name.to_lowercase().contains(&pattern)
        })
    }

    /// Selected cases in catalogue order
    #[must_use]
    pub fn apply<'s>(&self, suites: &'s [Suite]) -> Vec<(&'s Suite, &'s TestCase)> {
        suites
            .iter()
            .flat_map(|suite| suite.cases.iter().map(move |case| (suite, case)))
            .filter(|(suite, case)| self.selects(suite, case))
            .collect()
    }

    /// Requested suite names that match no suite
    #[must_use]
    pub fn unknown_suites(&self, suites: &[Suite]) -> Vec<String> {
        self.suites
            .iter()
            .filter(|name| !suites.iter().any(|s| s.name.eq_ignore_ascii_case(name)))
            .cloned()
            .collect()
    }
}
