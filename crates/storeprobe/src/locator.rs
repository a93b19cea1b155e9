//! Resilient element location.
//!
//! The storefront's markup differs slightly between pages and drifts over
//! time, so a logical target ("the login email field") is described by an
//! ordered list of candidate selectors rather than a single one.
//!
//! # Resolution rules
//!
//! - Candidates are evaluated in order; the first one yielding an element
//!   that meets the [`Presence`] requirement wins.
//! - A candidate whose query errors is skipped, never reported.
//! - Only exhaustion of every candidate is reported, as `None`.
//! - Resolution never mutates the page. Scrolling the result into view is
//!   the caller's business.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::driver::{ElementHandle, StoreDriver};
use crate::wait::{poll_for, WaitOptions, DEFAULT_POLL_INTERVAL_MS};

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Bounding box of a rendered element, in CSS pixels relative to the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl BoundingBox {
    /// Create a new bounding box
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the center point
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point is inside the box
    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Whether the box covers any area at all
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Selector language tag plus source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "source", rename_all = "lowercase")]
pub enum Selector {
    /// Attribute-query form (e.g. `input[data-qa='login-email']`)
    Css(String),
    /// Path-query form (e.g. `//button[normalize-space()='Login']`)
    XPath(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::XPath(selector.into())
    }

    /// Raw selector source without the language tag
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) => s,
        }
    }

    /// Language tag used in logs and error messages
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Css(_) => "css",
            Self::XPath(_) => "xpath",
        }
    }

    /// JavaScript expression evaluating to an `Array` of every matched element
    #[must_use]
    pub fn collect_script(&self) -> String {
        let literal = js_string(self.source());
        match self {
            Self::Css(_) => format!("Array.from(document.querySelectorAll({literal}))"),
            Self::XPath(_) => format!(
                "(() => {{ \
                 const snap = document.evaluate({literal}, document, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                 const out = []; \
                 for (let i = 0; i < snap.snapshotLength; i++) {{ \
                 const node = snap.snapshotItem(i); \
                 if (node.nodeType === 1) {{ out.push(node); }} \
                 }} \
                 return out; \
                 }})()"
            ),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.source())
    }
}

/// Quote a string as a JavaScript string literal
pub(crate) fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// How usable a match must be before it is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Presence {
    /// Present in the document
    #[default]
    Attached,
    /// Present and rendered with a non-empty box
    Visible,
    /// Visible and enabled
    Interactable,
}

impl Presence {
    /// Check whether an element satisfies this requirement
    #[must_use]
    pub fn accepts(self, element: &ElementHandle) -> bool {
        match self {
            Self::Attached => true,
            Self::Visible => element.is_visible(),
            Self::Interactable => element.is_interactable(),
        }
    }
}

/// A logical UI target with its ordered fallback candidates
#[derive(Debug, Clone, PartialEq)]
pub struct Locator {
    name: String,
    candidates: Vec<Selector>,
    presence: Presence,
    candidate_wait: Option<Duration>,
}

impl Locator {
    /// Create a locator with no candidates yet
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            candidates: Vec::new(),
            presence: Presence::Attached,
            candidate_wait: None,
        }
    }

    /// Append a CSS candidate
    #[must_use]
    pub fn css(mut self, selector: impl Into<String>) -> Self {
        self.candidates.push(Selector::css(selector));
        self
    }

    /// Append an XPath candidate
    #[must_use]
    pub fn xpath(mut self, selector: impl Into<String>) -> Self {
        self.candidates.push(Selector::xpath(selector));
        self
    }

    /// Append an already-built candidate
    #[must_use]
    pub fn candidate(mut self, selector: Selector) -> Self {
        self.candidates.push(selector);
        self
    }

    /// Require the match to be rendered
    #[must_use]
    pub const fn visible(mut self) -> Self {
        self.presence = Presence::Visible;
        self
    }

    /// Require the match to be rendered and enabled
    #[must_use]
    pub const fn interactable(mut self) -> Self {
        self.presence = Presence::Interactable;
        self
    }

    /// Set the presence requirement
    #[must_use]
    pub const fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = presence;
        self
    }

    /// Poll each candidate for up to `wait` before moving to the next
    #[must_use]
    pub const fn with_candidate_wait(mut self, wait: Duration) -> Self {
        self.candidate_wait = Some(wait);
        self
    }

    /// Logical name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Candidates in priority order
    #[must_use]
    pub fn candidates(&self) -> &[Selector] {
        &self.candidates
    }

    /// Presence requirement
    #[must_use]
    pub const fn presence(&self) -> Presence {
        self.presence
    }

    /// Per-candidate wait, if any
    #[must_use]
    pub const fn candidate_wait(&self) -> Option<Duration> {
        self.candidate_wait
    }

    /// Comma-separated candidate list for diagnostics
    #[must_use]
    pub fn describe_candidates(&self) -> String {
        self.candidates
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Resolve against the driver's current document
    pub async fn resolve(&self, driver: &dyn StoreDriver) -> Option<Resolved> {
        resolve(driver, self).await
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A successful resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// The matched element
    pub element: ElementHandle,
    /// Candidate that produced the match
    pub selector: Selector,
    /// Position of that candidate in the locator's list
    pub index: usize,
}

/// Resolve a locator to the first acceptable element.
///
/// Returns `None` when every candidate is exhausted, and immediately for an
/// empty candidate list.
pub async fn resolve(driver: &dyn StoreDriver, locator: &Locator) -> Option<Resolved> {
    let presence = locator.presence();
    for (index, selector) in locator.candidates().iter().enumerate() {
        let found = match locator.candidate_wait() {
            Some(wait) => {
                let options = WaitOptions::new()
                    .with_timeout(wait.as_millis() as u64)
                    .with_poll_interval(DEFAULT_POLL_INTERVAL_MS.min(wait.as_millis() as u64).max(1));
                let description = format!("{} via {selector}", locator.name());
                poll_for(&options, &description, || {
                    try_candidate(driver, selector, presence)
                })
                .await
                .ok()
            }
            None => try_candidate(driver, selector, presence).await,
        };

        if let Some(element) = found {
            debug!(
                locator = locator.name(),
                %selector,
                index,
                element = %element.id,
                "resolved"
            );
            return Some(Resolved {
                element,
                selector: selector.clone(),
                index,
            });
        }
    }

    debug!(
        locator = locator.name(),
        candidates = locator.candidates().len(),
        "all candidates exhausted"
    );
    None
}

/// Every acceptable match of the first candidate that has any
pub async fn resolve_all(driver: &dyn StoreDriver, locator: &Locator) -> Vec<ElementHandle> {
    let presence = locator.presence();
    for selector in locator.candidates() {
        match driver.find_all(selector).await {
            Ok(elements) => {
                let accepted: Vec<_> = elements
                    .into_iter()
                    .filter(|e| presence.accepts(e))
                    .collect();
                if !accepted.is_empty() {
                    return accepted;
                }
            }
            Err(err) => debug!(locator = locator.name(), %selector, error = %err, "candidate failed"),
        }
    }
    Vec::new()
}

async fn try_candidate(
    driver: &dyn StoreDriver,
    selector: &Selector,
    presence: Presence,
) -> Option<ElementHandle> {
    match driver.find_all(selector).await {
        Ok(elements) => elements.into_iter().find(|e| presence.accepts(e)),
        Err(err) => {
            debug!(%selector, error = %err, "candidate failed");
            None
        }
    }
}
