//! storeprobe: resilient browser end-to-end checks for an e-commerce storefront
//!
//! Cases drive a real browser through the storefront's pages and assert on
//! what they see. Each logical UI target is a [`Locator`] holding an ordered
//! list of CSS/XPath candidates; the first candidate that yields an
//! acceptable element wins, so markup drift in one selector does not break a
//! case.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ SuiteRunner  │──►│ TestCase     │──►│ Page objects │──►│ Session      │
//! │ (outcomes)   │   │ (catalog)    │   │ (locators)   │   │ (waits)      │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                                                 │
//!                                          ┌──────────────────────┴───────┐
//!                                          │ StoreDriver                  │
//!                                          │  ChromiumDriver │ MockDriver │
//!                                          └──────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "browser")]
//! # async fn demo() {
//! use std::sync::Arc;
//! use storeprobe::prelude::*;
//!
//! let config = ProbeConfig::default().with_env();
//! let factory = Arc::new(ChromiumFactory::new(config.driver.clone()));
//! let runner = SuiteRunner::from_config(factory, &config);
//! let summary = runner.run(&catalog(), &CaseFilter::new().suite("login")).await;
//! assert!(summary.succeeded(config.strict));
//! # }
//! ```

#![warn(missing_docs)]

mod assertion;
mod cases;
#[cfg(feature = "browser")]
mod chromium;
mod config;
mod driver;
mod locator;
/// In-memory driver for tests and benchmarks
pub mod mock;
/// Page objects for the storefront
pub mod pages;
mod result;
mod runner;
mod session;
mod suite;
mod wait;

pub use assertion::{Assertion, AssertionResult};
#[cfg(feature = "browser")]
pub use chromium::{ChromiumDriver, ChromiumFactory};
pub use config::{ProbeConfig, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_CHROMIUM_PATH, ENV_HEADLESS};
pub use driver::{DriverConfig, ElementHandle, StoreDriver};
pub use locator::{resolve, resolve_all, BoundingBox, Locator, Point, Presence, Resolved, Selector};
pub use result::{ProbeError, ProbeResult};
pub use runner::{
    CaseOutcome, CaseResult, DriverFactory, RunSummary, SuiteRunner, DEFAULT_CASE_TIMEOUT_MS,
};
pub use session::Session;
pub use suite::{catalog, CaseFilter, CaseFn, CaseKind, Suite, TestCase};
pub use wait::{
    poll_for, poll_until, WaitOptions, WaitResult, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::assertion::*;
    #[cfg(feature = "browser")]
    pub use super::chromium::*;
    pub use super::config::*;
    pub use super::driver::*;
    pub use super::locator::*;
    pub use super::pages::*;
    pub use super::result::*;
    pub use super::runner::*;
    pub use super::session::*;
    pub use super::suite::*;
    pub use super::wait::*;
}
