//! Run configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! environment variables, then whatever the caller (usually the CLI) sets
//! last. [`ProbeConfig::validate`] runs after every layer is applied.

use crate::driver::DriverConfig;
use crate::result::{ProbeError, ProbeResult};
use crate::runner::DEFAULT_CASE_TIMEOUT_MS;
use crate::wait::WaitOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Site the suites were written against
pub const DEFAULT_BASE_URL: &str = "https://automationexercise.com";

/// Overrides `base_url`
pub const ENV_BASE_URL: &str = "STOREPROBE_BASE_URL";
/// Overrides `driver.headless` (`true`/`false`/`1`/`0`)
pub const ENV_HEADLESS: &str = "STOREPROBE_HEADLESS";
/// Overrides `driver.executable_path`
pub const ENV_CHROMIUM_PATH: &str = "CHROMIUM_PATH";

/// Everything a run needs besides the case selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Storefront root URL
    pub base_url: String,
    /// Browser launch settings
    pub driver: DriverConfig,
    /// Default element and condition waits
    pub wait: WaitOptions,
    /// Deadline for a whole case
    pub case_timeout_ms: u64,
    /// Stop after the first failed case
    pub fail_fast: bool,
    /// Treat fixed known defects as failures
    pub strict: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            driver: DriverConfig::default(),
            wait: WaitOptions::default(),
            case_timeout_ms: DEFAULT_CASE_TIMEOUT_MS,
            fail_fast: false,
            strict: false,
        }
    }
}

impl ProbeConfig {
    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml(yaml: &str) -> ProbeResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML file
    pub fn load(path: &Path) -> ProbeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text).map_err(|err| match err {
            ProbeError::Config { message } => {
                ProbeError::config(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    #[must_use]
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(headless) = lookup(ENV_HEADLESS).and_then(|v| parse_bool(&v)) {
            self.driver.headless = headless;
        }
        if let Some(path) = lookup(ENV_CHROMIUM_PATH).filter(|v| !v.trim().is_empty()) {
            self.driver.executable_path = Some(path);
        }
        self
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> ProbeResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ProbeError::config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.wait.timeout_ms == 0 || self.wait.poll_interval_ms == 0 {
            return Err(ProbeError::config("wait timeout and poll interval must be positive"));
        }
        if self.case_timeout_ms < self.wait.timeout_ms {
            return Err(ProbeError::config(format!(
                "case_timeout_ms ({}) is shorter than wait.timeout_ms ({})",
                self.case_timeout_ms, self.wait.timeout_ms
            )));
        }
        if self.driver.viewport_width == 0 || self.driver.viewport_height == 0 {
            return Err(ProbeError::config("viewport dimensions must be positive"));
        }
        Ok(())
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> ProbeResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
