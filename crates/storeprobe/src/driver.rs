//! Browser automation seam.
//!
//! [`StoreDriver`] is the only surface the rest of the crate talks to. The
//! Chromium backend (feature `browser`) and the in-memory
//! [`MockDriver`](crate::mock::MockDriver) both implement it, so suites and
//! locator logic never depend on a particular browser protocol.

use crate::locator::{BoundingBox, Selector};
use crate::result::ProbeResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Snapshot of a matched DOM element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Identifier, stable while the element stays in the document
    pub id: String,
    /// Lower-case tag name
    pub tag_name: String,
    /// Trimmed rendered text
    #[serde(default)]
    pub text_content: Option<String>,
    /// Attribute map
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Current value for form controls
    #[serde(default)]
    pub value: Option<String>,
    /// Whether the control accepts input
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Bounding box if rendered
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
}

const fn default_enabled() -> bool {
    true
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag_name: tag_name.into(),
            text_content: None,
            attributes: BTreeMap::new(),
            value: None,
            enabled: true,
            bounding_box: None,
        }
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the form value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the rendered box
    #[must_use]
    pub const fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounding_box = Some(bounds);
        self
    }

    /// Mark the control disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Check if element is visible
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.bounding_box.is_some_and(|b| b.has_area())
    }

    /// Visible and enabled
    #[must_use]
    pub fn is_interactable(&self) -> bool {
        self.enabled && self.is_visible()
    }

    /// Rendered text, empty when absent
    #[must_use]
    pub fn text(&self) -> &str {
        self.text_content.as_deref().unwrap_or_default()
    }

    /// Attribute value
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Browser configuration for driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// User agent string
    pub user_agent: Option<String>,
    /// Timeout for navigation (ms)
    pub navigation_timeout_ms: u64,
    /// Timeout for a single CDP request (ms)
    pub request_timeout_ms: u64,
    /// Executable path override
    pub executable_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            user_agent: None,
            navigation_timeout_ms: 30_000,
            request_timeout_ms: 15_000,
            executable_path: None,
            sandbox: true,
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set user agent
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set the browser executable
    #[must_use]
    pub fn executable(mut self, path: impl Into<String>) -> Self {
        self.executable_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Navigation timeout
    #[must_use]
    pub const fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// Request timeout
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Abstract driver for one live browser page.
///
/// Query methods take `&self`. Anything that changes page state takes
/// `&mut self`, so a session has exclusive use of its driver while acting.
///
/// # Implementations
///
/// - `ChromiumDriver` - CDP via chromiumoxide (feature `browser`)
/// - `MockDriver` - in-memory site for unit testing
#[async_trait]
pub trait StoreDriver: Send + Sync {
    /// Navigate to URL and wait for the load event
    async fn navigate(&mut self, url: &str) -> ProbeResult<()>;

    /// Current URL
    async fn current_url(&self) -> ProbeResult<String>;

    /// Document title
    async fn title(&self) -> ProbeResult<String>;

    /// All elements matching a selector, in document order
    async fn find_all(&self, selector: &Selector) -> ProbeResult<Vec<ElementHandle>>;

    /// Re-read an element's state; `StaleElement` if it left the document
    async fn refresh(&self, element: &ElementHandle) -> ProbeResult<ElementHandle>;

    /// Native (pointer) click; `ClickIntercepted` when something covers it
    async fn click(&mut self, element: &ElementHandle) -> ProbeResult<()>;

    /// Script-triggered click that ignores overlays
    async fn js_click(&mut self, element: &ElementHandle) -> ProbeResult<()>;

    /// Type text into element
    async fn type_text(&mut self, element: &ElementHandle, text: &str) -> ProbeResult<()>;

    /// Clear a form control
    async fn clear(&mut self, element: &ElementHandle) -> ProbeResult<()>;

    /// Choose the `<option>` with this value in a `<select>`
    async fn select_option(&mut self, element: &ElementHandle, value: &str) -> ProbeResult<()>;

    /// Scroll element into the viewport
    async fn scroll_into_view(&mut self, element: &ElementHandle) -> ProbeResult<()>;

    /// Evaluate JavaScript in page context
    async fn execute_js(&self, script: &str) -> ProbeResult<serde_json::Value>;

    /// Message of the open alert/confirm dialog, if any
    async fn alert_text(&self) -> ProbeResult<Option<String>>;

    /// Accept the open dialog
    async fn accept_alert(&mut self) -> ProbeResult<()>;

    /// Dismiss the open dialog
    async fn dismiss_alert(&mut self) -> ProbeResult<()>;

    /// Go back in history
    async fn go_back(&mut self) -> ProbeResult<()>;

    /// Close the browser
    async fn close(&mut self) -> ProbeResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod element_handle_tests {
        use super::*;

        #[test]
        fn test_element_handle_creation() {
            let elem = ElementHandle::new("btn-1", "button");
            assert_eq!(elem.id, "btn-1");
            assert_eq!(elem.tag_name, "button");
            assert!(elem.text_content.is_none());
            assert_eq!(elem.text(), "");
            assert!(elem.enabled);
        }

        #[test]
        fn test_element_handle_visibility() {
            let mut elem = ElementHandle::new("elem", "div");
            assert!(!elem.is_visible());

            elem.bounding_box = Some(BoundingBox::new(0.0, 0.0, 100.0, 100.0));
            assert!(elem.is_visible());
            assert!(elem.is_interactable());
            assert!(!elem.disabled().is_interactable());
        }

        #[test]
        fn test_element_handle_attributes() {
            let elem = ElementHandle::new("e", "input")
                .with_attribute("data-qa", "login-email")
                .with_value("a@b.c");
            assert_eq!(elem.attribute("data-qa"), Some("login-email"));
            assert_eq!(elem.attribute("name"), None);
            assert_eq!(elem.value.as_deref(), Some("a@b.c"));
        }

        #[test]
        fn test_element_handle_from_page_json() {
            let json = serde_json::json!({
                "id": "12",
                "tag_name": "a",
                "text_content": "Signup / Login",
                "attributes": {"href": "/login"},
                "bounding_box": {"x": 1.0, "y": 2.0, "width": 80.0, "height": 20.0}
            });
            let elem: ElementHandle = serde_json::from_value(json).unwrap();
            assert!(elem.enabled);
            assert!(elem.is_visible());
            assert_eq!(elem.attribute("href"), Some("/login"));
        }
    }

    mod driver_config_tests {
        use super::*;

        #[test]
        fn test_config_default() {
            let config = DriverConfig::default();
            assert!(config.headless);
            assert!(config.sandbox);
            assert_eq!(config.viewport_width, 1920);
            assert_eq!(config.navigation_timeout(), Duration::from_secs(30));
        }

        #[test]
        fn test_config_builder() {
            let config = DriverConfig::new()
                .headless(false)
                .viewport(800, 600)
                .user_agent("test-agent")
                .executable("/usr/bin/chromium")
                .no_sandbox();

            assert!(!config.headless);
            assert!(!config.sandbox);
            assert_eq!(config.viewport_width, 800);
            assert_eq!(config.viewport_height, 600);
            assert_eq!(config.user_agent.as_deref(), Some("test-agent"));
            assert_eq!(config.executable_path.as_deref(), Some("/usr/bin/chromium"));
        }
    }
}
