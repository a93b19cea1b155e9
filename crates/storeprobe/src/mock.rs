//! In-memory storefront for unit testing.
//!
//! A [`MockDriver`] holds a set of pages keyed by URL. Every element lists
//! the selector sources that match it, so locator behaviour can be exercised
//! without a browser: a selector matches an element exactly when its source
//! string appears in that element's `selectors`.

use crate::driver::{ElementHandle, StoreDriver};
use crate::locator::{BoundingBox, Selector};
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What happens when a mock element is clicked
#[derive(Debug, Clone, PartialEq)]
pub enum ClickEffect {
    /// Load another page
    Navigate(String),
    /// Open a dialog; `on_accept` runs when it is accepted
    Alert {
        /// Dialog message
        message: String,
        /// Effect applied on accept
        on_accept: Option<Box<ClickEffect>>,
    },
    /// Render a hidden element on the current page
    Reveal(String),
    /// Remove an element from the current page
    Remove(String),
    /// Stop rendering an element on the current page
    Hide(String),
    /// Apply several effects in order; later ones see the page earlier ones left
    Chain(Vec<ClickEffect>),
}

/// An element on a mock page
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Handle returned to callers
    pub handle: ElementHandle,
    /// Selector sources matching this element
    pub selectors: Vec<String>,
    /// Click behaviour
    pub on_click: Option<ClickEffect>,
    /// Element covering this one, if any
    pub obscured_by: Option<String>,
}

/// Default box given to shown mock elements
const SHOWN: BoundingBox = BoundingBox::new(0.0, 0.0, 120.0, 32.0);

impl MockElement {
    /// Create a hidden element
    #[must_use]
    pub fn new(id: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            handle: ElementHandle::new(id, tag_name),
            selectors: Vec::new(),
            on_click: None,
            obscured_by: None,
        }
    }

    /// Add selector sources that match this element
    #[must_use]
    pub fn matching<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selectors.extend(selectors.into_iter().map(Into::into));
        self
    }

    /// Render the element
    #[must_use]
    pub fn shown(mut self) -> Self {
        self.handle.bounding_box = Some(SHOWN);
        self
    }

    /// Set text content
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.handle.text_content = Some(text.into());
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.handle.attributes.insert(name.into(), value.into());
        self
    }

    /// Make this a form control with an initial value
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.handle.value = Some(value.into());
        self
    }

    /// Mark disabled
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.handle.enabled = false;
        self
    }

    /// Set click behaviour
    #[must_use]
    pub fn on_click(mut self, effect: ClickEffect) -> Self {
        self.on_click = Some(effect);
        self
    }

    /// Cover this element with another one
    #[must_use]
    pub fn obscured_by(mut self, cover: impl Into<String>) -> Self {
        self.obscured_by = Some(cover.into());
        self
    }
}

/// A mock page
#[derive(Debug, Clone)]
pub struct MockPage {
    /// Page URL
    pub url: String,
    /// Document title
    pub title: String,
    /// Elements in document order
    pub elements: Vec<MockElement>,
}

impl MockPage {
    /// Create an empty page
    #[must_use]
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            elements: Vec::new(),
        }
    }

    /// Append an element
    #[must_use]
    pub fn with_element(mut self, element: MockElement) -> Self {
        self.elements.push(element);
        self
    }

    fn element(&self, id: &str) -> Option<&MockElement> {
        self.elements.iter().find(|e| e.handle.id == id)
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut MockElement> {
        self.elements.iter_mut().find(|e| e.handle.id == id)
    }
}

/// Mock driver for unit testing
#[derive(Debug, Default)]
pub struct MockDriver {
    pages: HashMap<String, MockPage>,
    current_url: Option<String>,
    back_stack: Vec<String>,
    alert: Option<(String, Option<ClickEffect>)>,
    failing: HashSet<String>,
    js_results: Mutex<Vec<serde_json::Value>>,
    closed: bool,
    close_counter: Option<Arc<AtomicUsize>>,
    call_history: Mutex<Vec<String>>,
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page
    #[must_use]
    pub fn with_page(mut self, page: MockPage) -> Self {
        self.pages.insert(page.url.clone(), page);
        self
    }

    /// Start on the given URL without recording a navigation
    #[must_use]
    pub fn at(mut self, url: impl Into<String>) -> Self {
        self.current_url = Some(url.into());
        self
    }

    /// Make any query with this selector source fail
    #[must_use]
    pub fn failing(mut self, selector: impl Into<String>) -> Self {
        self.failing.insert(selector.into());
        self
    }

    /// Bump `counter` on every close, so callers that hand the driver away
    /// can still observe teardown
    #[must_use]
    pub fn counting_closes(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.close_counter = Some(counter);
        self
    }

    /// Queue a JS result
    pub fn set_js_result(&mut self, result: serde_json::Value) {
        if let Ok(mut queue) = self.js_results.lock() {
            queue.push(result);
        }
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.call_history
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default()
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    /// Number of calls whose record starts with `method`
    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        self.history().iter().filter(|c| c.starts_with(method)).count()
    }

    /// Whether `close` has been called
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn record(&self, call: String) {
        if let Ok(mut history) = self.call_history.lock() {
            history.push(call);
        }
    }

    fn page(&self) -> ProbeResult<&MockPage> {
        self.current_url
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .ok_or_else(|| ProbeError::page("no page loaded"))
    }

    fn page_mut(&mut self) -> ProbeResult<&mut MockPage> {
        let url = self
            .current_url
            .clone()
            .ok_or_else(|| ProbeError::page("no page loaded"))?;
        self.pages
            .get_mut(&url)
            .ok_or_else(|| ProbeError::page(format!("unknown page {url}")))
    }

    fn live_element(&self, element: &ElementHandle) -> ProbeResult<&MockElement> {
        self.page()?
            .element(&element.id)
            .ok_or_else(|| ProbeError::StaleElement {
                id: element.id.clone(),
            })
    }

    fn load(&mut self, url: &str) -> ProbeResult<()> {
        if !self.pages.contains_key(url) {
            return Err(ProbeError::Navigation {
                url: url.to_string(),
                message: "404 Not Found".to_string(),
            });
        }
        if let Some(previous) = self.current_url.replace(url.to_string()) {
            self.back_stack.push(previous);
        }
        Ok(())
    }

    fn apply(&mut self, effect: ClickEffect) -> ProbeResult<()> {
        match effect {
            ClickEffect::Navigate(url) => self.load(&url),
            ClickEffect::Alert { message, on_accept } => {
                self.alert = Some((message, on_accept.map(|e| *e)));
                Ok(())
            }
            ClickEffect::Reveal(id) => {
                let page = self.page_mut()?;
                if let Some(target) = page.element_mut(&id) {
                    target.handle.bounding_box = Some(SHOWN);
                }
                Ok(())
            }
            ClickEffect::Remove(id) => {
                self.page_mut()?.elements.retain(|e| e.handle.id != id);
                Ok(())
            }
            ClickEffect::Hide(id) => {
                if let Some(target) = self.page_mut()?.element_mut(&id) {
                    target.handle.bounding_box = None;
                }
                Ok(())
            }
            ClickEffect::Chain(effects) => effects.into_iter().try_for_each(|e| self.apply(e)),
        }
    }

    fn ensure_no_dialog(&self) -> ProbeResult<()> {
        match &self.alert {
            Some((message, _)) => Err(ProbeError::page(format!(
                "unexpected alert open: {message}"
            ))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StoreDriver for MockDriver {
    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        self.record(format!("navigate:{url}"));
        self.load(url)
    }

    async fn current_url(&self) -> ProbeResult<String> {
        Ok(self.current_url.clone().unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn title(&self) -> ProbeResult<String> {
        Ok(self.page().map(|p| p.title.clone()).unwrap_or_default())
    }

    async fn find_all(&self, selector: &Selector) -> ProbeResult<Vec<ElementHandle>> {
        self.record(format!("find_all:{selector}"));
        if self.failing.contains(selector.source()) {
            return Err(ProbeError::InvalidSelector {
                selector: selector.to_string(),
                message: "rejected by mock".to_string(),
            });
        }
        Ok(self
            .page()?
            .elements
            .iter()
            .filter(|e| e.selectors.iter().any(|s| s == selector.source()))
            .map(|e| e.handle.clone())
            .collect())
    }

    async fn refresh(&self, element: &ElementHandle) -> ProbeResult<ElementHandle> {
        Ok(self.live_element(element)?.handle.clone())
    }

    async fn click(&mut self, element: &ElementHandle) -> ProbeResult<()> {
        self.record(format!("click:{}", element.id));
        self.ensure_no_dialog()?;
        let live = self.live_element(element)?;
        if !live.handle.is_interactable() {
            return Err(ProbeError::NotInteractable {
                id: element.id.clone(),
            });
        }
        if let Some(cover) = &live.obscured_by {
            return Err(ProbeError::ClickIntercepted {
                id: element.id.clone(),
                obscured_by: cover.clone(),
            });
        }
        match live.on_click.clone() {
            Some(effect) => self.apply(effect),
            None => Ok(()),
        }
    }

    async fn js_click(&mut self, element: &ElementHandle) -> ProbeResult<()> {
        self.record(format!("js_click:{}", element.id));
        self.ensure_no_dialog()?;
        match self.live_element(element)?.on_click.clone() {
            Some(effect) => self.apply(effect),
            None => Ok(()),
        }
    }

    async fn type_text(&mut self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
        self.record(format!("type_text:{}:{text}", element.id));
        self.ensure_no_dialog()?;
        if !self.live_element(element)?.handle.is_interactable() {
            return Err(ProbeError::NotInteractable {
                id: element.id.clone(),
            });
        }
        let id = element.id.clone();
        if let Some(target) = self.page_mut()?.element_mut(&id) {
            let current = target.handle.value.take().unwrap_or_default();
            target.handle.value = Some(current + text);
        }
        Ok(())
    }

    async fn clear(&mut self, element: &ElementHandle) -> ProbeResult<()> {
        self.record(format!("clear:{}", element.id));
        self.live_element(element)?;
        let id = element.id.clone();
        if let Some(target) = self.page_mut()?.element_mut(&id) {
            target.handle.value = Some(String::new());
        }
        Ok(())
    }

    async fn select_option(&mut self, element: &ElementHandle, value: &str) -> ProbeResult<()> {
        self.record(format!("select_option:{}:{value}", element.id));
        self.ensure_no_dialog()?;
        if self.live_element(element)?.handle.tag_name != "select" {
            return Err(ProbeError::Script {
                message: format!("element {} is not a <select>", element.id),
            });
        }
        let id = element.id.clone();
        if let Some(target) = self.page_mut()?.element_mut(&id) {
            target.handle.value = Some(value.to_string());
        }
        Ok(())
    }

    async fn scroll_into_view(&mut self, element: &ElementHandle) -> ProbeResult<()> {
        self.record(format!("scroll_into_view:{}", element.id));
        self.live_element(element).map(|_| ())
    }

    async fn execute_js(&self, script: &str) -> ProbeResult<serde_json::Value> {
        self.record(format!("execute_js:{script}"));
        let mut queue = self
            .js_results
            .lock()
            .map_err(|_| ProbeError::Script {
                message: "mock script queue poisoned".to_string(),
            })?;
        if queue.is_empty() {
            Ok(serde_json::Value::Null)
        } else {
            Ok(queue.remove(0))
        }
    }

    async fn alert_text(&self) -> ProbeResult<Option<String>> {
        Ok(self.alert.as_ref().map(|(message, _)| message.clone()))
    }

    async fn accept_alert(&mut self) -> ProbeResult<()> {
        self.record("accept_alert".to_string());
        let (_, follow_up) = self.alert.take().ok_or(ProbeError::NoAlert)?;
        match follow_up {
            Some(effect) => self.apply(effect),
            None => Ok(()),
        }
    }

    async fn dismiss_alert(&mut self) -> ProbeResult<()> {
        self.record("dismiss_alert".to_string());
        self.alert.take().map(|_| ()).ok_or(ProbeError::NoAlert)
    }

    async fn go_back(&mut self) -> ProbeResult<()> {
        self.record("go_back".to_string());
        if let Some(previous) = self.back_stack.pop() {
            self.current_url = Some(previous);
        }
        Ok(())
    }

    async fn close(&mut self) -> ProbeResult<()> {
        self.record("close".to_string());
        self.closed = true;
        if let Some(counter) = &self.close_counter {
            counter.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
