//! Chromium backend over the DevTools protocol (feature `browser`).
//!
//! Element lookups run the selector inside the page and stamp every match
//! with a `data-storeprobe-id` attribute. Later actions address the element
//! through that attribute, so a handle goes stale exactly when its node
//! leaves the document.

use crate::driver::{DriverConfig, ElementHandle, StoreDriver};
use crate::locator::{js_string, Selector};
use crate::result::{ProbeError, ProbeResult};
use crate::runner::DriverFactory;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    EventJavascriptDialogClosed, EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::Deserialize;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const ID_ATTR: &str = "data-storeprobe-id";

/// Maps an array of elements to `ElementHandle` JSON, stamping ids
const DESCRIBE_FN: &str = r"(els) => {
  if (!window.__storeprobeDoc) {
    window.__storeprobeDoc = Math.random().toString(36).slice(2, 8);
    window.__storeprobeSeq = 0;
  }
  return els.map((el) => {
    if (!el.hasAttribute('data-storeprobe-id')) {
      window.__storeprobeSeq += 1;
      el.setAttribute('data-storeprobe-id', window.__storeprobeDoc + '-' + window.__storeprobeSeq);
    }
    const rect = el.getBoundingClientRect();
    const style = window.getComputedStyle(el);
    const shown = rect.width > 0 && rect.height > 0
      && style.visibility !== 'hidden' && style.display !== 'none';
    const attributes = {};
    for (const attr of el.attributes) {
      if (attr.name !== 'data-storeprobe-id') { attributes[attr.name] = attr.value; }
    }
    return {
      id: el.getAttribute('data-storeprobe-id'),
      tag_name: el.tagName.toLowerCase(),
      text_content: (el.textContent || '').replace(/\s+/g, ' ').trim(),
      attributes,
      value: typeof el.value === 'string' ? el.value : null,
      enabled: !el.disabled,
      bounding_box: shown ? { x: rect.x, y: rect.y, width: rect.width, height: rect.height } : null,
    };
  });
}";

/// Pre-click check: scrolls the target to the centre and reports what the
/// pointer would hit
const CLICK_PROBE_FN: &str = r"(el) => {
  if (!el) { return { state: 'missing' }; }
  if (el.disabled) { return { state: 'disabled' }; }
  el.scrollIntoView({ block: 'center', inline: 'center' });
  const rect = el.getBoundingClientRect();
  if (rect.width === 0 || rect.height === 0) { return { state: 'hidden' }; }
  const top = document.elementFromPoint(rect.left + rect.width / 2, rect.top + rect.height / 2);
  if (top && top !== el && !el.contains(top)) {
    const id = top.id ? '#' + top.id : '';
    const cls = typeof top.className === 'string' && top.className ? '.' + top.className.trim().split(/\s+/).join('.') : '';
    return { state: 'blocked', obscured_by: top.tagName.toLowerCase() + id + cls };
  }
  return { state: 'clear' };
}";

#[derive(Debug, Deserialize)]
struct ClickProbe {
    state: String,
    #[serde(default)]
    obscured_by: Option<String>,
}

fn page_error(err: impl std::fmt::Display) -> ProbeError {
    ProbeError::page(err.to_string())
}

fn script_error(err: impl std::fmt::Display) -> ProbeError {
    ProbeError::Script {
        message: err.to_string(),
    }
}

fn css_for(element: &ElementHandle) -> String {
    format!("[{ID_ATTR}=\"{}\"]", element.id)
}

/// Message of the dialog currently open on the page, shared with the
/// event listener task
#[derive(Debug, Clone, Default)]
struct DialogSlot(Arc<StdMutex<Option<String>>>);

impl DialogSlot {
    fn opened(&self, message: String) {
        if let Ok(mut open) = self.0.lock() {
            *open = Some(message);
        }
    }

    fn closed(&self) {
        if let Ok(mut open) = self.0.lock() {
            *open = None;
        }
    }

    fn current(&self) -> ProbeResult<Option<String>> {
        Ok(self
            .0
            .lock()
            .map_err(|_| ProbeError::page("dialog state poisoned"))?
            .clone())
    }

    fn take(&self) -> ProbeResult<String> {
        self.0
            .lock()
            .map_err(|_| ProbeError::page("dialog state poisoned"))?
            .take()
            .ok_or(ProbeError::NoAlert)
    }
}

/// One Chromium process with a single page
pub struct ChromiumDriver {
    config: DriverConfig,
    browser: Arc<Mutex<CdpBrowser>>,
    page: CdpPage,
    dialog: DialogSlot,
    handler: JoinHandle<()>,
    dialog_listeners: [JoinHandle<()>; 2],
}

impl std::fmt::Debug for ChromiumDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromiumDriver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ChromiumDriver {
    /// Launch Chromium and open a blank page
    pub async fn launch(config: &DriverConfig) -> ProbeResult<Self> {
        let mut builder = CdpConfig::builder()
            .window_size(config.viewport_width, config.viewport_height)
            .viewport(None::<Viewport>)
            .request_timeout(config.request_timeout());

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.executable_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .build()
            .map_err(|message| ProbeError::BrowserLaunch { message })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await.map_err(page_error)?;
        if let Some(ref ua) = config.user_agent {
            page.set_user_agent(ua.clone()).await.map_err(page_error)?;
        }

        let dialog = DialogSlot::default();
        let mut opening = page
            .event_listener::<EventJavascriptDialogOpening>()
            .await
            .map_err(page_error)?;
        let mut closing = page
            .event_listener::<EventJavascriptDialogClosed>()
            .await
            .map_err(page_error)?;
        let slot = dialog.clone();
        let open_listener = tokio::spawn(async move {
            while let Some(event) = opening.next().await {
                debug!(message = %event.message, "dialog opened");
                slot.opened(event.message.clone());
            }
        });
        // Navigation or page script can close a dialog without our handler
        let slot = dialog.clone();
        let close_listener = tokio::spawn(async move {
            while let Some(event) = closing.next().await {
                debug!(accepted = event.result, "dialog closed");
                slot.closed();
            }
        });

        info!(headless = config.headless, "chromium launched");
        Ok(Self {
            config: config.clone(),
            browser: Arc::new(Mutex::new(browser)),
            page,
            dialog,
            handler,
            dialog_listeners: [open_listener, close_listener],
        })
    }

    async fn evaluate(&self, script: String) -> ProbeResult<serde_json::Value> {
        let result = self.page.evaluate(script).await.map_err(script_error)?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    /// Run `body` with `el` bound to the stamped element; `StaleElement` if gone
    async fn with_element(&self, element: &ElementHandle, body: &str) -> ProbeResult<serde_json::Value> {
        let lookup = js_string(&css_for(element));
        let value = self
            .evaluate(format!(
                "(() => {{ const el = document.querySelector({lookup}); \
                 if (!el) {{ return {{ stale: true }}; }} \
                 return {{ stale: false, value: (() => {{ {body} }})() }}; }})()"
            ))
            .await?;
        if value.get("stale").and_then(serde_json::Value::as_bool).unwrap_or(true) {
            return Err(ProbeError::StaleElement {
                id: element.id.clone(),
            });
        }
        Ok(value.get("value").cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn handle_dialog(&mut self, accept: bool) -> ProbeResult<()> {
        let message = self.dialog.take()?;
        debug!(%message, accept, "closing dialog");
        self.page
            .execute(HandleJavaScriptDialogParams::new(accept))
            .await
            .map_err(page_error)?;
        Ok(())
    }
}

#[async_trait]
impl StoreDriver for ChromiumDriver {
    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        let navigation = self.page.goto(url);
        match tokio::time::timeout(self.config.navigation_timeout(), navigation).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(ProbeError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(ProbeError::Navigation {
                url: url.to_string(),
                message: format!("no load event within {}ms", self.config.navigation_timeout_ms),
            }),
        }
    }

    async fn current_url(&self) -> ProbeResult<String> {
        Ok(self.page.url().await.map_err(page_error)?.unwrap_or_default())
    }

    async fn title(&self) -> ProbeResult<String> {
        Ok(self.page.get_title().await.map_err(page_error)?.unwrap_or_default())
    }

    async fn find_all(&self, selector: &Selector) -> ProbeResult<Vec<ElementHandle>> {
        let value = self
            .evaluate(format!("({DESCRIBE_FN})({})", selector.collect_script()))
            .await
            .map_err(|err| ProbeError::InvalidSelector {
                selector: selector.to_string(),
                message: err.to_string(),
            })?;
        Ok(serde_json::from_value(value)?)
    }

    async fn refresh(&self, element: &ElementHandle) -> ProbeResult<ElementHandle> {
        let lookup = js_string(&css_for(element));
        let value = self
            .evaluate(format!(
                "({DESCRIBE_FN})(Array.from(document.querySelectorAll({lookup})))"
            ))
            .await?;
        let mut found: Vec<ElementHandle> = serde_json::from_value(value)?;
        if found.is_empty() {
            Err(ProbeError::StaleElement {
                id: element.id.clone(),
            })
        } else {
            Ok(found.swap_remove(0))
        }
    }

    async fn click(&mut self, element: &ElementHandle) -> ProbeResult<()> {
        let lookup = js_string(&css_for(element));
        let value = self
            .evaluate(format!("({CLICK_PROBE_FN})(document.querySelector({lookup}))"))
            .await?;
        let probe: ClickProbe = serde_json::from_value(value)?;
        match probe.state.as_str() {
            "missing" => Err(ProbeError::StaleElement {
                id: element.id.clone(),
            }),
            "disabled" | "hidden" => Err(ProbeError::NotInteractable {
                id: element.id.clone(),
            }),
            "blocked" => Err(ProbeError::ClickIntercepted {
                id: element.id.clone(),
                obscured_by: probe.obscured_by.unwrap_or_default(),
            }),
            _ => {
                let target = self
                    .page
                    .find_element(css_for(element))
                    .await
                    .map_err(|_| ProbeError::StaleElement {
                        id: element.id.clone(),
                    })?;
                target.click().await.map_err(page_error)?;
                Ok(())
            }
        }
    }

    async fn js_click(&mut self, element: &ElementHandle) -> ProbeResult<()> {
        // Deferred so a dialog opened by the handler cannot block the evaluation
        self.with_element(element, "setTimeout(() => el.click(), 0); return true;")
            .await
            .map(|_| ())
    }

    async fn type_text(&mut self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
        self.with_element(element, "el.focus(); return true;").await?;
        let target = self
            .page
            .find_element(css_for(element))
            .await
            .map_err(|_| ProbeError::StaleElement {
                id: element.id.clone(),
            })?;
        target.type_str(text).await.map_err(page_error)?;
        Ok(())
    }

    async fn clear(&mut self, element: &ElementHandle) -> ProbeResult<()> {
        self.with_element(
            element,
            "el.value = ''; el.dispatchEvent(new Event('input', { bubbles: true })); return true;",
        )
        .await
        .map(|_| ())
    }

    async fn select_option(&mut self, element: &ElementHandle, value: &str) -> ProbeResult<()> {
        let wanted = js_string(value);
        let chosen = self
            .with_element(
                element,
                &format!(
                    "el.value = {wanted}; \
                     el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                     return el.value === {wanted};"
                ),
            )
            .await?;
        if chosen.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(ProbeError::Script {
                message: format!("no option {value:?} in select {}", element.id),
            })
        }
    }

    async fn scroll_into_view(&mut self, element: &ElementHandle) -> ProbeResult<()> {
        self.with_element(
            element,
            "el.scrollIntoView({ block: 'center', inline: 'center' }); return true;",
        )
        .await
        .map(|_| ())
    }

    async fn execute_js(&self, script: &str) -> ProbeResult<serde_json::Value> {
        self.evaluate(script.to_string()).await
    }

    async fn alert_text(&self) -> ProbeResult<Option<String>> {
        self.dialog.current()
    }

    async fn accept_alert(&mut self) -> ProbeResult<()> {
        self.handle_dialog(true).await
    }

    async fn dismiss_alert(&mut self) -> ProbeResult<()> {
        self.handle_dialog(false).await
    }

    async fn go_back(&mut self) -> ProbeResult<()> {
        self.evaluate("history.back(); true".to_string()).await?;
        self.page.wait_for_navigation().await.map_err(page_error)?;
        Ok(())
    }

    async fn close(&mut self) -> ProbeResult<()> {
        for listener in &self.dialog_listeners {
            listener.abort();
        }
        let mut browser = self.browser.lock().await;
        let closed = browser.close().await;
        if let Err(ref e) = closed {
            warn!(error = %e, "browser close failed");
        }
        if let Err(e) = browser.wait().await {
            warn!(error = %e, "browser process did not exit cleanly");
        }
        self.handler.abort();
        closed.map(|_| ()).map_err(|e| ProbeError::BrowserLaunch {
            message: e.to_string(),
        })
    }
}

/// Launches a fresh [`ChromiumDriver`] per case
#[derive(Debug, Clone, Default)]
pub struct ChromiumFactory {
    config: DriverConfig,
}

impl ChromiumFactory {
    /// Factory launching with `config`
    #[must_use]
    pub const fn new(config: DriverConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DriverFactory for ChromiumFactory {
    async fn launch(&self) -> ProbeResult<Box<dyn StoreDriver>> {
        let driver = ChromiumDriver::launch(&self.config).await?;
        Ok(Box::new(driver))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_for_handle() {
        let handle = ElementHandle::new("k3x9q1-4", "input");
        assert_eq!(css_for(&handle), "[data-storeprobe-id=\"k3x9q1-4\"]");
    }

    #[test]
    fn test_click_probe_parses() {
        let probe: ClickProbe =
            serde_json::from_value(serde_json::json!({"state": "blocked", "obscured_by": "iframe#aswift_2"}))
                .unwrap();
        assert_eq!(probe.state, "blocked");
        assert_eq!(probe.obscured_by.as_deref(), Some("iframe#aswift_2"));
        let clear: ClickProbe = serde_json::from_value(serde_json::json!({"state": "clear"})).unwrap();
        assert!(clear.obscured_by.is_none());
    }

    #[test]
    fn test_dialog_slot_open_then_take() {
        let slot = DialogSlot::default();
        assert!(matches!(slot.take(), Err(ProbeError::NoAlert)));
        slot.opened("Press OK to proceed!".into());
        assert_eq!(slot.current().unwrap().as_deref(), Some("Press OK to proceed!"));
        assert_eq!(slot.take().unwrap(), "Press OK to proceed!");
        assert!(slot.current().unwrap().is_none());
    }

    #[test]
    fn test_dialog_slot_cleared_when_page_closes_it() {
        let slot = DialogSlot::default();
        let listener_side = slot.clone();
        listener_side.opened("Leave site?".into());
        listener_side.closed();
        assert!(slot.current().unwrap().is_none());
        assert!(matches!(slot.take(), Err(ProbeError::NoAlert)));
    }

    #[test]
    fn test_describe_script_stamps_same_attribute() {
        assert!(DESCRIBE_FN.contains(ID_ATTR));
    }
}
