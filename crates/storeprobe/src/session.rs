//! Explicit browser session context.
//!
//! A [`Session`] owns exactly one driver for one case. Cases receive it as
//! `&mut Session`; nothing about the browser lives in global state. The
//! runner opens a session in setup and always calls [`Session::close`] in
//! teardown.

use crate::driver::{ElementHandle, StoreDriver};
use crate::locator::{resolve, resolve_all, Locator, Resolved};
use crate::result::{ProbeError, ProbeResult};
use crate::wait::{poll_for, poll_until, WaitOptions, WaitResult};
use tracing::{debug, warn};

/// One live browser page plus the context cases need to drive it
pub struct Session {
    driver: Box<dyn StoreDriver>,
    base_url: String,
    wait: WaitOptions,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("wait", &self.wait)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Wrap a launched driver
    #[must_use]
    pub fn new(driver: Box<dyn StoreDriver>, base_url: impl Into<String>, wait: WaitOptions) -> Self {
        Self {
            driver,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            wait,
        }
    }

    /// Base URL without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Default wait options
    #[must_use]
    pub const fn wait_options(&self) -> &WaitOptions {
        &self.wait
    }

    /// Borrow the driver
    #[must_use]
    pub fn driver(&self) -> &dyn StoreDriver {
        self.driver.as_ref()
    }

    /// Absolute URL for a site path
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Navigate to a site path
    pub async fn open(&mut self, path: &str) -> ProbeResult<()> {
        let url = self.url_for(path);
        debug!(%url, "open");
        self.driver.navigate(&url).await
    }

    /// Current URL
    pub async fn url(&self) -> ProbeResult<String> {
        self.driver.current_url().await
    }

    /// Document title
    pub async fn title(&self) -> ProbeResult<String> {
        self.driver.title().await
    }

    /// Single resolution attempt, no waiting
    pub async fn resolve(&self, locator: &Locator) -> Option<Resolved> {
        resolve(self.driver.as_ref(), locator).await
    }

    /// Whether the locator resolves right now
    pub async fn is_present(&self, locator: &Locator) -> bool {
        self.resolve(locator).await.is_some()
    }

    /// Wait until the locator resolves
    pub async fn find(&self, locator: &Locator) -> ProbeResult<ElementHandle> {
        let driver = self.driver.as_ref();
        poll_for(&self.wait, locator.name(), || async move {
            resolve(driver, locator).await.map(|r| r.element)
        })
        .await
        .map_err(|err| match err {
            ProbeError::Timeout { .. } => ProbeError::ElementNotFound {
                locator: locator.name().to_string(),
                tried: locator.describe_candidates(),
            },
            other => other,
        })
    }

    /// All matches of the first candidate that has any; empty when none do
    pub async fn find_all(&self, locator: &Locator) -> Vec<ElementHandle> {
        resolve_all(self.driver.as_ref(), locator).await
    }

    /// Wait until the locator yields at least `count` matches
    pub async fn find_at_least(&self, locator: &Locator, count: usize) -> ProbeResult<Vec<ElementHandle>> {
        let driver = self.driver.as_ref();
        let description = format!("{count}+ of {}", locator.name());
        poll_for(&self.wait, &description, || async move {
            let found = resolve_all(driver, locator).await;
            (found.len() >= count).then_some(found)
        })
        .await
    }

    /// Click, falling back to a script click when the pointer is blocked
    pub async fn click(&mut self, locator: &Locator) -> ProbeResult<()> {
        let element = self.find(locator).await?;
        match self.driver.click(&element).await {
            Err(err) if err.is_click_blocked() => {
                warn!(locator = locator.name(), error = %err, "native click blocked, using script click");
                self.driver.js_click(&element).await
            }
            other => other,
        }
    }

    /// Script-triggered click
    pub async fn js_click(&mut self, locator: &Locator) -> ProbeResult<()> {
        let element = self.find(locator).await?;
        self.driver.js_click(&element).await
    }

    /// Clear a field then type into it
    pub async fn fill(&mut self, locator: &Locator, text: &str) -> ProbeResult<()> {
        let element = self.find(locator).await?;
        self.driver.clear(&element).await?;
        self.driver.type_text(&element, text).await
    }

    /// Rendered text of the resolved element
    pub async fn text(&self, locator: &Locator) -> ProbeResult<String> {
        Ok(self.find(locator).await?.text().to_string())
    }

    /// Attribute of the resolved element
    pub async fn attribute(&self, locator: &Locator, name: &str) -> ProbeResult<Option<String>> {
        Ok(self.find(locator).await?.attribute(name).map(ToString::to_string))
    }

    /// Current value of a form control
    pub async fn value(&self, locator: &Locator) -> ProbeResult<String> {
        let element = self.find(locator).await?;
        let fresh = self.driver.refresh(&element).await?;
        Ok(fresh.value.unwrap_or_default())
    }

    /// Resolve, then bring the element into the viewport
    pub async fn scroll_to(&mut self, locator: &Locator) -> ProbeResult<ElementHandle> {
        let element = self.find(locator).await?;
        self.driver.scroll_into_view(&element).await?;
        Ok(element)
    }

    /// Wait until the URL contains `fragment`
    pub async fn wait_for_url_contains(&self, fragment: &str) -> ProbeResult<WaitResult> {
        let driver = self.driver.as_ref();
        let description = format!("url containing {fragment}");
        poll_until(&self.wait, &description, || async move {
            driver
                .current_url()
                .await
                .is_ok_and(|url| url.contains(fragment))
        })
        .await
    }

    /// Wait until `matches` accepts the current URL
    pub async fn wait_for_url<P>(&self, description: &str, matches: P) -> ProbeResult<WaitResult>
    where
        P: Fn(&str) -> bool + Sync,
    {
        let driver = self.driver.as_ref();
        let matches = &matches;
        poll_until(&self.wait, description, || async move {
            driver.current_url().await.is_ok_and(|url| matches(&url))
        })
        .await
    }

    /// Wait until the located element's text contains `expected`
    pub async fn wait_for_text(&self, locator: &Locator, expected: &str) -> ProbeResult<String> {
        let driver = self.driver.as_ref();
        let description = format!("{} to contain {expected:?}", locator.name());
        poll_for(&self.wait, &description, || async move {
            resolve(driver, locator)
                .await
                .map(|r| r.element.text().to_string())
                .filter(|text| text.contains(expected))
        })
        .await
    }

    /// Wait until the locator no longer resolves
    pub async fn wait_for_absent(&self, locator: &Locator) -> ProbeResult<WaitResult> {
        let driver = self.driver.as_ref();
        let description = format!("{} to disappear", locator.name());
        poll_until(&self.wait, &description, || async move {
            resolve(driver, locator).await.is_none()
        })
        .await
    }

    /// Wait for a dialog and return its message
    pub async fn alert_text(&self) -> ProbeResult<String> {
        let driver = self.driver.as_ref();
        poll_for(&self.wait, "alert dialog", || async move {
            driver.alert_text().await.ok().flatten()
        })
        .await
    }

    /// Wait for a dialog and accept it, returning its message
    pub async fn accept_alert(&mut self) -> ProbeResult<String> {
        let message = self.alert_text().await?;
        self.driver.accept_alert().await?;
        Ok(message)
    }

    /// Wait for a dialog and dismiss it, returning its message
    pub async fn dismiss_alert(&mut self) -> ProbeResult<String> {
        let message = self.alert_text().await?;
        self.driver.dismiss_alert().await?;
        Ok(message)
    }

    /// Choose an option of a `<select>` by value
    pub async fn select(&mut self, locator: &Locator, value: &str) -> ProbeResult<()> {
        let element = self.find(locator).await?;
        self.driver.select_option(&element, value).await
    }

    /// Evaluate JavaScript in page context
    pub async fn execute_js(&self, script: &str) -> ProbeResult<serde_json::Value> {
        self.driver.execute_js(script).await
    }

    /// Wait until a script evaluates to `true`
    pub async fn wait_for_script(&self, script: &str, description: &str) -> ProbeResult<WaitResult> {
        let driver = self.driver.as_ref();
        poll_until(&self.wait, description, || async move {
            matches!(driver.execute_js(script).await, Ok(serde_json::Value::Bool(true)))
        })
        .await
    }

    /// Go back in history
    pub async fn go_back(&mut self) -> ProbeResult<()> {
        self.driver.go_back().await
    }

    /// Release the browser
    pub async fn close(mut self) -> ProbeResult<()> {
        self.driver.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ClickEffect, MockDriver, MockElement, MockPage};

    const BASE: &str = "https://shop.test";

    fn quick() -> WaitOptions {
        WaitOptions::new().with_timeout(60).with_poll_interval(5)
    }

    fn session(driver: MockDriver) -> Session {
        Session::new(Box::new(driver), format!("{BASE}/"), quick())
    }

    fn login_page() -> MockPage {
        MockPage::new(format!("{BASE}/login"), "Signup / Login")
            .with_element(
                MockElement::new("email", "input")
                    .matching(["input[data-qa='login-email']"])
                    .attr("placeholder", "Email Address")
                    .value("")
                    .shown(),
            )
            .with_element(
                MockElement::new("button", "button")
                    .matching(["button[data-qa='login-button']"])
                    .text("Login")
                    .shown()
                    .obscured_by("iframe#aswift_1")
                    .on_click(ClickEffect::Reveal("error".to_string())),
            )
            .with_element(
                MockElement::new("error", "p")
                    .matching(["//form[@action='/login']/p"])
                    .text("Your email or password is incorrect!"),
            )
    }

    fn email() -> Locator {
        Locator::new("login email").css("#missing").css("input[data-qa='login-email']")
    }

    #[test]
    fn test_url_for() {
        let s = session(MockDriver::new());
        assert_eq!(s.base_url(), BASE);
        assert_eq!(s.url_for("/login"), "https://shop.test/login");
        assert_eq!(s.url_for("products"), "https://shop.test/products");
        assert_eq!(s.url_for("https://other.test/x"), "https://other.test/x");
    }

    #[tokio::test]
    async fn test_open_and_url() {
        let mut s = session(MockDriver::new().with_page(login_page()));
        s.open("/login").await.unwrap();
        assert_eq!(s.url().await.unwrap(), "https://shop.test/login");
        assert_eq!(s.title().await.unwrap(), "Signup / Login");
    }

    #[tokio::test]
    async fn test_find_reports_all_candidates() {
        let mut s = session(MockDriver::new().with_page(login_page()));
        s.open("/login").await.unwrap();
        let missing = Locator::new("logout link").css("a[href='/logout']").xpath("//a[contains(.,'Logout')]");
        match s.find(&missing).await.unwrap_err() {
            ProbeError::ElementNotFound { locator, tried } => {
                assert_eq!(locator, "logout link");
                assert_eq!(tried, "css:a[href='/logout'], xpath://a[contains(.,'Logout')]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fill_and_value() {
        let mut s = session(MockDriver::new().with_page(login_page()));
        s.open("/login").await.unwrap();
        s.fill(&email(), "qa@example.com").await.unwrap();
        assert_eq!(s.value(&email()).await.unwrap(), "qa@example.com");
        assert_eq!(
            s.attribute(&email(), "placeholder").await.unwrap().as_deref(),
            Some("Email Address")
        );
    }

    #[tokio::test]
    async fn test_click_falls_back_to_script_click() {
        let mut s = session(MockDriver::new().with_page(login_page()));
        s.open("/login").await.unwrap();
        let button = Locator::new("login button").css("button[data-qa='login-button']");
        let error = Locator::new("login error").xpath("//form[@action='/login']/p").visible();

        assert!(!s.is_present(&error).await);
        s.click(&button).await.unwrap();
        let text = s.wait_for_text(&error, "incorrect").await.unwrap();
        assert_eq!(text, "Your email or password is incorrect!");
    }

    #[tokio::test]
    async fn test_wait_for_url_timeout() {
        let mut s = session(MockDriver::new().with_page(login_page()));
        s.open("/login").await.unwrap();
        assert!(s.wait_for_url_contains("/login").await.is_ok());
        let err = s.wait_for_url_contains("/account_created").await.unwrap_err();
        assert!(matches!(err, ProbeError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_wait_for_url_predicate() {
        let mut s = session(MockDriver::new().with_page(login_page()));
        s.open("/login").await.unwrap();
        assert!(s.wait_for_url("login page", |url| url.ends_with("/login")).await.is_ok());
        let err = s.wait_for_url("cart page", |url| url.ends_with("/view_cart")).await.unwrap_err();
        assert!(err.to_string().contains("cart page"));
    }

    #[tokio::test]
    async fn test_alert_text_waits_then_times_out() {
        let s = session(MockDriver::new());
        let err = s.alert_text().await.unwrap_err();
        assert!(err.to_string().contains("alert dialog"));
    }

    #[tokio::test]
    async fn test_find_at_least() {
        let page = MockPage::new(format!("{BASE}/products"), "Products")
            .with_element(MockElement::new("a", "div").matching([".product-image-wrapper"]).shown())
            .with_element(MockElement::new("b", "div").matching([".product-image-wrapper"]).shown());
        let mut s = session(MockDriver::new().with_page(page));
        s.open("/products").await.unwrap();
        let cards = Locator::new("cards").css(".product-image-wrapper");
        assert_eq!(s.find_at_least(&cards, 2).await.unwrap().len(), 2);
        assert!(s.find_at_least(&cards, 3).await.is_err());
    }

    #[tokio::test]
    async fn test_close_consumes_session() {
        let s = session(MockDriver::new());
        s.close().await.unwrap();
    }
}
