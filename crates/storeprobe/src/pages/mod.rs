//! Page objects for the storefront.
//!
//! Each page type owns the locators for one screen of the site and the small
//! multi-step flows (log in, subscribe, add to cart) that cases reuse. Locators
//! are built fresh on every call; they are cheap values, and building them
//! inline keeps the candidate lists next to the page they describe.

mod api_list;
mod cart;
mod contact;
mod home;
mod login;
mod product_detail;
mod products;
mod signup;

pub use api_list::ApiListPage;
pub use cart::CartPage;
pub use contact::{ContactMessage, ContactPage};
pub use home::{HomePage, NavLink};
pub use login::LoginPage;
pub use product_detail::{ProductDetailPage, Review};
pub use products::ProductsPage;
pub use signup::{AccountDetails, SignupPage};

use crate::locator::Locator;
use crate::result::ProbeResult;
use crate::session::Session;
use async_trait::async_trait;
use tracing::debug;

/// A page or screen of the storefront.
///
/// `open` navigates to [`path`](PageObject::path) and waits for
/// [`ready_marker`](PageObject::ready_marker), so a returned `Ok` means the
/// page is usable, not merely requested.
#[async_trait]
pub trait PageObject: Sync {
    /// Site path, starting with `/`
    fn path(&self) -> &str;

    /// Name for logs and failure messages
    fn page_name(&self) -> &str;

    /// Element whose presence means the page has rendered
    fn ready_marker(&self) -> Locator;

    /// Whether `url` points at this page
    fn matches_url(&self, url: &str) -> bool {
        let path = self.path();
        if path == "/" {
            return true;
        }
        url.split(['?', '#'])
            .next()
            .is_some_and(|base| base.ends_with(path) || base.contains(&format!("{path}/")))
    }

    /// Navigate here and wait until ready
    async fn open(&self, session: &mut Session) -> ProbeResult<()> {
        debug!(page = self.page_name(), "opening page");
        session.open(self.path()).await?;
        self.wait_ready(session).await
    }

    /// Wait until the ready marker resolves
    async fn wait_ready(&self, session: &mut Session) -> ProbeResult<()> {
        session.find(&self.ready_marker()).await.map(|_| ())
    }

    /// After a click that navigates: wait for this page's URL, then its marker
    async fn wait_arrived(&self, session: &mut Session) -> ProbeResult<()> {
        let description = format!("url of {} page", self.page_name());
        session.wait_for_url(&description, |url| self.matches_url(url)).await?;
        self.wait_ready(session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_url() {
        assert!(LoginPage.matches_url("https://shop.test/login"));
        assert!(!LoginPage.matches_url("https://shop.test/signup"));
        assert!(CartPage.matches_url("https://shop.test/view_cart?x=1"));
        assert!(ProductDetailPage::new(3).matches_url("https://shop.test/product_details/3"));
        assert!(HomePage.matches_url("https://shop.test/anything"));
    }

    #[tokio::test]
    async fn test_wait_arrived_checks_url_before_marker() {
        use crate::mock::{MockDriver, MockElement, MockPage};
        use crate::wait::WaitOptions;

        // Cart markup served at the wrong address
        let page = MockPage::new("https://shop.test/login", "Login")
            .with_element(MockElement::new("cart", "section").matching(["#cart_items"]).shown());
        let driver = MockDriver::new().with_page(page).at("https://shop.test/login");
        let mut session = Session::new(
            Box::new(driver),
            "https://shop.test",
            WaitOptions::new().with_timeout(30).with_poll_interval(5),
        );

        assert!(CartPage.wait_ready(&mut session).await.is_ok());
        let err = CartPage.wait_arrived(&mut session).await.unwrap_err();
        assert!(err.to_string().contains("url of cart page"), "{err}");
    }

    #[test]
    fn test_every_page_has_a_ready_marker_with_fallback() {
        let pages: Vec<Box<dyn PageObject>> = vec![
            Box::new(HomePage),
            Box::new(LoginPage),
            Box::new(SignupPage),
            Box::new(ContactPage),
            Box::new(ProductsPage),
            Box::new(ProductDetailPage::new(1)),
            Box::new(CartPage),
            Box::new(ApiListPage),
        ];
        for page in pages {
            assert!(page.path().starts_with('/'), "{}", page.page_name());
            assert!(
                page.ready_marker().candidates().len() >= 2,
                "{} ready marker needs a fallback",
                page.page_name()
            );
        }
    }
}
