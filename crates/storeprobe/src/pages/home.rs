use super::PageObject;
use crate::locator::Locator;
use crate::result::ProbeResult;
use crate::session::Session;

/// Landing page plus the header and footer shared by every page
#[derive(Debug, Clone, Copy, Default)]
pub struct HomePage;

/// Entries of the header navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLink {
    /// `/`
    Home,
    /// `/products`
    Products,
    /// `/view_cart`
    Cart,
    /// `/login`
    SignupLogin,
    /// `/test_cases`
    TestCases,
    /// `/api_list`
    ApiTesting,
    /// `/contact_us`
    ContactUs,
}

impl NavLink {
    /// Every entry in header order
    pub const ALL: [Self; 7] = [
        Self::Home,
        Self::Products,
        Self::Cart,
        Self::SignupLogin,
        Self::TestCases,
        Self::ApiTesting,
        Self::ContactUs,
    ];

    /// Link target
    #[must_use]
    pub const fn href(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Products => "/products",
            Self::Cart => "/view_cart",
            Self::SignupLogin => "/login",
            Self::TestCases => "/test_cases",
            Self::ApiTesting => "/api_list",
            Self::ContactUs => "/contact_us",
        }
    }

    /// Visible label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Products => "Products",
            Self::Cart => "Cart",
            Self::SignupLogin => "Signup / Login",
            Self::TestCases => "Test Cases",
            Self::ApiTesting => "API Testing",
            Self::ContactUs => "Contact us",
        }
    }
}

impl PageObject for HomePage {
    fn path(&self) -> &str {
        "/"
    }

    fn page_name(&self) -> &str {
        "home"
    }

    fn ready_marker(&self) -> Locator {
        Self::logo()
    }
}

impl HomePage {
    /// Site logo in the header
    #[must_use]
    pub fn logo() -> Locator {
        Locator::new("site logo")
            .css("img[alt='Website for automation practice']")
            .xpath("//div[contains(@class,'logo')]//img")
            .visible()
    }

    /// Header navigation link
    #[must_use]
    pub fn nav(link: NavLink) -> Locator {
        Locator::new(format!("nav {}", link.label()))
            .css(format!(".shop-menu a[href='{}']", link.href()))
            .xpath(format!(
                "//ul[contains(@class,'navbar-nav')]//a[contains(normalize-space(),'{}')]",
                link.label()
            ))
            .visible()
    }

    /// Hero carousel
    #[must_use]
    pub fn carousel() -> Locator {
        Locator::new("hero carousel")
            .css("#slider-carousel")
            .css("section#slider .carousel")
            .visible()
    }

    /// Product cards on the landing page
    #[must_use]
    pub fn featured_items() -> Locator {
        Locator::new("featured items")
            .css(".features_items .product-image-wrapper")
            .xpath("//div[contains(@class,'features_items')]//div[contains(@class,'product-image-wrapper')]")
    }

    /// "Subscription" heading in the footer
    #[must_use]
    pub fn subscription_heading() -> Locator {
        Locator::new("subscription heading")
            .css(".single-widget h2")
            .xpath("//footer//h2[normalize-space()='Subscription']")
            .visible()
    }

    /// Footer subscription email field
    #[must_use]
    pub fn subscription_email() -> Locator {
        Locator::new("subscription email")
            .css("#susbscribe_email")
            .css("footer input[type='email']")
            .xpath("//input[@placeholder='Your email address']")
            .interactable()
    }

    /// Footer subscription submit button
    #[must_use]
    pub fn subscribe_button() -> Locator {
        Locator::new("subscribe button")
            .css("#subscribe")
            .xpath("//footer//form//button")
            .interactable()
    }

    /// Confirmation shown after subscribing
    #[must_use]
    pub fn subscribe_success() -> Locator {
        Locator::new("subscription confirmation")
            .css("#success-subscribe .alert-success")
            .xpath("//*[contains(text(),'You have been successfully subscribed!')]")
            .visible()
    }

    /// Page footer
    #[must_use]
    pub fn footer() -> Locator {
        Locator::new("footer")
            .css("#footer")
            .css("footer")
            .visible()
    }

    /// Floating scroll-to-top arrow
    #[must_use]
    pub fn scroll_up() -> Locator {
        Locator::new("scroll up arrow")
            .css("#scrollUp")
            .css("a[href='#top']")
            .visible()
    }

    /// "Logged in as <name>" header entry
    #[must_use]
    pub fn logged_in_as() -> Locator {
        Locator::new("logged in as")
            .xpath("//a[contains(normalize-space(),'Logged in as')]")
            .css(".shop-menu a i.fa-user")
            .visible()
    }

    /// Logout link
    #[must_use]
    pub fn logout() -> Locator {
        Locator::new("logout link")
            .css("a[href='/logout']")
            .xpath("//a[contains(normalize-space(),'Logout')]")
            .visible()
    }

    /// Delete-account link
    #[must_use]
    pub fn delete_account() -> Locator {
        Locator::new("delete account link")
            .css("a[href='/delete_account']")
            .xpath("//a[contains(normalize-space(),'Delete Account')]")
            .visible()
    }

    /// Follow a header link and wait for the target URL
    pub async fn navigate(session: &mut Session, link: NavLink) -> ProbeResult<()> {
        session.click(&Self::nav(link)).await?;
        session.wait_for_url_contains(link.href()).await.map(|_| ())
    }

    /// Submit the footer subscription form
    pub async fn subscribe(session: &mut Session, email: &str) -> ProbeResult<()> {
        session.scroll_to(&Self::footer()).await?;
        session.fill(&Self::subscription_email(), email).await?;
        session.click(&Self::subscribe_button()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_links_cover_header() {
        assert_eq!(NavLink::ALL.len(), 7);
        assert_eq!(NavLink::SignupLogin.href(), "/login");
        let cart = HomePage::nav(NavLink::Cart);
        assert_eq!(cart.name(), "nav Cart");
        assert_eq!(cart.candidates()[0].source(), ".shop-menu a[href='/view_cart']");
    }

    #[test]
    fn test_subscription_uses_site_id_first() {
        let email = HomePage::subscription_email();
        assert_eq!(email.candidates()[0].source(), "#susbscribe_email");
        assert_eq!(email.candidates().len(), 3);
    }
}
