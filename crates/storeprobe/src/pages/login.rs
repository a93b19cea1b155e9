use super::PageObject;
use crate::locator::Locator;
use crate::result::ProbeResult;
use crate::session::Session;

/// `/login`: the login form and the new-user signup form side by side
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginPage;

impl PageObject for LoginPage {
    fn path(&self) -> &str {
        "/login"
    }

    fn page_name(&self) -> &str {
        "login"
    }

    fn ready_marker(&self) -> Locator {
        Self::login_email()
    }
}

impl LoginPage {
    /// "Login to your account" heading
    #[must_use]
    pub fn login_heading() -> Locator {
        Locator::new("login heading")
            .css(".login-form h2")
            .xpath("//h2[normalize-space()='Login to your account']")
            .visible()
    }

    /// Login email field
    #[must_use]
    pub fn login_email() -> Locator {
        Locator::new("login email")
            .css("input[data-qa='login-email']")
            .xpath("//form[@action='/login']//input[@type='email']")
            .interactable()
    }

    /// Login password field
    #[must_use]
    pub fn login_password() -> Locator {
        Locator::new("login password")
            .css("input[data-qa='login-password']")
            .xpath("//form[@action='/login']//input[@type='password']")
            .interactable()
    }

    /// Login submit button
    #[must_use]
    pub fn login_button() -> Locator {
        Locator::new("login button")
            .css("button[data-qa='login-button']")
            .xpath("//button[normalize-space()='Login']")
            .interactable()
    }

    /// Error shown for bad credentials
    #[must_use]
    pub fn login_error() -> Locator {
        Locator::new("login error")
            .xpath("//form[@action='/login']/p")
            .css(".login-form form p")
            .visible()
    }

    /// "New User Signup!" heading
    #[must_use]
    pub fn signup_heading() -> Locator {
        Locator::new("signup heading")
            .css(".signup-form h2")
            .xpath("//h2[normalize-space()='New User Signup!']")
            .visible()
    }

    /// Signup name field
    #[must_use]
    pub fn signup_name() -> Locator {
        Locator::new("signup name")
            .css("input[data-qa='signup-name']")
            .xpath("//form[@action='/signup']//input[@name='name']")
            .interactable()
    }

    /// Signup email field
    #[must_use]
    pub fn signup_email() -> Locator {
        Locator::new("signup email")
            .css("input[data-qa='signup-email']")
            .xpath("//form[@action='/signup']//input[@name='email']")
            .interactable()
    }

    /// Signup submit button
    #[must_use]
    pub fn signup_button() -> Locator {
        Locator::new("signup button")
            .css("button[data-qa='signup-button']")
            .xpath("//button[normalize-space()='Signup']")
            .interactable()
    }

    /// Error shown when the signup email is taken
    #[must_use]
    pub fn signup_error() -> Locator {
        Locator::new("signup error")
            .xpath("//form[@action='/signup']/p")
            .css(".signup-form form p")
            .visible()
    }

    /// Submit the login form
    pub async fn login(session: &mut Session, email: &str, password: &str) -> ProbeResult<()> {
        session.fill(&Self::login_email(), email).await?;
        session.fill(&Self::login_password(), password).await?;
        session.click(&Self::login_button()).await
    }

    /// Submit the new-user form
    pub async fn start_signup(session: &mut Session, name: &str, email: &str) -> ProbeResult<()> {
        session.fill(&Self::signup_name(), name).await?;
        session.fill(&Self::signup_email(), email).await?;
        session.click(&Self::signup_button()).await
    }
}
