use super::PageObject;
use crate::locator::Locator;
use crate::result::ProbeResult;
use crate::session::Session;
use tracing::debug;

/// `/contact_us`
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactPage;

/// Contents of the "Get In Touch" form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactMessage {
    /// Sender name
    pub name: String,
    /// Reply address
    pub email: String,
    /// Subject line
    pub subject: String,
    /// Body text
    pub message: String,
}

impl ContactMessage {
    /// A complete message
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl PageObject for ContactPage {
    fn path(&self) -> &str {
        "/contact_us"
    }

    fn page_name(&self) -> &str {
        "contact us"
    }

    fn ready_marker(&self) -> Locator {
        Self::heading()
    }
}

impl ContactPage {
    /// "Get In Touch" heading
    #[must_use]
    pub fn heading() -> Locator {
        Locator::new("get in touch heading")
            .xpath("//h2[normalize-space()='Get In Touch']")
            .css(".contact-form h2.title")
            .visible()
    }

    /// Sender name field
    #[must_use]
    pub fn name() -> Locator {
        Locator::new("contact name")
            .css("input[data-qa='name']")
            .css("#contact-us-form input[name='name']")
            .interactable()
    }

    /// Sender email field
    #[must_use]
    pub fn email() -> Locator {
        Locator::new("contact email")
            .css("input[data-qa='email']")
            .css("#contact-us-form input[name='email']")
            .interactable()
    }

    /// Subject field
    #[must_use]
    pub fn subject() -> Locator {
        Locator::new("contact subject")
            .css("input[data-qa='subject']")
            .css("#contact-us-form input[name='subject']")
            .interactable()
    }

    /// Message textarea
    #[must_use]
    pub fn message() -> Locator {
        Locator::new("contact message")
            .css("textarea[data-qa='message']")
            .css("#message")
            .interactable()
    }

    /// File upload control
    #[must_use]
    pub fn upload() -> Locator {
        Locator::new("contact upload")
            .css("input[name='upload_file']")
            .css("#contact-us-form input[type='file']")
            .visible()
    }

    /// Submit button; the click raises a confirm dialog
    #[must_use]
    pub fn submit() -> Locator {
        Locator::new("contact submit")
            .css("input[data-qa='submit-button']")
            .xpath("//input[@type='submit' and @value='Submit']")
            .interactable()
    }

    /// Banner shown once the message is accepted
    #[must_use]
    pub fn success() -> Locator {
        Locator::new("contact success banner")
            .css(".status.alert.alert-success")
            .xpath("//div[contains(@class,'contact-form')]//div[contains(@class,'alert-success')]")
            .visible()
    }

    /// "Home" button under the success banner
    #[must_use]
    pub fn home_button() -> Locator {
        Locator::new("contact home button")
            .css("#form-section a.btn-success")
            .xpath("//div[@id='form-section']//a[contains(normalize-space(),'Home')]")
            .interactable()
    }

    /// Fill the form and click submit, leaving the confirm dialog open
    pub async fn submit_form(session: &mut Session, message: &ContactMessage) -> ProbeResult<()> {
        session.fill(&Self::name(), &message.name).await?;
        session.fill(&Self::email(), &message.email).await?;
        session.fill(&Self::subject(), &message.subject).await?;
        session.fill(&Self::message(), &message.message).await?;
        debug!(subject = %message.subject, "submitting contact form");
        session.scroll_to(&Self::submit()).await?;
        // The submit handler opens a blocking confirm(); a native click would
        // stall until the dialog closes.
        session.js_click(&Self::submit()).await
    }
}
