use super::PageObject;
use crate::locator::Locator;
use crate::result::ProbeResult;
use crate::session::Session;

/// `/signup`: the "Enter Account Information" form reached from the login page
#[derive(Debug, Clone, Copy, Default)]
pub struct SignupPage;

/// Values for the account information form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDetails {
    /// Account password
    pub password: String,
    /// Day of birth
    pub birth_day: u8,
    /// Month of birth, 1-12
    pub birth_month: u8,
    /// Year of birth
    pub birth_year: u16,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Street address
    pub address: String,
    /// Country as listed in the select
    pub country: String,
    /// State or province
    pub state: String,
    /// City
    pub city: String,
    /// Postal code
    pub zipcode: String,
    /// Mobile number
    pub mobile: String,
}

impl AccountDetails {
    /// Plausible details for a throwaway account
    #[must_use]
    pub fn sample(first_name: impl Into<String>) -> Self {
        Self {
            password: "Probe#2024".to_string(),
            birth_day: 14,
            birth_month: 6,
            birth_year: 1991,
            first_name: first_name.into(),
            last_name: "Tester".to_string(),
            address: "42 Harbour Street".to_string(),
            country: "Canada".to_string(),
            state: "Ontario".to_string(),
            city: "Toronto".to_string(),
            zipcode: "M5V 2T6".to_string(),
            mobile: "4165550199".to_string(),
        }
    }
}

impl PageObject for SignupPage {
    fn path(&self) -> &str {
        "/signup"
    }

    fn page_name(&self) -> &str {
        "signup"
    }

    fn ready_marker(&self) -> Locator {
        Self::heading()
    }
}

/// Field located by `data-qa`, then id
fn field(name: &str, qa: &str, id: &str) -> Locator {
    Locator::new(name.to_string())
        .css(format!("[data-qa='{qa}']"))
        .css(format!("#{id}"))
        .interactable()
}

impl SignupPage {
    /// "Enter Account Information" heading
    #[must_use]
    pub fn heading() -> Locator {
        Locator::new("account information heading")
            .xpath("//b[normalize-space()='Enter Account Information']")
            .css(".login-form h2.title b")
            .visible()
    }

    /// "Mr." title radio
    #[must_use]
    pub fn title_mr() -> Locator {
        Locator::new("title Mr")
            .css("#id_gender1")
            .css("input[name='title'][value='Mr']")
            .interactable()
    }

    /// Prefilled name field
    #[must_use]
    pub fn name() -> Locator {
        field("account name", "name", "name")
    }

    /// Password field
    #[must_use]
    pub fn password() -> Locator {
        field("account password", "password", "password")
    }

    /// Birth day select
    #[must_use]
    pub fn birth_day() -> Locator {
        field("birth day", "days", "days")
    }

    /// Birth month select
    #[must_use]
    pub fn birth_month() -> Locator {
        field("birth month", "months", "months")
    }

    /// Birth year select
    #[must_use]
    pub fn birth_year() -> Locator {
        field("birth year", "years", "years")
    }

    /// First name field
    #[must_use]
    pub fn first_name() -> Locator {
        field("first name", "first_name", "first_name")
    }

    /// Last name field
    #[must_use]
    pub fn last_name() -> Locator {
        field("last name", "last_name", "last_name")
    }

    /// Street address field
    #[must_use]
    pub fn address() -> Locator {
        field("address", "address", "address1")
    }

    /// Country select
    #[must_use]
    pub fn country() -> Locator {
        field("country", "country", "country")
    }

    /// State field
    #[must_use]
    pub fn state() -> Locator {
        field("state", "state", "state")
    }

    /// City field
    #[must_use]
    pub fn city() -> Locator {
        field("city", "city", "city")
    }

    /// Zipcode field
    #[must_use]
    pub fn zipcode() -> Locator {
        field("zipcode", "zipcode", "zipcode")
    }

    /// Mobile number field
    #[must_use]
    pub fn mobile() -> Locator {
        field("mobile number", "mobile_number", "mobile_number")
    }

    /// "Create Account" button
    #[must_use]
    pub fn create_account() -> Locator {
        Locator::new("create account button")
            .css("button[data-qa='create-account']")
            .xpath("//button[normalize-space()='Create Account']")
            .interactable()
    }

    /// "Account Created!" heading
    #[must_use]
    pub fn account_created() -> Locator {
        Locator::new("account created heading")
            .css("h2[data-qa='account-created']")
            .xpath("//b[normalize-space()='Account Created!']")
            .visible()
    }

    /// "Account Deleted!" heading
    #[must_use]
    pub fn account_deleted() -> Locator {
        Locator::new("account deleted heading")
            .css("h2[data-qa='account-deleted']")
            .xpath("//b[normalize-space()='Account Deleted!']")
            .visible()
    }

    /// Continue button after create/delete
    #[must_use]
    pub fn continue_button() -> Locator {
        Locator::new("continue button")
            .css("a[data-qa='continue-button']")
            .xpath("//a[normalize-space()='Continue']")
            .interactable()
    }

    /// Fill and submit the account form
    pub async fn create(session: &mut Session, details: &AccountDetails) -> ProbeResult<()> {
        session.click(&Self::title_mr()).await?;
        session.fill(&Self::password(), &details.password).await?;
        session.select(&Self::birth_day(), &details.birth_day.to_string()).await?;
        session.select(&Self::birth_month(), &details.birth_month.to_string()).await?;
        session.select(&Self::birth_year(), &details.birth_year.to_string()).await?;
        session.fill(&Self::first_name(), &details.first_name).await?;
        session.fill(&Self::last_name(), &details.last_name).await?;
        session.fill(&Self::address(), &details.address).await?;
        session.select(&Self::country(), &details.country).await?;
        session.fill(&Self::state(), &details.state).await?;
        session.fill(&Self::city(), &details.city).await?;
        session.fill(&Self::zipcode(), &details.zipcode).await?;
        session.fill(&Self::mobile(), &details.mobile).await?;
        session.scroll_to(&Self::create_account()).await?;
        session.click(&Self::create_account()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_prefers_data_qa() {
        let address = SignupPage::address();
        let sources: Vec<&str> = address.candidates().iter().map(|s| s.source()).collect();
        assert_eq!(sources, ["[data-qa='address']", "#address1"]);
    }

    #[test]
    fn test_sample_details() {
        let details = AccountDetails::sample("Ada");
        assert_eq!(details.first_name, "Ada");
        assert!((1..=31).contains(&details.birth_day));
        assert!((1..=12).contains(&details.birth_month));
    }
}
