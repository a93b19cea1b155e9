//! Login and signup, including a full account lifecycle.

use super::{expect_absent, unique_email};
use crate::assertion::Assertion;
use crate::pages::{AccountDetails, HomePage, LoginPage, PageObject, SignupPage};
use crate::result::ProbeResult;
use crate::session::Session;
use crate::suite::{Suite, TestCase};
use futures::future::BoxFuture;
use tracing::info;

/// Account flows run several page loads back to back
const ACCOUNT_FLOW_TIMEOUT_MS: u64 = 120_000;

pub fn suite() -> Suite {
    Suite::new("login", "Login form, signup form and account lifecycle")
        .with_case(TestCase::verifies(
            "forms_render",
            "Login and signup forms are both shown",
            forms_render,
        ))
        .with_case(TestCase::verifies(
            "invalid_credentials",
            "Unknown credentials show an error and stay on /login",
            invalid_credentials,
        ))
        .with_case(TestCase::verifies(
            "signup_opens_account_form",
            "A new name and email lead to the account information form",
            signup_opens_account_form,
        ))
        .with_case(
            TestCase::verifies(
                "register_and_delete",
                "Register, land logged in, then delete the account",
                register_and_delete,
            )
            .with_timeout(ACCOUNT_FLOW_TIMEOUT_MS),
        )
        .with_case(
            TestCase::verifies(
                "duplicate_email_rejected",
                "Signing up twice with one email is refused; logging back in works",
                duplicate_email_rejected,
            )
            .with_timeout(ACCOUNT_FLOW_TIMEOUT_MS),
        )
        .with_case(TestCase::known_defect(
            "signup_rejects_blank_name",
            "Signup refuses a whitespace-only name",
            "BUG: name validation missing, a name of spaces reaches the account form",
            signup_rejects_blank_name,
        ))
}

fn forms_render(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        LoginPage.open(session).await?;
        let login = session.text(&LoginPage::login_heading()).await?;
        Assertion::equals(&"Login to your account", &login.as_str()).check()?;
        let signup = session.text(&LoginPage::signup_heading()).await?;
        Assertion::equals(&"New User Signup!", &signup.as_str()).check()?;
        session.find(&LoginPage::login_password()).await?;
        session.find(&LoginPage::signup_name()).await?;
        Ok(())
    })
}

fn invalid_credentials(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        LoginPage.open(session).await?;
        LoginPage::login(session, &unique_email("nobody"), "not-the-password").await?;
        session
            .wait_for_text(&LoginPage::login_error(), "Your email or password is incorrect!")
            .await?;
        let url = session.url().await?;
        Assertion::url_contains(&url, "/login").check()
    })
}

fn signup_opens_account_form(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        LoginPage.open(session).await?;
        LoginPage::start_signup(session, "Probe Visitor", &unique_email("signup")).await?;
        SignupPage.wait_arrived(session).await?;
        let name = session.value(&SignupPage::name()).await?;
        Assertion::equals(&"Probe Visitor", &name.as_str())
            .context("prefilled name")
            .check()
    })
}

/// Sign up through both forms and continue to the logged-in home page
async fn register(session: &mut Session, name: &str, email: &str) -> ProbeResult<AccountDetails> {
    let details = AccountDetails::sample(name);
    LoginPage.open(session).await?;
    LoginPage::start_signup(session, name, email).await?;
    SignupPage.wait_ready(session).await?;
    SignupPage::create(session, &details).await?;
    let created = session.text(&SignupPage::account_created()).await?;
    Assertion::contains_ignore_case(&created, "Account Created!").check()?;
    session.click(&SignupPage::continue_button()).await?;
    session.wait_for_text(&HomePage::logged_in_as(), name).await?;
    info!(%email, "registered throwaway account");
    Ok(details)
}

async fn delete_account(session: &mut Session) -> ProbeResult<()> {
    session.click(&HomePage::delete_account()).await?;
    let deleted = session.text(&SignupPage::account_deleted()).await?;
    Assertion::contains_ignore_case(&deleted, "Account Deleted!").check()?;
    session.click(&SignupPage::continue_button()).await
}

fn register_and_delete(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        let name = "Probe Lifecycle";
        register(session, name, &unique_email("lifecycle")).await?;
        let label = session.text(&HomePage::logged_in_as()).await?;
        Assertion::contains(&label, name).context("header label").check()?;
        delete_account(session).await
    })
}

fn duplicate_email_rejected(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        let name = "Probe Duplicate";
        let email = unique_email("duplicate");
        let details = register(session, name, &email).await?;

        session.click(&HomePage::logout()).await?;
        session.wait_for_url_contains("/login").await?;

        LoginPage::start_signup(session, name, &email).await?;
        session
            .wait_for_text(&LoginPage::signup_error(), "Email Address already exist!")
            .await?;

        LoginPage::login(session, &email, &details.password).await?;
        session.wait_for_text(&HomePage::logged_in_as(), name).await?;
        delete_account(session).await
    })
}

fn signup_rejects_blank_name(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        LoginPage.open(session).await?;
        LoginPage::start_signup(session, "   ", &unique_email("blank")).await?;
        expect_absent(
            session,
            &SignupPage::heading(),
            "account form opened for a whitespace-only name",
        )
        .await
    })
}
