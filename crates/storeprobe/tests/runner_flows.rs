//! Runner classification and catalogue cases over an in-memory storefront.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use storeprobe::mock::{ClickEffect, MockDriver, MockElement, MockPage};
use storeprobe::{
    catalog, Assertion, CaseFilter, CaseOutcome, DriverFactory, Locator, ProbeError, ProbeResult,
    Session, StoreDriver, Suite, SuiteRunner, TestCase, WaitOptions,
};

const BASE: &str = "https://shop.test";

fn quick() -> WaitOptions {
    WaitOptions::new().with_timeout(80).with_poll_interval(5)
}

fn home_page() -> MockPage {
    MockPage::new(format!("{BASE}/"), "Automation Exercise").with_element(
        MockElement::new("logo", "img")
            .matching(["img[alt='Website for automation practice']"])
            .shown(),
    )
}

fn login_page() -> MockPage {
    MockPage::new(format!("{BASE}/login"), "Automation Exercise - Signup / Login")
        .with_element(
            MockElement::new("login-heading", "h2")
                .matching([".login-form h2"])
                .text("Login to your account")
                .shown(),
        )
        .with_element(
            MockElement::new("login-email", "input")
                .matching(["input[data-qa='login-email']"])
                .value("")
                .shown(),
        )
        .with_element(
            MockElement::new("login-password", "input")
                .matching(["input[data-qa='login-password']"])
                .value("")
                .shown(),
        )
        .with_element(
            MockElement::new("login-button", "button")
                .matching(["button[data-qa='login-button']"])
                .text("Login")
                .shown()
                .on_click(ClickEffect::Reveal("login-error".to_string())),
        )
        .with_element(
            MockElement::new("login-error", "p")
                .matching(["//form[@action='/login']/p"])
                .text("Your email or password is incorrect!"),
        )
        .with_element(
            MockElement::new("signup-heading", "h2")
                .matching([".signup-form h2"])
                .text("New User Signup!")
                .shown(),
        )
        .with_element(
            MockElement::new("signup-name", "input")
                .matching(["input[data-qa='signup-name']"])
                .value("")
                .shown(),
        )
}

/// Contact page whose submit always succeeds, empty message or not
fn contact_page() -> MockPage {
    let field = |id: &str, qa: &str, tag: &str| {
        MockElement::new(id, tag)
            .matching([format!("{tag}[data-qa='{qa}']")])
            .value("")
            .shown()
    };
    MockPage::new(format!("{BASE}/contact_us"), "Contact Us")
        .with_element(
            MockElement::new("heading", "h2")
                .matching(["//h2[normalize-space()='Get In Touch']"])
                .text("Get In Touch")
                .shown(),
        )
        .with_element(field("name", "name", "input"))
        .with_element(field("email", "email", "input"))
        .with_element(field("subject", "subject", "input"))
        .with_element(field("message", "message", "textarea"))
        .with_element(
            MockElement::new("submit", "input")
                .matching(["input[data-qa='submit-button']"])
                .value("Submit")
                .shown()
                .on_click(ClickEffect::Alert {
                    message: "Press OK to proceed!".to_string(),
                    on_accept: Some(Box::new(ClickEffect::Reveal("success".to_string()))),
                }),
        )
        .with_element(
            MockElement::new("success", "div")
                .matching([".status.alert.alert-success"])
                .text("Success! Your details have been submitted successfully."),
        )
        .with_element(
            MockElement::new("home", "a")
                .matching(["#form-section a.btn-success"])
                .text("Home")
                .shown()
                .on_click(ClickEffect::Navigate(format!("{BASE}/"))),
        )
}

struct SiteFactory {
    closes: Arc<AtomicUsize>,
    launches: AtomicUsize,
    fail_launch: bool,
}

impl SiteFactory {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            closes: Arc::new(AtomicUsize::new(0)),
            launches: AtomicUsize::new(0),
            fail_launch: false,
        })
    }

    fn broken() -> Arc<Self> {
        Arc::new(Self {
            closes: Arc::new(AtomicUsize::new(0)),
            launches: AtomicUsize::new(0),
            fail_launch: true,
        })
    }
}

#[async_trait]
impl DriverFactory for SiteFactory {
    async fn launch(&self) -> ProbeResult<Box<dyn StoreDriver>> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail_launch {
            return Err(ProbeError::BrowserLaunch {
                message: "chromium not found".to_string(),
            });
        }
        let driver = MockDriver::new()
            .with_page(home_page())
            .with_page(login_page())
            .with_page(contact_page())
            .counting_closes(Arc::clone(&self.closes));
        Ok(Box::new(driver))
    }
}

fn runner(factory: Arc<SiteFactory>) -> SuiteRunner {
    SuiteRunner::new(factory, BASE).with_wait(quick()).with_case_timeout(2_000)
}

// === Synthetic cases covering each classification ===

fn login_error_shows(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        session.open("/login").await?;
        let button = Locator::new("login").css("#gone").css("button[data-qa='login-button']");
        session.click(&button).await?;
        let error = Locator::new("error").xpath("//form[@action='/login']/p").visible();
        session.wait_for_text(&error, "incorrect").await?;
        Ok(())
    })
}

fn wrong_title(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        session.open("/").await?;
        let title = session.title().await?;
        Assertion::equals(&"Storefront", &title.as_str()).check()
    })
}

fn missing_element(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        session.open("/").await?;
        session.find(&Locator::new("banner").css(".promo-banner")).await?;
        Ok(())
    })
}

fn ok(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move { session.open("/").await })
}

fn hangs(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        session.open("/").await?;
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        Ok(())
    })
}

fn synthetic() -> Vec<Suite> {
    vec![Suite::new("synthetic", "classification table")
        .with_case(TestCase::verifies("passes", "login error shows", login_error_shows))
        .with_case(TestCase::verifies("assertion_fails", "title mismatch", wrong_title))
        .with_case(TestCase::known_defect(
            "still_broken",
            "title should be Storefront",
            "title is wrong",
            wrong_title,
        ))
        .with_case(TestCase::known_defect("now_fixed", "site fixed", "was broken", ok))
        .with_case(TestCase::known_defect(
            "cannot_run",
            "element missing",
            "promo banner",
            missing_element,
        ))
        .with_case(TestCase::verifies("hangs", "never finishes", hangs).with_timeout(50))]
}

#[tokio::test]
async fn classification_table_and_teardown() {
    let factory = SiteFactory::new();
    let suites = synthetic();
    let summary = runner(Arc::clone(&factory))
        .run(&suites, &CaseFilter::new().known_defects(true))
        .await;

    let outcomes: Vec<(String, CaseOutcome)> = summary
        .results
        .iter()
        .map(|r| (r.case.clone(), r.outcome))
        .collect();
    assert_eq!(
        outcomes,
        [
            ("passes".to_string(), CaseOutcome::Passed),
            ("assertion_fails".to_string(), CaseOutcome::Failed),
            ("still_broken".to_string(), CaseOutcome::DefectConfirmed),
            ("now_fixed".to_string(), CaseOutcome::DefectFixed),
            ("cannot_run".to_string(), CaseOutcome::Failed),
            ("hangs".to_string(), CaseOutcome::Failed),
        ]
    );
    assert_eq!(factory.launches.load(Ordering::SeqCst), 6);
    assert_eq!(factory.closes.load(Ordering::SeqCst), 6, "every session closed");

    let hung = &summary.results[5];
    assert!(hung.message.as_deref().unwrap_or_default().contains("case synthetic::hangs"));
    let fixed = &summary.results[3];
    assert!(fixed.message.as_deref().unwrap_or_default().contains("was broken"));
    assert!(!summary.succeeded(false));
    assert_eq!(summary.failed(), 3);
}

#[tokio::test]
async fn known_defects_excluded_by_default() {
    let factory = SiteFactory::new();
    let suites = synthetic();
    let summary = runner(factory)
        .run(&suites, &CaseFilter::new().pattern("still_broken"))
        .await;
    assert_eq!(summary.total(), 0);
    assert!(summary.succeeded(true));
}

#[tokio::test]
async fn strict_mode_rejects_fixed_defects() {
    let suites = synthetic();
    let summary = runner(SiteFactory::new())
        .run(&suites, &CaseFilter::new().known_defects(true).pattern("now_fixed"))
        .await;
    assert_eq!(summary.defects_fixed(), 1);
    assert!(summary.succeeded(false));
    assert!(!summary.succeeded(true));
}

#[tokio::test]
async fn fail_fast_stops_after_first_failure() {
    let factory = SiteFactory::new();
    let suites = synthetic();
    let summary = runner(Arc::clone(&factory))
        .with_fail_fast(true)
        .run(&suites, &CaseFilter::new())
        .await;
    assert_eq!(summary.total(), 2);
    assert!(summary.stopped_early);
    assert_eq!(factory.launches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn launch_failure_is_failed_case() {
    let factory = SiteFactory::broken();
    let suites = synthetic();
    let mut seen = Vec::new();
    let summary = runner(Arc::clone(&factory))
        .run_with_progress(&suites, &CaseFilter::new().pattern("passes"), |r| {
            seen.push(r.qualified_id());
        })
        .await;
    assert_eq!(seen, ["synthetic::passes"]);
    assert_eq!(summary.failed(), 1);
    let message = summary.results[0].message.clone().unwrap_or_default();
    assert!(message.contains("chromium not found"));
    assert_eq!(factory.closes.load(Ordering::SeqCst), 0);
}

// === Catalogue cases against the mock storefront ===

#[tokio::test]
async fn login_cases_pass_on_mock_site() {
    let suites = catalog();
    let filter = CaseFilter::new().suite("login").pattern("forms_render");
    let summary = runner(SiteFactory::new()).run(&suites, &filter).await;
    assert_eq!(summary.total(), 1);
    assert_eq!(summary.passed(), 1, "{:?}", summary.results);

    let filter = CaseFilter::new().suite("login").pattern("invalid_credentials");
    let summary = runner(SiteFactory::new()).run(&suites, &filter).await;
    assert_eq!(summary.passed(), 1, "{:?}", summary.results);
}

#[tokio::test]
async fn contact_submit_passes_on_mock_site() {
    let suites = catalog();
    let filter = CaseFilter::new().suite("contact").pattern("submit_succeeds");
    let summary = runner(SiteFactory::new()).run(&suites, &filter).await;
    assert_eq!(summary.passed(), 1, "{:?}", summary.results);
}

#[tokio::test]
async fn contact_empty_message_defect_is_confirmed() {
    let suites = catalog();
    let filter = CaseFilter::new()
        .suite("contact")
        .pattern("empty_message")
        .known_defects(true);
    let summary = runner(SiteFactory::new()).run(&suites, &filter).await;
    assert_eq!(summary.total(), 1);
    assert_eq!(summary.defects_confirmed(), 1, "{:?}", summary.results);
    assert!(summary.succeeded(true));
}
