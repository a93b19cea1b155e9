//! API listing page.

use crate::assertion::Assertion;
use crate::pages::{ApiListPage, HomePage, NavLink, PageObject};
use crate::result::ProbeResult;
use crate::session::Session;
use crate::suite::{Suite, TestCase};
use futures::future::BoxFuture;

pub fn suite() -> Suite {
    Suite::new("api", "API listing page")
        .with_case(TestCase::verifies(
            "list_renders",
            "API list shows numbered panels",
            list_renders,
        ))
        .with_case(TestCase::verifies(
            "panel_expands",
            "Clicking a panel title reveals its details",
            panel_expands,
        ))
        .with_case(TestCase::verifies(
            "reachable_from_header",
            "Header 'API Testing' link opens the list",
            reachable_from_header,
        ))
}

fn list_renders(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        ApiListPage.open(session).await?;
        let titles = session.find_at_least(&ApiListPage::panel_titles(), 1).await?;
        Assertion::contains(titles[0].text(), "API 1").context("first panel").check()
    })
}

fn panel_expands(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        ApiListPage.open(session).await?;
        let body = ApiListPage::expand(session, 1).await?;
        Assertion::contains(&body, "Request Method").check()
    })
}

fn reachable_from_header(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        HomePage.open(session).await?;
        HomePage::navigate(session, NavLink::ApiTesting).await?;
        ApiListPage.wait_ready(session).await
    })
}
