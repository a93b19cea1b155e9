use super::PageObject;
use crate::locator::Locator;
use crate::result::ProbeResult;
use crate::session::Session;

/// `/api_list`: collapsible descriptions of the site's practice APIs
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiListPage;

impl PageObject for ApiListPage {
    fn path(&self) -> &str {
        "/api_list"
    }

    fn page_name(&self) -> &str {
        "api list"
    }

    fn ready_marker(&self) -> Locator {
        Self::heading()
    }
}

impl ApiListPage {
    /// "APIs List for practice" heading
    #[must_use]
    pub fn heading() -> Locator {
        Locator::new("api list heading")
            .xpath("//b[normalize-space()='APIs List for practice']")
            .css("h2.title b")
            .visible()
    }

    /// Panel titles
    #[must_use]
    pub fn panel_titles() -> Locator {
        Locator::new("api panel titles")
            .css(".panel-group .panel-title a")
            .css("h4.panel-title")
    }

    /// Toggle of the n-th panel, 1-based
    #[must_use]
    pub fn panel_toggle(index: u32) -> Locator {
        Locator::new(format!("api panel {index} toggle"))
            .css(format!("a[href='#collapse{index}']"))
            .xpath(format!("(//h4[contains(@class,'panel-title')]/a)[{index}]"))
            .interactable()
    }

    /// Body of the n-th panel, 1-based
    #[must_use]
    pub fn panel_body(index: u32) -> Locator {
        Locator::new(format!("api panel {index} body"))
            .css(format!("#collapse{index} .panel-body"))
            .css(format!("#collapse{index}"))
            .visible()
    }

    /// Expand a panel and return its text
    pub async fn expand(session: &mut Session, index: u32) -> ProbeResult<String> {
        session.click(&Self::panel_toggle(index)).await?;
        session.wait_for_text(&Self::panel_body(index), "API URL").await
    }
}
