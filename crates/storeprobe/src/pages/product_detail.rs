use super::PageObject;
use crate::locator::Locator;
use crate::result::ProbeResult;
use crate::session::Session;

/// `/product_details/<id>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetailPage {
    product_id: u32,
    path: String,
}

/// A product review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// Reviewer name
    pub name: String,
    /// Reviewer email
    pub email: String,
    /// Review body
    pub text: String,
}

impl PageObject for ProductDetailPage {
    fn path(&self) -> &str {
        &self.path
    }

    fn page_name(&self) -> &str {
        "product detail"
    }

    fn ready_marker(&self) -> Locator {
        Self::information()
    }
}

/// Line of the information block starting with `label`
fn info_line(name: &str, label: &str) -> Locator {
    Locator::new(name.to_string())
        .xpath(format!(
            "//div[contains(@class,'product-information')]/p[contains(normalize-space(),'{label}')]"
        ))
        .xpath(format!("//b[normalize-space()='{label}']/.."))
        .visible()
}

impl ProductDetailPage {
    /// Detail page of one product
    #[must_use]
    pub fn new(product_id: u32) -> Self {
        Self {
            product_id,
            path: format!("/product_details/{product_id}"),
        }
    }

    /// Product shown
    #[must_use]
    pub const fn product_id(&self) -> u32 {
        self.product_id
    }

    /// Information block next to the image
    #[must_use]
    pub fn information() -> Locator {
        Locator::new("product information")
            .css(".product-information")
            .xpath("//div[contains(@class,'product-details')]//div[contains(@class,'product-information')]")
            .visible()
    }

    /// Product name heading
    #[must_use]
    pub fn name() -> Locator {
        Locator::new("product name")
            .css(".product-information h2")
            .xpath("//div[contains(@class,'product-information')]//h2")
            .visible()
    }

    /// "Category: ..." line
    #[must_use]
    pub fn category() -> Locator {
        info_line("product category", "Category:")
    }

    /// Price, e.g. "Rs. 500"
    #[must_use]
    pub fn price() -> Locator {
        Locator::new("product price")
            .css(".product-information span span")
            .xpath("//div[contains(@class,'product-information')]//span[starts-with(normalize-space(),'Rs.')]")
            .visible()
    }

    /// "Availability: ..." line
    #[must_use]
    pub fn availability() -> Locator {
        info_line("product availability", "Availability:")
    }

    /// "Condition: ..." line
    #[must_use]
    pub fn condition() -> Locator {
        info_line("product condition", "Condition:")
    }

    /// "Brand: ..." line
    #[must_use]
    pub fn brand() -> Locator {
        info_line("product brand", "Brand:")
    }

    /// Quantity input
    #[must_use]
    pub fn quantity() -> Locator {
        Locator::new("quantity input")
            .css("#quantity")
            .css(".product-information input[name='quantity']")
            .interactable()
    }

    /// "Add to cart" button
    #[must_use]
    pub fn add_to_cart() -> Locator {
        Locator::new("detail add to cart")
            .css(".product-information button.cart")
            .xpath("//button[contains(normalize-space(),'Add to cart')]")
            .interactable()
    }

    /// Review form name
    #[must_use]
    pub fn review_name() -> Locator {
        Locator::new("review name")
            .css("#review-form #name")
            .css("input#name")
            .interactable()
    }

    /// Review form email
    #[must_use]
    pub fn review_email() -> Locator {
        Locator::new("review email")
            .css("#review-form #email")
            .css("input#email")
            .interactable()
    }

    /// Review body
    #[must_use]
    pub fn review_text() -> Locator {
        Locator::new("review text")
            .css("#review")
            .css("textarea[name='review']")
            .interactable()
    }

    /// Review submit button
    #[must_use]
    pub fn review_submit() -> Locator {
        Locator::new("review submit")
            .css("#button-review")
            .xpath("//button[normalize-space()='Submit']")
            .interactable()
    }

    /// "Thank you for your review." notice
    #[must_use]
    pub fn review_success() -> Locator {
        Locator::new("review confirmation")
            .css("#review-section .alert-success")
            .xpath("//span[contains(text(),'Thank you for your review.')]")
            .visible()
    }

    /// Set a quantity and add to the cart
    pub async fn add_quantity(session: &mut Session, quantity: u32) -> ProbeResult<()> {
        session.fill(&Self::quantity(), &quantity.to_string()).await?;
        session.click(&Self::add_to_cart()).await
    }

    /// Write and submit a review
    pub async fn submit_review(session: &mut Session, review: &Review) -> ProbeResult<()> {
        session.scroll_to(&Self::review_text()).await?;
        session.fill(&Self::review_name(), &review.name).await?;
        session.fill(&Self::review_email(), &review.email).await?;
        session.fill(&Self::review_text(), &review.text).await?;
        session.click(&Self::review_submit()).await
    }
}
