use super::PageObject;
use crate::locator::Locator;
use crate::result::ProbeResult;
use crate::session::Session;

/// `/products`: catalogue, search and the add-to-cart modal
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductsPage;

impl PageObject for ProductsPage {
    fn path(&self) -> &str {
        "/products"
    }

    fn page_name(&self) -> &str {
        "products"
    }

    fn ready_marker(&self) -> Locator {
        Self::search_input()
    }
}

impl ProductsPage {
    /// Catalogue heading, "All Products" or "Searched Products"
    #[must_use]
    pub fn heading() -> Locator {
        Locator::new("products heading")
            .css(".features_items h2.title")
            .xpath("//div[contains(@class,'features_items')]/h2")
            .visible()
    }

    /// Every product card
    #[must_use]
    pub fn cards() -> Locator {
        Locator::new("product cards")
            .css(".features_items .product-image-wrapper")
            .xpath("//div[contains(@class,'product-image-wrapper')]")
    }

    /// Product names on the cards
    #[must_use]
    pub fn card_names() -> Locator {
        Locator::new("product names")
            .css(".features_items .productinfo p")
            .xpath("//div[contains(@class,'productinfo')]/p")
    }

    /// Search box
    #[must_use]
    pub fn search_input() -> Locator {
        Locator::new("search input")
            .css("#search_product")
            .css("input[name='search']")
            .interactable()
    }

    /// Search submit
    #[must_use]
    pub fn search_button() -> Locator {
        Locator::new("search button")
            .css("#submit_search")
            .xpath("//input[@id='search_product']/following-sibling::button")
            .interactable()
    }

    /// Message shown when a search matches nothing
    #[must_use]
    pub fn no_results() -> Locator {
        Locator::new("no results message")
            .xpath("//div[contains(@class,'features_items')]//*[contains(translate(normalize-space(),'NOPRDUCTSF','noprductsf'),'no products')]")
            .css(".features_items .no-results")
            .visible()
    }

    /// Category sidebar
    #[must_use]
    pub fn category_panel() -> Locator {
        Locator::new("category sidebar")
            .css("#accordian")
            .css(".left-sidebar .category-products")
            .visible()
    }

    /// Brands sidebar
    #[must_use]
    pub fn brands_panel() -> Locator {
        Locator::new("brands sidebar")
            .css(".brands_products")
            .xpath("//h2[normalize-space()='Brands']")
            .visible()
    }

    /// "View Product" link of a product
    #[must_use]
    pub fn view_product(product_id: u32) -> Locator {
        Locator::new(format!("view product {product_id}"))
            .css(format!("a[href='/product_details/{product_id}']"))
            .xpath(format!("//a[contains(@href,'/product_details/{product_id}')]"))
            .interactable()
    }

    /// "View Product" link of the first card in the listing
    #[must_use]
    pub fn first_view_product() -> Locator {
        Locator::new("first view product link")
            .css(".features_items .choose a[href^='/product_details/']")
            .xpath("(//a[contains(normalize-space(),'View Product')])[1]")
            .interactable()
    }

    /// "Add to cart" button of a product card
    #[must_use]
    pub fn add_to_cart(product_id: u32) -> Locator {
        Locator::new(format!("add product {product_id} to cart"))
            .css(format!(".productinfo a.add-to-cart[data-product-id='{product_id}']"))
            .css(format!("a.add-to-cart[data-product-id='{product_id}']"))
            .xpath(format!("(//a[@data-product-id='{product_id}'])[1]"))
            .interactable()
    }

    /// Body of the "Added!" modal
    #[must_use]
    pub fn cart_modal() -> Locator {
        Locator::new("added to cart modal")
            .css("#cartModal .modal-content")
            .xpath("//div[@id='cartModal']//div[contains(@class,'modal-content')]")
            .visible()
    }

    /// "Continue Shopping" button in the modal
    #[must_use]
    pub fn continue_shopping() -> Locator {
        Locator::new("continue shopping")
            .css("#cartModal button.close-modal")
            .xpath("//button[normalize-space()='Continue Shopping']")
            .interactable()
    }

    /// "View Cart" link in the modal
    #[must_use]
    pub fn modal_view_cart() -> Locator {
        Locator::new("modal view cart")
            .css("#cartModal a[href='/view_cart']")
            .xpath("//div[@id='cartModal']//a[@href='/view_cart']/u")
            .interactable()
    }

    /// Search and return the names of the matching products
    pub async fn search(session: &mut Session, term: &str) -> ProbeResult<Vec<String>> {
        session.fill(&Self::search_input(), term).await?;
        session.click(&Self::search_button()).await?;
        session.wait_for_text(&Self::heading(), "Searched Products").await?;
        Ok(session
            .find_all(&Self::card_names())
            .await
            .iter()
            .map(|card| card.text().to_string())
            .collect())
    }

    /// Add a product from the listing and close the confirmation modal
    pub async fn add_and_continue(session: &mut Session, product_id: u32) -> ProbeResult<()> {
        session.scroll_to(&Self::add_to_cart(product_id)).await?;
        session.click(&Self::add_to_cart(product_id)).await?;
        session.find(&Self::cart_modal()).await?;
        session.click(&Self::continue_shopping()).await?;
        session.wait_for_absent(&Self::cart_modal()).await.map(|_| ())
    }
}
