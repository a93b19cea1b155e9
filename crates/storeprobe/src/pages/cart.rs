use super::PageObject;
use crate::locator::Locator;
use crate::result::ProbeResult;
use crate::session::Session;

/// `/view_cart`
#[derive(Debug, Clone, Copy, Default)]
pub struct CartPage;

impl PageObject for CartPage {
    fn path(&self) -> &str {
        "/view_cart"
    }

    fn page_name(&self) -> &str {
        "cart"
    }

    fn ready_marker(&self) -> Locator {
        Locator::new("cart body")
            .css("#cart_items")
            .xpath("//section[@id='cart_items']")
    }
}

impl CartPage {
    /// Rows of the cart table
    #[must_use]
    pub fn rows() -> Locator {
        Locator::new("cart rows")
            .css("#cart_info_table tbody tr")
            .xpath("//table[@id='cart_info_table']//tbody/tr")
    }

    /// Product name in a row
    #[must_use]
    pub fn row_name(product_id: u32) -> Locator {
        Locator::new(format!("cart row {product_id} name"))
            .css(format!("#product-{product_id} .cart_description h4 a"))
            .xpath(format!("//tr[@id='product-{product_id}']//h4/a"))
            .visible()
    }

    /// Unit price in a row
    #[must_use]
    pub fn row_price(product_id: u32) -> Locator {
        Locator::new(format!("cart row {product_id} price"))
            .css(format!("#product-{product_id} .cart_price p"))
            .xpath(format!("//tr[@id='product-{product_id}']/td[@class='cart_price']/p"))
            .visible()
    }

    /// Quantity in a row
    #[must_use]
    pub fn row_quantity(product_id: u32) -> Locator {
        Locator::new(format!("cart row {product_id} quantity"))
            .css(format!("#product-{product_id} .cart_quantity button"))
            .xpath(format!("//tr[@id='product-{product_id}']/td[@class='cart_quantity']/button"))
            .visible()
    }

    /// Line total in a row
    #[must_use]
    pub fn row_total(product_id: u32) -> Locator {
        Locator::new(format!("cart row {product_id} total"))
            .css(format!("#product-{product_id} .cart_total_price"))
            .xpath(format!("//tr[@id='product-{product_id}']//p[@class='cart_total_price']"))
            .visible()
    }

    /// Delete control in a row
    #[must_use]
    pub fn row_delete(product_id: u32) -> Locator {
        Locator::new(format!("cart row {product_id} delete"))
            .css(format!("#product-{product_id} .cart_quantity_delete"))
            .css(format!("a.cart_quantity_delete[data-product-id='{product_id}']"))
            .interactable()
    }

    /// "Cart is empty!" notice
    #[must_use]
    pub fn empty_notice() -> Locator {
        Locator::new("empty cart notice")
            .css("#empty_cart")
            .xpath("//b[normalize-space()='Cart is empty!']")
            .visible()
    }

    /// "Proceed To Checkout" button
    #[must_use]
    pub fn proceed_to_checkout() -> Locator {
        Locator::new("proceed to checkout")
            .css("#do_action a.check_out")
            .xpath("//a[normalize-space()='Proceed To Checkout']")
            .interactable()
    }

    /// Checkout modal shown to anonymous users
    #[must_use]
    pub fn checkout_modal() -> Locator {
        Locator::new("checkout modal")
            .css("#checkoutModal .modal-content")
            .xpath("//div[@id='checkoutModal']//div[contains(@class,'modal-content')]")
            .visible()
    }

    /// "Register / Login" link in the checkout modal
    #[must_use]
    pub fn checkout_login_link() -> Locator {
        Locator::new("checkout register/login link")
            .css("#checkoutModal a[href='/login']")
            .xpath("//div[@id='checkoutModal']//a[contains(normalize-space(),'Register / Login')]")
            .visible()
    }

    /// Parse the numeric part of "Rs. 500"
    #[must_use]
    pub fn parse_price(text: &str) -> Option<u32> {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        digits.parse().ok()
    }

    /// Expected row total for a unit price, `None` when unknown or it overflows
    #[must_use]
    pub fn expected_total(unit_price: Option<u32>, quantity: u32) -> Option<u32> {
        unit_price.and_then(|p| p.checked_mul(quantity))
    }

    /// Number of rows currently in the cart
    pub async fn row_count(session: &Session) -> usize {
        session.find_all(&Self::rows()).await.len()
    }

    /// Remove a row and wait for it to disappear
    pub async fn remove(session: &mut Session, product_id: u32) -> ProbeResult<()> {
        session.click(&Self::row_delete(product_id)).await?;
        session.wait_for_absent(&Self::row_name(product_id)).await.map(|_| ())
    }
}
