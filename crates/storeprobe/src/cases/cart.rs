//! Adding, checking and removing cart rows.

use crate::assertion::Assertion;
use crate::pages::{CartPage, PageObject, ProductDetailPage, ProductsPage};
use crate::result::ProbeResult;
use crate::session::Session;
use crate::suite::{Suite, TestCase};
use futures::future::BoxFuture;

pub fn suite() -> Suite {
    Suite::new("cart", "Cart contents, quantities and checkout gate")
        .with_case(TestCase::verifies(
            "empty_notice",
            "A fresh session shows an empty cart",
            empty_notice,
        ))
        .with_case(TestCase::verifies(
            "two_products",
            "Two products added from the listing appear with matching totals",
            two_products,
        ))
        .with_case(TestCase::verifies(
            "detail_quantity",
            "Quantity chosen on the detail page carries into the cart",
            detail_quantity,
        ))
        .with_case(TestCase::verifies(
            "remove_product",
            "Removing the only row empties the cart",
            remove_product,
        ))
        .with_case(TestCase::verifies(
            "checkout_requires_login",
            "Anonymous checkout asks to register or log in",
            checkout_requires_login,
        ))
}

/// Unit price times quantity equals the row total
async fn check_row(session: &Session, product_id: u32, quantity: u32) -> ProbeResult<()> {
    let shown = session.text(&CartPage::row_quantity(product_id)).await?;
    Assertion::equals(&quantity.to_string(), &shown)
        .context(&format!("product {product_id} quantity"))
        .check()?;
    let price = CartPage::parse_price(&session.text(&CartPage::row_price(product_id)).await?);
    let total = CartPage::parse_price(&session.text(&CartPage::row_total(product_id)).await?);
    let expected = CartPage::expected_total(price, quantity);
    Assertion::is_some(&expected, "a unit price that fits the quantity")
        .context(&format!("product {product_id} price"))
        .check()?;
    Assertion::equals(&expected, &total)
        .context(&format!("product {product_id} total"))
        .check()
}

fn empty_notice(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        CartPage.open(session).await?;
        session.wait_for_text(&CartPage::empty_notice(), "Cart is empty!").await?;
        Assertion::equals(&0, &CartPage::row_count(session).await).check()
    })
}

fn two_products(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        ProductsPage.open(session).await?;
        ProductsPage::add_and_continue(session, 1).await?;
        ProductsPage::add_and_continue(session, 2).await?;
        CartPage.open(session).await?;
        session.find_at_least(&CartPage::rows(), 2).await?;
        Assertion::equals(&2, &CartPage::row_count(session).await).context("cart rows").check()?;
        check_row(session, 1, 1).await?;
        check_row(session, 2, 1).await
    })
}

fn detail_quantity(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        ProductDetailPage::new(1).open(session).await?;
        ProductDetailPage::add_quantity(session, 4).await?;
        session.find(&ProductsPage::cart_modal()).await?;
        session.click(&ProductsPage::modal_view_cart()).await?;
        CartPage.wait_arrived(session).await?;
        check_row(session, 1, 4).await
    })
}

fn remove_product(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        ProductsPage.open(session).await?;
        ProductsPage::add_and_continue(session, 1).await?;
        CartPage.open(session).await?;
        session.find(&CartPage::row_name(1)).await?;
        CartPage::remove(session, 1).await?;
        session.wait_for_text(&CartPage::empty_notice(), "Cart is empty!").await?;
        Ok(())
    })
}

fn checkout_requires_login(session: &mut Session) -> BoxFuture<'_, ProbeResult<()>> {
    Box::pin(async move {
        ProductsPage.open(session).await?;
        ProductsPage::add_and_continue(session, 1).await?;
        CartPage.open(session).await?;
        session.click(&CartPage::proceed_to_checkout()).await?;
        session.find(&CartPage::checkout_modal()).await?;
        let link = session.text(&CartPage::checkout_login_link()).await?;
        Assertion::contains(&link, "Register / Login").check()
    })
}
