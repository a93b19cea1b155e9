//! Property-based tests for candidate resolution.
//!
//! Each generated locator mixes candidates that match, miss, or make the
//! driver error, against a mock page built to agree with the mix.

use proptest::prelude::*;
use storeprobe::mock::{MockDriver, MockElement, MockPage};
use storeprobe::{resolve, Locator, Presence};

const URL: &str = "https://shop.test/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    Hit,
    Hidden,
    Miss,
    Error,
}

fn candidate() -> impl Strategy<Value = Candidate> {
    prop_oneof![
        Just(Candidate::Hit),
        Just(Candidate::Hidden),
        Just(Candidate::Miss),
        Just(Candidate::Error),
    ]
}

fn source(i: usize, c: Candidate) -> String {
    match c {
        Candidate::Hit | Candidate::Hidden => format!(".c{i}"),
        Candidate::Miss => format!("#missing-{i}"),
        Candidate::Error => format!("//broken[{i}"),
    }
}

fn fixture(mix: &[Candidate], presence: Presence) -> (MockDriver, Locator) {
    let mut page = MockPage::new(URL, "Home");
    let mut driver = MockDriver::new();
    let mut locator = Locator::new("target").with_presence(presence);
    for (i, c) in mix.iter().enumerate() {
        let src = source(i, *c);
        match c {
            Candidate::Hit => {
                page = page.with_element(MockElement::new(format!("el-{i}"), "div").matching([src.clone()]).shown());
            }
            Candidate::Hidden => {
                page = page.with_element(MockElement::new(format!("el-{i}"), "div").matching([src.clone()]));
            }
            Candidate::Error => driver = driver.failing(src.clone()),
            Candidate::Miss => {}
        }
        locator = if i % 2 == 0 { locator.css(src) } else { locator.xpath(src) };
    }
    (driver.with_page(page).at(URL), locator)
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    /// The first acceptable candidate wins, whatever follows it.
    #[test]
    fn prop_first_match_wins(mix in prop::collection::vec(candidate(), 1..8)) {
        let (driver, locator) = fixture(&mix, Presence::Attached);
        let expected = mix.iter().position(|c| matches!(c, Candidate::Hit | Candidate::Hidden));
        let resolved = block_on(resolve(&driver, &locator));
        prop_assert_eq!(resolved.as_ref().map(|r| r.index), expected);
        if let (Some(r), Some(i)) = (resolved, expected) {
            prop_assert_eq!(r.element.id, format!("el-{i}"));
        }
    }

    /// Visible presence skips hidden matches.
    #[test]
    fn prop_visible_skips_hidden(mix in prop::collection::vec(candidate(), 1..8)) {
        let (driver, locator) = fixture(&mix, Presence::Visible);
        let expected = mix.iter().position(|c| *c == Candidate::Hit);
        let resolved = block_on(resolve(&driver, &locator));
        prop_assert_eq!(resolved.map(|r| r.index), expected);
    }

    /// No matching candidate yields None rather than an error or panic.
    #[test]
    fn prop_no_match_is_none(mix in prop::collection::vec(
        prop_oneof![Just(Candidate::Miss), Just(Candidate::Error)], 0..8)
    ) {
        let (driver, locator) = fixture(&mix, Presence::Attached);
        prop_assert!(block_on(resolve(&driver, &locator)).is_none());
    }

    /// Resolving twice against an unchanged page gives the same element.
    #[test]
    fn prop_resolution_is_stable(mix in prop::collection::vec(candidate(), 1..8)) {
        let (driver, locator) = fixture(&mix, Presence::Attached);
        let first = block_on(resolve(&driver, &locator)).map(|r| r.element.id);
        let second = block_on(resolve(&driver, &locator)).map(|r| r.element.id);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn missing_id_then_class_then_id_returns_class_match() {
    let page = MockPage::new(URL, "Login").with_element(
        MockElement::new("email", "input")
            .matching(["input.email-field"])
            .shown(),
    );
    let driver = MockDriver::new().with_page(page).at(URL);
    let locator = Locator::new("email field")
        .css("#login-email")
        .css("input.email-field")
        .css("#email-address");

    let resolved = block_on(resolve(&driver, &locator)).unwrap();
    assert_eq!(resolved.index, 1);
    assert_eq!(resolved.element.id, "email");
    assert_eq!(resolved.selector.source(), "input.email-field");
}

#[test]
fn empty_locator_resolves_to_none_without_querying() {
    let driver = MockDriver::new().with_page(MockPage::new(URL, "Home")).at(URL);
    let locator = Locator::new("nothing");
    assert!(block_on(resolve(&driver, &locator)).is_none());
    assert!(!driver.was_called("find_all"));
}
