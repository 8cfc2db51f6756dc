//! CSS selectors for eBay search result pages.
//!
//! All storefronts share the same listing markup today. When a region drifts,
//! capture an HTML sample, update the selectors here, and add a test fixture.

use scraper::Selector;
use std::sync::LazyLock;

/// Listing card container.
pub static RESULT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li.s-item, div.s-item__wrapper").unwrap());

/// Class marking promotional "river" cards injected between listings.
pub const PROMO_CLASS: &str = "srp-river-answer";

/// Listing title text.
pub static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".s-item__title span").unwrap());

/// Title container, for cards without an inner span.
pub static TITLE_FALLBACK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".s-item__title").unwrap());

/// Displayed price.
pub static PRICE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".s-item__price").unwrap());

/// Link to the listing page.
pub static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.s-item__link[href]").unwrap());
