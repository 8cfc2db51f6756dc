//! HTML parser for eBay search result pages.

use crate::ebay::models::{ParsedPage, ResultRecord};
use crate::ebay::regions::Region;
use crate::ebay::selectors;
use crate::error::EntryError;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};
use url::Url;

/// Titles shorter than this are treated as noise.
const MIN_TITLE_CHARS: usize = 6;

/// Parser for one storefront's search result pages.
pub struct Parser {
    region: Region,
    base_url: String,
}

impl Parser {
    /// Creates a new parser for the given region.
    pub fn new(region: Region) -> Self {
        Self::with_base_url(region, region.base_url())
    }

    /// Creates a parser that resolves relative links against `base_url`.
    pub fn with_base_url(region: Region, base_url: impl Into<String>) -> Self {
        Self { region, base_url: base_url.into() }
    }

    /// Parses a search results page, keeping at most `max_results` records.
    ///
    /// Cards are examined in page order and scanning stops as soon as the cap
    /// is reached. Incomplete cards are skipped and counted.
    pub fn parse_search(&self, html: &str, max_results: usize) -> ParsedPage {
        let document = Html::parse_document(html);
        let mut page = ParsedPage::default();

        for element in document.select(&selectors::RESULT) {
            if page.records.len() >= max_results {
                break;
            }

            if is_nested_card(element) {
                continue;
            }

            page.cards += 1;

            match self.parse_card(element) {
                Ok(record) => {
                    trace!("Parsed {} listing: {} - {}", self.region, record.price, record.name);
                    page.records.push(record);
                }
                Err(e) => {
                    debug!("Skipping {} listing: {}", self.region, e);
                    page.skipped += 1;
                }
            }
        }

        debug!(
            "Parsed {} records from {} cards on {} ({} skipped)",
            page.records.len(),
            page.cards,
            self.region,
            page.skipped
        );

        page
    }

    /// Parses a single listing card into a complete record.
    fn parse_card(&self, element: ElementRef) -> Result<ResultRecord, EntryError> {
        if element.value().classes().any(|c| c == selectors::PROMO_CLASS) {
            return Err(EntryError::Promotional);
        }

        let name = extract_text(element, &selectors::TITLE)
            .or_else(|| extract_text(element, &selectors::TITLE_FALLBACK))
            .ok_or(EntryError::MissingTitle)?;

        let lowered = name.to_lowercase();
        if lowered.contains("shop on ebay") || lowered.contains("new listing") {
            return Err(EntryError::PlaceholderTitle(name));
        }

        if name.chars().count() < MIN_TITLE_CHARS {
            return Err(EntryError::ShortTitle(name));
        }

        let price = extract_text(element, &selectors::PRICE).ok_or(EntryError::MissingPrice)?;
        if self.is_price_range(&price) {
            return Err(EntryError::PriceRange(price));
        }

        let href = extract_href(element, &selectors::LINK).ok_or(EntryError::MissingLink)?;
        let url = self.absolute_url(href)?;

        Ok(ResultRecord { name, price, url, region: self.region })
    }

    /// Checks for "$10.00 to $25.00" style prices in the region's language.
    fn is_price_range(&self, price: &str) -> bool {
        let separator = self.region.range_separator();
        price.split_whitespace().any(|word| word.eq_ignore_ascii_case(separator))
    }

    /// Resolves a listing link to an absolute http(s) URL without tracking parameters.
    fn absolute_url(&self, href: &str) -> Result<String, EntryError> {
        let invalid = || EntryError::InvalidUrl(href.to_string());

        let base = Url::parse(&self.base_url).map_err(|_| invalid())?;
        let mut url = base.join(href.trim()).map_err(|_| invalid())?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid());
        }

        url.set_query(None);
        url.set_fragment(None);

        Ok(url.to_string())
    }
}

/// Returns the whitespace-collapsed text of the first match, if non-empty.
pub fn extract_text(element: ElementRef, selector: &Selector) -> Option<String> {
    let node = element.select(selector).next()?;
    let text = node.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ");

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Returns the non-empty `href` of the first match.
pub fn extract_href<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<&'a str> {
    element
        .select(selector)
        .next()
        .and_then(|e| e.value().attr("href"))
        .filter(|href| !href.trim().is_empty())
}

/// True when the card sits inside another matched card (a wrapper div inside its `<li>`).
fn is_nested_card(element: ElementRef) -> bool {
    element.ancestors().filter_map(ElementRef::wrap).any(|a| selectors::RESULT.matches(&a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str, price: &str, href: &str) -> String {
        format!(
            r#"<li class="s-item"><div class="s-item__wrapper">
                <a class="s-item__link" href="{}">
                    <div class="s-item__title"><span role="heading">{}</span></div>
                </a>
                <span class="s-item__price">{}</span>
            </div></li>"#,
            href, title, price
        )
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body><ul class=\"srp-results\">{}</ul></body></html>", cards.join(""))
    }

    #[test]
    fn test_parse_complete_cards_in_page_order() {
        let html = page(&[
            card("Sony PlayStation 5 Disc", "$449.99", "https://www.ebay.com/itm/111?hash=abc"),
            card("PS5 Slim Digital Edition", "$379.00", "https://www.ebay.com/itm/222"),
        ]);

        let parsed = Parser::new(Region::Us).parse_search(&html, 10);

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.cards, 2);
        assert_eq!(parsed.skipped, 0);

        let first = &parsed.records[0];
        assert_eq!(first.name, "Sony PlayStation 5 Disc");
        assert_eq!(first.price, "$449.99");
        assert_eq!(first.url, "https://www.ebay.com/itm/111");
        assert_eq!(first.region, Region::Us);

        assert_eq!(parsed.records[1].name, "PS5 Slim Digital Edition");
    }

    #[test]
    fn test_parse_stops_at_cap() {
        let html = page(&[
            card("First listing", "$1.00", "https://www.ebay.com/itm/1"),
            card("Second listing", "$2.00", "https://www.ebay.com/itm/2"),
            card("Third listing", "$3.00", "https://www.ebay.com/itm/3"),
        ]);

        let parsed = Parser::new(Region::Us).parse_search(&html, 2);

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.cards, 2);
        assert_eq!(parsed.records[1].name, "Second listing");
    }

    #[test]
    fn test_skips_incomplete_cards() {
        let missing_price = r#"<li class="s-item">
                <a class="s-item__link" href="https://www.ebay.com/itm/9"></a>
                <div class="s-item__title"><span>No price here</span></div>
            </li>"#
            .to_string();
        let missing_link = r#"<li class="s-item">
                <div class="s-item__title"><span>No link here</span></div>
                <span class="s-item__price">$5.00</span>
            </li>"#
            .to_string();

        let html = page(&[
            missing_price,
            card("Shop on eBay", "$20.00", "https://www.ebay.com/itm/0"),
            card("Tiny", "$20.00", "https://www.ebay.com/itm/4"),
            missing_link,
            card("Valid listing title", "$7.50", "https://www.ebay.com/itm/5"),
        ]);

        let parsed = Parser::new(Region::Us).parse_search(&html, 5);

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].name, "Valid listing title");
        assert_eq!(parsed.skipped, 4);
        assert_eq!(parsed.cards, 5);
    }

    #[test]
    fn test_skips_promotional_card() {
        let html = page(&[
            r#"<li class="s-item srp-river-answer">
                <a class="s-item__link" href="https://www.ebay.com/b/1"></a>
                <div class="s-item__title"><span>Shop related categories</span></div>
                <span class="s-item__price">$1.00</span>
            </li>"#
                .to_string(),
        ]);

        let parsed = Parser::new(Region::Us).parse_search(&html, 5);
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn test_skips_price_ranges_per_region() {
        let us = page(&[card("Controller bundle", "$10.00 to $25.00", "https://www.ebay.com/itm/1")]);
        assert!(Parser::new(Region::Us).parse_search(&us, 5).records.is_empty());

        let de = page(&[card("Controller Paket", "EUR 10,00 bis EUR 25,00", "https://www.ebay.de/itm/1")]);
        assert!(Parser::new(Region::De).parse_search(&de, 5).records.is_empty());

        // "to" is not a range marker on the German storefront
        let de_single = page(&[card("Controller Paket", "EUR 10,00", "https://www.ebay.de/itm/1")]);
        assert_eq!(Parser::new(Region::De).parse_search(&de_single, 5).records.len(), 1);
    }

    #[test]
    fn test_price_kept_verbatim() {
        let html = page(&[card("Nintendo Switch OLED", "EUR 299,00", "https://www.ebay.de/itm/42")]);
        let parsed = Parser::new(Region::De).parse_search(&html, 5);
        assert_eq!(parsed.records[0].price, "EUR 299,00");
    }

    #[test]
    fn test_relative_link_resolved_against_region() {
        let html = page(&[card("Relative link listing", "£12.00", "/itm/777?var=1#top")]);
        let parsed = Parser::new(Region::Uk).parse_search(&html, 5);
        assert_eq!(parsed.records[0].url, "https://www.ebay.co.uk/itm/777");
    }

    #[test]
    fn test_non_http_link_rejected() {
        let html = page(&[card("Script link listing", "$3.00", "javascript:void(0)")]);
        let parsed = Parser::new(Region::Us).parse_search(&html, 5);
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn test_custom_base_url() {
        let html = page(&[card("Mock server listing", "$3.00", "/itm/5")]);
        let parsed =
            Parser::with_base_url(Region::Us, "http://127.0.0.1:8080").parse_search(&html, 5);
        assert_eq!(parsed.records[0].url, "http://127.0.0.1:8080/itm/5");
    }

    #[test]
    fn test_empty_page() {
        let parsed = Parser::new(Region::Fr).parse_search("<html><body></body></html>", 5);
        assert_eq!(parsed, ParsedPage::default());
    }

    #[test]
    fn test_extract_text_collapses_whitespace() {
        let html = Html::parse_fragment("<div><p class=\"t\">  Sony \n  PS5   </p></div>");
        let root = html.root_element();
        let selector = Selector::parse(".t").unwrap();
        assert_eq!(extract_text(root, &selector), Some("Sony PS5".to_string()));

        let empty = Selector::parse(".missing").unwrap();
        assert_eq!(extract_text(root, &empty), None);
    }
}
