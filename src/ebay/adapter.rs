//! Region adapters: search URL construction and page extraction per storefront.

use crate::ebay::models::{ParsedPage, RegionQuery};
use crate::ebay::parser::Parser;
use crate::ebay::regions::Region;

/// Listings requested per page. A single page is fetched per region.
pub const PAGE_SIZE: u32 = 60;

/// Knows how to query one storefront and read its result page.
pub trait RegionAdapter: Send + Sync {
    /// Storefront served by this adapter.
    fn region(&self) -> Region;

    /// Builds the search URL for a query.
    fn search_url(&self, query: &RegionQuery) -> String;

    /// Extracts complete records from a result page, capped at the query's maximum.
    fn extract(&self, html: &str, query: &RegionQuery) -> ParsedPage;
}

/// Adapter for an eBay storefront.
pub struct EbayAdapter {
    region: Region,
    base_url: Option<String>,
    parser: Parser,
}

impl EbayAdapter {
    /// Creates an adapter for the region's public storefront.
    pub fn new(region: Region) -> Self {
        Self::with_base_url(region, None)
    }

    /// Creates an adapter with an optional custom base URL (for testing).
    pub fn with_base_url(region: Region, base_url: Option<String>) -> Self {
        let parser = match &base_url {
            Some(base) => Parser::with_base_url(region, base.clone()),
            None => Parser::new(region),
        };

        Self { region, base_url, parser }
    }

    fn base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| self.region.base_url())
    }
}

impl RegionAdapter for EbayAdapter {
    fn region(&self) -> Region {
        self.region
    }

    fn search_url(&self, query: &RegionQuery) -> String {
        format!(
            "{}/sch/i.html?_nkw={}&_ipg={}",
            self.base_url(),
            urlencoding::encode(&query.keyword),
            PAGE_SIZE
        )
    }

    fn extract(&self, html: &str, query: &RegionQuery) -> ParsedPage {
        self.parser.parse_search(html, query.max_results)
    }
}
