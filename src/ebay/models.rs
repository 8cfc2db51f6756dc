//! Data models for search requests and extracted listings.

use crate::ebay::regions::Region;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One matched listing, complete in all fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Listing title as shown on the page
    pub name: String,
    /// Price text exactly as displayed, in the region's currency convention
    pub price: String,
    /// Absolute link to the listing
    pub url: String,
    /// Storefront that produced this record
    pub region: Region,
}

impl ResultRecord {
    /// Returns the site label for this record's region, e.g. `eBay (DE)`.
    pub fn site(&self) -> String {
        self.region.site_label()
    }
}

/// One unit of work: a keyword searched on a single storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionQuery {
    pub keyword: String,
    pub region: Region,
    pub max_results: usize,
}

/// A validated search invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    keyword: String,
    regions: Vec<Region>,
    max_results: usize,
}

impl SearchRequest {
    /// Validates an invocation.
    ///
    /// The keyword is trimmed and must be non-empty, the cap must be at least 1,
    /// and at least one region is required. Repeated regions are collapsed,
    /// keeping the position of their first occurrence.
    pub fn new(
        keyword: &str,
        regions: &[Region],
        max_results: usize,
    ) -> Result<Self, ValidationError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ValidationError::EmptyKeyword);
        }

        if max_results == 0 {
            return Err(ValidationError::InvalidMaxResults(max_results));
        }

        if regions.is_empty() {
            return Err(ValidationError::NoRegions);
        }

        let mut distinct: Vec<Region> = Vec::with_capacity(regions.len());
        for region in regions {
            if distinct.contains(region) {
                warn!("Region '{}' requested more than once, searching it once", region);
            } else {
                distinct.push(*region);
            }
        }

        Ok(Self { keyword: keyword.to_string(), regions: distinct, max_results })
    }

    /// Validates an invocation whose regions are still raw codes.
    pub fn parse(
        keyword: &str,
        region_codes: &[&str],
        max_results: usize,
    ) -> Result<Self, ValidationError> {
        let regions = region_codes
            .iter()
            .map(|code| code.parse::<Region>())
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(keyword, &regions, max_results)
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Regions in the order they were requested.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Builds one query per region, in request order.
    pub fn queries(&self) -> impl Iterator<Item = RegionQuery> + '_ {
        self.regions.iter().map(move |region| RegionQuery {
            keyword: self.keyword.clone(),
            region: *region,
            max_results: self.max_results,
        })
    }
}

/// Records extracted from a single result page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Complete records in page order, never more than the query's cap
    pub records: Vec<ResultRecord>,
    /// Entries dropped because a field was missing or invalid
    pub skipped: usize,
    /// Candidate entries examined before parsing stopped
    pub cards: usize,
}
