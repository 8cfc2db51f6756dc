//! price-compare - Compare product prices across regional eBay storefronts
//!
//! Searches several storefronts concurrently, keeps the first few complete
//! listings from each, and exports them as a single spreadsheet report.

pub mod aggregator;
pub mod commands;
pub mod config;
pub mod ebay;
pub mod error;
pub mod format;
pub mod report;

pub use aggregator::{AggregateReport, Aggregator, RegionOutcome, RegionStatus};
pub use config::Config;
pub use ebay::{Region, ResultRecord, SearchRequest};
pub use error::{EntryError, FetchError, ValidationError};
