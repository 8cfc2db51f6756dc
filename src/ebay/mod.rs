//! eBay storefront modules for fetching, parsing, and data models.

pub mod adapter;
pub mod client;
pub mod models;
pub mod parser;
pub mod regions;
pub mod selectors;

pub use adapter::{EbayAdapter, RegionAdapter};
pub use client::{FetchClient, PageFetch};
pub use models::{ParsedPage, RegionQuery, ResultRecord, SearchRequest};
pub use parser::Parser;
pub use regions::Region;
