//! Concurrent multi-region search with per-region failure isolation.
//!
//! One task is launched per requested region. Every task runs to completion
//! on its own: a failed fetch only empties that region's slot. Results are
//! merged in request order once all tasks have finished.

use crate::ebay::{
    EbayAdapter, PageFetch, Region, RegionAdapter, RegionQuery, ResultRecord, SearchRequest,
};
use crate::error::FetchError;
use futures::future::join_all;
use tracing::{info, warn};

/// Terminal state of one region's task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionStatus {
    Completed,
    Failed(FetchError),
}

/// What a single region contributed to the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionOutcome {
    pub region: Region,
    pub status: RegionStatus,
    /// Records in page order, at most the per-region cap
    pub records: Vec<ResultRecord>,
    /// Entries dropped because they were incomplete
    pub skipped: usize,
    /// Candidate entries examined on the page
    pub cards: usize,
}

impl RegionOutcome {
    fn failed(region: Region, error: FetchError) -> Self {
        Self {
            region,
            status: RegionStatus::Failed(error),
            records: Vec::new(),
            skipped: 0,
            cards: 0,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, RegionStatus::Failed(_))
    }
}

/// Merged result of a run, one outcome per requested region in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    outcomes: Vec<RegionOutcome>,
}

impl AggregateReport {
    pub fn outcomes(&self) -> &[RegionOutcome] {
        &self.outcomes
    }

    /// All records, grouped by region in request order.
    pub fn records(&self) -> impl Iterator<Item = &ResultRecord> {
        self.outcomes.iter().flat_map(|o| o.records.iter())
    }

    pub fn into_records(self) -> Vec<ResultRecord> {
        self.outcomes.into_iter().flat_map(|o| o.records).collect()
    }

    /// Total number of records across all regions.
    pub fn total(&self) -> usize {
        self.outcomes.iter().map(|o| o.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Regions whose fetch failed.
    pub fn failed(&self) -> impl Iterator<Item = &RegionOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }
}

/// Fans a search out across regions and merges the results.
pub struct Aggregator<F> {
    fetcher: F,
    base_url: Option<String>,
}

impl<F: PageFetch> Aggregator<F> {
    /// Creates an aggregator that queries the public storefronts.
    pub fn new(fetcher: F) -> Self {
        Self::with_base_url(fetcher, None)
    }

    /// Creates an aggregator whose adapters target a custom base URL (for testing).
    pub fn with_base_url(fetcher: F, base_url: Option<String>) -> Self {
        Self { fetcher, base_url }
    }

    fn adapter_for(&self, region: Region) -> EbayAdapter {
        EbayAdapter::with_base_url(region, self.base_url.clone())
    }

    /// Runs one concurrent task per region and waits for all of them.
    pub async fn search(&self, request: &SearchRequest) -> AggregateReport {
        info!("Searching for '{}' on {} eBay sites", request.keyword(), request.regions().len());

        let adapters: Vec<EbayAdapter> =
            request.regions().iter().map(|region| self.adapter_for(*region)).collect();

        let tasks = request
            .queries()
            .zip(adapters.iter())
            .map(|(query, adapter)| self.search_region(adapter, query));

        // join_all yields outputs in input order regardless of completion order
        let outcomes = join_all(tasks).await;

        let report = AggregateReport { outcomes };

        let failed = report.failed().count();
        if failed > 0 {
            warn!("{} of {} regions failed", failed, report.outcomes().len());
        }
        info!("Collected {} products in total", report.total());

        report
    }

    /// Fetches and parses one region. Never fails: errors become an empty outcome.
    async fn search_region(
        &self,
        adapter: &dyn RegionAdapter,
        query: RegionQuery,
    ) -> RegionOutcome {
        let region = query.region;
        let url = adapter.search_url(&query);

        let html = match self.fetcher.fetch(region, &url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Error searching eBay {}: {}", region, e);
                return RegionOutcome::failed(region, e);
            }
        };

        let page = adapter.extract(&html, &query);

        if page.cards == 0 {
            warn!("No product cards found on eBay {}", region);
        } else {
            info!(
                "Extracted {} valid products from {} cards on eBay {} ({} skipped)",
                page.records.len(),
                page.cards,
                region,
                page.skipped
            );
        }

        let mut records = page.records;
        records.truncate(query.max_results);

        RegionOutcome {
            region,
            status: RegionStatus::Completed,
            records,
            skipped: page.skipped,
            cards: page.cards,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Mock fetcher keyed by region, with an optional per-region delay.
    struct MockFetcher {
        responses: HashMap<Region, Result<String, FetchError>>,
        delays: HashMap<Region, u64>,
        call_count: Arc<AtomicU32>,
    }

    impl MockFetcher {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
                delays: HashMap::new(),
                call_count: Arc::new(AtomicU32::new(0)),
            }
        }

        fn page(mut self, region: Region, html: String) -> Self {
            self.responses.insert(region, Ok(html));
            self
        }

        fn error(mut self, region: Region, error: FetchError) -> Self {
            self.responses.insert(region, Err(error));
            self
        }

        fn delay(mut self, region: Region, millis: u64) -> Self {
            self.delays.insert(region, millis);
            self
        }

        fn call_count(&self) -> u32 {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PageFetch for MockFetcher {
        async fn fetch(&self, region: Region, url: &str) -> Result<String, FetchError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            assert!(url.contains(region.domain()), "unexpected url {} for {}", url, region);

            if let Some(millis) = self.delays.get(&region) {
                tokio::time::sleep(Duration::from_millis(*millis)).await;
            }

            self.responses
                .get(&region)
                .cloned()
                .unwrap_or_else(|| Ok("<html><body></body></html>".to_string()))
        }
    }

    fn listing_page(region: Region, listings: &[(&str, &str)]) -> String {
        let mut html = String::from("<html><body><ul>");
        for (i, (title, price)) in listings.iter().enumerate() {
            html.push_str(&format!(
                r#"<li class="s-item">
                    <a class="s-item__link" href="{}/itm/{}?_trksid=p1"></a>
                    <div class="s-item__title"><span>{}</span></div>
                    <span class="s-item__price">{}</span>
                </li>"#,
                region.base_url(),
                i + 1,
                title,
                price
            ));
        }
        html.push_str("</ul></body></html>");
        html
    }

    #[tokio::test]
    async fn test_partial_failure_scenario() {
        let us_page = listing_page(
            Region::Us,
            &[
                ("PS5 Disc Console", "$449.99"),
                ("PS5 Digital Console", "$399.99"),
                ("PS5 Slim Bundle", "$499.00"),
            ],
        );
        let fetcher =
            MockFetcher::new().page(Region::Us, us_page).error(Region::Uk, FetchError::Timeout);

        let aggregator = Aggregator::new(fetcher);
        let request = SearchRequest::new("PS5", &[Region::Us, Region::Uk], 2).unwrap();

        let report = aggregator.search(&request).await;

        assert_eq!(aggregator.fetcher.call_count(), 2);
        assert_eq!(report.total(), 2);

        let records: Vec<_> = report.records().collect();
        assert!(records.iter().all(|r| r.region == Region::Us));
        assert_eq!(records[0].name, "PS5 Disc Console");
        assert_eq!(records[1].name, "PS5 Digital Console");
        assert_eq!(records[0].url, "https://www.ebay.com/itm/1");

        let failed: Vec<_> = report.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].region, Region::Uk);
        assert_eq!(failed[0].status, RegionStatus::Failed(FetchError::Timeout));
    }

    #[tokio::test]
    async fn test_empty_regions_are_a_successful_empty_run() {
        let fetcher = MockFetcher::new()
            .page(Region::De, listing_page(Region::De, &[]))
            .page(Region::Fr, listing_page(Region::Fr, &[]));

        let aggregator = Aggregator::new(fetcher);
        let request = SearchRequest::new("obscure widget", &[Region::De, Region::Fr], 5).unwrap();

        let report = aggregator.search(&request).await;

        assert!(report.is_empty());
        assert_eq!(report.outcomes().len(), 2);
        assert!(report.outcomes().iter().all(|o| o.status == RegionStatus::Completed));
        assert_eq!(report.failed().count(), 0);
    }

    #[tokio::test]
    async fn test_all_regions_fail() {
        let fetcher = MockFetcher::new()
            .error(Region::Us, FetchError::NetworkError("connection reset".to_string()))
            .error(Region::Au, FetchError::HttpError { status: 403 });

        let aggregator = Aggregator::new(fetcher);
        let request = SearchRequest::new("PS5", &[Region::Us, Region::Au], 5).unwrap();

        let report = aggregator.search(&request).await;

        assert!(report.is_empty());
        assert_eq!(report.failed().count(), 2);
        assert!(report.into_records().is_empty());
    }

    #[tokio::test]
    async fn test_one_task_per_region_survives_k_minus_one_failures() {
        let mut fetcher = MockFetcher::new();
        for region in Region::all() {
            fetcher = fetcher.error(*region, FetchError::HttpError { status: 500 });
        }
        let it_page = listing_page(Region::It, &[("Lego Colosseo 10276", "EUR 449,99")]);
        let fetcher = fetcher.page(Region::It, it_page);

        let aggregator = Aggregator::new(fetcher);
        let request = SearchRequest::new("lego", Region::all(), 3).unwrap();

        let report = aggregator.search(&request).await;

        assert_eq!(aggregator.fetcher.call_count(), 7);
        assert_eq!(report.outcomes().len(), 7);
        assert_eq!(report.failed().count(), 6);
        assert_eq!(report.total(), 1);
        assert_eq!(report.records().next().unwrap().region, Region::It);
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_follows_request_not_completion() {
        let fetcher = MockFetcher::new()
            .page(Region::Uk, listing_page(Region::Uk, &[("Slowest listing", "£1.00")]))
            .page(Region::Us, listing_page(Region::Us, &[("Middle listing", "$1.00")]))
            .page(Region::De, listing_page(Region::De, &[("Fastest listing", "EUR 1,00")]))
            .delay(Region::Uk, 300)
            .delay(Region::Us, 200)
            .delay(Region::De, 100);

        let aggregator = Aggregator::new(fetcher);
        let request = SearchRequest::new("item", &[Region::Uk, Region::Us, Region::De], 5).unwrap();

        let started = tokio::time::Instant::now();
        let report = aggregator.search(&request).await;
        let elapsed = started.elapsed();

        let regions: Vec<Region> = report.records().map(|r| r.region).collect();
        assert_eq!(regions, vec![Region::Uk, Region::Us, Region::De]);

        // Concurrent: total wait is the slowest region, not the sum
        assert!(elapsed < Duration::from_millis(600), "elapsed {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_rerun_is_deterministic() {
        let make = || {
            let us_page =
                listing_page(Region::Us, &[("Alpha product", "$1.00"), ("Beta product", "$2.00")]);
            let es_page = listing_page(Region::Es, &[("Gamma producto", "1,00 EUR")]);
            MockFetcher::new().page(Region::Us, us_page).page(Region::Es, es_page)
        };
        let request = SearchRequest::new("thing", &[Region::Es, Region::Us], 5).unwrap();

        let first = Aggregator::new(make()).search(&request).await;
        let second = Aggregator::new(make()).search(&request).await;

        assert_eq!(first, second);
        let names: Vec<_> = first.records().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Gamma producto", "Alpha product", "Beta product"]);
    }

    #[tokio::test]
    async fn test_skipped_entries_counted_per_region() {
        let html = format!(
            "{}{}",
            r#"<html><body><ul>
                <li class="s-item"><div class="s-item__title"><span>No price or link</span></div></li>"#,
            r#"<li class="s-item"><a class="s-item__link" href="https://www.ebay.fr/itm/2"></a>
                <div class="s-item__title"><span>Console complete</span></div>
                <span class="s-item__price">299,00 EUR</span></li>
            </ul></body></html>"#
        );
        let fetcher = MockFetcher::new().page(Region::Fr, html);

        let aggregator = Aggregator::new(fetcher);
        let request = SearchRequest::new("console", &[Region::Fr], 5).unwrap();

        let report = aggregator.search(&request).await;
        let outcome = &report.outcomes()[0];

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.cards, 2);
    }
}
