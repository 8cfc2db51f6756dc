//! Search command implementation.

use crate::aggregator::{AggregateReport, Aggregator};
use crate::config::Config;
use crate::ebay::{FetchClient, PageFetch, SearchRequest};
use crate::error::ValidationError;
use crate::format::Formatter;
use crate::report::{self, ReportWriter};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// Per-invocation options that don't belong in the config file.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Region codes overriding the configured regions, as typed by the user
    pub regions: Option<Vec<String>>,
    /// Explicit report path; a timestamped name is derived when absent
    pub output: Option<PathBuf>,
    /// Write the report file at all
    pub write_report: bool,
    /// Open the report with the system viewer after writing
    pub open: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { regions: None, output: None, write_report: true, open: false }
    }
}

/// Result of a completed search.
#[derive(Debug)]
pub struct SearchOutcome {
    pub report: AggregateReport,
    /// Records formatted for the terminal
    pub rendered: String,
    /// Where the report file was written, if it was
    pub report_path: Option<PathBuf>,
}

/// Executes a multi-region product search.
pub struct SearchCommand {
    config: Config,
}

impl SearchCommand {
    /// Creates a new search command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Validates the invocation: timeout, regions (raw codes win over config), keyword and cap.
    pub fn request(
        &self,
        query: &str,
        region_codes: Option<&[String]>,
    ) -> Result<SearchRequest, ValidationError> {
        if self.config.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        match region_codes {
            Some(codes) => {
                let codes: Vec<&str> =
                    codes.iter().map(String::as_str).filter(|c| !c.trim().is_empty()).collect();
                SearchRequest::parse(query, &codes, self.config.max_results)
            }
            None => SearchRequest::new(query, &self.config.regions, self.config.max_results),
        }
    }

    /// Executes the search against the live storefronts.
    pub async fn execute(&self, query: &str, options: &SearchOptions) -> Result<SearchOutcome> {
        let request = self.request(query, options.regions.as_deref())?;
        let client = FetchClient::new(&self.config).context("Failed to create HTTP client")?;

        self.run(client, &request, options).await
    }

    /// Executes the search with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        client: impl PageFetch,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchOutcome> {
        let request = self.request(query, options.regions.as_deref())?;
        self.run(client, &request, options).await
    }

    async fn run(
        &self,
        client: impl PageFetch,
        request: &SearchRequest,
        options: &SearchOptions,
    ) -> Result<SearchOutcome> {
        let report = Aggregator::new(client).search(request).await;
        let records: Vec<_> = report.records().cloned().collect();

        if records.is_empty() {
            info!("No products found for '{}'. Try a different search term.", request.keyword());
        }

        let report_path = if options.write_report {
            let writer = ReportWriter::new(self.config.output_dir.clone());
            let path = writer.write(&records, request.keyword(), options.output.as_deref())?;

            if options.open {
                if let Err(e) = report::open(&path) {
                    warn!("{:#}", e);
                }
            }

            Some(path)
        } else {
            None
        };

        let rendered = Formatter::new(self.config.format).format_records(&records);

        Ok(SearchOutcome { report, rendered, report_path })
    }
}
