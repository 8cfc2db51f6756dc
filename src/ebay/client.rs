//! HTTP client for storefront requests using wreq for TLS fingerprint emulation.

use crate::config::Config;
use crate::ebay::regions::Region;
use crate::error::FetchError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::debug;
use wreq::Client;
use wreq_util::Emulation;

/// Chrome 131 user agents with the matching `Sec-Ch-Ua-Platform` value.
const USER_AGENTS: &[(&str, &str)] = &[
    (
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
        "\"Windows\"",
    ),
    (
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
        "\"macOS\"",
    ),
    (
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
        "\"Linux\"",
    ),
];

/// Retrieves one page per call - enables mocking for tests.
#[async_trait]
pub trait PageFetch: Send + Sync {
    /// Fetches `url` on behalf of `region` and returns the response body.
    async fn fetch(&self, region: Region, url: &str) -> Result<String, FetchError>;
}

/// HTTP client with browser impersonation. Performs exactly one attempt per fetch.
pub struct FetchClient {
    client: Client,
}

impl FetchClient {
    /// Creates a new client with the configured timeout and proxy.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetch for FetchClient {
    async fn fetch(&self, region: Region, url: &str) -> Result<String, FetchError> {
        let (user_agent, platform) = USER_AGENTS[rand::rng().random_range(0..USER_AGENTS.len())];

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("User-Agent", user_agent)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8")
            .header("Accept-Language", region.accept_language())
            .header("Cache-Control", "max-age=0")
            .header("Sec-Ch-Ua", "\"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\"")
            .header("Sec-Ch-Ua-Mobile", "?0")
            .header("Sec-Ch-Ua-Platform", platform)
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await?;

        let status = response.status();
        debug!("Response status from {}: {}", region, status);

        if !status.is_success() {
            return Err(FetchError::HttpError { status: status.as_u16() });
        }

        Ok(response.text().await?)
    }
}
