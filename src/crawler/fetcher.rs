//! HTTP fetcher with rate limiting and gzip sniffing
//!
//! This module provides the HTTP client shared by both feeds:
//! - One pooled `reqwest::Client` with a fixed browser User-Agent
//! - Rate limiting with governor
//! - Retry with exponential backoff on 429/5xx
//! - Transparent decompression of gzip bodies served without `Content-Encoding`

use async_trait::async_trait;
use bytes::Bytes;
use flate2::read::GzDecoder;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::Client;
use std::io::Read;
use std::num::NonZeroU32;
use std::time::Duration;

use super::headers::build_browser_headers;
use super::PageSource;
use crate::config::FetcherConfig;
use crate::utils::error::FetchError;

/// The two-byte gzip magic number
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// HTTP fetcher used by the refresh coordinators
pub struct FortuneFetcher {
    /// HTTP client with configured timeout, headers and connection pool
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Maximum number of retry attempts for retryable statuses
    max_retries: u32,

    /// Base delay in milliseconds for exponential backoff
    base_delay_ms: u64,
}

impl FortuneFetcher {
    /// Create a new fetcher from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .default_headers(build_browser_headers(&config.user_agent))
            .timeout(config.request_timeout())
            .gzip(true)
            .build()?;

        let rate = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            max_retries: config.max_retries,
            base_delay_ms: 500,
        })
    }

    /// Override the backoff base delay
    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Fetch raw body bytes with rate limiting and retry
    ///
    /// # Errors
    ///
    /// - `FetchError::InvalidUrl` if `url` does not parse
    /// - `FetchError::ServerError` for a non-retryable non-success status
    /// - `FetchError::MaxRetriesExceeded` once retries on 429/5xx run out
    /// - `FetchError::Timeout` / `FetchError::Http` for transport failures
    pub async fn fetch_bytes(&self, url: &str) -> Result<Bytes, FetchError> {
        let parsed = url::Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.backoff_delay(attempt)).await;
            }

            self.rate_limiter.until_ready().await;

            tracing::debug!(url = %url, attempt, "Fetching URL");

            match self.client.get(parsed.clone()).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response.bytes().await?);
                    } else if Self::should_retry(status.as_u16()) {
                        last_error = Some(FetchError::ServerError(status.as_u16()));
                        continue;
                    } else {
                        return Err(FetchError::ServerError(status.as_u16()));
                    }
                }
                Err(e) if e.is_timeout() => last_error = Some(FetchError::Timeout),
                Err(e) => last_error = Some(FetchError::Http(e)),
            }
        }

        match last_error {
            Some(err) if self.max_retries == 0 => Err(err),
            Some(err) => {
                tracing::debug!(url = %url, error = %err, "Retries exhausted");
                Err(FetchError::MaxRetriesExceeded)
            }
            None => Err(FetchError::MaxRetriesExceeded),
        }
    }

    /// Fetch a page and decode it to text
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let bytes = self.fetch_bytes(url).await?;
        Ok(decode_body(&bytes))
    }

    /// Delay before retry number `attempt` (1-based), doubling each time
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }

    /// Determine if a status code should trigger a retry
    ///
    /// Retry on 429, 500, 502, 503 and 504; everything else fails at once.
    fn should_retry(status: u16) -> bool {
        matches!(status, 429 | 500 | 502 | 503 | 504)
    }
}

#[async_trait]
impl PageSource for FortuneFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_text(url).await
    }
}

/// Decode a response body to UTF-8 text
///
/// Bodies starting with the gzip magic number are decompressed first. A
/// failed decompression is not fatal: the raw bytes are decoded instead.
pub fn decode_body(bytes: &[u8]) -> String {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut decoded = Vec::new();
        match GzDecoder::new(bytes).read_to_end(&mut decoded) {
            Ok(_) => return String::from_utf8_lossy(&decoded).into_owned(),
            Err(e) => {
                tracing::debug!(error = %e, "gzip magic present but body did not inflate")
            }
        }
    }

    String::from_utf8_lossy(bytes).into_owned()
}
