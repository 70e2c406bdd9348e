// src/fetch/http.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::{future::Future, time::Duration};
use tokio::time::sleep;
use tracing::{debug, error, warn};

use super::ResourceFetcher;
use crate::config::RetryConfig;

const USER_AGENT: &str = concat!("rbistats/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_BACKOFF_MS: u64 = 5 * 60 * 1000;

/// `initial_ms * 2^(attempt-1)`, capped at `MAX_BACKOFF_MS`.
fn backoff_ms(initial_ms: u64, attempt: u32) -> u64 {
    let factor = 2u64.checked_pow(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    initial_ms.saturating_mul(factor).min(MAX_BACKOFF_MS)
}

/// reqwest-backed fetcher with exponential backoff on every request.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retry: RetryConfig,
}

impl HttpFetcher {
    pub fn new(retry: RetryConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .gzip(true)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, retry })
    }

    /// Exponential backoff between attempts, up to `max_retries` retries.
    async fn with_retry<T, F, Fut>(&self, url: &str, op: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempts = 0;
        loop {
            match op().await {
                Ok(t) => return Ok(t),
                Err(e) if attempts < self.retry.max_retries => {
                    attempts += 1;
                    let backoff = backoff_ms(self.retry.initial_backoff_ms, attempts);
                    warn!(%url, attempt = attempts, delay_ms = backoff, error = %e, "Retrying");
                    sleep(Duration::from_millis(backoff)).await;
                }
                Err(e) => {
                    error!(%url, error = %e, "Exhausted retries");
                    return Err(e);
                }
            }
        }
    }

    async fn get_text_core(&self, url: &str) -> Result<String> {
        let text = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }

    async fn get_bytes_core(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

impl ResourceFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!(%url, "fetching page");
        self.with_retry(url, || self.get_text_core(url))
            .await
            .with_context(|| format!("fetching page {url}"))
    }

    async fn fetch_workbook(&self, url: &str) -> Result<Vec<u8>> {
        debug!(%url, "fetching workbook");
        self.with_retry(url, || self.get_bytes_core(url))
            .await
            .with_context(|| format!("downloading {url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff_ms(500, 1), 500);
        assert_eq!(backoff_ms(500, 2), 1000);
        assert_eq!(backoff_ms(500, 4), 4000);
        assert_eq!(backoff_ms(500, 64), MAX_BACKOFF_MS);
        assert_eq!(backoff_ms(u64::MAX, 2), MAX_BACKOFF_MS);
        assert_eq!(backoff_ms(0, 100), 0);
    }
}
