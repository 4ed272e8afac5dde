// src/ingest/fetch.rs
//! Single-attempt HTTP GET shared by both collectors.

use anyhow::Context;
use metrics::counter;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("empty body")]
    EmptyBody,
}

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build the client with the configured user-agent and per-request timeout.
    pub fn new(cfg: &AppConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(&cfg.user_agent)
            .timeout(cfg.http_timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }

    /// GET `url` once. Only a 200 with a non-empty body counts as success.
    pub async fn try_get(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status));
        }
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(body)
    }

    /// Like [`Fetcher::try_get`], but failures are logged and collapsed to `None`.
    pub async fn get(&self, url: &str) -> Option<String> {
        match self.try_get(url).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(url, error = %e, "GET failed");
                counter!("editais_fetch_errors_total").increment(1);
                None
            }
        }
    }
}
