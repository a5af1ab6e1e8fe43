pub mod config;

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::error::PinError;
use crate::types::ProviderEnvelope;

pub use config::ProviderConfig;

pub(crate) const MALFORMED_RESPONSE: &str = "Malformed provider response";

/// Retrieves the raw provider envelope for an already-validated pin URL.
#[async_trait]
pub trait PinSource: Send + Sync {
    async fn fetch_raw(&self, url: &str) -> Result<ProviderEnvelope, PinError>;
}

/// HTTP client for the RapidAPI-hosted pin downloader.
pub struct RapidApiSource {
    client: reqwest::Client,
    endpoint: Url,
    api_host: String,
    api_key: String,
}

impl RapidApiSource {
    pub fn new(cfg: &ProviderConfig) -> Result<Self> {
        let api_key = cfg.require_key()?.to_string();
        let endpoint = Url::parse(&cfg.endpoint)
            .with_context(|| format!("invalid provider endpoint: {}", cfg.endpoint))?;
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .context("building provider HTTP client")?;
        Ok(Self {
            client,
            endpoint,
            api_host: cfg.api_host.clone(),
            api_key,
        })
    }

    fn request_url(&self, url: &str) -> Url {
        let mut u = self.endpoint.clone();
        u.query_pairs_mut().append_pair("url", url);
        u
    }
}

#[async_trait]
impl PinSource for RapidApiSource {
    async fn fetch_raw(&self, url: &str) -> Result<ProviderEnvelope, PinError> {
        let resp = self
            .client
            .get(self.request_url(url))
            .header("content-type", "application/json")
            .header("x-rapidapi-host", &self.api_host)
            .header("x-rapidapi-key", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "provider request failed");
                PinError::upstream(Some(e.to_string()))
            })?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("provider rate limited the request");
            return Err(PinError::UpstreamRateLimited);
        }
        if !status.is_success() {
            let message = resp
                .json::<ProviderEnvelope>()
                .await
                .ok()
                .and_then(|e| e.message().map(str::to_string));
            tracing::warn!(%status, ?message, "provider returned an error status");
            return Err(PinError::upstream(message));
        }

        resp.json::<ProviderEnvelope>().await.map_err(|e| {
            tracing::warn!(error = %e, "provider response did not parse");
            PinError::UpstreamRequestFailed(MALFORMED_RESPONSE.to_string())
        })
    }
}
