use super::Fetcher;
use crate::config::ImportConfig;
use crate::error::ImportError;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;

pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, ImportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ImportError::ClientError(e.to_string()))?;

        Ok(Self { client })
    }

    pub fn from_config(config: &ImportConfig) -> Result<Self, ImportError> {
        Self::new(Duration::from_secs(config.timeout), &config.user_agent)
    }
}

#[async_trait]
impl Fetcher for RequestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ImportError> {
        debug!("RequestFetcher: GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("RequestFetcher: {} answered {}", url, status);
            return Err(ImportError::UpstreamError {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let html = response.text().await?;
        Ok(html)
    }
}
